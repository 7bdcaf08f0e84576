// src/ops.rs
//
// Pipeline operations.
// These are cheap to create and store - the pixel work happens in apply_ops().

use bitflags::bitflags;

/// Image operations that can be queued for execution.
///
/// Each operation is self-contained: no references, no lifetimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Mirror every row left-to-right
    FlipH,

    /// Mirror the row order top-to-bottom
    FlipV,
}

bitflags! {
    /// Requested mirror axes, as passed by callers of `flip_image`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct FlipFlags: u8 {
        const HORIZONTAL = 0b01;
        const VERTICAL = 0b10;
    }
}

impl FlipFlags {
    pub fn from_bools(horizontal: bool, vertical: bool) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::HORIZONTAL, horizontal);
        flags.set(Self::VERTICAL, vertical);
        flags
    }

    /// Expand into operations. Horizontal always comes before vertical.
    pub fn to_ops(self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(2);
        if self.contains(Self::HORIZONTAL) {
            ops.push(Operation::FlipH);
        }
        if self.contains(Self::VERTICAL) {
            ops.push(Operation::FlipV);
        }
        ops
    }
}
