// src/engine/pipeline.rs
//
// Pipeline operations: apply_ops, optimize_ops

use crate::engine::image::RawImage;
use crate::ops::Operation;
use tracing::debug;

/// Drop adjacent identical flips; each pair cancels out.
///
/// Relative order of the remaining operations is unchanged.
pub fn optimize_ops(ops: &[Operation]) -> Vec<Operation> {
    let mut optimized: Vec<Operation> = Vec::with_capacity(ops.len());
    for &op in ops {
        if optimized.last() == Some(&op) {
            optimized.pop();
        } else {
            optimized.push(op);
        }
    }
    optimized
}

/// Apply operations in place, in order.
pub fn apply_ops(img: &mut RawImage, ops: &[Operation]) {
    let optimized = optimize_ops(ops);
    if optimized.len() != ops.len() {
        debug!(
            target: "imgflip::pipeline",
            requested = ops.len(),
            applied = optimized.len(),
            "cancelled redundant flips"
        );
    }

    for op in &optimized {
        debug!(
            target: "imgflip::pipeline",
            op = ?op,
            width = img.width(),
            height = img.height(),
            "apply"
        );
        match op {
            Operation::FlipH => img.flip_horizontal(),
            Operation::FlipV => img.flip_vertical(),
        }
    }
}
