// src/error.rs
//
// Unified error handling for imgflip
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - IoError: missing/unreadable/unwritable files, short reads
// - FormatError: header or payload does not describe a valid image
// - ResourceLimit: firewall limits
// - UserError: invalid configuration from the caller

use std::borrow::Cow;
use thiserror::Error;

/// Error taxonomy.
///
/// Every error surfaces through one of these four tiers, so callers that only
/// care about "bad file" vs "bad disk" can branch on the category alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// File missing, unreadable, unwritable, or shorter than it claimed
    IoError,
    /// Header or payload violates the format
    FormatError,
    /// Input rejected by configured limits
    ResourceLimit,
    /// Invalid configuration supplied by the caller
    UserError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::IoError => "IoError",
            ErrorCategory::FormatError => "FormatError",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::UserError => "UserError",
        }
    }
}

/// imgflip error types
#[derive(Debug, Error)]
pub enum ImgFlipError {
    // File I/O Errors
    #[error("File not found: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("Failed to read file '{path}': {source}")]
    FileReadFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to memory-map file '{path}': {source}")]
    MmapFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWriteFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Truncated header: expected 8 bytes, got {actual}")]
    TruncatedHeader { actual: usize },

    #[error("Truncated payload: expected {expected} bytes, read {actual}")]
    TruncatedPayload { expected: u64, actual: u64 },

    // Format Errors
    #[error("Invalid byte order marker 0x{marker:04x}")]
    InvalidMarker { marker: u16 },

    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u16, height: u16 },

    #[error("Reserved format bits set in format word 0x{format:04x}")]
    ReservedBitsSet { format: u16 },

    #[error("Invalid channel code 0b{code:02b}")]
    InvalidChannelCode { code: u16 },

    #[error("Invalid bit depth code 0b{code:03b}")]
    InvalidBitDepthCode { code: u16 },

    #[error("Unsupported bit depth: {bits} bit(s) per channel cannot be stored as whole bytes")]
    UnsupportedBitDepth { bits: u8 },

    #[error("Payload length mismatch: header declares {expected} bytes, file holds {actual}")]
    PayloadLengthMismatch { expected: u64, actual: u64 },

    // Limit Errors
    #[error("Image Firewall blocked the image: {reason}")]
    FirewallViolation { reason: Cow<'static, str> },

    // Configuration Errors
    #[error("Unknown firewall policy: '{policy}'. Expected strict, lenient, custom or disabled")]
    InvalidFirewallPolicy { policy: Cow<'static, str> },
}

impl Clone for ImgFlipError {
    fn clone(&self) -> Self {
        fn clone_io(source: &std::io::Error) -> std::io::Error {
            std::io::Error::new(source.kind(), source.to_string())
        }

        match self {
            Self::FileNotFound { path } => Self::FileNotFound { path: path.clone() },
            Self::FileReadFailed { path, source } => Self::FileReadFailed {
                path: path.clone(),
                source: clone_io(source),
            },
            Self::MmapFailed { path, source } => Self::MmapFailed {
                path: path.clone(),
                source: clone_io(source),
            },
            Self::FileWriteFailed { path, source } => Self::FileWriteFailed {
                path: path.clone(),
                source: clone_io(source),
            },
            Self::TruncatedHeader { actual } => Self::TruncatedHeader { actual: *actual },
            Self::TruncatedPayload { expected, actual } => Self::TruncatedPayload {
                expected: *expected,
                actual: *actual,
            },
            Self::InvalidMarker { marker } => Self::InvalidMarker { marker: *marker },
            Self::ZeroDimension { width, height } => Self::ZeroDimension {
                width: *width,
                height: *height,
            },
            Self::ReservedBitsSet { format } => Self::ReservedBitsSet { format: *format },
            Self::InvalidChannelCode { code } => Self::InvalidChannelCode { code: *code },
            Self::InvalidBitDepthCode { code } => Self::InvalidBitDepthCode { code: *code },
            Self::UnsupportedBitDepth { bits } => Self::UnsupportedBitDepth { bits: *bits },
            Self::PayloadLengthMismatch { expected, actual } => Self::PayloadLengthMismatch {
                expected: *expected,
                actual: *actual,
            },
            Self::FirewallViolation { reason } => Self::FirewallViolation {
                reason: reason.clone(),
            },
            Self::InvalidFirewallPolicy { policy } => Self::InvalidFirewallPolicy {
                policy: policy.clone(),
            },
        }
    }
}

// Constructor Helpers
impl ImgFlipError {
    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Map an open/read failure, promoting `NotFound` to [`ImgFlipError::FileNotFound`].
    pub fn from_open_error(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::file_not_found(path)
        } else {
            Self::file_read_failed(path, source)
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn file_write_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn truncated_header(actual: usize) -> Self {
        Self::TruncatedHeader { actual }
    }

    pub fn truncated_payload(expected: u64, actual: u64) -> Self {
        Self::TruncatedPayload { expected, actual }
    }

    pub fn invalid_marker(marker: u16) -> Self {
        Self::InvalidMarker { marker }
    }

    pub fn zero_dimension(width: u16, height: u16) -> Self {
        Self::ZeroDimension { width, height }
    }

    pub fn reserved_bits_set(format: u16) -> Self {
        Self::ReservedBitsSet { format }
    }

    pub fn invalid_channel_code(code: u16) -> Self {
        Self::InvalidChannelCode { code }
    }

    pub fn invalid_bit_depth_code(code: u16) -> Self {
        Self::InvalidBitDepthCode { code }
    }

    pub fn unsupported_bit_depth(bits: u8) -> Self {
        Self::UnsupportedBitDepth { bits }
    }

    pub fn payload_length_mismatch(expected: u64, actual: u64) -> Self {
        Self::PayloadLengthMismatch { expected, actual }
    }

    pub fn firewall_violation(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::FirewallViolation {
            reason: reason.into(),
        }
    }

    pub fn invalid_firewall_policy(policy: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidFirewallPolicy {
            policy: policy.into(),
        }
    }

    /// Check if this error is recoverable (user can fix it)
    ///
    /// Consistent with category():
    /// - IoError, ResourceLimit and UserError are recoverable (fix the path, raise the limit, ...)
    /// - FormatError is not: the file itself is bad
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::IoError | ErrorCategory::ResourceLimit | ErrorCategory::UserError => {
                true
            }
            ErrorCategory::FormatError => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. }
            | Self::FileWriteFailed { .. }
            | Self::TruncatedHeader { .. }
            | Self::TruncatedPayload { .. } => ErrorCategory::IoError,

            Self::InvalidMarker { .. }
            | Self::ZeroDimension { .. }
            | Self::ReservedBitsSet { .. }
            | Self::InvalidChannelCode { .. }
            | Self::InvalidBitDepthCode { .. }
            | Self::UnsupportedBitDepth { .. }
            | Self::PayloadLengthMismatch { .. } => ErrorCategory::FormatError,

            Self::FirewallViolation { .. } => ErrorCategory::ResourceLimit,

            Self::InvalidFirewallPolicy { .. } => ErrorCategory::UserError,
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, ImgFlipError>;
