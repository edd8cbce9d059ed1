//! Error handling for 3270 datastream processing
//!
//! This module provides structured error types for datastream decoding and
//! screen buffer maintenance. Decode errors abort the current inbound message
//! and are returned to the caller; they are never swallowed or auto-corrected.

use std::error::Error as StdError;
use std::fmt;

/// Errors raised while decoding or applying a 3270 datastream message
///
/// Every decode-level variant carries the byte offset (within the inbound
/// message) at which the problem was detected, so the transport layer can
/// report exactly where a stream went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastreamError {
    /// A buffer address decoded outside the valid range, or an address byte
    /// was not part of the 3270 address alphabet
    AddressDecode {
        offset: usize,
        value: u16,
        limit: usize,
    },
    /// An order expected more payload bytes than remain in the message
    TruncatedStream {
        offset: usize,
        expected: usize,
        remaining: usize,
    },
    /// A control-range byte that is not a recognized order or command code
    UnsupportedOpcode { offset: usize, opcode: u8 },
    /// An extended attribute type byte that no decoder claims
    UnsupportedAttribute { offset: usize, attribute_type: u8 },
    /// The field list was found sorted incorrectly or overlapping.
    /// Always a defect; fatal to the affected session, never repaired.
    InvariantViolation { detail: String },
}

impl DatastreamError {
    /// Byte offset within the inbound message, where one applies
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::AddressDecode { offset, .. }
            | Self::TruncatedStream { offset, .. }
            | Self::UnsupportedOpcode { offset, .. }
            | Self::UnsupportedAttribute { offset, .. } => Some(*offset),
            Self::InvariantViolation { .. } => None,
        }
    }

    /// True for errors that must terminate the session rather than the message
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }

    /// Rebase the offset of an error raised against a sub-slice of the
    /// message so it points into the full message
    pub fn rebased(mut self, base: usize) -> Self {
        match &mut self {
            Self::AddressDecode { offset, .. }
            | Self::TruncatedStream { offset, .. }
            | Self::UnsupportedOpcode { offset, .. }
            | Self::UnsupportedAttribute { offset, .. } => *offset += base,
            Self::InvariantViolation { .. } => {}
        }
        self
    }
}

impl fmt::Display for DatastreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressDecode {
                offset,
                value,
                limit,
            } => write!(
                f,
                "invalid buffer address {value} at offset {offset} (buffer size {limit})"
            ),
            Self::TruncatedStream {
                offset,
                expected,
                remaining,
            } => write!(
                f,
                "truncated datastream at offset {offset}: order needs {expected} more byte(s), {remaining} remain"
            ),
            Self::UnsupportedOpcode { offset, opcode } => {
                write!(f, "unsupported opcode 0x{opcode:02X} at offset {offset}")
            }
            Self::UnsupportedAttribute {
                offset,
                attribute_type,
            } => write!(
                f,
                "unsupported attribute type 0x{attribute_type:02X} at offset {offset}"
            ),
            Self::InvariantViolation { detail } => {
                write!(f, "field list invariant violated: {detail}")
            }
        }
    }
}

impl StdError for DatastreamError {}
