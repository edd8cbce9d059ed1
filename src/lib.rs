//! tn3270r - IBM 3270 data stream decoder and screen buffer model
//!
//! This crate turns an inbound 3270 datastream message into a live screen
//! model: a fixed-size cell buffer plus an ordered collection of fields,
//! contiguous non-overlapping buffer ranges carrying formatting attributes.
//!
//! # Architecture
//!
//! Data flows one way: raw bytes go through the [`order::OrderStreamParser`]
//! into a sequence of typed orders, which the [`screen::ScreenBuffer`] state
//! machine applies, maintaining the cursor, the cells, and the field list
//! through the [`field::FieldList`] primitives. External renderers consume
//! the read-only snapshot API; the network transport that delivers the bytes
//! is someone else's problem.
//!
//! # Example
//!
//! ```
//! use tn3270r::{AddressingMode, DatastreamProcessor, ScreenBuffer, ScreenSize};
//!
//! let mut screen = ScreenBuffer::new(ScreenSize::Model2);
//! let processor = DatastreamProcessor::new(AddressingMode::TwelveBit);
//!
//! // Write command, WCC restore, then text at buffer address 0
//! let message = [0x01, 0x02, 0xC8, 0xC9]; // "HI" in EBCDIC
//! processor.apply_message(&message, &mut screen).unwrap();
//! assert_eq!(screen.cell_at(0).unwrap().ch, 'H');
//! ```

/// Protocol constants: command codes, order codes, attribute bits
pub mod codes;

/// 12-bit and 14-bit buffer address codec
pub mod addressing;

/// Tagged attribute decoding for SF/SFE/SA payloads
pub mod attribute;

/// Field interval model: containment, overlap, split, merge
pub mod field;

/// Order stream tokenizer
pub mod order;

/// Screen buffer state machine and snapshot API
pub mod screen;

/// Command/WCC layer over the order stream
pub mod protocol;

/// EBCDIC CP037 translation
pub mod ebcdic;

/// Error taxonomy for datastream processing
pub mod error;

/// Per-session configuration
pub mod config;

// Re-exports for easy access
pub use addressing::AddressingMode;
pub use attribute::{Attribute, BasicAttribute, ExtendedAttributes};
pub use config::SessionConfig;
pub use error::DatastreamError;
pub use field::{Field, FieldAttributes, FieldList};
pub use order::{Order, OrderStreamParser};
pub use protocol::DatastreamProcessor;
pub use screen::{CellView, ScreenBuffer, ScreenSize};
