//! 3270 attribute decoding
//!
//! Attributes arrive as type/value byte pairs in the Start Field Extended
//! (SFE) and Set Attribute (SA) orders, plus the single basic attribute byte
//! of the Start Field (SF) order. Decoding dispatches on the type byte into a
//! tagged enum; each variant is total over its one-byte payload, so every bit
//! pattern produces a value even when the protocol reserves it. Unknown type
//! bytes are errors at the dispatch level, never guessed.

use crate::codes::*;
use crate::error::DatastreamError;

/// The basic field attribute byte carried by the SF order
///
/// Bit layout follows GA23-0059: protection, numeric shift, display
/// intensity, and the Modified Data Tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BasicAttribute(u8);

impl BasicAttribute {
    pub fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// Raw attribute byte as received
    pub fn byte(self) -> u8 {
        self.0
    }

    /// Check if field is protected
    pub fn is_protected(self) -> bool {
        (self.0 & ATTR_PROTECTED) != 0
    }

    /// Check if field is numeric
    pub fn is_numeric(self) -> bool {
        (self.0 & ATTR_NUMERIC) != 0
    }

    /// Check if field is hidden (non-display)
    pub fn is_hidden(self) -> bool {
        (self.0 & ATTR_DISPLAY) == DISPLAY_HIDDEN
    }

    /// Check if field is intensified
    pub fn is_intensified(self) -> bool {
        (self.0 & ATTR_DISPLAY) == DISPLAY_INTENSIFIED
    }

    /// Check if the Modified Data Tag (MDT) is set
    pub fn is_modified(self) -> bool {
        (self.0 & ATTR_MDT) != 0
    }

    /// Set or clear the Modified Data Tag (MDT)
    pub fn set_modified(&mut self, modified: bool) {
        if modified {
            self.0 |= ATTR_MDT;
        } else {
            self.0 &= !ATTR_MDT;
        }
    }
}

/// One decoded attribute type/value pair
///
/// `Basic` carries the 3270 field attribute byte (type 0xC0); the remaining
/// variants carry the extended attribute payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Basic(BasicAttribute),
    Highlighting(u8),
    ForegroundColor(u8),
    BackgroundColor(u8),
    CharacterSet(u8),
    Validation(u8),
    Outlining(u8),
    Transparency(u8),
}

impl Attribute {
    /// Decode one type/value pair read at `offset` in the stream
    pub fn decode(attr_type: u8, value: u8, offset: usize) -> Result<Self, DatastreamError> {
        match attr_type {
            XA_3270 => Ok(Self::Basic(BasicAttribute::new(value))),
            XA_HIGHLIGHTING => Ok(Self::Highlighting(value)),
            XA_FOREGROUND => Ok(Self::ForegroundColor(value)),
            XA_BACKGROUND => Ok(Self::BackgroundColor(value)),
            XA_CHARSET => Ok(Self::CharacterSet(value)),
            XA_VALIDATION => Ok(Self::Validation(value)),
            XA_OUTLINING => Ok(Self::Outlining(value)),
            XA_TRANSPARENCY => Ok(Self::Transparency(value)),
            _ => Err(DatastreamError::UnsupportedAttribute {
                offset,
                attribute_type: attr_type,
            }),
        }
    }

    /// The wire type byte for this attribute
    pub fn type_byte(self) -> u8 {
        match self {
            Self::Basic(_) => XA_3270,
            Self::Highlighting(_) => XA_HIGHLIGHTING,
            Self::ForegroundColor(_) => XA_FOREGROUND,
            Self::BackgroundColor(_) => XA_BACKGROUND,
            Self::CharacterSet(_) => XA_CHARSET,
            Self::Validation(_) => XA_VALIDATION,
            Self::Outlining(_) => XA_OUTLINING,
            Self::Transparency(_) => XA_TRANSPARENCY,
        }
    }
}

/// Extended attributes collected from SFE pairs
///
/// Each value is optional; an extended attribute overrides the corresponding
/// basic-byte behavior where both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedAttributes {
    pub highlighting: Option<u8>,
    pub foreground_color: Option<u8>,
    pub background_color: Option<u8>,
    pub charset: Option<u8>,
    pub validation: Option<u8>,
    pub outlining: Option<u8>,
    pub transparency: Option<u8>,
}

impl ExtendedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded attribute into the set; `Basic` is returned to the
    /// caller's basic byte instead
    pub fn apply(&mut self, attribute: Attribute) -> Option<BasicAttribute> {
        match attribute {
            Attribute::Basic(basic) => return Some(basic),
            Attribute::Highlighting(v) => self.highlighting = Some(v),
            Attribute::ForegroundColor(v) => self.foreground_color = Some(v),
            Attribute::BackgroundColor(v) => self.background_color = Some(v),
            Attribute::CharacterSet(v) => self.charset = Some(v),
            Attribute::Validation(v) => self.validation = Some(v),
            Attribute::Outlining(v) => self.outlining = Some(v),
            Attribute::Transparency(v) => self.transparency = Some(v),
        }
        None
    }

    /// Set highlighting attribute
    pub fn with_highlighting(mut self, highlighting: u8) -> Self {
        self.highlighting = Some(highlighting);
        self
    }

    /// Set foreground color
    pub fn with_foreground(mut self, color: u8) -> Self {
        self.foreground_color = Some(color);
        self
    }

    /// Set validation attribute
    pub fn with_validation(mut self, validation: u8) -> Self {
        self.validation = Some(validation);
        self
    }
}
