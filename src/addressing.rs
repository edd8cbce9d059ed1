//! 3270 buffer address codec
//!
//! 3270 buffer addresses pack 12 or 14 significant bits into two bytes. In
//! 12-bit mode each byte carries 6 address bits through a non-linear alphabet
//! whose two high bits are format bits, not address bits. 14-bit mode masks
//! the two high bits of the first byte and takes the second byte whole.
//!
//! The mode is fixed at session setup; screens up to 4096 positions use
//! 12-bit addressing, larger screens require 14-bit.

use serde::{Deserialize, Serialize};

use crate::error::DatastreamError;

/// Buffer address width negotiated for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressingMode {
    /// Two 6-bit address bytes, up to 4096 positions
    TwelveBit,
    /// 6 + 8 address bits, up to 16384 positions
    FourteenBit,
}

impl AddressingMode {
    /// Largest address this mode can carry
    pub fn max_address(self) -> u16 {
        match self {
            Self::TwelveBit => 0x0FFF,
            Self::FourteenBit => 0x3FFF,
        }
    }

    /// Decode a two-byte buffer address read at `offset` in the stream
    ///
    /// A byte outside the address alphabet, or a decoded value at or beyond
    /// `buffer_size`, is reported as an error rather than clamped.
    pub fn decode(
        self,
        byte1: u8,
        byte2: u8,
        buffer_size: usize,
        offset: usize,
    ) -> Result<u16, DatastreamError> {
        let address = match self {
            Self::TwelveBit => {
                let high = decode_address_byte(byte1).ok_or(DatastreamError::AddressDecode {
                    offset,
                    value: byte1 as u16,
                    limit: buffer_size,
                })?;
                let low = decode_address_byte(byte2).ok_or(DatastreamError::AddressDecode {
                    offset: offset + 1,
                    value: byte2 as u16,
                    limit: buffer_size,
                })?;
                ((high as u16) << 6) | low as u16
            }
            Self::FourteenBit => (((byte1 & 0x3F) as u16) << 8) | byte2 as u16,
        };

        if (address as usize) >= buffer_size {
            return Err(DatastreamError::AddressDecode {
                offset,
                value: address,
                limit: buffer_size,
            });
        }

        Ok(address)
    }

    /// Encode a buffer address into its two-byte wire form
    pub fn encode(self, address: u16) -> (u8, u8) {
        match self {
            Self::TwelveBit => {
                let high = ((address >> 6) & 0x3F) as u8;
                let low = (address & 0x3F) as u8;
                (encode_address_byte(high), encode_address_byte(low))
            }
            Self::FourteenBit => (((address >> 8) & 0x3F) as u8, (address & 0xFF) as u8),
        }
    }
}

/// Decode a single 12-bit-mode address byte to its 6-bit value
///
/// The alphabet covers 0x40..=0x7F and the alternate rows 0xC0..=0xFF;
/// anything else is not an address byte.
fn decode_address_byte(byte: u8) -> Option<u8> {
    match byte {
        0x40..=0x7F => Some(byte - 0x40),
        0xC0..=0xFF => Some(byte - 0xC0),
        _ => None,
    }
}

/// Encode a 6-bit value to the canonical (0x40-row) address byte
fn encode_address_byte(value: u8) -> u8 {
    0x40 + (value & 0x3F)
}
