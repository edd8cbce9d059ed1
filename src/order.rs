//! 3270 order stream parsing
//!
//! Tokenizes the byte sequence of one inbound message into typed [`Order`]
//! values. The parser reads one opcode byte at a time and dispatches to a
//! fixed-arity reader (SBA, RA, EUA take an address; SF takes one attribute
//! byte) or a variable-arity reader (SFE consumes a pair-count prefix; text
//! runs continue until the next recognized opcode or end of stream).
//!
//! Parsing is lazy and restartable: the byte offset can be saved and restored
//! with [`OrderStreamParser::offset`] and [`OrderStreamParser::seek`], though
//! sessions consume messages front to back.

use crate::addressing::AddressingMode;
use crate::attribute::{Attribute, BasicAttribute};
use crate::codes::{OrderCode, DATA_NUL};
use crate::error::DatastreamError;

/// One decoded datastream instruction
///
/// Ephemeral: produced by the parser, applied to the screen buffer, and
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    StartField(BasicAttribute),
    StartFieldExtended(Vec<Attribute>),
    SetBufferAddress(u16),
    SetAttribute(Attribute),
    RepeatToAddress(u16, u8),
    EraseUnprotectedToAddress(u16),
    InsertCursor,
    ProgramTab,
    GraphicEscape(u8),
    Text(Vec<u8>),
}

/// Lazy tokenizer over the order portion of one inbound message
#[derive(Debug)]
pub struct OrderStreamParser<'a> {
    data: &'a [u8],
    pos: usize,
    mode: AddressingMode,
    buffer_size: usize,
}

impl<'a> OrderStreamParser<'a> {
    pub fn new(data: &'a [u8], mode: AddressingMode, buffer_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            mode,
            buffer_size,
        }
    }

    /// Current byte offset into the message
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Restart parsing from a saved byte offset
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.data.len());
    }

    /// Decode the next order, or `None` at end of stream
    pub fn next_order(&mut self) -> Result<Option<Order>, DatastreamError> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }

        let opcode = self.data[self.pos];
        if let Some(order) = OrderCode::from_u8(opcode) {
            self.pos += 1;
            return self.read_order(order).map(Some);
        }

        if is_text_byte(opcode) {
            return Ok(Some(self.read_text_run()));
        }

        Err(DatastreamError::UnsupportedOpcode {
            offset: self.pos,
            opcode,
        })
    }

    fn read_order(&mut self, order: OrderCode) -> Result<Order, DatastreamError> {
        match order {
            OrderCode::StartField => {
                let attr = self.read_byte(1)?;
                Ok(Order::StartField(BasicAttribute::new(attr)))
            }
            OrderCode::StartFieldExtended => self.read_start_field_extended(),
            OrderCode::SetBufferAddress => Ok(Order::SetBufferAddress(self.read_address()?)),
            OrderCode::SetAttribute => {
                let offset = self.pos;
                let attr_type = self.read_byte(2)?;
                let value = self.read_byte(1)?;
                Ok(Order::SetAttribute(Attribute::decode(
                    attr_type, value, offset,
                )?))
            }
            OrderCode::InsertCursor => Ok(Order::InsertCursor),
            OrderCode::ProgramTab => Ok(Order::ProgramTab),
            OrderCode::RepeatToAddress => {
                let target = self.read_address()?;
                let fill = self.read_byte(1)?;
                Ok(Order::RepeatToAddress(target, fill))
            }
            OrderCode::EraseUnprotectedToAddress => {
                Ok(Order::EraseUnprotectedToAddress(self.read_address()?))
            }
            OrderCode::GraphicEscape => Ok(Order::GraphicEscape(self.read_byte(1)?)),
        }
    }

    /// SFE: a pair-count byte followed by that many type/value pairs
    fn read_start_field_extended(&mut self) -> Result<Order, DatastreamError> {
        let count = self.read_byte(1)? as usize;
        let mut attributes = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = self.pos;
            let attr_type = self.read_byte(2)?;
            let value = self.read_byte(1)?;
            attributes.push(Attribute::decode(attr_type, value, offset)?);
        }
        Ok(Order::StartFieldExtended(attributes))
    }

    /// Collect a run of displayable data bytes into one Text order
    fn read_text_run(&mut self) -> Order {
        let start = self.pos;
        while self.pos < self.data.len() {
            let byte = self.data[self.pos];
            if OrderCode::from_u8(byte).is_some() || !is_text_byte(byte) {
                break;
            }
            self.pos += 1;
        }
        Order::Text(self.data[start..self.pos].to_vec())
    }

    fn read_byte(&mut self, expected: usize) -> Result<u8, DatastreamError> {
        if self.pos >= self.data.len() {
            return Err(DatastreamError::TruncatedStream {
                offset: self.pos,
                expected,
                remaining: 0,
            });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    fn read_address(&mut self) -> Result<u16, DatastreamError> {
        let offset = self.pos;
        let remaining = self.data.len() - self.pos;
        if remaining < 2 {
            return Err(DatastreamError::TruncatedStream {
                offset,
                expected: 2,
                remaining,
            });
        }
        let byte1 = self.data[self.pos];
        let byte2 = self.data[self.pos + 1];
        self.pos += 2;
        self.mode.decode(byte1, byte2, self.buffer_size, offset)
    }
}

impl<'a> Iterator for OrderStreamParser<'a> {
    type Item = Result<Order, DatastreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_order().transpose()
    }
}

/// Data bytes are EBCDIC NUL or anything at or above 0x40; other
/// control-range bytes must be recognized orders
fn is_text_byte(byte: u8) -> bool {
    byte == DATA_NUL || byte >= 0x40
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::*;

    fn parse_all(data: &[u8]) -> Result<Vec<Order>, DatastreamError> {
        OrderStreamParser::new(data, AddressingMode::TwelveBit, 1920).collect()
    }

    #[test]
    fn test_start_field_and_text() {
        let data = vec![ORDER_SF, ATTR_PROTECTED, 0xC8, 0xC5, 0xD3];
        let orders = parse_all(&data).unwrap();
        assert_eq!(orders.len(), 2);
        match &orders[0] {
            Order::StartField(attr) => assert!(attr.is_protected()),
            other => panic!("unexpected order: {other:?}"),
        }
        assert_eq!(orders[1], Order::Text(vec![0xC8, 0xC5, 0xD3]));
    }

    #[test]
    fn test_set_buffer_address() {
        let (b1, b2) = AddressingMode::TwelveBit.encode(100);
        let orders = parse_all(&[ORDER_SBA, b1, b2]).unwrap();
        assert_eq!(orders, vec![Order::SetBufferAddress(100)]);
    }

    #[test]
    fn test_repeat_to_address() {
        let (b1, b2) = AddressingMode::TwelveBit.encode(500);
        let orders = parse_all(&[ORDER_RA, b1, b2, 0x40]).unwrap();
        assert_eq!(orders, vec![Order::RepeatToAddress(500, 0x40)]);
    }

    #[test]
    fn test_start_field_extended() {
        let data = vec![
            ORDER_SFE,
            0x02, // two pairs
            XA_3270,
            ATTR_PROTECTED,
            XA_FOREGROUND,
            COLOR_RED,
        ];
        let orders = parse_all(&data).unwrap();
        match &orders[0] {
            Order::StartFieldExtended(attrs) => {
                assert_eq!(attrs.len(), 2);
                assert_eq!(attrs[1], Attribute::ForegroundColor(COLOR_RED));
            }
            other => panic!("unexpected order: {other:?}"),
        }
    }

    #[test]
    fn test_sfe_unknown_attribute_type() {
        let data = vec![ORDER_SFE, 0x01, 0x99, 0x00];
        let err = parse_all(&data).unwrap_err();
        assert_eq!(
            err,
            DatastreamError::UnsupportedAttribute {
                offset: 2,
                attribute_type: 0x99,
            }
        );
    }

    #[test]
    fn test_truncated_sba() {
        let err = parse_all(&[ORDER_SBA, 0x40]).unwrap_err();
        assert_eq!(
            err,
            DatastreamError::TruncatedStream {
                offset: 1,
                expected: 2,
                remaining: 1,
            }
        );
    }

    #[test]
    fn test_truncated_sf() {
        let err = parse_all(&[ORDER_SF]).unwrap_err();
        assert!(matches!(err, DatastreamError::TruncatedStream { .. }));
    }

    #[test]
    fn test_unsupported_opcode_offset() {
        // 0x2C (Modify Field) is outside the supported order set
        let data = vec![0xC1, 0xC2, 0x2C];
        let mut parser = OrderStreamParser::new(&data, AddressingMode::TwelveBit, 1920);
        assert!(matches!(parser.next_order(), Ok(Some(Order::Text(_)))));
        let err = parser.next_order().unwrap_err();
        assert_eq!(
            err,
            DatastreamError::UnsupportedOpcode {
                offset: 2,
                opcode: 0x2C,
            }
        );
    }

    #[test]
    fn test_nul_bytes_are_data() {
        let orders = parse_all(&[0x00, 0x00, 0xC1]).unwrap();
        assert_eq!(orders, vec![Order::Text(vec![0x00, 0x00, 0xC1])]);
    }

    #[test]
    fn test_restart_from_saved_offset() {
        let (b1, b2) = AddressingMode::TwelveBit.encode(10);
        let data = vec![ORDER_SBA, b1, b2, ORDER_IC, 0xC1];
        let mut parser = OrderStreamParser::new(&data, AddressingMode::TwelveBit, 1920);
        parser.next_order().unwrap();
        let saved = parser.offset();
        assert_eq!(parser.next_order().unwrap(), Some(Order::InsertCursor));

        parser.seek(saved);
        assert_eq!(parser.next_order().unwrap(), Some(Order::InsertCursor));
        assert_eq!(parser.next_order().unwrap(), Some(Order::Text(vec![0xC1])));
        assert_eq!(parser.next_order().unwrap(), None);
    }

    #[test]
    fn test_insert_cursor_and_program_tab() {
        let orders = parse_all(&[ORDER_IC, ORDER_PT]).unwrap();
        assert_eq!(orders, vec![Order::InsertCursor, Order::ProgramTab]);
    }

    #[test]
    fn test_graphic_escape() {
        let orders = parse_all(&[ORDER_GE, 0x1D]).unwrap();
        assert_eq!(orders, vec![Order::GraphicEscape(0x1D)]);
    }
}
