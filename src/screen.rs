//! 3270 screen buffer state machine
//!
//! [`ScreenBuffer`] owns the fixed-size cell array, the cursor, and the field
//! list for one terminal session. Orders mutate it sequentially, in arrival
//! order; field structure is maintained exclusively through the
//! [`FieldList`] primitives, and split/merge always happen before any
//! character write the new field is meant to format.
//!
//! All cursor arithmetic is modulo the buffer size: writing past the last
//! cell continues at cell zero.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, ExtendedAttributes};
use crate::codes::DATA_NUL;
use crate::ebcdic::ebcdic_to_char;
use crate::error::DatastreamError;
use crate::field::{Field, FieldAttributes, FieldList};
use crate::order::{Order, OrderStreamParser};

/// Standard 3270 screen sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenSize {
    /// Model 2: 24 rows x 80 columns (1920 positions)
    Model2,
    /// Model 3: 32 rows x 80 columns (2560 positions)
    Model3,
    /// Model 4: 43 rows x 80 columns (3440 positions)
    Model4,
    /// Model 5: 27 rows x 132 columns (3564 positions)
    Model5,
}

impl ScreenSize {
    pub fn rows(self) -> usize {
        match self {
            Self::Model2 => 24,
            Self::Model3 => 32,
            Self::Model4 => 43,
            Self::Model5 => 27,
        }
    }

    pub fn cols(self) -> usize {
        match self {
            Self::Model2 | Self::Model3 | Self::Model4 => 80,
            Self::Model5 => 132,
        }
    }

    /// Total buffer size (rows * cols)
    pub fn buffer_size(self) -> usize {
        self.rows() * self.cols()
    }

    /// Convert a buffer address to (row, col) coordinates
    pub fn address_to_coords(self, address: u16) -> (usize, usize) {
        let addr = address as usize;
        (addr / self.cols(), addr % self.cols())
    }

    /// Convert (row, col) coordinates to a buffer address
    pub fn coords_to_address(self, row: usize, col: usize) -> u16 {
        (row * self.cols() + col) as u16
    }
}

/// One position in the screen buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Cell {
    /// Character data (EBCDIC)
    data: u8,
    /// True where a field attribute byte occupies the position
    field_start: bool,
    /// Character-level attributes stamped by the SA order
    char_attributes: ExtendedAttributes,
}

/// Read-only view of one buffer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView<'a> {
    /// The cell's character, CP037-decoded
    pub ch: char,
    /// Raw EBCDIC byte
    pub data: u8,
    /// Attributes of the field governing this position
    pub field: Option<&'a FieldAttributes>,
    /// Character-level attributes active when the cell was written
    pub char_attributes: ExtendedAttributes,
    /// True where a field attribute byte occupies the position
    pub is_field_start: bool,
}

/// Screen state for one 3270 terminal session
#[derive(Debug)]
pub struct ScreenBuffer {
    size: ScreenSize,
    cells: Vec<Cell>,
    cursor: u16,
    display_cursor: u16,
    fields: FieldList,
    /// Active character attributes, updated by SA orders
    char_attributes: ExtendedAttributes,
    keyboard_locked: bool,
    alarm: bool,
}

impl ScreenBuffer {
    pub fn new(size: ScreenSize) -> Self {
        let buffer_size = size.buffer_size();
        Self {
            size,
            cells: vec![Cell::default(); buffer_size],
            cursor: 0,
            display_cursor: 0,
            fields: FieldList::new(buffer_size),
            char_attributes: ExtendedAttributes::default(),
            keyboard_locked: true,
            alarm: false,
        }
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    pub fn cols(&self) -> usize {
        self.size.cols()
    }

    pub fn buffer_size(&self) -> usize {
        self.cells.len()
    }

    /// Current write position
    pub fn cursor_address(&self) -> u16 {
        self.cursor
    }

    /// Position recorded by the last Insert Cursor order
    pub fn display_cursor(&self) -> u16 {
        self.display_cursor
    }

    /// Display cursor as (row, col)
    pub fn display_cursor_position(&self) -> (usize, usize) {
        self.size.address_to_coords(self.display_cursor)
    }

    /// Ordered, non-overlapping field list
    pub fn fields_snapshot(&self) -> &[Field] {
        self.fields.fields()
    }

    /// Read-only view of one buffer position
    pub fn cell_at(&self, address: u16) -> Option<CellView<'_>> {
        let cell = self.cells.get(address as usize)?;
        Some(CellView {
            ch: ebcdic_to_char(cell.data),
            data: cell.data,
            field: self.fields.governing_field(address).map(|f| &f.attributes),
            char_attributes: cell.char_attributes,
            is_field_start: cell.field_start,
        })
    }

    /// One screen row rendered as text; attribute positions show as blanks
    pub fn row_text(&self, row: usize) -> Option<String> {
        if row >= self.rows() {
            return None;
        }
        let cols = self.cols();
        let start = row * cols;
        let text = self.cells[start..start + cols]
            .iter()
            .map(|cell| {
                if cell.field_start {
                    ' '
                } else {
                    let ch = ebcdic_to_char(cell.data);
                    if ch.is_ascii_graphic() || ch == ' ' {
                        ch
                    } else {
                        ' '
                    }
                }
            })
            .collect();
        Some(text)
    }

    pub fn is_keyboard_locked(&self) -> bool {
        self.keyboard_locked
    }

    pub fn lock_keyboard(&mut self) {
        self.keyboard_locked = true;
    }

    pub fn unlock_keyboard(&mut self) {
        self.keyboard_locked = false;
    }

    pub fn is_alarm(&self) -> bool {
        self.alarm
    }

    pub fn set_alarm(&mut self, alarm: bool) {
        self.alarm = alarm;
    }

    /// Erase the buffer: cells, cursor, fields, and character attributes
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.cursor = 0;
        self.display_cursor = 0;
        self.fields.clear();
        self.char_attributes = ExtendedAttributes::default();
    }

    /// Reset the MDT bit of every field
    pub fn reset_mdt(&mut self) {
        for index in 0..self.fields.len() {
            self.fields.attributes_mut(index).set_modified(false);
        }
    }

    /// Null the contents of every unprotected field and reset its MDT
    /// (the Erase All Unprotected command)
    pub fn erase_all_unprotected(&mut self) {
        for index in 0..self.fields.len() {
            if self.fields.fields()[index].attributes.is_protected() {
                continue;
            }
            let (start, end) = {
                let field = &self.fields.fields()[index];
                (field.start(), field.end())
            };
            for addr in start..=end {
                let cell = &mut self.cells[addr as usize];
                if !cell.field_start {
                    cell.data = DATA_NUL;
                }
            }
            self.fields.attributes_mut(index).set_modified(false);
        }
    }

    /// Decode and apply every remaining order in the parser
    ///
    /// Each order is fully decoded before it is applied, so a decode error
    /// leaves the screen at its last fully-applied order. The field-list
    /// invariant is checked once the stream is exhausted; a violation is
    /// fatal to the session.
    pub fn apply_orders(&mut self, parser: &mut OrderStreamParser<'_>) -> Result<(), DatastreamError> {
        while let Some(order) = parser.next_order()? {
            self.apply_order(order)?;
        }
        self.fields.verify()
    }

    /// Apply one decoded order
    pub fn apply_order(&mut self, order: Order) -> Result<(), DatastreamError> {
        trace!("applying order {order:?} at cursor {}", self.cursor);
        match order {
            Order::SetBufferAddress(address) => {
                // addresses are always taken modulo the buffer size
                self.cursor = (address as usize % self.buffer_size()) as u16;
            }
            Order::StartField(basic) => {
                self.start_field(FieldAttributes::new(basic));
            }
            Order::StartFieldExtended(attributes) => {
                let mut basic = Default::default();
                let mut extended = ExtendedAttributes::default();
                for attribute in attributes {
                    if let Some(b) = extended.apply(attribute) {
                        basic = b;
                    }
                }
                self.start_field(FieldAttributes::with_extended(basic, extended));
            }
            Order::SetAttribute(attribute) => match attribute {
                Attribute::Basic(_) => {
                    // SA resets character attributes only; a field attribute
                    // here has no character-level meaning
                    debug!("ignoring SA order carrying a field attribute");
                }
                other => {
                    extended_apply(&mut self.char_attributes, other);
                }
            },
            Order::Text(bytes) => {
                for byte in bytes {
                    self.write_data(byte);
                }
            }
            Order::GraphicEscape(byte) => {
                self.write_data(byte);
            }
            Order::RepeatToAddress(target, fill) => {
                let n = self.buffer_size() as u32;
                let span = (u32::from(target) + n - u32::from(self.cursor)) % n + 1;
                for _ in 0..span {
                    self.write_data(fill);
                }
            }
            Order::EraseUnprotectedToAddress(target) => {
                self.erase_unprotected_range(self.cursor, target);
            }
            Order::InsertCursor => {
                self.display_cursor = self.cursor;
            }
            Order::ProgramTab => {
                self.program_tab();
            }
        }
        Ok(())
    }

    /// Start a field at the cursor: split whatever occupies the position,
    /// insert the one-position field, stamp the attribute cell, advance
    fn start_field(&mut self, attributes: FieldAttributes) {
        let address = self.cursor;
        self.fields.split(address, address);
        self.fields.insert(address, address, attributes);

        let cell = &mut self.cells[address as usize];
        cell.data = attributes.basic.byte();
        cell.field_start = true;
        cell.char_attributes = ExtendedAttributes::default();

        self.advance_cursor();
    }

    /// Write one data byte at the cursor and advance
    ///
    /// Writing never creates or removes fields, but a write landing one past
    /// the governing field's trailing edge extends that field over the cell,
    /// and the extension merges with the following entry when the two become
    /// adjacent with identical attributes and the neighbor has no attribute
    /// byte of its own (a wrap-normalized continuation, for instance).
    fn write_data(&mut self, byte: u8) {
        let address = self.cursor;
        let cell = &mut self.cells[address as usize];
        cell.data = byte;
        cell.char_attributes = self.char_attributes;

        self.note_write(address);
        self.advance_cursor();
    }

    /// Field bookkeeping for a data write at `address`
    fn note_write(&mut self, address: u16) {
        if let Some(index) = self.fields.index_of(address) {
            if !self.fields.fields()[index].attributes.is_protected() {
                self.fields.attributes_mut(index).set_modified(true);
            }
            return;
        }

        let Some(governing) = self.fields.governing_index(address) else {
            return; // unformatted screen
        };
        let field = &self.fields.fields()[governing];
        let adjacent = address == field.end() + 1
            || (address == 0 && field.end() as usize == self.buffer_size() - 1);
        if !adjacent {
            return;
        }

        let index = self.fields.extend_to(governing, address);
        if !self.fields.fields()[index].attributes.is_protected() {
            self.fields.attributes_mut(index).set_modified(true);
        }

        // the edit may have closed the gap to the next entry
        if let Some(next) = self.fields.fields().get(index + 1) {
            if !self.cells[next.start() as usize].field_start {
                self.fields.merge_if_uniform(index);
            }
        }
    }

    /// Null unprotected cells in `[from, to]` inclusive, wrapping, and reset
    /// MDT on the fields touched; protected fields and attribute bytes are
    /// untouched, and the cursor does not move
    fn erase_unprotected_range(&mut self, from: u16, to: u16) {
        let n = self.buffer_size() as u32;
        let span = (u32::from(to) + n - u32::from(from)) % n + 1;
        let mut address = from;
        for _ in 0..span {
            if let Some(index) = self.fields.index_of(address) {
                if !self.fields.fields()[index].attributes.is_protected() {
                    let cell = &mut self.cells[address as usize];
                    if !cell.field_start {
                        cell.data = DATA_NUL;
                    }
                    self.fields.attributes_mut(index).set_modified(false);
                }
            }
            address = self.wrapped(address, 1);
        }
    }

    /// Move the cursor to the position after the next unprotected field's
    /// attribute byte; no move when the screen has none
    fn program_tab(&mut self) {
        let fields = self.fields.fields();
        if fields.is_empty() {
            return;
        }
        let after = fields
            .iter()
            .filter(|f| f.start() > self.cursor)
            .chain(fields.iter())
            .find(|f| !f.attributes.is_protected() && !f.is_wrap_continuation());
        if let Some(field) = after {
            self.cursor = self.wrapped(field.start(), 1);
        }
    }

    fn advance_cursor(&mut self) {
        self.cursor = self.wrapped(self.cursor, 1);
    }

    fn wrapped(&self, address: u16, delta: u16) -> u16 {
        (((address as usize) + (delta as usize)) % self.buffer_size()) as u16
    }
}

/// Fold one non-basic attribute into an extended set
fn extended_apply(extended: &mut ExtendedAttributes, attribute: Attribute) {
    let folded = extended.apply(attribute);
    debug_assert!(folded.is_none());
}
