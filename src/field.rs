//! Field interval model for the 3270 screen buffer
//!
//! A field is a contiguous range of buffer addresses sharing one set of
//! formatting attributes. The screen buffer owns a single [`FieldList`] and
//! mutates it only through the primitives here; the list is kept sorted by
//! start address and pairwise non-overlapping at all times.
//!
//! Wrap-around ranges are normalized at construction: a field that would run
//! past the last buffer position is stored as two entries, `[start, N-1]` and
//! `[0, end]`, with the second tagged as a continuation. The two halves are
//! independent entries for containment and overlap checks.

use std::fmt;

use crate::attribute::{BasicAttribute, ExtendedAttributes};
use crate::error::DatastreamError;

/// Formatting attributes attached to one field
///
/// The basic byte comes from the SF order (or the 0xC0 pair of an SFE);
/// extended values override the basic behavior where both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldAttributes {
    pub basic: BasicAttribute,
    pub extended: ExtendedAttributes,
}

impl FieldAttributes {
    pub fn new(basic: BasicAttribute) -> Self {
        Self {
            basic,
            extended: ExtendedAttributes::default(),
        }
    }

    pub fn with_extended(basic: BasicAttribute, extended: ExtendedAttributes) -> Self {
        Self { basic, extended }
    }

    pub fn is_protected(&self) -> bool {
        self.basic.is_protected()
    }

    pub fn is_numeric(&self) -> bool {
        self.basic.is_numeric()
    }

    pub fn is_modified(&self) -> bool {
        self.basic.is_modified()
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.basic.set_modified(modified);
    }

    /// Attribute identity for merge checks: everything but the MDT bit
    fn merge_key(&self) -> (u8, ExtendedAttributes) {
        let mut basic = self.basic;
        basic.set_modified(false);
        (basic.byte(), self.extended)
    }
}

/// One formatted region of the screen buffer
///
/// `start` and `end` are inclusive buffer addresses; `start == end` is a
/// single-position field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    start: u16,
    end: u16,
    pub attributes: FieldAttributes,
    wrap_continuation: bool,
}

impl Field {
    /// Create a non-wrapping field; wrapping ranges go through
    /// [`FieldList::insert`], which normalizes them
    pub fn new(start: u16, end: u16, attributes: FieldAttributes) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            attributes,
            wrap_continuation: false,
        }
    }

    fn continuation(end: u16, attributes: FieldAttributes) -> Self {
        Self {
            start: 0,
            end,
            attributes,
            wrap_continuation: true,
        }
    }

    /// Start buffer address, inclusive
    pub fn start(&self) -> u16 {
        self.start
    }

    /// End buffer address, inclusive
    pub fn end(&self) -> u16 {
        self.end
    }

    /// True for the `[0, end]` half of a wrapped field
    pub fn is_wrap_continuation(&self) -> bool {
        self.wrap_continuation
    }

    /// Does this field occupy the given buffer position
    pub fn contains_position(&self, position: u16) -> bool {
        self.start <= position && position <= self.end
    }

    /// Does this field occupy any part of `[check_start, check_end]`
    pub fn overlaps(&self, check_start: u16, check_end: u16) -> bool {
        check_start <= self.end && self.start <= check_end
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Ordered, non-overlapping collection of fields over one screen buffer
///
/// This is the arena the screen buffer state machine composes; no caller
/// edits the underlying vector directly.
#[derive(Debug, Clone)]
pub struct FieldList {
    fields: Vec<Field>,
    buffer_size: usize,
}

impl FieldList {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            fields: Vec::new(),
            buffer_size,
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Insert a field covering `[start, end]`, normalizing wrap-around
    ///
    /// The caller splits overlapping fields first; insertion itself is purely
    /// structural. A range with `start > end` wraps past the last position
    /// and is stored as two entries.
    pub fn insert(&mut self, start: u16, end: u16, attributes: FieldAttributes) {
        if start > end {
            self.insert_entry(Field::new(start, (self.buffer_size - 1) as u16, attributes));
            self.insert_entry(Field::continuation(end, attributes));
        } else {
            self.insert_entry(Field::new(start, end, attributes));
        }
    }

    fn insert_entry(&mut self, field: Field) {
        let at = self.fields.partition_point(|f| f.start < field.start);
        self.fields.insert(at, field);
    }

    /// Remove `[split_start, split_end]` from every field that overlaps it
    ///
    /// A fully covered field is removed; an edge cut shrinks the field; an
    /// interior cut shrinks the field to the left remainder and inserts a new
    /// field for the right remainder, both keeping the original attributes.
    /// A wrapping cut (`split_start > split_end`) is applied as its two
    /// non-wrapping halves. Afterwards no field overlaps the cut range.
    pub fn split(&mut self, split_start: u16, split_end: u16) {
        if split_start > split_end {
            self.split_range(split_start, (self.buffer_size - 1) as u16);
            self.split_range(0, split_end);
        } else {
            self.split_range(split_start, split_end);
        }
        self.refresh_continuations();
    }

    fn split_range(&mut self, split_start: u16, split_end: u16) {
        let mut i = 0;
        while i < self.fields.len() {
            let field = &self.fields[i];
            if !field.overlaps(split_start, split_end) {
                i += 1;
                continue;
            }

            if split_start <= field.start && field.end <= split_end {
                // cut covers the whole field
                self.fields.remove(i);
            } else if field.start < split_start && split_end < field.end {
                // interior cut: keep the left remainder, insert the right
                let right = Field::new(split_end + 1, field.end, field.attributes);
                self.fields[i].end = split_start - 1;
                self.fields.insert(i + 1, right);
                i += 2;
            } else if split_start <= field.start {
                // cut trims the leading edge
                self.fields[i].start = split_end + 1;
                i += 1;
            } else {
                // cut trims the trailing edge
                self.fields[i].end = split_start - 1;
                i += 1;
            }
        }
    }

    /// Merge `fields[index]` with the following entry
    ///
    /// Extends the field's end over the next entry and removes it. Purely
    /// structural; the caller verifies adjacency and attribute compatibility.
    pub fn merge(&mut self, index: usize) {
        let next = self.fields.remove(index + 1);
        self.fields[index].end = next.end;
    }

    /// Index of the field containing `position`, if any
    pub fn index_of(&self, position: u16) -> Option<usize> {
        let candidate = self.fields.partition_point(|f| f.start <= position);
        if candidate == 0 {
            return None;
        }
        let index = candidate - 1;
        self.fields[index].contains_position(position).then_some(index)
    }

    /// Index of the field governing `position`: the containing field, or the
    /// nearest field at-or-before it, wrapping to the last field when the
    /// position precedes every start address
    pub fn governing_index(&self, position: u16) -> Option<usize> {
        if self.fields.is_empty() {
            return None;
        }
        let candidate = self.fields.partition_point(|f| f.start <= position);
        if candidate == 0 {
            // position precedes the first field; governance wraps
            Some(self.fields.len() - 1)
        } else {
            Some(candidate - 1)
        }
    }

    /// The field governing `position`, if any
    pub fn governing_field(&self, position: u16) -> Option<&Field> {
        self.governing_index(position).map(|i| &self.fields[i])
    }

    pub fn attributes_mut(&mut self, index: usize) -> &mut FieldAttributes {
        &mut self.fields[index].attributes
    }

    /// Grow the trailing edge of `fields[index]` over the adjacent position
    ///
    /// Used when a data write lands one past the field's end. Growth past the
    /// last buffer position creates the wrap-continuation entry. Returns the
    /// index of the entry that now covers `position`.
    pub fn extend_to(&mut self, index: usize, position: u16) -> usize {
        let field = &self.fields[index];
        if field.contains_position(position) {
            return index;
        }
        if position == 0 && field.end as usize == self.buffer_size - 1 {
            let attributes = field.attributes;
            self.insert_entry(Field::continuation(0, attributes));
            return 0;
        }
        debug_assert_eq!(position, field.end + 1);
        self.fields[index].end = position;
        index
    }

    /// Merge `fields[index]` with the next entry when the two are adjacent
    /// and carry the same attributes (MDT aside). Returns true on merge.
    pub fn merge_if_uniform(&mut self, index: usize) -> bool {
        if index + 1 >= self.fields.len() {
            return false;
        }
        let field = &self.fields[index];
        let next = &self.fields[index + 1];
        if next.start != field.end + 1 {
            return false;
        }
        if field.attributes.merge_key() != next.attributes.merge_key() {
            return false;
        }
        self.merge(index);
        true
    }

    /// Check the structural invariant: sorted by start, pairwise
    /// non-overlapping, every address inside the buffer
    pub fn verify(&self) -> Result<(), DatastreamError> {
        for (i, field) in self.fields.iter().enumerate() {
            if field.end as usize >= self.buffer_size {
                return Err(DatastreamError::InvariantViolation {
                    detail: format!("field {field} exceeds buffer size {}", self.buffer_size),
                });
            }
            if i > 0 {
                let prev = &self.fields[i - 1];
                if prev.end >= field.start {
                    return Err(DatastreamError::InvariantViolation {
                        detail: format!("field {prev} overlaps or passes field {field}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Drop stale continuation tags after splits remove the wrapped head
    fn refresh_continuations(&mut self) {
        let has_tail = self
            .fields
            .last()
            .is_some_and(|f| f.end as usize == self.buffer_size - 1);
        if let Some(first) = self.fields.first_mut() {
            if first.wrap_continuation && (!has_tail || first.start != 0) {
                first.wrap_continuation = false;
            }
        }
    }
}
