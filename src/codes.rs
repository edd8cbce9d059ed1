//! 3270 protocol constants and codes
//!
//! Command codes, order codes, and field attribute bits as specified in the
//! IBM 3270 Data Stream Programmer's Reference (GA23-0059) and RFC 2355.

/// 3270 Command Codes
///
/// The command byte leads every inbound message from the host.
pub const CMD_WRITE: u8 = 0x01; // Write command
pub const CMD_ERASE_WRITE: u8 = 0x05; // Erase/Write command
pub const CMD_ERASE_WRITE_ALTERNATE: u8 = 0x0D; // Erase/Write Alternate
pub const CMD_ERASE_ALL_UNPROTECTED: u8 = 0x0F; // Erase All Unprotected
pub const CMD_READ_BUFFER: u8 = 0x02; // Read Buffer command
pub const CMD_READ_MODIFIED: u8 = 0x06; // Read Modified command
pub const CMD_READ_MODIFIED_ALL: u8 = 0x0E; // Read Modified All command
pub const CMD_WRITE_STRUCTURED_FIELD: u8 = 0x11; // Write Structured Field

/// 3270 Order Codes
/// These are embedded in the data stream to control formatting
pub const ORDER_SF: u8 = 0x1D; // Start Field
pub const ORDER_SFE: u8 = 0x29; // Start Field Extended
pub const ORDER_SBA: u8 = 0x11; // Set Buffer Address
pub const ORDER_SA: u8 = 0x28; // Set Attribute
pub const ORDER_IC: u8 = 0x13; // Insert Cursor
pub const ORDER_PT: u8 = 0x05; // Program Tab
pub const ORDER_RA: u8 = 0x3C; // Repeat to Address
pub const ORDER_EUA: u8 = 0x12; // Erase Unprotected to Address
pub const ORDER_GE: u8 = 0x08; // Graphic Escape

/// Write Control Character (WCC) Bits
/// Used with Write and Erase/Write commands
pub const WCC_RESET: u8 = 0x40; // Reset bit
pub const WCC_ALARM: u8 = 0x04; // Sound alarm
pub const WCC_RESTORE: u8 = 0x02; // Restore keyboard
pub const WCC_RESET_MDT: u8 = 0x01; // Reset MDT bits

/// Field Attribute Byte Bits
/// Used in Start Field (SF) order
pub const ATTR_PROTECTED: u8 = 0x20; // Bit 5: Protected field
pub const ATTR_NUMERIC: u8 = 0x10; // Bit 4: Numeric field
pub const ATTR_DISPLAY: u8 = 0x0C; // Bits 2-3: Display attributes
pub const ATTR_MDT: u8 = 0x01; // Bit 0: Modified Data Tag

/// Display Attribute Values (bits 2-3 of field attribute)
pub const DISPLAY_NORMAL: u8 = 0x00;
pub const DISPLAY_INTENSIFIED: u8 = 0x08;
pub const DISPLAY_HIDDEN: u8 = 0x0C;

/// Extended Field Attribute Types (for SFE and SA orders)
pub const XA_3270: u8 = 0xC0; // 3270 field attribute
pub const XA_VALIDATION: u8 = 0xC1; // Field validation
pub const XA_OUTLINING: u8 = 0xC2; // Field outlining
pub const XA_HIGHLIGHTING: u8 = 0x41; // Highlighting
pub const XA_FOREGROUND: u8 = 0x42; // Foreground color
pub const XA_CHARSET: u8 = 0x43; // Character set
pub const XA_BACKGROUND: u8 = 0x45; // Background color
pub const XA_TRANSPARENCY: u8 = 0x46; // Transparency

/// Highlighting Attribute Values
pub const HIGHLIGHT_DEFAULT: u8 = 0x00;
pub const HIGHLIGHT_NORMAL: u8 = 0xF0;
pub const HIGHLIGHT_BLINK: u8 = 0xF1;
pub const HIGHLIGHT_REVERSE: u8 = 0xF2;
pub const HIGHLIGHT_UNDERSCORE: u8 = 0xF4;

/// Color Attribute Values
pub const COLOR_DEFAULT: u8 = 0x00;
pub const COLOR_BLUE: u8 = 0xF1;
pub const COLOR_RED: u8 = 0xF2;
pub const COLOR_PINK: u8 = 0xF3;
pub const COLOR_GREEN: u8 = 0xF4;
pub const COLOR_TURQUOISE: u8 = 0xF5;
pub const COLOR_YELLOW: u8 = 0xF6;
pub const COLOR_WHITE: u8 = 0xF7;

/// Validation Attribute Values
pub const VALIDATION_MANDATORY_FILL: u8 = 0x04;
pub const VALIDATION_MANDATORY_ENTRY: u8 = 0x02;
pub const VALIDATION_TRIGGER: u8 = 0x01;

/// EBCDIC NUL, the cleared-cell value
pub const DATA_NUL: u8 = 0x00;

/// Enum representation of the write-class 3270 command codes
///
/// Read-class commands (Read Buffer, Read Modified) belong to the input side
/// of the protocol and are not decoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCode {
    Write = CMD_WRITE as isize,
    EraseWrite = CMD_ERASE_WRITE as isize,
    EraseWriteAlternate = CMD_ERASE_WRITE_ALTERNATE as isize,
    EraseAllUnprotected = CMD_ERASE_ALL_UNPROTECTED as isize,
}

impl CommandCode {
    /// Convert a byte value to a CommandCode enum
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            CMD_WRITE => Some(Self::Write),
            CMD_ERASE_WRITE => Some(Self::EraseWrite),
            CMD_ERASE_WRITE_ALTERNATE => Some(Self::EraseWriteAlternate),
            CMD_ERASE_ALL_UNPROTECTED => Some(Self::EraseAllUnprotected),
            _ => None,
        }
    }

    /// Convert CommandCode enum to byte value
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// True if the command erases the screen before its order stream applies
    pub fn erases(self) -> bool {
        matches!(self, Self::EraseWrite | Self::EraseWriteAlternate)
    }
}

/// Enum representation of 3270 order codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCode {
    StartField = ORDER_SF as isize,
    StartFieldExtended = ORDER_SFE as isize,
    SetBufferAddress = ORDER_SBA as isize,
    SetAttribute = ORDER_SA as isize,
    InsertCursor = ORDER_IC as isize,
    ProgramTab = ORDER_PT as isize,
    RepeatToAddress = ORDER_RA as isize,
    EraseUnprotectedToAddress = ORDER_EUA as isize,
    GraphicEscape = ORDER_GE as isize,
}

impl OrderCode {
    /// Convert a byte value to an OrderCode enum
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            ORDER_SF => Some(Self::StartField),
            ORDER_SFE => Some(Self::StartFieldExtended),
            ORDER_SBA => Some(Self::SetBufferAddress),
            ORDER_SA => Some(Self::SetAttribute),
            ORDER_IC => Some(Self::InsertCursor),
            ORDER_PT => Some(Self::ProgramTab),
            ORDER_RA => Some(Self::RepeatToAddress),
            ORDER_EUA => Some(Self::EraseUnprotectedToAddress),
            ORDER_GE => Some(Self::GraphicEscape),
            _ => None,
        }
    }

    /// Convert OrderCode enum to byte value
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}
