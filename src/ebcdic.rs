//! EBCDIC character translation
//!
//! The 3270 datastream carries screen text in EBCDIC. This module converts
//! between EBCDIC code page 037 (US/Canada, the common mainframe variant) and
//! Unicode for the read-only snapshot API and for building test streams.

/// EBCDIC CP037 to Unicode translation table, all 256 code points
const EBCDIC_CP037_TO_CHAR: [char; 256] = [
    // 0x00-0x3F control range
    '\x00', '\x01', '\x02', '\x03', '\u{9C}', '\t', '\u{86}', '\x7F', //
    '\u{97}', '\u{8D}', '\u{8E}', '\x0B', '\x0C', '\r', '\x0E', '\x0F', //
    '\x10', '\x11', '\x12', '\x13', '\u{9D}', '\u{85}', '\x08', '\u{87}', //
    '\x18', '\x19', '\u{92}', '\u{8F}', '\x1C', '\x1D', '\x1E', '\x1F', //
    '\u{80}', '\u{81}', '\u{82}', '\u{83}', '\u{84}', '\n', '\x17', '\x1B', //
    '\u{88}', '\u{89}', '\u{8A}', '\u{8B}', '\u{8C}', '\x05', '\x06', '\x07', //
    '\u{90}', '\u{91}', '\x16', '\u{93}', '\u{94}', '\u{95}', '\u{96}', '\x04', //
    '\u{98}', '\u{99}', '\u{9A}', '\u{9B}', '\x14', '\x15', '\u{9E}', '\x1A', //
    // 0x40-0x7F space, punctuation
    ' ', '\u{A0}', '\u{E2}', '\u{E4}', '\u{E0}', '\u{E1}', '\u{E3}', '\u{E5}', //
    '\u{E7}', '\u{F1}', '\u{A2}', '.', '<', '(', '+', '|', //
    '&', '\u{E9}', '\u{EA}', '\u{EB}', '\u{E8}', '\u{ED}', '\u{EE}', '\u{EF}', //
    '\u{EC}', '\u{DF}', '!', '$', '*', ')', ';', '\u{AC}', //
    '-', '/', '\u{C2}', '\u{C4}', '\u{C0}', '\u{C1}', '\u{C3}', '\u{C5}', //
    '\u{C7}', '\u{D1}', '\u{A6}', ',', '%', '_', '>', '?', //
    '\u{F8}', '\u{C9}', '\u{CA}', '\u{CB}', '\u{C8}', '\u{CD}', '\u{CE}', '\u{CF}', //
    '\u{CC}', '`', ':', '#', '@', '\'', '=', '"', //
    // 0x80-0xBF lowercase letters and symbols
    '\u{D8}', 'a', 'b', 'c', 'd', 'e', 'f', 'g', //
    'h', 'i', '\u{AB}', '\u{BB}', '\u{F0}', '\u{FD}', '\u{FE}', '\u{B1}', //
    '\u{B0}', 'j', 'k', 'l', 'm', 'n', 'o', 'p', //
    'q', 'r', '\u{AA}', '\u{BA}', '\u{E6}', '\u{B8}', '\u{C6}', '\u{A4}', //
    '\u{B5}', '~', 's', 't', 'u', 'v', 'w', 'x', //
    'y', 'z', '\u{A1}', '\u{BF}', '\u{D0}', '\u{DD}', '\u{DE}', '\u{AE}', //
    '^', '\u{A3}', '\u{A5}', '\u{B7}', '\u{A9}', '\u{A7}', '\u{B6}', '\u{BC}', //
    '\u{BD}', '\u{BE}', '[', ']', '\u{AF}', '\u{A8}', '\u{B4}', '\u{D7}', //
    // 0xC0-0xFF uppercase letters and digits
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G', //
    'H', 'I', '\u{AD}', '\u{F4}', '\u{F6}', '\u{F2}', '\u{F3}', '\u{F5}', //
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P', //
    'Q', 'R', '\u{B9}', '\u{FB}', '\u{FC}', '\u{F9}', '\u{FA}', '\u{FF}', //
    '\\', '\u{F7}', 'S', 'T', 'U', 'V', 'W', 'X', //
    'Y', 'Z', '\u{B2}', '\u{D4}', '\u{D6}', '\u{D2}', '\u{D3}', '\u{D5}', //
    '0', '1', '2', '3', '4', '5', '6', '7', //
    '8', '9', '\u{B3}', '\u{DB}', '\u{DC}', '\u{D9}', '\u{DA}', '\u{9F}', //
];

/// Convert an EBCDIC CP037 byte to its Unicode character
pub fn ebcdic_to_char(byte: u8) -> char {
    EBCDIC_CP037_TO_CHAR[byte as usize]
}

/// Convert a character to its EBCDIC CP037 byte
///
/// Characters outside the code page map to EBCDIC space (0x40).
pub fn char_to_ebcdic(ch: char) -> u8 {
    // the table is a bijection over its range; scan it for the inverse
    EBCDIC_CP037_TO_CHAR
        .iter()
        .position(|&c| c == ch)
        .map_or(0x40, |i| i as u8)
}

/// Encode a string as EBCDIC bytes, one byte per character
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(char_to_ebcdic).collect()
}
