//! End-to-end datastream scenarios
//!
//! Drives complete inbound messages through the processor and checks the
//! resulting screen model: field layout, cell contents, cursor state, and
//! error reporting.

use tn3270r::codes::{
    ATTR_PROTECTED, CMD_ERASE_WRITE, CMD_WRITE, DATA_NUL, ORDER_IC, ORDER_RA, ORDER_SBA, ORDER_SF,
    ORDER_SFE, WCC_RESTORE, XA_3270, XA_FOREGROUND, COLOR_RED,
};
use tn3270r::ebcdic::encode_text;
use tn3270r::{AddressingMode, DatastreamError, DatastreamProcessor, ScreenBuffer, ScreenSize};

fn session() -> (DatastreamProcessor, ScreenBuffer) {
    let _ = env_logger::builder().is_test(true).try_init();
    (
        DatastreamProcessor::new(AddressingMode::TwelveBit),
        ScreenBuffer::new(ScreenSize::Model2),
    )
}

fn sba(address: u16) -> [u8; 3] {
    let (b1, b2) = AddressingMode::TwelveBit.encode(address);
    [ORDER_SBA, b1, b2]
}

/// A protected label followed by an unprotected input field
#[test]
fn test_two_field_screen_layout() {
    let (processor, mut screen) = session();

    let mut message = vec![CMD_WRITE, WCC_RESTORE];
    message.extend(sba(0));
    message.push(ORDER_SF);
    message.push(ATTR_PROTECTED);
    message.extend(encode_text("HELLO"));
    message.extend(sba(6));
    message.push(ORDER_SF);
    message.push(0x00);

    processor.apply_message(&message, &mut screen).unwrap();

    let fields = screen.fields_snapshot();
    assert_eq!(fields.len(), 2);
    assert_eq!((fields[0].start(), fields[0].end()), (0, 5));
    assert!(fields[0].attributes.is_protected());
    assert_eq!((fields[1].start(), fields[1].end()), (6, 6));
    assert!(!fields[1].attributes.is_protected());

    let text: String = (1..=5).map(|a| screen.cell_at(a).unwrap().ch).collect();
    assert_eq!(text, "HELLO");
    assert!(screen.cell_at(0).unwrap().is_field_start);
    assert!(screen.cell_at(6).unwrap().is_field_start);
}

/// A start-field landing inside an existing field splits it in three
#[test]
fn test_start_field_splits_existing_field() {
    let (processor, mut screen) = session();

    // lay down one field covering [10,20]
    let mut message = vec![CMD_WRITE, 0x00];
    message.extend(sba(10));
    message.push(ORDER_SF);
    message.push(ATTR_PROTECTED);
    message.extend(encode_text("0123456789"));
    processor.apply_message(&message, &mut screen).unwrap();
    let fields = screen.fields_snapshot();
    assert_eq!((fields[0].start(), fields[0].end()), (10, 20));

    // a new unprotected field definition lands at 15
    let mut message = vec![CMD_WRITE, 0x00];
    message.extend(sba(15));
    message.push(ORDER_SF);
    message.push(0x00);
    processor.apply_message(&message, &mut screen).unwrap();

    let ranges: Vec<_> = screen
        .fields_snapshot()
        .iter()
        .map(|f| (f.start(), f.end()))
        .collect();
    assert_eq!(ranges, vec![(10, 14), (15, 15), (16, 20)]);

    let fields = screen.fields_snapshot();
    assert!(fields[0].attributes.is_protected());
    assert!(!fields[1].attributes.is_protected());
    // the post-split remainder carries the original attributes
    assert!(fields[2].attributes.is_protected());
}

/// Repeat-to-address wraps past the last buffer position
#[test]
fn test_repeat_to_address_wraps_at_buffer_end() {
    let (processor, mut screen) = session();
    let n = screen.buffer_size() as u16;

    let mut message = vec![CMD_WRITE, 0x00];
    message.extend(sba(n - 2));
    message.push(ORDER_RA);
    let (b1, b2) = AddressingMode::TwelveBit.encode(1);
    message.extend([b1, b2]);
    message.push(0x5C); // '*'
    processor.apply_message(&message, &mut screen).unwrap();

    for addr in [n - 2, n - 1, 0, 1] {
        assert_eq!(screen.cell_at(addr).unwrap().ch, '*', "address {addr}");
    }
    assert_eq!(screen.cell_at(2).unwrap().data, DATA_NUL);
    assert_eq!(screen.cursor_address(), 2);
}

#[test]
fn test_extended_field_attributes() {
    let (processor, mut screen) = session();

    let message = vec![
        CMD_WRITE,
        0x00,
        ORDER_SFE,
        0x02,
        XA_3270,
        ATTR_PROTECTED,
        XA_FOREGROUND,
        COLOR_RED,
        0xC1,
    ];
    processor.apply_message(&message, &mut screen).unwrap();

    let fields = screen.fields_snapshot();
    assert_eq!(fields.len(), 1);
    assert!(fields[0].attributes.is_protected());
    assert_eq!(fields[0].attributes.extended.foreground_color, Some(COLOR_RED));
    assert_eq!(screen.cell_at(1).unwrap().ch, 'A');
}

#[test]
fn test_insert_cursor_snapshot() {
    let (processor, mut screen) = session();

    let mut message = vec![CMD_WRITE, 0x00];
    message.extend(sba(162)); // row 2, col 2
    message.push(ORDER_IC);
    processor.apply_message(&message, &mut screen).unwrap();

    assert_eq!(screen.display_cursor(), 162);
    assert_eq!(screen.display_cursor_position(), (2, 2));
}

#[test]
fn test_fourteen_bit_session() {
    let processor = DatastreamProcessor::new(AddressingMode::FourteenBit);
    let mut screen = ScreenBuffer::new(ScreenSize::Model4);

    let (b1, b2) = AddressingMode::FourteenBit.encode(3000);
    let mut message = vec![CMD_WRITE, 0x00, ORDER_SBA, b1, b2];
    message.extend(encode_text("X"));
    processor.apply_message(&message, &mut screen).unwrap();

    assert_eq!(screen.cell_at(3000).unwrap().ch, 'X');
}

#[test]
fn test_address_out_of_range_aborts_message() {
    let (processor, mut screen) = session();

    // address 2000 on a 1920-cell screen
    let (b1, b2) = AddressingMode::TwelveBit.encode(2000);
    let message = vec![CMD_WRITE, 0x00, ORDER_SBA, b1, b2, 0xC1];
    let err = processor.apply_message(&message, &mut screen).unwrap_err();

    match err {
        DatastreamError::AddressDecode { offset, value, limit } => {
            assert_eq!(offset, 3);
            assert_eq!(value, 2000);
            assert_eq!(limit, 1920);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // the trailing text never applied
    assert_eq!(screen.cell_at(0).unwrap().data, DATA_NUL);
}

#[test]
fn test_partial_application_stops_at_failing_order() {
    let (processor, mut screen) = session();

    let mut message = vec![CMD_WRITE, 0x00];
    message.extend(encode_text("OK"));
    message.push(ORDER_SF); // attribute byte missing
    let err = processor.apply_message(&message, &mut screen).unwrap_err();

    assert!(matches!(err, DatastreamError::TruncatedStream { .. }));
    assert_eq!(screen.cell_at(0).unwrap().ch, 'O');
    assert_eq!(screen.cell_at(1).unwrap().ch, 'K');
    assert!(screen.fields_snapshot().is_empty());
}

#[test]
fn test_erase_write_resets_previous_screen() {
    let (processor, mut screen) = session();

    let mut message = vec![CMD_WRITE, 0x00, ORDER_SF, 0x00];
    message.extend(encode_text("FIRST"));
    processor.apply_message(&message, &mut screen).unwrap();
    assert_eq!(screen.fields_snapshot().len(), 1);

    let mut message = vec![CMD_ERASE_WRITE, WCC_RESTORE];
    message.extend(encode_text("SECOND"));
    processor.apply_message(&message, &mut screen).unwrap();

    assert!(screen.fields_snapshot().is_empty());
    let text: String = (0..6).map(|a| screen.cell_at(a).unwrap().ch).collect();
    assert_eq!(text, "SECOND");
}

#[test]
fn test_row_text_rendering() {
    let (processor, mut screen) = session();

    let mut message = vec![CMD_WRITE, 0x00];
    message.extend(sba(80)); // row 1
    message.push(ORDER_SF);
    message.push(ATTR_PROTECTED);
    message.extend(encode_text("STATUS"));
    processor.apply_message(&message, &mut screen).unwrap();

    let row = screen.row_text(1).unwrap();
    assert_eq!(&row[1..7], "STATUS");
    assert_eq!(&row[0..1], " "); // attribute byte renders blank
}
