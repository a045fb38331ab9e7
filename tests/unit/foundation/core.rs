use super::*;

#[test]
fn frame_file_names_are_nine_digit_zero_padded() {
    assert_eq!(FrameIndex(0).file_name(), "000000000.png");
    assert_eq!(FrameIndex(42).file_name(), "000000042.png");
    assert_eq!(FrameIndex(123_456_789).file_name(), "123456789.png");
}

#[test]
fn frame_file_names_parse_back() {
    assert_eq!(
        FrameIndex::parse_file_name("000000042.png"),
        Some(FrameIndex(42))
    );
    assert_eq!(FrameIndex::parse_file_name("42.png"), None);
    assert_eq!(FrameIndex::parse_file_name("00000004a.png"), None);
    assert_eq!(FrameIndex::parse_file_name("000000042.jpg"), None);
}

#[test]
fn canvas_rejects_degenerate_sizes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(Canvas::new(4, 2).unwrap().byte_len(), 32);
}

#[test]
fn flatten_premul_over_black_keeps_color() {
    let mut dst = [0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &[128, 0, 0, 128], true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, [128, 0, 0, 255]);
}

#[test]
fn flatten_straight_blends_background() {
    let src = [0u8, 0, 0, 0, 9, 8, 7, 255, 255, 0, 0, 128];
    let mut dst = [0u8; 12];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, [255, 255, 255, 255, 9, 8, 7, 255, 255, 127, 127, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = [0u8; 4];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 8], false, [0, 0, 0, 255]).is_err());
}
