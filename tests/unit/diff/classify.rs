use super::*;
use crate::diff::wrap::str_columns;

#[test]
fn added_line_strips_marker() {
    let lines = classify_lines("+export enum CACHE_FILES {", 48);
    assert_eq!(
        lines,
        vec![ClassifiedLine {
            index: 0,
            kind: ChangeKind::Added,
            text: "export enum CACHE_FILES {".to_string(),
        }]
    );
}

#[test]
fn markers_map_to_kinds() {
    assert_eq!(ChangeKind::from_marker('+'), Some(ChangeKind::Added));
    assert_eq!(ChangeKind::from_marker('-'), Some(ChangeKind::Removed));
    assert_eq!(ChangeKind::from_marker(' '), Some(ChangeKind::Context));
    assert_eq!(ChangeKind::from_marker('@'), None);
}

#[test]
fn headers_and_blank_lines_do_not_consume_indices() {
    let block = "@@ -8,9 +8,14 @@ const ServerFuncs = {\n \
                 keep\n\
                 +\n\
                 -   \n\
                 -gone\n\
                 \\ No newline at end of file\n\
                 +fresh\n";
    let lines = classify_lines(block, 125);
    let summary: Vec<_> = lines
        .iter()
        .map(|l| (l.index, l.kind, l.text.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, ChangeKind::Context, "keep"),
            (1, ChangeKind::Removed, "gone"),
            (2, ChangeKind::Added, "fresh"),
        ]
    );
}

#[test]
fn long_lines_wrap_into_consecutive_indices() {
    let block = "+one two three four five six\n context";
    let lines = classify_lines(block, 9);
    let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["one two", "three", "four five", "six", "context"]);
    assert!(
        lines[..4]
            .iter()
            .all(|l| l.kind == ChangeKind::Added)
    );
    assert_eq!(lines[4].kind, ChangeKind::Context);
    let indices: Vec<_> = lines.iter().map(|l| l.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn wrapped_text_never_exceeds_width() {
    let block = "+\tlet value = some_function_with_a_long_name(first_argument, second_argument);\n\
                 -}\n \
                 // a comment that is long enough to need wrapping at small widths";
    for width in [4usize, 10, 25, 125] {
        for line in classify_lines(block, width) {
            assert!(str_columns(&line.text) <= width);
        }
    }
}

#[test]
fn combining_marks_do_not_stretch_lines() {
    let block = format!("+{}", "e\u{301}".repeat(100));
    let lines = classify_lines(&block, 125);
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert!(line.text.chars().count() <= 125);
        assert_eq!(line.kind, ChangeKind::Added);
    }
}

#[test]
fn crlf_line_endings_are_tolerated() {
    let lines = classify_lines("+a\r\n-b\r\n", 10);
    let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let err = classify_bytes(b"+ok\n+\xff\xfe\n", 125).unwrap_err();
    assert!(matches!(err, DiffreelError::Decode(_)));
    assert_eq!(classify_bytes(b"+ok\n", 125).unwrap().len(), 1);
}
