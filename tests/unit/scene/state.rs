use super::*;

fn scene(slots: Vec<SlotState>, ignored: &[usize]) -> SceneState {
    SceneState {
        filename: "src/lib.rs".to_string(),
        file_kind: FileChangeKind::Modified,
        header_list: vec![],
        footer: "summary".to_string(),
        slots,
        ignored: ignored.iter().copied().collect(),
    }
}

#[test]
fn slot_accessors_expose_exactly_one_variant() {
    let s = SlotState::New("abc".to_string());
    assert_eq!(s.new_text(), Some("abc"));
    assert_eq!(s.existing_text(), None);
    assert_eq!(s.removed_text(), None);
    assert_eq!(SlotState::Empty.text(), None);
}

#[test]
fn rows_shift_up_past_ignored_indices() {
    let s = scene(vec![SlotState::Empty; 5], &[1, 3]);
    assert_eq!(s.row_of(0, 64, 16), Some(64));
    assert_eq!(s.row_of(1, 64, 16), None);
    assert_eq!(s.row_of(2, 64, 16), Some(80));
    assert_eq!(s.row_of(3, 64, 16), None);
    assert_eq!(s.row_of(4, 64, 16), Some(96));
    assert_eq!(s.row_of(5, 64, 16), None);
}

#[test]
fn visible_slots_skip_empty_and_ignored() {
    let s = scene(
        vec![
            SlotState::Existing("a".to_string()),
            SlotState::Empty,
            SlotState::Removed("b".to_string()),
            SlotState::New("c".to_string()),
        ],
        &[2],
    );
    let idx: Vec<_> = s.visible_slots().map(|(i, _)| i).collect();
    assert_eq!(idx, vec![0, 3]);
}
