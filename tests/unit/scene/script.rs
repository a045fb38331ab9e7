use super::*;
use crate::{diff::change::FileChangeKind, foundation::error::DiffreelError};

fn change(old: Option<&str>, new: Option<&str>, raw: &str) -> FileChange {
    FileChange {
        old_path: old.map(str::to_string),
        new_path: new.map(str::to_string),
        raw: raw.as_bytes().to_vec(),
    }
}

fn small() -> CommitSceneAssembler {
    CommitSceneAssembler::new(
        125,
        SequenceConfig {
            intro_frames: 2,
            outro_frames: 2,
            removal_burst: 1,
        },
    )
}

#[test]
fn header_list_grows_most_recent_first() {
    let changes = vec![
        change(Some("a.rs"), Some("a.rs"), " x"),
        change(None, Some("b.rs"), "+y"),
        change(Some("c.rs"), None, "-z"),
    ];
    let script = small().assemble("Rework the widget loader", &changes).unwrap();
    assert_eq!(script.file_count(), 3);

    let states: Vec<_> = script.iter().collect();
    let first_of = |name: &str| states.iter().find(|s| s.filename == name).unwrap();

    assert!(first_of("a.rs").header_list.is_empty());
    assert_eq!(first_of("b.rs").header_list, vec!["a.rs".to_string()]);
    assert_eq!(
        first_of("c.rs").header_list,
        vec!["b.rs".to_string(), "a.rs".to_string()]
    );
    assert_eq!(first_of("a.rs").file_kind, FileChangeKind::Modified);
    assert_eq!(first_of("b.rs").file_kind, FileChangeKind::Created);
    assert_eq!(first_of("c.rs").file_kind, FileChangeKind::Deleted);
}

#[test]
fn deleted_files_fall_back_to_old_path() {
    let script = small()
        .assemble("Drop the legacy module entirely", &[change(Some("old.rs"), None, "-x")])
        .unwrap();
    assert!(script.iter().all(|s| s.filename == "old.rs"));
}

#[test]
fn footer_is_the_summary_everywhere() {
    let changes = vec![change(Some("a.rs"), Some("a.rs"), "+hello")];
    let script = small().assemble("Say hello to everyone", &changes).unwrap();
    assert_eq!(script.footer(), "Say hello to everyone");
    assert!(script.iter().all(|s| s.footer == "Say hello to everyone"));
}

#[test]
fn files_play_back_to_back_in_order() {
    let changes = vec![
        change(Some("a.rs"), Some("a.rs"), "+ab"),
        change(Some("b.rs"), Some("b.rs"), " ctx"),
    ];
    let script = small().assemble("Two files in one commit", &changes).unwrap();
    let names: Vec<_> = script.iter().map(|s| s.filename).collect();
    // a.rs: 2 intro + 2 typed + 2 outro; b.rs: 2 intro + 2 outro
    let mut expected = vec!["a.rs".to_string(); 6];
    expected.extend(vec!["b.rs".to_string(); 4]);
    assert_eq!(names, expected);
    assert_eq!(script.frame_count(), 10);
}

#[test]
fn script_is_restartable() {
    let changes = vec![
        change(Some("a.rs"), Some("a.rs"), "-x\n+y\n z"),
        change(None, Some("n.rs"), "+new file"),
    ];
    let script = small().assemble("Restartable script check", &changes).unwrap();
    let first: Vec<_> = script.iter().collect();
    let second: Vec<_> = script.iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), script.frame_count());
}

#[test]
fn no_changes_gives_an_empty_script() {
    let script = small().assemble("Merge branch main", &[]).unwrap();
    assert!(script.is_empty());
    assert_eq!(script.iter().count(), 0);
}

#[test]
fn undecodable_change_aborts_the_commit() {
    let changes = vec![
        change(Some("a.rs"), Some("a.rs"), "+fine"),
        FileChange {
            old_path: Some("bin.dat".to_string()),
            new_path: Some("bin.dat".to_string()),
            raw: vec![b'+', 0xff, 0xfe],
        },
    ];
    let err = small().assemble("Binary sneaks in here", &changes).unwrap_err();
    assert!(matches!(err, DiffreelError::Decode(_)));
}
