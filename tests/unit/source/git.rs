use super::*;

#[test]
fn parse_log_reads_records() {
    let out = "aaa\u{1f}\u{1f}Create project\n\u{1e}\nbbb\u{1f}aaa ccc\u{1f}Second commit\n\nbody\n\u{1e}\n";
    let commits = parse_log(out.as_bytes()).unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].id, "aaa");
    assert_eq!(commits[0].parent, None);
    assert_eq!(commits[0].message, "Create project\n");
    assert_eq!(commits[1].parent.as_deref(), Some("aaa"));
    assert_eq!(commits[1].summary(), "Second commit");
}

#[test]
fn parse_log_rejects_truncated_records() {
    assert!(parse_log(b"abc\x1fdef\x1e").is_err());
    assert!(parse_log(b"").unwrap().is_empty());
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?}");
}

#[test]
fn reads_ranges_and_changes_from_a_real_repo() {
    if !is_git_on_path() {
        eprintln!("git not found; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    git(root, &["init", "-q"]);

    std::fs::write(root.join("a.txt"), "one\n").unwrap();
    git(root, &["add", "."]);
    git(root, &["commit", "-q", "-m", "Create the first text file"]);
    git(root, &["tag", "0"]);

    std::fs::write(root.join("a.txt"), "one\ntwo\n").unwrap();
    std::fs::write(root.join("b.txt"), "bee\n").unwrap();
    git(root, &["add", "."]);
    git(root, &["commit", "-q", "-m", "Extend a.txt and add b.txt alongside"]);
    std::fs::remove_file(root.join("b.txt")).unwrap();
    git(root, &["add", "-A"]);
    git(root, &["commit", "-q", "-m", "fix"]);
    git(root, &["tag", "1"]);

    let src = GitCli::new(root);
    let commits = src
        .commits_in_range(&TagRange::new("0", "1"))
        .unwrap()
        .unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].summary(), "Extend a.txt and add b.txt alongside");
    assert_eq!(commits[1].summary(), "fix");

    let changes = src.file_changes(&commits[0]).unwrap();
    let names: Vec<_> = changes.iter().map(|c| c.display_path()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
    assert_eq!(
        changes[1].kind(),
        crate::diff::change::FileChangeKind::Created
    );
    assert!(String::from_utf8_lossy(&changes[0].raw).contains("+two"));

    let deleted = src.file_changes(&commits[1]).unwrap();
    assert_eq!(
        deleted[0].kind(),
        crate::diff::change::FileChangeKind::Deleted
    );

    let root_commit = src.commit("0").unwrap();
    assert!(root_commit.parent.is_none());
    let initial = src.file_changes(&root_commit).unwrap();
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].kind(), crate::diff::change::FileChangeKind::Created);

    assert_eq!(src.commits_in_range(&TagRange::new("1", "2")).unwrap(), None);
}
