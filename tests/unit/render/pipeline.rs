use std::collections::HashMap;

use super::*;
use crate::{
    diff::change::FileChange,
    encode::sink::InMemorySink,
    foundation::{
        config::SequenceConfig,
        core::Canvas,
    },
    render::backend::FrameRGBA,
    scene::state::SceneState,
};

/// Paints every frame a solid color derived from how many scene rows are visible.
struct CountingBackend {
    blanks: u32,
    scenes: u32,
}

impl CountingBackend {
    fn new() -> Self {
        Self {
            blanks: 0,
            scenes: 0,
        }
    }

    fn frame(shade: u8) -> FrameRGBA {
        FrameRGBA {
            width: 2,
            height: 2,
            data: [shade, shade, shade, 255].repeat(4),
            premultiplied: true,
        }
    }
}

impl RenderBackend for CountingBackend {
    fn canvas(&self) -> Canvas {
        Canvas::new(2, 2).unwrap()
    }

    fn render_blank(&mut self) -> DiffreelResult<FrameRGBA> {
        self.blanks += 1;
        Ok(Self::frame(0))
    }

    fn render_scene(&mut self, scene: &SceneState) -> DiffreelResult<FrameRGBA> {
        self.scenes += 1;
        Ok(Self::frame(scene.visible_slots().count() as u8 + 1))
    }
}

#[derive(Default)]
struct FakeSource {
    ranges: Vec<(TagRange, Vec<CommitInfo>)>,
    changes: HashMap<String, Vec<FileChange>>,
}

impl CommitSource for FakeSource {
    fn commits_in_range(&self, range: &TagRange) -> DiffreelResult<Option<Vec<CommitInfo>>> {
        Ok(self
            .ranges
            .iter()
            .find(|(r, _)| r == range)
            .map(|(_, commits)| commits.clone()))
    }

    fn commit(&self, rev: &str) -> DiffreelResult<CommitInfo> {
        self.ranges
            .iter()
            .flat_map(|(_, commits)| commits)
            .find(|c| c.id == rev)
            .cloned()
            .ok_or_else(|| DiffreelError::source(format!("unknown revision '{rev}'")))
    }

    fn file_changes(&self, commit: &CommitInfo) -> DiffreelResult<Vec<FileChange>> {
        Ok(self.changes.get(&commit.id).cloned().unwrap_or_default())
    }
}

fn commit(id: &str, message: &str) -> CommitInfo {
    CommitInfo {
        id: id.to_string(),
        parent: None,
        message: message.to_string(),
    }
}

fn modified(path: &str, raw: &str) -> FileChange {
    FileChange {
        old_path: Some(path.to_string()),
        new_path: Some(path.to_string()),
        raw: raw.as_bytes().to_vec(),
    }
}

fn small_config(root: &std::path::Path) -> Config {
    Config {
        frames_root: root.join("imgs"),
        output: root.join("out.mp4"),
        sequence: SequenceConfig {
            intro_frames: 2,
            outro_frames: 2,
            removal_burst: 1,
        },
        ..Config::default()
    }
}

fn fixture() -> FakeSource {
    let mut source = FakeSource::default();
    source.ranges.push((
        TagRange::new("0", "1"),
        vec![
            commit("c1", "Add the frame cache and its eviction policy"),
            commit("c2", "fix"),
        ],
    ));
    source.ranges.push((
        TagRange::new("1", "2"),
        vec![commit("c3", "Teach the loader about nested config files")],
    ));
    source
        .changes
        .insert("c1".into(), vec![modified("cache.rs", "@@ -1 +1,2 @@\n a\n+bc\n")]);
    source
        .changes
        .insert("c3".into(), vec![modified("load.rs", "@@ -1,2 +1 @@\n-x\n y\n")]);
    source
}

#[test]
fn render_script_writes_lead_in_then_scenes_from_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path());
    let source = fixture();
    let c1 = source.commit("c1").unwrap();

    let mut backend = CountingBackend::new();
    let mut sink = InMemorySink::new();
    let n = render_commit(&c1, &source, &cfg, &mut backend, &mut sink).unwrap();

    // 1 lead-in + intro 2 + reveal "bc" 2 + outro 2
    assert_eq!(n, 7);
    assert_eq!(backend.blanks, 1);
    assert_eq!(backend.scenes, 6);
    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
    assert_eq!(sink.config().unwrap().fps, cfg.fps);
}

#[test]
fn collect_commits_filters_short_messages_and_stops_at_missing_range() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path());
    let source = fixture();

    let ranges = crate::source::commits::numbered_tag_ranges(1, None);
    let commits = collect_commits(&source, &cfg, ranges).unwrap();
    let ids: Vec<&str> = commits.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c3"]);
}

#[test]
fn each_commit_gets_its_own_directory_numbered_from_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path());
    let source = fixture();
    let commits = collect_commits(&source, &cfg, crate::source::commits::numbered_tag_ranges(1, None)).unwrap();

    let rendered =
        render_commit_frames(&source, &cfg, &commits, || Ok(CountingBackend::new())).unwrap();
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0].0, cfg.frames_root.join("c1"));
    assert_eq!(rendered[1].0, cfg.frames_root.join("c3"));

    for (dir, count) in &rendered {
        let frames = crate::encode::timeline::list_frames(dir).unwrap();
        assert_eq!(frames.len() as u64, *count);
        assert!(dir.join("000000000.png").is_file());
    }
    // removal of one line: 1 lead-in + 2 intro + 3 bursts + 2 outro
    assert_eq!(rendered[1].1, 8);
}

#[test]
fn rerender_replaces_stale_frames() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path());
    let source = fixture();
    let c1 = source.commit("c1").unwrap();

    let stale = cfg.commit_frames_dir("c1");
    std::fs::create_dir_all(&stale).unwrap();
    for i in 0..20 {
        std::fs::write(stale.join(FrameIndex(i).file_name()), b"old").unwrap();
    }

    let rendered =
        render_commit_frames(&source, &cfg, &[c1], || Ok(CountingBackend::new())).unwrap();
    let frames = crate::encode::timeline::list_frames(&rendered[0].0).unwrap();
    assert_eq!(frames.len(), 7);
}

#[test]
fn parallel_rendering_keeps_commit_order() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = Config {
        jobs: 3,
        ..small_config(tmp.path())
    };
    let source = fixture();
    let commits = collect_commits(&source, &cfg, crate::source::commits::numbered_tag_ranges(1, None)).unwrap();

    let rendered =
        render_commit_frames(&source, &cfg, &commits, || Ok(CountingBackend::new())).unwrap();
    let ids: Vec<_> = rendered
        .iter()
        .map(|(dir, _)| dir.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(ids, ["c1", "c3"]);
}

#[test]
fn backend_failure_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(tmp.path());
    let source = fixture();
    let c1 = source.commit("c1").unwrap();

    let err = render_commit_frames(&source, &cfg, &[c1], || {
        Err::<CountingBackend, _>(DiffreelError::asset("no font"))
    })
    .unwrap_err();
    assert!(err.to_string().contains("no font"));
}
