use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    encode::{
        sink::{FrameDirSink, FrameSink, SinkConfig},
        timeline::TimelineAssembler,
    },
    foundation::{
        config::Config,
        core::FrameIndex,
        error::{DiffreelError, DiffreelResult},
    },
    render::{assets::RenderAssets, backend::RenderBackend, cpu::CpuBackend},
    scene::script::{AnimationScript, CommitSceneAssembler},
    source::commits::{CommitInfo, CommitSource, TagRange, select_commits},
};

/// Outcome of [`render_tag_video`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    /// Commits that passed the message filter and were rendered.
    pub commits: usize,
    /// Frames written across all commit directories.
    pub frames: u64,
    /// The video file, if any frames were produced.
    pub output: Option<PathBuf>,
}

/// Push `lead_in` blank frames followed by every scene of `script`.
///
/// Frame indices start at 0. Returns the number of frames pushed.
pub fn render_script(
    script: &AnimationScript,
    lead_in: u32,
    fps: u32,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn FrameSink,
) -> DiffreelResult<u64> {
    sink.begin(SinkConfig {
        canvas: backend.canvas(),
        fps,
    })?;

    let mut idx = FrameIndex(0);
    for _ in 0..lead_in {
        let frame = backend.render_blank()?;
        sink.push_frame(idx, &frame)?;
        idx = idx.next();
    }
    for scene in script.iter() {
        let frame = backend.render_scene(&scene)?;
        sink.push_frame(idx, &frame)?;
        idx = idx.next();
    }

    sink.end()?;
    Ok(idx.0)
}

/// Build the animation script for one commit.
pub fn commit_script(
    commit: &CommitInfo,
    source: &dyn CommitSource,
    cfg: &Config,
) -> DiffreelResult<AnimationScript> {
    let changes = source.file_changes(commit)?;
    CommitSceneAssembler::from_config(cfg).assemble(commit.summary(), &changes)
}

/// Render one commit into `sink`. Returns the number of frames pushed.
#[tracing::instrument(skip_all, fields(commit = %commit.id))]
pub fn render_commit(
    commit: &CommitInfo,
    source: &dyn CommitSource,
    cfg: &Config,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn FrameSink,
) -> DiffreelResult<u64> {
    let script = commit_script(commit, source, cfg)?;
    tracing::info!(
        summary = commit.summary(),
        files = script.file_count(),
        scenes = script.frame_count(),
        "rendering commit"
    );
    render_script(&script, cfg.lead_in_frames, cfg.fps, backend, sink)
}

/// Walk `ranges` in order, keeping the commits that pass the message filter.
///
/// Stops at the first range the source reports as missing.
pub fn collect_commits(
    source: &dyn CommitSource,
    cfg: &Config,
    ranges: impl IntoIterator<Item = TagRange>,
) -> DiffreelResult<Vec<CommitInfo>> {
    let mut out = Vec::new();
    for range in ranges {
        let Some(commits) = source.commits_in_range(&range)? else {
            tracing::debug!(range = %range.spec(), "range not found; stopping");
            break;
        };
        let total = commits.len();
        let kept = select_commits(commits, cfg.min_message_len);
        tracing::info!(range = %range.spec(), total, kept = kept.len(), "collected commits");
        out.extend(kept);
    }
    Ok(out)
}

/// Render each commit into `frames_root/<id>/`, returning the directories in commit order
/// together with their frame counts.
///
/// With `cfg.jobs > 1` commits are rendered on a dedicated rayon pool, one backend per worker.
pub fn render_commit_frames<B, F>(
    source: &dyn CommitSource,
    cfg: &Config,
    commits: &[CommitInfo],
    make_backend: F,
) -> DiffreelResult<Vec<(PathBuf, u64)>>
where
    B: RenderBackend,
    F: Fn() -> DiffreelResult<B> + Sync,
{
    let render_one = |backend: &mut B, commit: &CommitInfo| -> DiffreelResult<(PathBuf, u64)> {
        let dir = cfg.commit_frames_dir(&commit.id);
        let mut sink = FrameDirSink::new(&dir);
        let frames = render_commit(commit, source, cfg, backend, &mut sink)?;
        Ok((dir, frames))
    };

    if cfg.jobs <= 1 {
        let mut backend = make_backend()?;
        return commits
            .iter()
            .map(|commit| render_one(&mut backend, commit))
            .collect();
    }

    let pool = build_thread_pool(cfg.jobs)?;
    pool.install(|| {
        commits
            .par_iter()
            .map_init(&make_backend, |backend, commit| match backend {
                Ok(backend) => render_one(backend, commit),
                Err(e) => Err(DiffreelError::asset(format!(
                    "failed to create worker backend: {e}"
                ))),
            })
            .collect()
    })
}

/// Render every selected commit in `ranges` and concatenate the frames into `cfg.output`.
#[tracing::instrument(skip_all, fields(output = %cfg.output.display(), jobs = cfg.jobs))]
pub fn render_tag_video(
    source: &dyn CommitSource,
    cfg: &Config,
    assets: &RenderAssets,
    ranges: impl IntoIterator<Item = TagRange>,
) -> DiffreelResult<RenderSummary> {
    let commits = collect_commits(source, cfg, ranges)?;
    let rendered = render_commit_frames(source, cfg, &commits, || {
        CpuBackend::new(assets.clone(), cfg)
    })?;

    let frames: u64 = rendered.iter().map(|(_, n)| n).sum();
    let dirs: Vec<PathBuf> = rendered.into_iter().map(|(dir, _)| dir).collect();
    let output = TimelineAssembler::from_config(cfg)
        .assemble(&dirs)?
        .map(|_| cfg.output.clone());

    tracing::info!(commits = commits.len(), frames, "render finished");
    Ok(RenderSummary {
        commits: commits.len(),
        frames,
        output,
    })
}

fn build_thread_pool(threads: usize) -> DiffreelResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| DiffreelError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
