use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use diffreel::{CommitSource as _, RenderBackend as _};

#[derive(Parser, Debug)]
#[command(name = "diffreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every commit between consecutive numeric tags into one MP4 (requires `git` and `ffmpeg`).
    Render(RenderArgs),
    /// Print a commit's animation script as JSON lines (one scene per line).
    Script(ScriptArgs),
    /// Render a single scene of a commit as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Repository to read commits from.
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// JSON config file; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// First tag range rendered is `{start_tag - 1}..{start_tag}`.
    #[arg(long, default_value_t = 1)]
    start_tag: u64,

    /// Stop before this tag number (default: until a tag is missing).
    #[arg(long)]
    end_tag: Option<u64>,

    /// Output MP4 path (overrides the config).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Commits rendered concurrently (overrides the config).
    #[arg(long)]
    jobs: Option<usize>,
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Commit to describe.
    #[arg(long)]
    commit: String,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Commit to render.
    #[arg(long)]
    commit: String,

    /// Scene index (0-based, lead-in frames not counted).
    #[arg(long)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Script(args) => cmd_script(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<diffreel::Config> {
    let cfg = match path {
        Some(path) => diffreel::Config::from_json_file(path)?,
        None => diffreel::Config::default(),
    };
    Ok(cfg)
}

fn open_source(repo: &Path) -> anyhow::Result<diffreel::GitCli> {
    if !diffreel::source::git::is_git_on_path() {
        anyhow::bail!("git is required but was not found on PATH");
    }
    Ok(diffreel::GitCli::new(repo))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.source.config.as_deref())?;
    if let Some(out) = args.out {
        cfg.output = out;
    }
    if let Some(jobs) = args.jobs {
        cfg.jobs = jobs;
    }
    cfg.validate()?;

    let source = open_source(&args.source.repo)?;
    let assets = diffreel::RenderAssets::load(&cfg)?;
    let ranges = diffreel::numbered_tag_ranges(args.start_tag, args.end_tag);

    let summary = diffreel::render_tag_video(&source, &cfg, &assets, ranges)?;
    match summary.output {
        Some(path) => eprintln!(
            "wrote {} ({} commits, {} frames)",
            path.display(),
            summary.commits,
            summary.frames
        ),
        None => eprintln!("nothing to render"),
    }
    Ok(())
}

fn cmd_script(args: ScriptArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.source.config.as_deref())?;
    let source = open_source(&args.source.repo)?;
    let commit = source.commit(&args.commit)?;
    let script = diffreel::render::pipeline::commit_script(&commit, &source, &cfg)?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    for scene in script.iter() {
        serde_json::to_writer(&mut out, &scene).context("serialize scene")?;
        out.write_all(b"\n").context("write scene")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.source.config.as_deref())?;
    let source = open_source(&args.source.repo)?;
    let commit = source.commit(&args.commit)?;
    let script = diffreel::render::pipeline::commit_script(&commit, &source, &cfg)?;

    let scene = script.iter().nth(args.index).with_context(|| {
        format!(
            "scene index {} out of range (script has {} scenes)",
            args.index,
            script.frame_count()
        )
    })?;

    let assets = diffreel::RenderAssets::load(&cfg)?;
    let mut backend = diffreel::CpuBackend::new(assets, &cfg)?;
    let frame = backend.render_scene(&scene)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    diffreel::encode::sink::write_png(&args.out, &frame, &mut Vec::new())?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
