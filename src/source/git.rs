use std::{
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use crate::{
    diff::change::FileChange,
    foundation::error::{DiffreelError, DiffreelResult},
    source::{
        commits::{CommitInfo, CommitSource, TagRange},
        patch::parse_patch,
    },
};

const LOG_FORMAT: &str = "--format=%H%x1f%P%x1f%B%x1e";
const DIFF_FLAGS: [&str; 3] = ["--no-color", "--no-ext-diff", "--no-renames"];

pub fn is_git_on_path() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// [`CommitSource`] backed by the system `git` binary.
#[derive(Clone, Debug)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn output(&self, args: &[&str]) -> DiffreelResult<Output> {
        Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                DiffreelError::source(format!(
                    "failed to spawn git (is it installed and on PATH?): {e}"
                ))
            })
    }

    fn run(&self, args: &[&str]) -> DiffreelResult<Vec<u8>> {
        let out = self.output(args)?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(DiffreelError::source(format!(
                "git {} failed ({}): {}",
                args.join(" "),
                out.status,
                stderr.trim()
            )));
        }
        Ok(out.stdout)
    }

    fn rev_exists(&self, rev: &str) -> DiffreelResult<bool> {
        let spec = format!("{rev}^{{commit}}");
        let out = self.output(&["rev-parse", "--verify", "--quiet", &spec])?;
        Ok(out.status.success())
    }
}

impl CommitSource for GitCli {
    fn commits_in_range(&self, range: &TagRange) -> DiffreelResult<Option<Vec<CommitInfo>>> {
        if !self.rev_exists(&range.from)? || !self.rev_exists(&range.to)? {
            tracing::debug!(range = %range.spec(), "range endpoint missing");
            return Ok(None);
        }
        let spec = range.spec();
        let out = self.run(&["log", "--reverse", LOG_FORMAT, &spec, "--"])?;
        parse_log(&out).map(Some)
    }

    fn commit(&self, rev: &str) -> DiffreelResult<CommitInfo> {
        let out = self.run(&["log", "-1", LOG_FORMAT, rev, "--"])?;
        parse_log(&out)?
            .into_iter()
            .next()
            .ok_or_else(|| DiffreelError::source(format!("revision '{rev}' not found")))
    }

    fn file_changes(&self, commit: &CommitInfo) -> DiffreelResult<Vec<FileChange>> {
        let out = match &commit.parent {
            Some(parent) => {
                let mut args = vec!["diff"];
                args.extend(DIFF_FLAGS);
                args.extend([parent.as_str(), commit.id.as_str(), "--"]);
                self.run(&args)?
            }
            None => {
                let mut args = vec!["diff-tree", "-p", "-r", "--root", "--no-commit-id"];
                args.extend(DIFF_FLAGS);
                args.extend([commit.id.as_str(), "--"]);
                self.run(&args)?
            }
        };
        Ok(parse_patch(&out))
    }
}

/// Parse records written with [`LOG_FORMAT`].
fn parse_log(out: &[u8]) -> DiffreelResult<Vec<CommitInfo>> {
    let text = String::from_utf8_lossy(out);
    let mut commits = Vec::new();
    for record in text.split('\u{1e}') {
        let record = record.trim_start_matches('\n');
        if record.is_empty() {
            continue;
        }
        let mut fields = record.splitn(3, '\u{1f}');
        let (Some(id), Some(parents), Some(message)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(DiffreelError::source(format!(
                "unexpected git log record: {record:?}"
            )));
        };
        commits.push(CommitInfo {
            id: id.to_string(),
            parent: parents.split_whitespace().next().map(str::to_string),
            message: message.to_string(),
        });
    }
    Ok(commits)
}

#[cfg(test)]
#[path = "../../tests/unit/source/git.rs"]
mod tests;
