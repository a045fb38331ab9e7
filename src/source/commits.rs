use crate::{diff::change::FileChange, foundation::error::DiffreelResult};

/// A commit as reported by a [`CommitSource`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CommitInfo {
    /// Full object id; also names the commit's frame directory.
    pub id: String,
    /// First parent, absent for root commits.
    pub parent: Option<String>,
    /// Full message.
    pub message: String,
}

impl CommitInfo {
    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim_end()
    }
}

/// Revision range `from..to` (commits reachable from `to` but not from `from`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagRange {
    pub from: String,
    pub to: String,
}

impl TagRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn spec(&self) -> String {
        format!("{}..{}", self.from, self.to)
    }
}

/// Ranges between consecutive numeric tags: `"{n-1}".."{n}"` for `n` in `start..end`.
pub fn numbered_tag_ranges(start: u64, end: Option<u64>) -> impl Iterator<Item = TagRange> {
    let end = end.unwrap_or(u64::MAX);
    (start.max(1)..end).map(|n| TagRange::new((n - 1).to_string(), n.to_string()))
}

/// Keep commits whose message, without trailing whitespace, is longer than `min_len` characters.
pub fn select_commits(commits: Vec<CommitInfo>, min_len: usize) -> Vec<CommitInfo> {
    commits
        .into_iter()
        .filter(|c| c.message.trim_end().chars().count() > min_len)
        .collect()
}

/// Supplies commits and their per-file changes.
pub trait CommitSource: Sync {
    /// Commits in `range`, oldest first. `Ok(None)` means the range does not exist, which ends
    /// a walk over consecutive tags.
    fn commits_in_range(&self, range: &TagRange) -> DiffreelResult<Option<Vec<CommitInfo>>>;

    /// Resolve a single revision.
    fn commit(&self, rev: &str) -> DiffreelResult<CommitInfo>;

    /// File changes of `commit` against its first parent, in a stable order.
    fn file_changes(&self, commit: &CommitInfo) -> DiffreelResult<Vec<FileChange>>;
}

#[cfg(test)]
#[path = "../../tests/unit/source/commits.rs"]
mod tests;
