/// One file's entry in a commit diff, as supplied by a commit source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileChange {
    /// Path before the change; `None` when the file was created.
    pub old_path: Option<String>,
    /// Path after the change; `None` when the file was deleted.
    pub new_path: Option<String>,
    /// Undecoded hunk text (everything from the first `@@` line on).
    pub raw: Vec<u8>,
}

impl FileChange {
    pub fn kind(&self) -> FileChangeKind {
        FileChangeKind::of(self.old_path.as_deref(), self.new_path.as_deref())
    }

    /// Name shown in the header: the new path, or the old path for deletions.
    pub fn display_path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or("")
    }
}

/// How a file-change affects the file as a whole; drives header styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChangeKind {
    Created,
    Deleted,
    Modified,
}

impl FileChangeKind {
    pub fn of(old_path: Option<&str>, new_path: Option<&str>) -> Self {
        match (old_path, new_path) {
            (None, Some(_)) => Self::Created,
            (Some(_), None) => Self::Deleted,
            _ => Self::Modified,
        }
    }
}
