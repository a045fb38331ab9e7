use std::collections::BTreeSet;

use crate::diff::change::FileChangeKind;

/// What one sequence index currently shows. Being an enum, a slot can never carry more than
/// one of the existing/new/removed variants at once.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum SlotState {
    /// Nothing drawn, but the row is still reserved unless the index is ignored.
    #[default]
    Empty,
    /// Unchanged (or not yet animated) text.
    Existing(String),
    /// Text being or already typed in.
    New(String),
    /// Text marked for removal.
    Removed(String),
}

impl SlotState {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Existing(t) | Self::New(t) | Self::Removed(t) => Some(t),
        }
    }

    pub fn existing_text(&self) -> Option<&str> {
        match self {
            Self::Existing(t) => Some(t),
            _ => None,
        }
    }

    pub fn new_text(&self) -> Option<&str> {
        match self {
            Self::New(t) => Some(t),
            _ => None,
        }
    }

    pub fn removed_text(&self) -> Option<&str> {
        match self {
            Self::Removed(t) => Some(t),
            _ => None,
        }
    }
}

/// One frame's worth of animation state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SceneState {
    /// File currently being animated.
    pub filename: String,
    pub file_kind: FileChangeKind,
    /// Files already animated in this commit, most recent first.
    pub header_list: Vec<String>,
    pub footer: String,
    /// Indexed by sequence index.
    pub slots: Vec<SlotState>,
    /// Collapsed indices; they no longer take a row.
    pub ignored: BTreeSet<usize>,
}

impl SceneState {
    /// Render row of `index`, or `None` when the index is collapsed or unknown.
    ///
    /// `row(i) = base + line_height * (i - |{j in ignored : j < i}|)`
    pub fn row_of(&self, index: usize, base: u32, line_height: u32) -> Option<u32> {
        if index >= self.slots.len() || self.ignored.contains(&index) {
            return None;
        }
        let hidden_above = self.ignored.range(..index).count();
        let visual = u32::try_from(index - hidden_above).ok()?;
        Some(base + line_height * visual)
    }

    /// Non-ignored slots with text, paired with their index.
    pub fn visible_slots(&self) -> impl Iterator<Item = (usize, &SlotState)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, s)| !self.ignored.contains(i) && s.text().is_some())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
