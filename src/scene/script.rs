use crate::{
    diff::{change::FileChange, classify::classify_bytes},
    foundation::{
        config::{Config, SequenceConfig},
        error::DiffreelResult,
    },
    scene::{
        sequencer::{FileSceneContext, SceneSequencer},
        state::SceneState,
    },
};

/// Ordered scene states for one commit.
///
/// The script is plain data: [`AnimationScript::iter`] can be called any number of times and
/// always yields the same sequence.
#[derive(Clone, Debug)]
pub struct AnimationScript {
    footer: String,
    files: Vec<SceneSequencer>,
}

impl AnimationScript {
    pub fn iter(&self) -> impl Iterator<Item = SceneState> + '_ {
        self.files.iter().cloned().flatten()
    }

    pub fn frame_count(&self) -> usize {
        self.files.iter().map(ExactSizeIterator::len).sum()
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Chains per-file sequences into one commit script.
#[derive(Clone, Copy, Debug)]
pub struct CommitSceneAssembler {
    wrap_width: usize,
    sequence: SequenceConfig,
}

impl CommitSceneAssembler {
    pub fn new(wrap_width: usize, sequence: SequenceConfig) -> Self {
        Self {
            wrap_width,
            sequence,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.wrap_width, cfg.sequence)
    }

    /// Classify every file-change (in the given order) and build its sequencer.
    ///
    /// Each file sees the names of the files before it, most recent first. Any decode failure
    /// aborts the whole commit.
    pub fn assemble(&self, summary: &str, changes: &[FileChange]) -> DiffreelResult<AnimationScript> {
        let mut header_list: Vec<String> = Vec::new();
        let mut files = Vec::with_capacity(changes.len());

        for change in changes {
            let filename = change.display_path().to_string();
            let lines = classify_bytes(&change.raw, self.wrap_width).map_err(|e| {
                tracing::error!(file = %filename, "failed to classify change block");
                e
            })?;
            tracing::debug!(file = %filename, lines = lines.len(), kind = ?change.kind(), "classified file change");

            let ctx = FileSceneContext {
                filename: filename.clone(),
                file_kind: change.kind(),
                header_list: header_list.clone(),
                footer: summary.to_string(),
            };
            files.push(SceneSequencer::new(ctx, lines, self.sequence)?);
            header_list.insert(0, filename);
        }

        Ok(AnimationScript {
            footer: summary.to_string(),
            files,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/script.rs"]
mod tests;
