//! Per-file animation state machine.
//!
//! A [`SceneSequencer`] walks the classified lines of one file-change and yields one
//! [`SceneState`] per frame:
//!
//! 1. **Intro**: the starting picture, held for `intro_frames`.
//! 2. Per index, ascending:
//!    - removed lines run three bursts of `removal_burst` frames (marked with the next removal
//!      bracketed, marked alone, collapsed);
//!    - added lines are typed in one character per frame;
//!    - context lines produce no frames.
//! 3. **Outro**: the settled result, held for `outro_frames`.
//!
//! Emitted states are snapshots of a private working copy; nothing handed out is mutated later.

use crate::{
    diff::{
        change::FileChangeKind,
        classify::{ChangeKind, ClassifiedLine},
    },
    foundation::{
        config::SequenceConfig,
        error::{DiffreelError, DiffreelResult},
    },
    scene::state::{SceneState, SlotState},
};

/// Header/footer data shared by every state of one file-change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSceneContext {
    pub filename: String,
    pub file_kind: FileChangeKind,
    pub header_list: Vec<String>,
    pub footer: String,
}

#[derive(Clone, Debug)]
enum Phase {
    Intro(u32),
    Next(usize),
    Bracket {
        index: usize,
        left: u32,
        restore: Option<SlotState>,
    },
    Marked {
        index: usize,
        left: u32,
    },
    Collapsed {
        index: usize,
        left: u32,
    },
    Reveal {
        index: usize,
        shown: usize,
        total: usize,
    },
    Outro(u32),
    Done,
}

/// Lazy, finite iterator of scene states for one file-change.
#[derive(Clone, Debug)]
pub struct SceneSequencer {
    lines: Vec<ClassifiedLine>,
    cfg: SequenceConfig,
    work: SceneState,
    phase: Phase,
    remaining: usize,
}

impl SceneSequencer {
    /// Build a sequencer; `lines` must carry indices `0..n` in order.
    pub fn new(
        ctx: FileSceneContext,
        lines: Vec<ClassifiedLine>,
        cfg: SequenceConfig,
    ) -> DiffreelResult<Self> {
        if let Some((pos, line)) = lines.iter().enumerate().find(|(i, l)| l.index != *i) {
            return Err(DiffreelError::sequence(format!(
                "classified line at position {pos} has index {}, expected {pos}",
                line.index
            )));
        }

        let slots = lines.iter().map(intro_slot).collect();
        let remaining = frame_count(&lines, cfg);
        Ok(Self {
            work: SceneState {
                filename: ctx.filename,
                file_kind: ctx.file_kind,
                header_list: ctx.header_list,
                footer: ctx.footer,
                slots,
                ignored: Default::default(),
            },
            lines,
            cfg,
            phase: Phase::Intro(cfg.intro_frames),
            remaining,
        })
    }

    pub fn lines(&self) -> &[ClassifiedLine] {
        &self.lines
    }

    fn snapshot(&mut self) -> Option<SceneState> {
        self.remaining -= 1;
        Some(self.work.clone())
    }

    fn set_slot(&mut self, index: usize, state: SlotState) -> SlotState {
        std::mem::replace(&mut self.work.slots[index], state)
    }

    fn begin_line(&mut self, index: usize) -> Phase {
        let line = &self.lines[index];
        match line.kind {
            ChangeKind::Context => Phase::Next(index + 1),
            ChangeKind::Added => Phase::Reveal {
                index,
                shown: 0,
                total: line.text.chars().count(),
            },
            ChangeKind::Removed => {
                let text = line.text.clone();
                let next_removed = self
                    .lines
                    .get(index + 1)
                    .filter(|next| next.kind == ChangeKind::Removed)
                    .map(|next| next.text.clone());
                self.set_slot(index, SlotState::Removed(text));
                let restore =
                    next_removed.map(|t| self.set_slot(index + 1, SlotState::Removed(t)));
                Phase::Bracket {
                    index,
                    left: self.cfg.removal_burst,
                    restore,
                }
            }
        }
    }

    fn collapse(&mut self, index: usize) {
        self.set_slot(index, SlotState::Empty);
        self.work.ignored.insert(index);
    }
}

impl Iterator for SceneSequencer {
    type Item = SceneState;

    fn next(&mut self) -> Option<SceneState> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Intro(0) => self.phase = Phase::Next(0),
                Phase::Intro(left) => {
                    self.phase = Phase::Intro(left - 1);
                    return self.snapshot();
                }
                Phase::Next(index) if index >= self.lines.len() => {
                    self.phase = Phase::Outro(self.cfg.outro_frames);
                }
                Phase::Next(index) => self.phase = self.begin_line(index),
                Phase::Bracket {
                    index,
                    left: 0,
                    restore,
                } => {
                    if let Some(prev) = restore {
                        self.set_slot(index + 1, prev);
                    }
                    self.phase = Phase::Marked {
                        index,
                        left: self.cfg.removal_burst,
                    };
                }
                Phase::Bracket {
                    index,
                    left,
                    restore,
                } => {
                    self.phase = Phase::Bracket {
                        index,
                        left: left - 1,
                        restore,
                    };
                    return self.snapshot();
                }
                Phase::Marked { index, left: 0 } => {
                    self.collapse(index);
                    self.phase = Phase::Collapsed {
                        index,
                        left: self.cfg.removal_burst,
                    };
                }
                Phase::Marked { index, left } => {
                    self.phase = Phase::Marked {
                        index,
                        left: left - 1,
                    };
                    return self.snapshot();
                }
                Phase::Collapsed { index, left: 0 } => self.phase = Phase::Next(index + 1),
                Phase::Collapsed { index, left } => {
                    self.phase = Phase::Collapsed {
                        index,
                        left: left - 1,
                    };
                    return self.snapshot();
                }
                Phase::Reveal {
                    index,
                    shown,
                    total,
                } if shown >= total => self.phase = Phase::Next(index + 1),
                Phase::Reveal {
                    index,
                    shown,
                    total,
                } => {
                    let prefix = char_prefix(&self.lines[index].text, shown + 1).to_string();
                    self.set_slot(index, SlotState::New(prefix));
                    self.phase = Phase::Reveal {
                        index,
                        shown: shown + 1,
                        total,
                    };
                    return self.snapshot();
                }
                Phase::Outro(0) | Phase::Done => return None,
                Phase::Outro(left) => {
                    self.phase = Phase::Outro(left - 1);
                    return self.snapshot();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SceneSequencer {}

/// Total number of states a sequencer over `lines` yields.
pub fn frame_count(lines: &[ClassifiedLine], cfg: SequenceConfig) -> usize {
    let burst = cfg.removal_burst as usize;
    let body: usize = lines
        .iter()
        .map(|l| match l.kind {
            ChangeKind::Context => 0,
            ChangeKind::Removed => 3 * burst,
            ChangeKind::Added => l.text.chars().count(),
        })
        .sum();
    cfg.intro_frames as usize + body + cfg.outro_frames as usize
}

fn intro_slot(line: &ClassifiedLine) -> SlotState {
    match line.kind {
        ChangeKind::Context | ChangeKind::Removed => SlotState::Existing(line.text.clone()),
        ChangeKind::Added => SlotState::Empty,
    }
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/sequencer.rs"]
mod tests;
