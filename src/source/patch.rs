//! Split `git diff` output into per-file [`FileChange`]s.
//!
//! Only the file headers are interpreted here. Hunk bodies stay as raw bytes so that decoding
//! happens (and fails) in the line classifier.

use crate::diff::change::FileChange;

const DIFF_HEADER: &[u8] = b"diff --git ";

#[derive(Default)]
struct Block {
    git_paths: Option<(String, String)>,
    created: bool,
    deleted: bool,
    minus: Option<Option<String>>,
    plus: Option<Option<String>>,
    in_body: bool,
    raw: Vec<u8>,
}

impl Block {
    fn finish(self) -> Option<FileChange> {
        let (git_old, git_new) = match self.git_paths {
            Some((a, b)) => (Some(a), Some(b)),
            None => (None, None),
        };
        let old_path = match self.minus {
            Some(p) => p,
            None if self.created => None,
            None => git_old,
        };
        let new_path = match self.plus {
            Some(p) => p,
            None if self.deleted => None,
            None => git_new,
        };
        if old_path.is_none() && new_path.is_none() {
            return None;
        }
        Some(FileChange {
            old_path,
            new_path,
            raw: self.raw,
        })
    }

    fn header_line(&mut self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let text = text.trim_end_matches(['\n', '\r']);
        if let Some(rest) = text.strip_prefix("--- ") {
            self.minus = Some(header_path(rest, "a/"));
        } else if let Some(rest) = text.strip_prefix("+++ ") {
            self.plus = Some(header_path(rest, "b/"));
        } else if text.starts_with("new file mode") {
            self.created = true;
        } else if text.starts_with("deleted file mode") {
            self.deleted = true;
        }
    }
}

/// Parse the output of `git diff` / `git diff-tree -p` into file changes, in output order.
pub fn parse_patch(output: &[u8]) -> Vec<FileChange> {
    let mut changes = Vec::new();
    let mut block: Option<Block> = None;

    for line in output.split_inclusive(|&b| b == b'\n') {
        if let Some(rest) = line.strip_prefix(DIFF_HEADER) {
            if let Some(done) = block.take().and_then(Block::finish) {
                changes.push(done);
            }
            block = Some(Block {
                git_paths: git_header_paths(&String::from_utf8_lossy(rest)),
                ..Block::default()
            });
            continue;
        }

        let Some(current) = block.as_mut() else {
            continue;
        };
        if !current.in_body && line.starts_with(b"@@") {
            current.in_body = true;
        }
        if current.in_body {
            current.raw.extend_from_slice(line);
        } else {
            current.header_line(line);
        }
    }

    if let Some(done) = block.and_then(Block::finish) {
        changes.push(done);
    }
    changes
}

fn header_path(raw: &str, prefix: &str) -> Option<String> {
    let raw = raw.trim_end_matches('\t');
    if raw == "/dev/null" {
        return None;
    }
    let raw = unquote(raw);
    Some(raw.strip_prefix(prefix).unwrap_or(raw).to_string())
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// Paths from `a/<old> b/<new>`. Without renames both halves are equal, which disambiguates
/// paths containing `" b/"`.
fn git_header_paths(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim_end_matches(['\n', '\r']);
    let body = rest.strip_prefix("a/")?;
    if body.len() >= 3 && (body.len() - 3) % 2 == 0 {
        let half = (body.len() - 3) / 2;
        if body.is_char_boundary(half) {
            let (old, tail) = body.split_at(half);
            if tail.strip_prefix(" b/") == Some(old) {
                return Some((old.to_string(), old.to_string()));
            }
        }
    }
    let (old, new) = body.rsplit_once(" b/")?;
    Some((old.to_string(), new.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/source/patch.rs"]
mod tests;
