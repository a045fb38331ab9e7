use crate::{
    diff::wrap::wrap_columns,
    foundation::error::{DiffreelError, DiffreelResult},
};

/// Line role derived from the leading diff marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Context,
    Added,
    Removed,
}

impl ChangeKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(Self::Context),
            '+' => Some(Self::Added),
            '-' => Some(Self::Removed),
            _ => None,
        }
    }
}

/// One wrapped display line of a file-change.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ClassifiedLine {
    /// Zero-based, contiguous within one file-change.
    pub index: usize,
    pub kind: ChangeKind,
    /// Marker stripped, at most `wrap_width` columns.
    pub text: String,
}

/// Classify a raw change block, decoding it as UTF-8 first.
pub fn classify_bytes(raw: &[u8], wrap_width: usize) -> DiffreelResult<Vec<ClassifiedLine>> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        DiffreelError::decode(format!("change block is not valid UTF-8: {e}"))
    })?;
    Ok(classify_lines(text, wrap_width))
}

/// Turn decoded change-block text into wrapped, typed lines.
///
/// Lines whose first character is not a diff marker (hunk headers, `\ No newline ...`) are
/// skipped, as are lines that are blank once the marker is removed; neither consumes an index.
pub fn classify_lines(text: &str, wrap_width: usize) -> Vec<ClassifiedLine> {
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let mut chars = raw_line.chars();
        let Some(kind) = chars.next().and_then(ChangeKind::from_marker) else {
            continue;
        };
        let body = chars.as_str();
        if body.trim().is_empty() {
            continue;
        }
        for segment in wrap_columns(body, wrap_width) {
            out.push(ClassifiedLine {
                index: out.len(),
                kind,
                text: segment,
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/diff/classify.rs"]
mod tests;
