//! Turning raw change blocks into display lines.

/// File-level change records.
pub mod change;
/// Line classification (context / added / removed) with fixed-width wrapping.
pub mod classify;
/// Column-aware word wrapping.
pub mod wrap;
