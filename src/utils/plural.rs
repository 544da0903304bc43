//! Pluralization for summary lines.

/// Format count with noun, e.g. `1 file`, `3 files`, `0 files`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
