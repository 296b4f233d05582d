//! Static line layout of a segment's clean text.

/// Greedy word wrapping under width and word-count limits.
pub mod wrap;
