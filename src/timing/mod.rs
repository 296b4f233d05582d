//! Word timing within a segment and the run-scoped record tracker.

/// Equal-partition timing of words inside a segment.
pub mod distribute;
/// Accumulates timed highlight records across one pipeline run.
pub mod tracker;
