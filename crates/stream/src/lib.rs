//! Location stream aggregation.
//!
//! Code-intelligence providers report results as a two-level stream: an outer
//! stream yields one inner stream per result source, and each inner stream
//! yields complete snapshots of that source's results so far. [`Aggregate`]
//! folds this into a single stream of [`LocationsState`]: the concatenation of
//! every source's latest snapshot, in source first-seen order, plus a flag that
//! turns true once the outer stream and every inner stream have finished.
//!
//! The first item is always the loading state (no locations, not complete).
//! Errors are fatal: the error is yielded once, all sources are dropped and the
//! stream ends. Dropping the aggregate, or cancelling its token, drops every
//! source it holds.

mod aggregate;
mod error;
mod groups;
mod state;

pub use aggregate::{Aggregate, aggregate};
pub use error::AggregateError;
pub use groups::GroupId;
pub use state::LocationsState;
