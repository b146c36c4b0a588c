use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{debug, trace, warn};
use xref_primitives::Location;

use crate::error::AggregateError;
use crate::groups::{GroupEvent, GroupRegistry};
use crate::state::LocationsState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	/// The loading state has not been yielded yet.
	Initial,
	/// Sources are being merged.
	Running,
	/// Completed, failed or cancelled. Yields nothing more.
	Finished,
}

pin_project! {
	/// Stream adapter merging a stream of location sources.
	///
	/// See the [crate docs](crate) for the emission contract.
	#[must_use = "streams do nothing unless polled"]
	pub struct Aggregate<O, I> {
		#[pin]
		outer: Option<O>,
		#[pin]
		cancelled: Option<WaitForCancellationFutureOwned>,
		groups: GroupRegistry<I>,
		phase: Phase,
	}
}

/// Merges a stream of location sources. Shorthand for [`Aggregate::new`].
pub fn aggregate<O, I, E>(outer: O) -> Aggregate<O, I>
where
	O: Stream<Item = Result<I, E>>,
	I: Stream<Item = Result<Vec<Location>, E>>,
{
	Aggregate::new(outer)
}

impl<O, I, E> Aggregate<O, I>
where
	O: Stream<Item = Result<I, E>>,
	I: Stream<Item = Result<Vec<Location>, E>>,
{
	/// Wraps an outer stream of sources.
	pub fn new(outer: O) -> Self {
		Self {
			outer: Some(outer),
			cancelled: None,
			groups: GroupRegistry::new(),
			phase: Phase::Initial,
		}
	}

	/// Ends the stream, dropping every source, once `token` is cancelled.
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancelled = Some(token.cancelled_owned());
		self
	}

	/// Returns the merged view of the current snapshots.
	pub fn snapshot(&self) -> Vec<Location> {
		self.groups.snapshot()
	}

	/// Returns true once the stream has completed, failed or been cancelled.
	pub fn is_terminated(&self) -> bool {
		self.phase == Phase::Finished
	}
}

impl<O, I, E> Stream for Aggregate<O, I>
where
	O: Stream<Item = Result<I, E>>,
	I: Stream<Item = Result<Vec<Location>, E>>,
{
	type Item = Result<LocationsState, AggregateError<E>>;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		let mut this = self.project();

		match *this.phase {
			Phase::Finished => return Poll::Ready(None),
			Phase::Initial => {
				*this.phase = Phase::Running;
				return Poll::Ready(Some(Ok(LocationsState::loading())));
			}
			Phase::Running => {}
		}

		if let Some(cancelled) = this.cancelled.as_mut().as_pin_mut()
			&& cancelled.poll(cx).is_ready()
		{
			debug!(domain = "locations", groups = this.groups.len(), "aggregate cancelled");
			this.outer.set(None);
			this.cancelled.set(None);
			this.groups.close();
			*this.phase = Phase::Finished;
			return Poll::Ready(None);
		}

		// Register new sources before polling the existing ones.
		while let Some(outer) = this.outer.as_mut().as_pin_mut() {
			match outer.poll_next(cx) {
				Poll::Ready(Some(Ok(inner))) => {
					let id = this.groups.open(inner);
					trace!(domain = "locations", group = %id, "opened location source");
				}
				Poll::Ready(Some(Err(err))) => {
					warn!(domain = "locations", groups = this.groups.len(), "location source stream failed; discarding results");
					this.outer.set(None);
					this.cancelled.set(None);
					this.groups.close();
					*this.phase = Phase::Finished;
					return Poll::Ready(Some(Err(AggregateError::Outer(err))));
				}
				Poll::Ready(None) => {
					trace!(domain = "locations", groups = this.groups.len(), "outer location stream finished");
					this.outer.set(None);
				}
				Poll::Pending => break,
			}
		}

		loop {
			match this.groups.poll_next_event(cx) {
				Poll::Ready(Some(GroupEvent::Batch(id))) => {
					let locations = this.groups.snapshot();
					trace!(domain = "locations", group = %id, total = locations.len(), "location source updated");
					return Poll::Ready(Some(Ok(LocationsState::new(locations, false))));
				}
				Poll::Ready(Some(GroupEvent::Closed(id))) => {
					trace!(domain = "locations", group = %id, open = this.groups.open_count(), "location source finished");
				}
				Poll::Ready(Some(GroupEvent::Failed(group, source))) => {
					warn!(domain = "locations", group = %group, "location source failed; discarding results");
					this.outer.set(None);
					this.cancelled.set(None);
					this.groups.close();
					*this.phase = Phase::Finished;
					return Poll::Ready(Some(Err(AggregateError::Inner { group, source })));
				}
				Poll::Ready(None) => break,
				Poll::Pending => return Poll::Pending,
			}
		}

		// Every source has finished; complete once the outer stream has too.
		if this.outer.is_some() {
			return Poll::Pending;
		}

		let locations = this.groups.snapshot();
		debug!(domain = "locations", groups = this.groups.len(), total = locations.len(), "locations complete");
		this.groups.close();
		this.cancelled.set(None);
		*this.phase = Phase::Finished;
		Poll::Ready(Some(Ok(LocationsState::new(locations, true))))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match self.phase {
			Phase::Finished => (0, Some(0)),
			Phase::Initial => (2, None),
			Phase::Running => (1, None),
		}
	}
}

impl<O, I> std::fmt::Debug for Aggregate<O, I> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Aggregate")
			.field("phase", &self.phase)
			.field("outer_open", &self.outer.is_some())
			.field("groups", &self.groups)
			.finish()
	}
}
