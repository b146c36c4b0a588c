//! Registry of location sources keyed by arena-assigned identity.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use xref_primitives::Location;

/// Identity of one inner stream, unique within one aggregate.
///
/// Two sources reporting identical content still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(u64);

impl GroupId {
	/// Returns the raw id.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for GroupId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// One registered source.
struct GroupEntry<I> {
	id: GroupId,
	/// Latest snapshot; replaced, never appended to.
	batch: Vec<Location>,
	/// Live source. `None` once the source finished.
	source: Option<Pin<Box<I>>>,
}

/// Event produced by polling the open sources.
pub(crate) enum GroupEvent<E> {
	/// A source replaced its snapshot.
	Batch(GroupId),
	/// A source finished.
	Closed(GroupId),
	/// A source failed.
	Failed(GroupId, E),
}

/// Sources in first-seen order, each owning its live inner stream.
///
/// Dropping an entry's stream is how that source is cancelled; [`GroupRegistry::close`]
/// drops all of them at once.
pub(crate) struct GroupRegistry<I> {
	entries: Vec<GroupEntry<I>>,
	next_id: u64,
	/// Round-robin start for polling so one busy source cannot starve the others.
	cursor: usize,
}

impl<I> Default for GroupRegistry<I> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
			next_id: 0,
			cursor: 0,
		}
	}
}

impl<I> GroupRegistry<I> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a new source with an empty snapshot.
	pub fn open(&mut self, source: I) -> GroupId {
		let id = GroupId(self.next_id);
		self.next_id += 1;
		self.entries.push(GroupEntry {
			id,
			batch: Vec::new(),
			source: Some(Box::pin(source)),
		});
		id
	}

	/// Number of sources ever registered (and not discarded).
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Number of sources that have not finished.
	pub fn open_count(&self) -> usize {
		self.entries.iter().filter(|e| e.source.is_some()).count()
	}

	/// Concatenates every source's latest snapshot in first-seen order.
	pub fn snapshot(&self) -> Vec<Location> {
		let total = self.entries.iter().map(|e| e.batch.len()).sum();
		let mut merged = Vec::with_capacity(total);
		for entry in &self.entries {
			merged.extend_from_slice(&entry.batch);
		}
		merged
	}

	/// Drops every source and discards all snapshots.
	pub fn close(&mut self) {
		self.entries.clear();
		self.cursor = 0;
	}
}

impl<I, E> GroupRegistry<I>
where
	I: Stream<Item = Result<Vec<Location>, E>>,
{
	/// Polls open sources round-robin until one produces an event.
	///
	/// Snapshots are stored before the event is returned. Every source that
	/// returns `Pending` has registered the waker.
	pub(crate) fn poll_next_event(&mut self, cx: &mut Context<'_>) -> Poll<Option<GroupEvent<E>>> {
		let len = self.entries.len();
		for step in 0..len {
			let idx = (self.cursor + step) % len;
			let entry = &mut self.entries[idx];
			let Some(source) = entry.source.as_mut() else {
				continue;
			};
			let event = match source.as_mut().poll_next(cx) {
				Poll::Pending => continue,
				Poll::Ready(Some(Ok(batch))) => {
					entry.batch = batch;
					GroupEvent::Batch(entry.id)
				}
				Poll::Ready(Some(Err(err))) => GroupEvent::Failed(entry.id, err),
				Poll::Ready(None) => {
					entry.source = None;
					GroupEvent::Closed(entry.id)
				}
			};
			self.cursor = (idx + 1) % len;
			return Poll::Ready(Some(event));
		}
		if self.open_count() == 0 { Poll::Ready(None) } else { Poll::Pending }
	}
}

impl<I> fmt::Debug for GroupRegistry<I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GroupRegistry")
			.field("groups", &self.entries.len())
			.field("open", &self.open_count())
			.field("next_id", &self.next_id)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use futures::channel::mpsc;
	use pretty_assertions::assert_eq;

	use super::*;

	type Source = mpsc::UnboundedReceiver<Result<Vec<Location>, ()>>;

	#[test]
	fn ids_follow_registration_and_close_drops_sources() {
		let mut groups: GroupRegistry<Source> = GroupRegistry::new();
		let (first_tx, first) = mpsc::unbounded();
		let (second_tx, second) = mpsc::unbounded();

		assert_eq!(groups.open(first).get(), 0);
		assert_eq!(groups.open(second).get(), 1);
		assert_eq!((groups.len(), groups.open_count()), (2, 2));
		assert!(groups.snapshot().is_empty());

		groups.close();
		assert_eq!(groups.len(), 0);
		assert!(first_tx.is_closed());
		assert!(second_tx.is_closed());
	}
}
