use crate::groups::GroupId;

/// Fatal aggregation failure.
///
/// `E` is the error type of the location sources.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError<E> {
	/// The outer stream of sources failed.
	#[error("location source stream failed: {0}")]
	Outer(#[source] E),
	/// One source's snapshot stream failed.
	#[error("location source {group} failed: {source}")]
	Inner {
		/// Identity of the failed source.
		group: GroupId,
		/// The source's error.
		#[source]
		source: E,
	},
}

impl<E> AggregateError<E> {
	/// Returns the underlying source error.
	pub fn source_error(&self) -> &E {
		match self {
			Self::Outer(err) | Self::Inner { source: err, .. } => err,
		}
	}

	/// Returns the failed group, if the failure came from an inner stream.
	pub fn group(&self) -> Option<GroupId> {
		match self {
			Self::Outer(_) => None,
			Self::Inner { group, .. } => Some(*group),
		}
	}
}
