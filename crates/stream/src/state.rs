use xref_primitives::Location;

/// Merged view of all location sources at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationsState {
	/// Latest snapshot of every source, concatenated in source first-seen order.
	pub locations: Vec<Location>,
	/// True once the outer stream and every source it produced have finished.
	pub is_complete: bool,
}

impl LocationsState {
	/// The state observed before any source has reported.
	pub fn loading() -> Self {
		Self::default()
	}

	/// Creates a state.
	pub fn new(locations: Vec<Location>, is_complete: bool) -> Self {
		Self { locations, is_complete }
	}

	/// Returns true while nothing has been found and more may arrive.
	pub fn is_loading(&self) -> bool {
		self.locations.is_empty() && !self.is_complete
	}
}
