use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, trace, warn};
use xref_config::SettingsStore;
use xref_config::keys::GROUP_BY_FILE;
use xref_primitives::{BoxStreamSend, Location};
use xref_registry::{ContributionSink, Contributions};
use xref_stream::{LocationsState, aggregate};

use crate::contribution::register_group_by_file;
use crate::view_model::RenderedLocations;

/// Host callback producing highlighted lines for a file.
///
/// Arguments are the file URI, whether to disable the highlighting timeout, and
/// whether the light theme is active.
pub type FetchHighlightedFileLines = Arc<dyn Fn(&str, bool, bool) -> BoxStreamSend<'static, Vec<String>> + Send + Sync>;

/// Inputs the host supplies when mounting the panel.
#[derive(Clone)]
pub struct HierarchicalLocationsViewProps {
	/// Settings read for `panel.locations.groupByFile`.
	pub settings: SettingsStore,
	/// Repository whose group is expanded first, e.g. `git://github.com/foo/bar`.
	pub default_group: String,
	/// Whether the host renders with the light theme.
	pub is_light_theme: bool,
	/// Highlighting callback, forwarded unmodified.
	pub fetch_highlighted_file_lines: FetchHighlightedFileLines,
}

impl std::fmt::Debug for HierarchicalLocationsViewProps {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HierarchicalLocationsViewProps")
			.field("default_group", &self.default_group)
			.field("is_light_theme", &self.is_light_theme)
			.finish_non_exhaustive()
	}
}

/// What the panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
	/// Spinner: nothing reported yet.
	Loading,
	/// Locations to draw.
	Ready(RenderedLocations),
	/// A source failed; partial results are discarded.
	Error(String),
}

impl ViewState {
	/// Returns the frame, if ready.
	pub fn ready(&self) -> Option<&RenderedLocations> {
		match self {
			Self::Ready(frame) => Some(frame),
			_ => None,
		}
	}
}

/// Failure that ends [`MountedView::run`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
	/// A location source failed.
	#[error("failed to load locations: {0}")]
	Locations(String),
}

/// The hierarchical locations panel.
pub struct HierarchicalLocationsView;

impl HierarchicalLocationsView {
	/// Mounts the panel: registers its toolbar toggle with `sink` and returns the
	/// live handle. Dropping the handle unmounts.
	pub fn mount(props: HierarchicalLocationsViewProps, sink: &dyn ContributionSink) -> MountedView {
		let contributions = register_group_by_file(sink);
		debug!(domain = "locations", default_group = %props.default_group, "mounted locations panel");
		let (state_tx, _) = watch::channel(ViewState::Loading);
		MountedView {
			props,
			state_tx,
			latest: Mutex::new(LocationsState::loading()),
			selection: Mutex::new(None),
			contributions,
		}
	}
}

/// A mounted panel.
pub struct MountedView {
	props: HierarchicalLocationsViewProps,
	state_tx: watch::Sender<ViewState>,
	latest: Mutex<LocationsState>,
	selection: Mutex<Option<String>>,
	contributions: Contributions,
}

impl MountedView {
	/// Subscribes to state changes. The receiver sees the current state first.
	pub fn subscribe(&self) -> watch::Receiver<ViewState> {
		self.state_tx.subscribe()
	}

	/// Returns the current state.
	pub fn state(&self) -> ViewState {
		self.state_tx.borrow().clone()
	}

	/// Drives the panel from a stream of location sources.
	///
	/// Republishes on every merged update and every settings change. Keeps
	/// following settings after the sources complete, so the future only ends
	/// on a source failure (`Err`) or once the settings store goes away.
	/// Dropping the future drops every source.
	pub async fn run<O, I, E>(&self, locations: O) -> Result<(), ViewError>
	where
		O: Stream<Item = Result<I, E>>,
		I: Stream<Item = Result<Vec<Location>, E>>,
		E: std::error::Error + 'static,
	{
		let mut updates = pin!(aggregate(locations));
		let mut settings = self.props.settings.subscribe();
		let mut updates_open = true;
		let mut settings_open = true;

		loop {
			tokio::select! {
				item = updates.next(), if updates_open => match item {
					Some(Ok(state)) => {
						*self.latest.lock() = state;
						self.publish();
					}
					Some(Err(err)) => {
						let message = err.to_string();
						warn!(domain = "locations", error = %message, "locations panel failed");
						*self.latest.lock() = LocationsState::loading();
						self.state_tx.send_replace(ViewState::Error(message.clone()));
						return Err(ViewError::Locations(message));
					}
					None => {
						trace!(domain = "locations", "location sources finished");
						updates_open = false;
					}
				},
				changed = settings.changed(), if settings_open => match changed {
					Ok(()) => {
						settings.borrow_and_update();
						trace!(domain = "locations", "settings changed; regrouping");
						self.publish();
					}
					Err(_) => settings_open = false,
				},
				else => return Ok(()),
			}
		}
	}

	/// Expands the group with the given key. Returns false if no such group is
	/// shown.
	pub fn select_group(&self, key: &str) -> bool {
		let shown = self
			.state_tx
			.borrow()
			.ready()
			.is_some_and(|frame| frame.view.groups().iter().any(|g| g.key == key));
		if !shown {
			return false;
		}
		*self.selection.lock() = Some(key.to_string());
		self.publish();
		true
	}

	/// Fetches highlighted lines through the host callback.
	pub fn fetch_highlighted_file_lines(&self, uri: &str, disable_timeout: bool) -> BoxStreamSend<'static, Vec<String>> {
		(self.props.fetch_highlighted_file_lines)(uri, disable_timeout, self.props.is_light_theme)
	}

	/// Unmounts now, unregistering the toolbar toggle.
	pub fn unmount(self) {
		debug!(domain = "locations", "unmounted locations panel");
		self.contributions.dispose();
	}

	fn publish(&self) {
		// Read on every publish; the store may have changed since the last frame.
		let grouped = self.props.settings.resolve(&GROUP_BY_FILE);
		let latest = self.latest.lock();
		if latest.is_loading() {
			self.state_tx.send_replace(ViewState::Loading);
			return;
		}
		let mut selection = self.selection.lock();
		let frame = RenderedLocations::build(&latest, grouped, &self.props.default_group, selection.as_deref());
		if frame.selected_group.is_some() {
			selection.clone_from(&frame.selected_group);
		}
		self.state_tx.send_replace(ViewState::Ready(frame));
	}
}

impl std::fmt::Debug for MountedView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MountedView")
			.field("props", &self.props)
			.field("state", &*self.state_tx.borrow())
			.field("contributions", &self.contributions)
			.finish()
	}
}
