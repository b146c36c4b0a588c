use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::def::{ActionContribution, ContributionDescriptor, MenuId, MenuItemContribution};

/// Write-only sink for contribution declarations.
pub trait ContributionSink {
	/// Registers a descriptor. The declarations stay live until the returned
	/// guard is dropped or disposed.
	fn register_contributions(&self, descriptor: ContributionDescriptor) -> Contributions;
}

/// Guard for a live registration.
///
/// Unregisters on [`Contributions::dispose`] or drop, whichever happens first.
/// The release runs exactly once, including during unwinding.
#[must_use = "dropping the guard unregisters the contributions immediately"]
pub struct Contributions {
	dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Contributions {
	/// Creates a guard that runs `dispose` on release.
	pub fn new(dispose: impl FnOnce() + Send + Sync + 'static) -> Self {
		Self {
			dispose: Some(Box::new(dispose)),
		}
	}

	/// Releases the registration now.
	pub fn dispose(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(dispose) = self.dispose.take() {
			dispose();
		}
	}
}

impl Drop for Contributions {
	fn drop(&mut self) {
		self.release();
	}
}

impl std::fmt::Debug for Contributions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Contributions").field("live", &self.dispose.is_some()).finish()
	}
}

/// Monotonic identifier of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationId(u64);

#[derive(Default)]
struct RegistryState {
	entries: Vec<(RegistrationId, ContributionDescriptor)>,
	next_id: u64,
}

/// In-memory contribution registry.
///
/// Reads flatten all live registrations in registration order. Cloning the
/// registry shares the same state.
#[derive(Clone, Default)]
pub struct ContributionRegistry {
	state: Arc<RwLock<RegistryState>>,
}

impl ContributionRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of live registrations.
	pub fn len(&self) -> usize {
		self.state.read().entries.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.state.read().entries.is_empty()
	}

	/// Returns all live actions.
	pub fn actions(&self) -> Vec<ActionContribution> {
		self.state.read().entries.iter().flat_map(|(_, d)| d.actions.iter().cloned()).collect()
	}

	/// Returns the live action with the given id.
	///
	/// When several registrations declare the same id, the most recent wins.
	pub fn action(&self, id: &str) -> Option<ActionContribution> {
		self.state.read().entries.iter().rev().find_map(|(_, d)| d.action(id).cloned())
	}

	/// Returns all live items placed in the given menu.
	pub fn menu_items(&self, menu: MenuId) -> Vec<MenuItemContribution> {
		self.state
			.read()
			.entries
			.iter()
			.filter_map(|(_, d)| d.menus.get(&menu))
			.flat_map(|items| items.iter().cloned())
			.collect()
	}

	fn unregister(state: &Weak<RwLock<RegistryState>>, id: RegistrationId) {
		let Some(state) = state.upgrade() else {
			return;
		};
		let mut guard = state.write();
		if let Some(pos) = guard.entries.iter().position(|(entry_id, _)| *entry_id == id) {
			guard.entries.remove(pos);
			debug!(domain = "contributions", registration = id.0, "unregistered contributions");
		}
	}
}

impl ContributionSink for ContributionRegistry {
	fn register_contributions(&self, descriptor: ContributionDescriptor) -> Contributions {
		let id = {
			let mut guard = self.state.write();
			let id = RegistrationId(guard.next_id);
			guard.next_id += 1;
			trace!(
				domain = "contributions",
				registration = id.0,
				actions = descriptor.actions.len(),
				menus = descriptor.menus.len(),
				"registering contributions"
			);
			guard.entries.push((id, descriptor));
			id
		};

		let state = Arc::downgrade(&self.state);
		Contributions::new(move || Self::unregister(&state, id))
	}
}

impl std::fmt::Debug for ContributionRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ContributionRegistry").field("registrations", &self.len()).finish()
	}
}
