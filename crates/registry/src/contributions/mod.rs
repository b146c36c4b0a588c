//! Action and menu contributions.

mod def;
mod registry;

pub use def::{ActionContribution, ContributionDescriptor, MenuId, MenuItemContribution};
pub use registry::{ContributionRegistry, ContributionSink, Contributions, RegistrationId};
