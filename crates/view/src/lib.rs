//! View-model for the hierarchical locations panel.
//!
//! [`LocationsView::from_state`] turns the merged output of
//! [`xref_stream::Aggregate`] and the `panel.locations.groupByFile` setting into
//! a render-ready structure: a loading marker, a flat list, or file groups in
//! first-occurrence order. It is pure and total.
//!
//! [`HierarchicalLocationsView`] is the mounted component: it registers the
//! "Group by file" toggle while mounted and republishes a [`ViewState`] on every
//! location update or settings change.

mod component;
pub mod contribution;
mod group;
mod selection;
mod view_model;

pub use component::{FetchHighlightedFileLines, HierarchicalLocationsView, HierarchicalLocationsViewProps, MountedView, ViewError, ViewState};
pub use group::{FileGroup, group_by_file};
pub use selection::select_group;
pub use view_model::{LocationsView, RenderedLocations};
