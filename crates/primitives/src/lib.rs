//! Core types for code-intelligence locations: positions, ranges, locations and repository URIs.

/// Boxed stream alias.
pub mod future;
/// Resource locations and LSP-style position/range coordinates.
pub mod lsp;
/// Repository URI parsing for display labels.
pub mod uri;

pub use future::BoxStreamSend;
pub use lsp::{Location, LspPosition, LspRange};
pub use uri::{RepoUri, UriError};
