use xref_primitives::RepoUri;

use crate::group::FileGroup;

/// Picks the group the panel should show expanded.
///
/// Keeps `previous` while that group still exists. Otherwise prefers the first
/// group in the default repository, then the first group overall. `default_group`
/// is either a repository URI (`git://github.com/foo/bar`) or a bare repository
/// name.
pub fn select_group(groups: &[FileGroup], previous: Option<&str>, default_group: &str) -> Option<String> {
	if let Some(previous) = previous
		&& groups.iter().any(|g| g.key == previous)
	{
		return Some(previous.to_string());
	}
	let default_repo = default_repo(default_group);
	groups
		.iter()
		.find(|g| g.repo.as_deref() == Some(default_repo.as_str()))
		.or_else(|| groups.first())
		.map(|g| g.key.clone())
}

/// Repository name named by a default-group prop.
pub(crate) fn default_repo(default_group: &str) -> String {
	RepoUri::parse(default_group).map_or_else(|_| default_group.to_string(), |uri| uri.repo)
}
