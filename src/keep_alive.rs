use hashbrown::HashSet;
use tracing::trace;

/// Names of the components whose mounted state the render layer should keep across navigations.
///
/// Empty at startup and never persisted. Only [`RouterGuards`](`crate::guards::RouterGuards`) mutates it;
/// the render layer reads it through [`contains`](`KeepAliveRegistry::contains`) or [`include_list`](`KeepAliveRegistry::include_list`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeepAliveRegistry {
	names: HashSet<String>,
}
impl KeepAliveRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns whether `name` was newly added.
	pub fn add(&mut self, name: &str) -> bool {
		let added = !self.names.contains(name) && self.names.insert(name.to_owned());
		if added {
			trace!(name, "Caching component.");
		}
		added
	}

	/// Returns whether `name` was present.
	pub fn remove(&mut self, name: &str) -> bool {
		let removed = self.names.remove(name);
		if removed {
			trace!(name, "Evicting component.");
		}
		removed
	}

	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.names.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Iterates the cached names in no particular order.
	pub fn iter(&self) -> impl '_ + Iterator<Item = &str> {
		self.names.iter().map(String::as_str)
	}

	/// The cached names, sorted, as a render layer's include filter expects them.
	#[must_use]
	pub fn include_list(&self) -> Vec<String> {
		let mut names: Vec<String> = self.names.iter().cloned().collect();
		names.sort_unstable();
		names
	}
}
