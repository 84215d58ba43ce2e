//! Route locations and navigation records as the guard pipeline sees them.

use core::fmt::{self, Display, Formatter};

/// Static metadata attached to a route definition. Read-only during navigation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteMeta {
	/// Applied to the document after navigating here, unless empty.
	pub title: String,
	/// Whether the route's component should be kept alive on back navigation.
	pub keep_alive: bool,
	pub auth: bool,
	pub icon: Option<String>,
	pub show_tabbar: bool,
	/// [`None`] uses the default page transition.
	pub transition_name: Option<String>,
}
impl RouteMeta {
	pub fn titled(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_keep_alive(self, keep_alive: bool) -> Self {
		Self { keep_alive, ..self }
	}
}

/// The component a route renders.
///
/// `name` is the component's declared name, `type_name` the name of its underlying type,
/// which stands in when no name was declared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComponentRef {
	pub name: Option<String>,
	pub type_name: Option<String>,
}
impl ComponentRef {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			type_name: None,
		}
	}

	#[must_use]
	pub fn anonymous() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn resolved_name(&self) -> Option<&str> {
		self.name.as_deref().or_else(|| self.type_name.as_deref())
	}
}

/// One record of a location's matched chain, outermost first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
	pub name: Option<String>,
	pub path: String,
	pub component: Option<ComponentRef>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteLocation {
	pub name: Option<String>,
	pub path: String,
	/// Path including query and hash.
	pub full_path: String,
	pub meta: RouteMeta,
	pub matched: Vec<MatchedRoute>,
}
impl RouteLocation {
	pub fn new(path: impl Into<String>) -> Self {
		let path = path.into();
		Self {
			full_path: path.clone(),
			path,
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_name(self, name: impl Into<String>) -> Self {
		Self { name: Some(name.into()), ..self }
	}

	#[must_use]
	pub fn with_meta(self, meta: RouteMeta) -> Self {
		Self { meta, ..self }
	}

	/// Appends a matched record rendering `component` at this location's path.
	#[must_use]
	pub fn with_component(mut self, component: ComponentRef) -> Self {
		self.matched.push(MatchedRoute {
			name: self.name.clone(),
			path: self.path.clone(),
			component: Some(component),
		});
		self
	}

	/// The name of the innermost matched component.
	///
	/// [`None`] means the location is anonymous and can't be cached.
	#[must_use]
	pub fn component_name(&self) -> Option<&str> {
		self.matched.last()?.component.as_ref()?.resolved_name()
	}

	#[must_use]
	pub fn is_named(&self, name: &str) -> bool {
		self.name.as_deref() == Some(name)
	}

	/// How this location appears in logs.
	///
	/// Paths can carry personal data, so they are only used with the `dangerous-logging` feature.
	#[must_use]
	pub fn log_label(&self) -> &str {
		if cfg!(feature = "dangerous-logging") {
			&self.full_path
		} else {
			self.name.as_deref().unwrap_or("<unnamed>")
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationFailureKind {
	/// A guard aborted the navigation.
	Aborted,
	/// A newer navigation superseded this one.
	Cancelled,
	/// The destination was the current location.
	Duplicated,
}
impl Display for NavigationFailureKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			NavigationFailureKind::Aborted => "aborted",
			NavigationFailureKind::Cancelled => "cancelled",
			NavigationFailureKind::Duplicated => "duplicated",
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("navigation {kind}: {message}")]
pub struct NavigationFailure {
	pub kind: NavigationFailureKind,
	pub message: String,
}
impl NavigationFailure {
	pub fn new(kind: NavigationFailureKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into() }
	}
}

/// One route transition, created per navigation and consumed by the guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
	pub to: RouteLocation,
	pub from: RouteLocation,
	pub failure: Option<NavigationFailure>,
}
impl Navigation {
	#[must_use]
	pub fn new(from: RouteLocation, to: RouteLocation) -> Self {
		Self { to, from, failure: None }
	}

	#[must_use]
	pub fn failed(self, failure: NavigationFailure) -> Self {
		Self {
			failure: Some(failure),
			..self
		}
	}
}
