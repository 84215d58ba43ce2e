//! The static route tree and its flattened, resolvable form.

use crate::route::{ComponentRef, MatchedRoute, RouteLocation, RouteMeta};
use hashbrown::{hash_map::Entry, HashMap};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
	Path(String),
	Name(String),
}

/// A route definition as written by the application, possibly nested.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteRecord {
	pub name: Option<String>,
	/// Relative to the parent's path.
	pub path: String,
	pub redirect: Option<Redirect>,
	pub meta: RouteMeta,
	pub component: Option<ComponentRef>,
	pub children: Vec<RouteRecord>,
}
impl RouteRecord {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
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

	#[must_use]
	pub fn with_component(self, component: ComponentRef) -> Self {
		Self {
			component: Some(component),
			..self
		}
	}

	#[must_use]
	pub fn with_redirect(self, redirect: Redirect) -> Self {
		Self {
			redirect: Some(redirect),
			..self
		}
	}

	#[must_use]
	pub fn with_children(self, children: Vec<RouteRecord>) -> Self {
		Self { children, ..self }
	}
}

/// A route with its absolute path and the chain of records it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRoute {
	pub name: Option<String>,
	pub path: String,
	pub redirect: Option<Redirect>,
	pub meta: RouteMeta,
	/// Outermost first, ending with this route itself.
	pub matched: Vec<MatchedRoute>,
}

/// Flattens a route tree.
///
/// Child paths are joined onto their parent's path, and a parent without an explicit redirect
/// redirects to its first named child. Children are listed before their parent.
#[must_use]
pub fn flatten_routes(records: Vec<RouteRecord>) -> Vec<FlatRoute> {
	let mut flat = Vec::new();
	flatten_into(records, "/", &[], &mut flat);
	flat
}

fn flatten_into(records: Vec<RouteRecord>, parent_path: &str, parent_chain: &[MatchedRoute], flat: &mut Vec<FlatRoute>) {
	for record in records {
		let RouteRecord {
			name,
			path,
			mut redirect,
			meta,
			component,
			children,
		} = record;

		let path = if path.is_empty() { path } else { unique_slash(&format!("/{}/{}", parent_path, path)) };

		let mut matched = parent_chain.to_vec();
		matched.push(MatchedRoute {
			name: name.clone(),
			path: path.clone(),
			component,
		});

		if !children.is_empty() {
			if redirect.is_none() {
				redirect = children[0].name.clone().map(Redirect::Name);
			}
			flatten_into(children, &path, &matched, flat);
		}

		flat.push(FlatRoute {
			name,
			path,
			redirect,
			meta,
			matched,
		});
	}
}

/// Collapses runs of slashes into one, leaving `http:/` and `https:/` prefixes intact.
///
/// `///aaa//bbb///ccc` becomes `/aaa/bbb/ccc`, `https://a//b` becomes `https://a/b`.
#[must_use]
pub fn unique_slash(path: &str) -> String {
	const PROTOCOLS: [&str; 2] = ["https:/", "http:/"];

	let mut unique = String::with_capacity(path.len());
	let mut rest = path;
	while let Some(c) = rest.chars().next() {
		if let Some(protocol) = PROTOCOLS.iter().find(|protocol| rest.starts_with(**protocol)) {
			unique.push_str(protocol);
			rest = &rest[protocol.len()..];
		} else if c == '/' {
			unique.push('/');
			rest = rest.trim_start_matches('/');
		} else {
			unique.push(c);
			rest = &rest[c.len_utf8()..];
		}
	}
	unique
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
	#[error("duplicate route name {0:?}")]
	DuplicateName(String),
}

/// Flattened routes, resolvable by name or exact path.
#[derive(Debug, Clone)]
pub struct RouteTable {
	routes: Vec<FlatRoute>,
	by_name: HashMap<String, usize>,
}
impl RouteTable {
	/// # Errors
	///
	/// Iff two routes share a name.
	#[instrument(skip(records))]
	pub fn new(records: Vec<RouteRecord>) -> Result<Self, RouteTableError> {
		let routes = flatten_routes(records);
		let mut by_name = HashMap::with_capacity(routes.len());
		for (i, route) in routes.iter().enumerate() {
			if let Some(name) = &route.name {
				match by_name.entry(name.clone()) {
					Entry::Occupied(_) => return Err(RouteTableError::DuplicateName(name.clone())),
					Entry::Vacant(vacant) => {
						vacant.insert(i);
					}
				}
			}
		}
		debug!("Loaded {} route(s), {} named.", routes.len(), by_name.len());
		Ok(Self { routes, by_name })
	}

	#[must_use]
	pub fn routes(&self) -> &[FlatRoute] {
		&self.routes
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&FlatRoute> {
		self.by_name.get(name).map(|&i| &self.routes[i])
	}

	/// Every route name, in table order.
	///
	/// Built from the routes that don't require authentication, this is the white list of the guard setup.
	pub fn names(&self) -> impl '_ + Iterator<Item = &str> {
		self.routes.iter().filter_map(|route| route.name.as_deref())
	}

	#[must_use]
	pub fn resolve(&self, name: &str) -> Option<RouteLocation> {
		self.get(name).map(Self::location)
	}

	/// Resolves a static path. Path parameters are not matched.
	#[must_use]
	pub fn resolve_path(&self, path: &str) -> Option<RouteLocation> {
		let path = unique_slash(path);
		self.routes.iter().find(|route| route.path == path).map(Self::location)
	}

	fn location(route: &FlatRoute) -> RouteLocation {
		RouteLocation {
			name: route.name.clone(),
			path: route.path.clone(),
			full_path: route.path.clone(),
			meta: route.meta.clone(),
			matched: route.matched.clone(),
		}
	}
}
