//! Navigation guards that keep the [`KeepAliveRegistry`] in step with route transitions.
//!
//! Forward navigation always renders a fresh component, even for cacheable routes: the destination's
//! name is evicted before the transition commits and re-added afterwards if its metadata asks for
//! keep-alive. Back navigation leaves the cache alone, so the previous page is restored as it was left.

use crate::{
	keep_alive::KeepAliveRegistry,
	route::{Navigation, NavigationFailure, RouteLocation},
};
use core::fmt::Display;
use tracing::{debug, error, instrument, trace, warn};

/// The browser history's position counter.
pub trait HistorySource {
	/// The position stored in the current history state.
	///
	/// [`None`] if the state is missing or its position isn't a number.
	fn position(&self) -> Option<i64>;

	/// Writes position `0` into the current history state.
	fn reset_position(&self);
}

/// A page-level progress bar, started before and stopped after each transition.
pub trait ProgressIndicator {
	fn start(&self);
	fn done(&self);
}

pub trait DocumentTitle {
	fn set_title(&self, title: &str);
}

impl ProgressIndicator for () {
	fn start(&self) {}
	fn done(&self) {}
}

impl DocumentTitle for () {
	fn set_title(&self, _: &str) {}
}

/// Names of the routes the guards treat specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
	/// No progress bar when navigating here.
	pub home_name: String,
	/// No progress bar when navigating here.
	pub login_name: String,
	/// Navigating here reloads the previous page, so its cached component is evicted.
	pub redirect_name: String,
}
impl Default for GuardConfig {
	fn default() -> Self {
		Self {
			home_name: "Home".to_owned(),
			login_name: "Login".to_owned(),
			redirect_name: "Redirect".to_owned(),
		}
	}
}

/// Navigation state that lives as long as the router instance.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GuardContext {
	last_position: i64,
	is_back: bool,
	keep_alive: KeepAliveRegistry,
}
impl GuardContext {
	/// Resumes from a known history position with an already populated registry.
	#[must_use]
	pub fn new(last_position: i64, keep_alive: KeepAliveRegistry) -> Self {
		Self {
			last_position,
			is_back: false,
			keep_alive,
		}
	}

	#[must_use]
	pub fn last_position(&self) -> i64 {
		self.last_position
	}

	/// Whether the transition in progress (or the last one) moved back through history.
	#[must_use]
	pub fn is_back(&self) -> bool {
		self.is_back
	}

	#[must_use]
	pub fn keep_alive(&self) -> &KeepAliveRegistry {
		&self.keep_alive
	}
}

/// The before/after/error pipeline around each route transition.
#[derive(Debug)]
pub struct RouterGuards<H, P, D> {
	context: GuardContext,
	config: GuardConfig,
	history: H,
	progress: P,
	document: D,
}
impl<H: HistorySource, P: ProgressIndicator, D: DocumentTitle> RouterGuards<H, P, D> {
	pub fn new(history: H, progress: P, document: D, config: GuardConfig) -> Self {
		Self::with_context(history, progress, document, config, GuardContext::default())
	}

	/// Like [`new`](`RouterGuards::new`), but starts from an existing `context`.
	pub fn with_context(history: H, progress: P, document: D, config: GuardConfig, context: GuardContext) -> Self {
		Self {
			context,
			config,
			history,
			progress,
			document,
		}
	}

	/// Runs before a transition commits.
	#[instrument(skip(self, to, _from), fields(to = to.log_label()))]
	pub fn before_each(&mut self, to: &RouteLocation, _from: &RouteLocation) {
		let last_position = self.context.last_position;
		self.context.is_back = self.history.position().map_or(false, |position| last_position > position);
		trace!(is_back = self.context.is_back);

		if !(to.is_named(&self.config.login_name) || to.is_named(&self.config.home_name)) {
			self.progress.start();
		}

		if !self.context.is_back {
			if let Some(name) = to.component_name() {
				if self.context.keep_alive.remove(name) {
					debug!(name, "Forward navigation; the component will be mounted fresh.");
				}
			}
		}
	}

	/// Runs after a transition committed or failed.
	#[instrument(skip(self, to, from, failure), fields(to = to.log_label(), from = from.log_label()))]
	pub fn after_each(&mut self, to: &RouteLocation, from: &RouteLocation, failure: Option<&NavigationFailure>) {
		self.context.last_position = match self.history.position() {
			Some(position) => position,
			None => {
				self.history.reset_position();
				0
			}
		};

		if let Some(failure) = failure {
			error!("Failed navigation: {}", failure);
		}

		let to_name = to.component_name();
		if to.meta.keep_alive {
			match to_name {
				Some(name) => {
					self.context.keep_alive.add(name);
				}
				None => warn!(
					"Route {} has `keep_alive` set, but its component has no name.\n\
					It won't be cached.",
					to.log_label()
				),
			}
		} else if let Some(name) = to_name {
			self.context.keep_alive.remove(name);
		}

		if to.is_named(&self.config.redirect_name) {
			if let Some(from_name) = from.component_name() {
				if self.context.keep_alive.remove(from_name) {
					debug!(from_name, "Reloading through the redirect route; evicted the previous page.");
				}
			}
		}

		self.progress.done();

		if !to.meta.title.is_empty() {
			self.document.set_title(&to.meta.title);
		}
	}

	/// Logs an uncaught router error. Subsequent navigations are unaffected.
	pub fn on_error<E: ?Sized + Display>(&self, error: &E) {
		error!("Router error: {}", error);
	}

	/// Runs both phases for a transition that already happened.
	pub fn navigate(&mut self, navigation: &Navigation) {
		self.before_each(&navigation.to, &navigation.from);
		self.after_each(&navigation.to, &navigation.from, navigation.failure.as_ref());
	}

	#[must_use]
	pub fn context(&self) -> &GuardContext {
		&self.context
	}

	#[must_use]
	pub fn keep_alive(&self) -> &KeepAliveRegistry {
		&self.context.keep_alive
	}

	#[must_use]
	pub fn is_back(&self) -> bool {
		self.context.is_back
	}

	#[must_use]
	pub fn config(&self) -> &GuardConfig {
		&self.config
	}

	pub fn history(&self) -> &H {
		&self.history
	}

	pub fn progress(&self) -> &P {
		&self.progress
	}

	pub fn document(&self) -> &D {
		&self.document
	}

	/// Hands the navigation state back, e.g. to rebuild the guards with other collaborators.
	#[must_use]
	pub fn into_context(self) -> GuardContext {
		self.context
	}
}
