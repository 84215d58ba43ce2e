//! Paginated list loading for infinite-scroll views.
//!
//! A [`PageLoader`] accumulates the records of successive pages. Continuations append, initial
//! loads and refreshes replace, and `finished` tells the view to stop asking for more.
//!
//! Loads are not serialised: overlapping calls each issue their own fetch, and whichever response
//! lands last decides `records`. Wrap calls in an [`AsyncLock`](`crate::lock::AsyncLock`) where that's unwanted.

use crate::{clone::DeepClone, value::Value};
use core::{
	cell::{Ref, RefCell},
	fmt::{self, Debug, Formatter},
	future::Future,
};
use futures::{
	future::{FutureExt, LocalBoxFuture},
	task::{LocalSpawn, LocalSpawnExt, SpawnError},
};
use indexmap::IndexMap;
use num_traits::NumCast;
use std::rc::Rc;
use tracing::{debug, debug_span, trace, Instrument};

/// Extra query parameters, passed through to the fetch callback.
pub type Params = IndexMap<String, Value>;

/// What the fetch callback is asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
	/// 1-based.
	pub page_num: u32,
	pub page_size: u32,
	pub extra: Params,
}

/// One page of a paginated response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
	pub records: Vec<T>,
	/// Total record count across all pages.
	pub total: u64,
	pub size: u32,
	/// 1-based number of this page.
	pub current: u32,
	pub pages: u32,
}
impl<T> Page<T> {
	/// A single, empty, last page.
	#[must_use]
	pub fn empty() -> Self {
		Self {
			records: Vec::new(),
			total: 0,
			size: 0,
			current: 1,
			pages: 1,
		}
	}
}
impl<T> Default for Page<T> {
	fn default() -> Self {
		Self::empty()
	}
}

/// A fetch callback's data: either a bare list or a page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageData<T> {
	List(Vec<T>),
	Page(Page<T>),
}
impl<T> PageData<T> {
	/// A bare list becomes the one and only page.
	#[must_use]
	pub fn normalize(self) -> Page<T> {
		match self {
			PageData::List(records) => {
				let len = records.len();
				Page {
					records,
					total: NumCast::from(len).unwrap_or(u64::MAX),
					size: NumCast::from(len).unwrap_or(u32::MAX),
					current: 1,
					pages: 1,
				}
			}
			PageData::Page(page) => page,
		}
	}
}
impl<T> From<Vec<T>> for PageData<T> {
	fn from(records: Vec<T>) -> Self {
		Self::List(records)
	}
}
impl<T> From<Page<T>> for PageData<T> {
	fn from(page: Page<T>) -> Self {
		Self::Page(page)
	}
}

impl PageData<Value> {
	/// Reads a dynamically typed response.
	///
	/// Arrays are lists. Objects are pages with `records`, `total`, `size`, `current` and `pages`
	/// properties; a missing or invalid `current` or `pages` counts as `1`, other counts as `0`.
	/// A page without `pages` therefore finishes the list, where a plain `pages <= current`
	/// comparison against a missing value would keep requesting further pages.
	/// Anything else yields [`None`], which the loader treats as an empty page.
	#[must_use]
	pub fn from_value(value: &Value) -> Option<Self> {
		fn count<N: NumCast>(value: &Value, key: &str) -> Option<N> {
			value.get(key)?.as_f64().and_then(|n| N::from(n.trunc()))
		}

		match value {
			Value::Array(_) => value.to_vec().map(PageData::List),
			Value::Object(_) => Some(PageData::Page(Page {
				records: value.get("records").and_then(|records| records.to_vec()).unwrap_or_default(),
				total: count(value, "total").unwrap_or(0),
				size: count(value, "size").unwrap_or(0),
				current: count(value, "current").unwrap_or(1),
				pages: count(value, "pages").unwrap_or(1),
			})),
			_ => None,
		}
	}
}

/// Resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
	/// Default `1`.
	pub page_num: u32,
	/// Default `15`.
	pub page_size: u32,
	/// Whether [`PageLoader::mount`] starts loading right away. Default `false`.
	pub immediate: bool,
	/// Whether a full-screen loading toast is shown from construction until the first response. Default `false`.
	pub show_loading: bool,
}
impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			page_num: 1,
			page_size: 15,
			immediate: false,
			show_loading: false,
		}
	}
}

/// The scrollable list a loader fills.
pub trait ListViewport {
	/// Called on initial loads so a stale scroll position doesn't immediately trigger further loads.
	fn scroll_to_top(&self);
}

/// A full-screen loading indicator.
pub trait LoadingToast {
	fn show(&self);
	fn close(&self);
}

/// External collaborators of a [`PageLoader`]. Both are optional.
#[derive(Clone, Default)]
pub struct LoaderHooks {
	pub viewport: Option<Rc<dyn ListViewport>>,
	pub toast: Option<Rc<dyn LoadingToast>>,
}
impl Debug for LoaderHooks {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoaderHooks")
			.field("viewport", &self.viewport.is_some())
			.field("toast", &self.toast.is_some())
			.finish()
	}
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
	#[error("failed to spawn the initial load")]
	Spawn(#[from] SpawnError),
}

type Fetch<T, E> = dyn Fn(PageQuery) -> LocalBoxFuture<'static, Result<Option<PageData<T>>, E>>;

#[derive(Debug)]
struct PageListState<T, E> {
	page_num: u32,
	page_size: u32,
	records: Vec<T>,
	finished: bool,
	loading: bool,
	error: Option<E>,
	refreshing: bool,
	/// Keep `records` through the next non-refreshing initial load until the response replaces them.
	preserve_records: bool,
}

/// Accumulates paginated records fetched through a callback.
///
/// Cloning yields another handle to the same list.
pub struct PageLoader<T, E> {
	state: Rc<RefCell<PageListState<T, E>>>,
	fetch: Rc<Fetch<T, E>>,
	hooks: LoaderHooks,
}
impl<T, E> Clone for PageLoader<T, E> {
	fn clone(&self) -> Self {
		Self {
			state: Rc::clone(&self.state),
			fetch: Rc::clone(&self.fetch),
			hooks: self.hooks.clone(),
		}
	}
}
impl<T: Debug, E: Debug> Debug for PageLoader<T, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageLoader").field("state", &self.state).field("hooks", &self.hooks).finish_non_exhaustive()
	}
}

impl<T: 'static + DeepClone, E: 'static> PageLoader<T, E> {
	/// Creates a loader without loading anything yet.
	///
	/// Shows the loading toast if [`LoaderConfig::show_loading`] is set.
	pub fn new<F, Fut>(fetch: F, config: LoaderConfig, hooks: LoaderHooks) -> Self
	where
		F: 'static + Fn(PageQuery) -> Fut,
		Fut: 'static + Future<Output = Result<Option<PageData<T>>, E>>,
	{
		if config.show_loading {
			if let Some(toast) = &hooks.toast {
				toast.show();
			}
		}

		let fetch: Rc<Fetch<T, E>> = Rc::new(move |query: PageQuery| fetch(query).boxed_local());
		Self {
			state: Rc::new(RefCell::new(PageListState {
				page_num: config.page_num,
				page_size: config.page_size,
				records: Vec::new(),
				finished: false,
				loading: false,
				error: None,
				refreshing: false,
				preserve_records: false,
			})),
			fetch,
			hooks,
		}
	}

	/// Creates a loader and, if [`LoaderConfig::immediate`] is set, spawns its first load onto `spawner`.
	///
	/// # Errors
	///
	/// Iff the first load couldn't be spawned.
	pub fn mount<F, Fut, S>(fetch: F, config: LoaderConfig, hooks: LoaderHooks, spawner: &S) -> Result<Self, LoaderError>
	where
		F: 'static + Fn(PageQuery) -> Fut,
		Fut: 'static + Future<Output = Result<Option<PageData<T>>, E>>,
		S: ?Sized + LocalSpawn,
	{
		let loader = Self::new(fetch, config, hooks);
		if config.immediate {
			let first_load = loader.load(false, Params::new());
			let toast = loader.hooks.toast.clone();
			spawner.spawn_local(async move {
				first_load.await;
				if let Some(toast) = toast {
					toast.close();
				}
			})?;
		}
		Ok(loader)
	}

	/// Loads the next page, or the first page if `init` is set.
	///
	/// The resets of an initial load and the fetch itself happen before this method returns;
	/// the returned future only waits for the response and merges it.
	pub fn load(&self, init: bool, extra: Params) -> impl Future<Output = ()> {
		let (query, scroll_to_top) = {
			let mut state = self.state.borrow_mut();
			state.loading = true;

			let mut scroll_to_top = false;
			if init {
				state.page_num = 1;
				if state.refreshing {
					// The view is already at the top, and a scroll mustn't trigger a load while refreshing.
					state.loading = false;
					state.finished = true;
				} else {
					state.finished = false;
					scroll_to_top = true;
					if !state.preserve_records {
						state.records.clear();
					}
					state.preserve_records = false;
				}
			}

			let query = PageQuery {
				page_num: state.page_num,
				page_size: state.page_size,
				extra,
			};
			(query, scroll_to_top)
		};

		if scroll_to_top {
			if let Some(viewport) = &self.hooks.viewport {
				viewport.scroll_to_top();
			}
		}

		let span = debug_span!("load", init, page_num = query.page_num, page_size = query.page_size);
		let response = (self.fetch)(query);
		let loader = self.clone();
		async move {
			let response = response.await;
			loader.commit(init, response);
		}
		.instrument(span)
	}

	/// Reloads from the first page, keeping the current records visible until the response replaces them.
	///
	/// The list counts as finished while the refresh is pending.
	/// `preserve_until_replaced` is remembered for the next initial load made outside of a refresh,
	/// which otherwise clears `records` before fetching.
	pub fn refresh(&self, extra: Params, preserve_until_replaced: bool) -> impl Future<Output = ()> {
		{
			let mut state = self.state.borrow_mut();
			state.preserve_records = preserve_until_replaced;
			state.refreshing = true;
		}
		self.load(true, extra)
	}

	fn commit(&self, init: bool, response: Result<Option<PageData<T>>, E>) {
		if let Some(toast) = &self.hooks.toast {
			toast.close();
		}

		let mut state = self.state.borrow_mut();
		state.refreshing = false;

		let data = match response {
			Ok(data) => data,
			Err(error) => {
				debug!("Fetch failed; the list is finished until reloaded.");
				state.error = Some(error);
				state.page_num = 1;
				state.finished = true;
				state.loading = false;
				return;
			}
		};
		state.error = None;

		let page = data.map_or_else(Page::empty, PageData::normalize);
		let records = page.records.deep_clone();
		if !init && state.page_num != 1 {
			trace!("Appending {} record(s).", records.len());
			state.records.extend(records);
		} else {
			trace!("Replacing records with {} record(s).", records.len());
			state.records = records;
		}

		if page.current >= page.pages {
			state.finished = true;
		} else {
			state.page_num = state.page_num.saturating_add(1);
			state.finished = false;
		}
		state.loading = false;
	}
}

impl<T, E> PageLoader<T, E> {
	/// The page the next continuation will request.
	#[must_use]
	pub fn page_num(&self) -> u32 {
		self.state.borrow().page_num
	}

	#[must_use]
	pub fn page_size(&self) -> u32 {
		self.state.borrow().page_size
	}

	/// Panics if held across a response being merged.
	#[must_use]
	pub fn records(&self) -> Ref<'_, Vec<T>> {
		Ref::map(self.state.borrow(), |state| &state.records)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.state.borrow().records.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.state.borrow().records.is_empty()
	}

	/// No further pages should be requested.
	#[must_use]
	pub fn finished(&self) -> bool {
		self.state.borrow().finished
	}

	#[must_use]
	pub fn loading(&self) -> bool {
		self.state.borrow().loading
	}

	#[must_use]
	pub fn refreshing(&self) -> bool {
		self.state.borrow().refreshing
	}

	/// For pull-to-refresh widgets that drive the flag themselves.
	pub fn set_refreshing(&self, refreshing: bool) {
		self.state.borrow_mut().refreshing = refreshing;
	}

	/// The error of the last response, if it failed.
	#[must_use]
	pub fn error(&self) -> Option<E>
	where
		E: Clone,
	{
		self.state.borrow().error.clone()
	}

	#[must_use]
	pub fn has_error(&self) -> bool {
		self.state.borrow().error.is_some()
	}
}
