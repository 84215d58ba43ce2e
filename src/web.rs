//! Browser implementations of the guard and loader collaborators.
//!
//! DOM calls that fail are logged and otherwise ignored, since neither a missing progress bar
//! nor a missing title should break navigation.

use crate::{
	guards::{DocumentTitle, HistorySource, ProgressIndicator},
	loader::ListViewport,
};
use js_sys::{Object, Reflect};
use num_traits::NumCast;
use tracing::{error, instrument, trace};
use wasm_bindgen::{JsCast, JsValue};

const POSITION: &str = "position";

/// Reads the position counter the router keeps in [***history.state***](https://developer.mozilla.org/en-US/docs/Web/API/History/state).
#[derive(Debug, Clone)]
pub struct WebHistory {
	history: web_sys::History,
}
impl WebHistory {
	#[must_use]
	pub fn new(history: web_sys::History) -> Self {
		Self { history }
	}

	/// [`None`] outside a browsing context.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.history().ok().map(Self::new)
	}
}
impl HistorySource for WebHistory {
	fn position(&self) -> Option<i64> {
		let state = self.history.state().ok()?;
		if !state.is_object() {
			return None;
		}
		let position = Reflect::get(&state, &JsValue::from_str(POSITION)).ok()?.as_f64()?;
		NumCast::from(position)
	}

	#[instrument]
	fn reset_position(&self) {
		let state = match self.history.state() {
			Ok(state) if state.is_object() => state,
			Ok(_) => Object::new().into(),
			Err(error) => return error!("Couldn't read `history.state`: {:?}", error),
		};

		if let Err(error) = Reflect::set(&state, &JsValue::from_str(POSITION), &JsValue::from_f64(0.0)) {
			return error!("Couldn't set the history position: {:?}", error);
		}
		if let Err(error) = self.history.replace_state(&state, "") {
			error!("Couldn't replace `history.state`: {:?}", error)
		}
	}
}

/// Sets [***document.title***](https://developer.mozilla.org/en-US/docs/Web/API/Document/title).
#[derive(Debug, Clone)]
pub struct WebDocumentTitle {
	document: web_sys::Document,
}
impl WebDocumentTitle {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}
}
impl DocumentTitle for WebDocumentTitle {
	fn set_title(&self, title: &str) {
		self.document.set_title(title)
	}
}

/// Signals a pending navigation by adding a CSS class to an element, usually `<html>`.
#[derive(Debug, Clone)]
pub struct ClassProgress {
	element: web_sys::Element,
	class: String,
}
impl ClassProgress {
	pub fn new(element: web_sys::Element, class: impl Into<String>) -> Self {
		Self { element, class: class.into() }
	}

	/// Uses the document element.
	pub fn from_window(class: impl Into<String>) -> Option<Self> {
		let element = web_sys::window()?.document()?.document_element()?;
		Some(Self::new(element, class))
	}
}
impl ProgressIndicator for ClassProgress {
	fn start(&self) {
		if let Err(error) = self.element.class_list().add_1(&self.class) {
			error!("Couldn't start progress: {:?}", error)
		}
	}

	fn done(&self) {
		if let Err(error) = self.element.class_list().remove_1(&self.class) {
			error!("Couldn't finish progress: {:?}", error)
		}
	}
}

/// Scrolls every element matching a CSS selector back to the top.
#[derive(Debug, Clone)]
pub struct SelectorViewport {
	document: web_sys::Document,
	selector: String,
}
impl SelectorViewport {
	/// The selector of the list component's container.
	pub const DEFAULT_SELECTOR: &'static str = ".van-list";

	pub fn new(document: web_sys::Document, selector: impl Into<String>) -> Self {
		Self {
			document,
			selector: selector.into(),
		}
	}

	#[must_use]
	pub fn from_window() -> Option<Self> {
		Some(Self::new(web_sys::window()?.document()?, Self::DEFAULT_SELECTOR))
	}
}
impl ListViewport for SelectorViewport {
	#[instrument]
	fn scroll_to_top(&self) {
		let lists = match self.document.query_selector_all(&self.selector) {
			Ok(lists) => lists,
			Err(error) => return error!("Invalid list selector {:?}: {:?}", self.selector, error),
		};

		let mut scrolled = 0;
		for i in 0..lists.length() {
			if let Some(node) = lists.get(i) {
				if let Some(element) = node.dyn_ref::<web_sys::Element>() {
					element.set_scroll_top(0);
					scrolled += 1;
				}
			}
		}
		trace!("Scrolled {} list(s) to the top.", scrolled);
	}
}
