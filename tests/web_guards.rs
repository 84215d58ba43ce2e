#![cfg(target_arch = "wasm32")]

use js_sys::{Object, Reflect};
use keep_alive_router::{
	guards::{GuardConfig, HistorySource, RouterGuards},
	loader::ListViewport,
	route::{ComponentRef, RouteLocation, RouteMeta},
	web::{ClassProgress, SelectorViewport, WebDocumentTitle, WebHistory},
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn init_log() {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
}

fn set_history_position(position: Option<f64>) {
	let history = window().unwrap().history().unwrap();
	let state: JsValue = Object::new().into();
	if let Some(position) = position {
		Reflect::set(&state, &JsValue::from_str("position"), &JsValue::from_f64(position)).unwrap();
	}
	history.replace_state(&state, "").unwrap();
}

#[wasm_bindgen_test]
fn history_position() {
	init_log();
	let history = WebHistory::from_window().unwrap();

	set_history_position(Some(4.0));
	assert_eq!(history.position(), Some(4));

	set_history_position(None);
	assert_eq!(history.position(), None);

	history.reset_position();
	assert_eq!(history.position(), Some(0));
}

#[wasm_bindgen_test]
fn navigation_updates_title_progress_and_cache() {
	init_log();
	set_history_position(Some(1.0));

	let progress = ClassProgress::from_window("nprogress-busy").unwrap();
	let mut guards = RouterGuards::new(WebHistory::from_window().unwrap(), progress, WebDocumentTitle::from_window().unwrap(), GuardConfig::default());

	let home = RouteLocation::new("/").with_name("Home");
	let list = RouteLocation::new("/list")
		.with_name("List")
		.with_meta(RouteMeta::titled("Web list").with_keep_alive(true))
		.with_component(ComponentRef::named("ListPage"));

	guards.before_each(&list, &home);
	let root = window().unwrap().document().unwrap().document_element().unwrap();
	assert!(root.class_list().contains("nprogress-busy"));

	guards.after_each(&list, &home, None);
	assert!(!root.class_list().contains("nprogress-busy"));
	assert_eq!(window().unwrap().document().unwrap().title(), "Web list");
	assert!(guards.keep_alive().contains("ListPage"));
	assert_eq!(guards.context().last_position(), 1);
}

#[wasm_bindgen_test]
fn viewport_scrolls_matching_lists() {
	init_log();
	let document = window().unwrap().document().unwrap();
	let body = document.body().unwrap();

	let list: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	list.set_class_name("van-list");
	list.style().set_property("height", "10px").unwrap();
	list.style().set_property("overflow", "auto").unwrap();
	let content: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	content.style().set_property("height", "100px").unwrap();
	list.append_child(&content).unwrap();
	body.append_child(&list).unwrap();

	list.set_scroll_top(50);
	assert!(list.scroll_top() > 0);

	SelectorViewport::from_window().unwrap().scroll_to_top();
	assert_eq!(list.scroll_top(), 0);

	body.remove_child(&list).unwrap();
}
