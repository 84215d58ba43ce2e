use keep_alive_router::{
	route::{ComponentRef, RouteMeta},
	routes::{flatten_routes, unique_slash, Redirect, RouteRecord, RouteTable, RouteTableError},
};

fn tree() -> Vec<RouteRecord> {
	vec![
		RouteRecord::new("/").with_name("Home").with_meta(RouteMeta::titled("Home")).with_component(ComponentRef::named("HomePage")),
		RouteRecord::new("/error").with_name("error").with_meta(RouteMeta::titled("Error")).with_children(vec![
			RouteRecord::new(":state(\\d+)").with_name("PageNotFound").with_component(ComponentRef::named("ErrorState")),
			RouteRecord::new("wx-error").with_name("WxError").with_component(ComponentRef::named("WxError")),
		]),
		RouteRecord::new("/orders/").with_name("Orders").with_redirect(Redirect::Path("/orders/list".to_owned())).with_children(vec![
			RouteRecord::new("/list/").with_name("OrderList").with_meta(RouteMeta::titled("Orders").with_keep_alive(true)).with_component(ComponentRef::named("OrderList")),
		]),
	]
}

#[test]
fn child_paths_are_joined() {
	let flat = flatten_routes(tree());
	let paths: Vec<&str> = flat.iter().map(|route| route.path.as_str()).collect();
	assert_eq!(paths, vec!["/", "/error/:state(\\d+)", "/error/wx-error", "/error", "/orders/list/", "/orders/"]);
}

#[test]
fn parents_redirect_to_their_first_child() {
	let table = RouteTable::new(tree()).unwrap();
	assert_eq!(table.get("error").unwrap().redirect, Some(Redirect::Name("PageNotFound".to_owned())));
	assert_eq!(table.get("Orders").unwrap().redirect, Some(Redirect::Path("/orders/list".to_owned())));
	assert_eq!(table.get("Home").unwrap().redirect, None);
}

#[test]
fn resolved_locations_carry_the_matched_chain() {
	let table = RouteTable::new(tree()).unwrap();

	let list = table.resolve("OrderList").unwrap();
	assert_eq!(list.path, "/orders/list/");
	assert!(list.meta.keep_alive);
	assert_eq!(list.matched.len(), 2);
	assert_eq!(list.matched[0].name.as_deref(), Some("Orders"));
	assert_eq!(list.component_name(), Some("OrderList"));

	let error = table.resolve("error").unwrap();
	assert_eq!(error.component_name(), None);

	assert_eq!(table.resolve_path("//error///wx-error").unwrap().name.as_deref(), Some("WxError"));
	assert!(table.resolve("Missing").is_none());
}

#[test]
fn names_form_the_white_list() {
	let table = RouteTable::new(tree()).unwrap();
	let names: Vec<&str> = table.names().collect();
	assert_eq!(names, vec!["Home", "PageNotFound", "WxError", "error", "OrderList", "Orders"]);
	assert_eq!(table.routes().len(), 6);
}

#[test]
fn duplicate_names_are_rejected() {
	let routes = vec![RouteRecord::new("/a").with_name("Same"), RouteRecord::new("/b").with_name("Same")];
	assert_eq!(RouteTable::new(routes).unwrap_err(), RouteTableError::DuplicateName("Same".to_owned()));
}

#[test]
fn slashes_are_collapsed() {
	assert_eq!(unique_slash("///aaa//bbb///ccc"), "/aaa/bbb/ccc");
	assert_eq!(unique_slash("https://example.com//a///b"), "https://example.com/a/b");
	assert_eq!(unique_slash("http:///x"), "http://x");
	assert_eq!(unique_slash("plain"), "plain");
	assert_eq!(unique_slash(""), "");
}
