use keep_alive_router::{
	clone::{deep_clone, Identities},
	value::ValueKind,
	DeepClone, Value,
};
use std::rc::Rc;

#[test]
fn self_cycle() {
	let a = Value::object(vec![("id", Value::from(1))]);
	a.set_property("self", a.clone());

	let b = a.deep_clone();
	assert_ne!(a, b);
	assert_eq!(b.get("self"), Some(b.clone()));
	assert_eq!(b.get("id"), Some(Value::from(1)));
	assert_eq!(a.get("self"), Some(a.clone()));
}

#[test]
fn indirect_cycle() {
	let parent = Value::object(Vec::<(&str, Value)>::new());
	let children = Value::array(vec![Value::object(vec![("parent", parent.clone())])]);
	parent.set_property("children", children.clone());

	let clone = parent.deep_clone();
	let cloned_children = clone.get("children").unwrap();
	assert_ne!(cloned_children, children);
	let child = cloned_children.index(0).unwrap();
	assert_eq!(child.get("parent"), Some(clone.clone()));
}

#[test]
fn aliasing_is_preserved() {
	let shared = Value::array(vec![Value::from("x")]);
	let holder = Value::object(vec![("left", shared.clone()), ("right", shared.clone())]);

	let clone = holder.deep_clone();
	let left = clone.get("left").unwrap();
	let right = clone.get("right").unwrap();
	assert_eq!(left, right);
	assert_ne!(left, shared);

	left.push(Value::from("y"));
	assert_eq!(right.len(), Some(2));
	assert_eq!(shared.len(), Some(1));
}

#[test]
fn mutation_does_not_leak() {
	let original = Value::array(vec![Value::object(vec![("n", Value::from(1))])]);
	let clone = original.deep_clone();

	original.index(0).unwrap().set_property("n", Value::from(2));
	assert_eq!(clone.index(0).unwrap().get("n"), Some(Value::from(1)));
}

#[test]
fn map_keys_and_values() {
	let key = Value::object(vec![("k", Value::Bool(true))]);
	let value = Value::array(vec![Value::from(1)]);
	let map = Value::map(vec![(key.clone(), value.clone()), (Value::from("plain"), Value::Null)]);

	let clone = map.deep_clone();
	assert_eq!(clone.kind(), ValueKind::Map);
	assert_ne!(clone, map);

	if let Value::Map(entries) = &clone {
		let entries = entries.borrow();
		assert_eq!(entries.len(), 2);
		let (cloned_key, cloned_value) = entries.get_index(0).unwrap();
		assert_ne!(*cloned_key, key);
		assert_eq!(cloned_key.get("k"), Some(Value::Bool(true)));
		assert_ne!(*cloned_value, value);
		assert_eq!(cloned_value.index(0), Some(Value::from(1)));
		assert_eq!(entries.get(&Value::from("plain")), Some(&Value::Null));
	} else {
		unreachable!()
	}
}

#[test]
fn set_members() {
	let member = Value::array(Vec::new());
	let set = Value::set(vec![member.clone(), Value::from(1.0)]);

	let clone = set.deep_clone();
	assert_eq!(clone.kind(), ValueKind::Set);
	assert_ne!(clone, set);

	if let Value::Set(members) = &clone {
		let members = members.borrow();
		assert_eq!(members.len(), 2);
		assert!(!members.contains(&member));
		assert!(members.contains(&Value::from(1.0)));
		assert_eq!(members.get_index(0).unwrap().kind(), ValueKind::Array);
	} else {
		unreachable!()
	}
}

#[test]
fn map_cycle() {
	let map = Value::map(Vec::new());
	if let Value::Map(entries) = &map {
		entries.borrow_mut().insert(Value::from("me"), map.clone());
	}

	let clone = map.deep_clone();
	if let Value::Map(entries) = &clone {
		assert_eq!(entries.borrow().get(&Value::from("me")), Some(&clone));
	} else {
		unreachable!()
	}
}

#[test]
fn leaves_are_rebuilt() {
	let date = Value::date(1_700_000_000_000.0);
	let error = Value::error("TypeError", "nope");
	let regexp = Value::regexp("a+b", "gi");
	if let Value::RegExp(regexp) = &regexp {
		regexp.last_index.set(3);
	}

	for original in &[date.clone(), error, regexp] {
		let clone = original.deep_clone();
		assert_eq!(clone.kind(), original.kind());
		assert_ne!(&clone, original);
	}

	match (date.deep_clone(), &date) {
		(Value::Date(clone), Value::Date(original)) => {
			clone.set(0.0);
			assert!((original.get() - 1_700_000_000_000.0).abs() < f64::EPSILON);
		}
		_ => unreachable!(),
	}

	match Value::regexp("x", "y").deep_clone() {
		Value::RegExp(clone) => {
			assert_eq!(clone.source, "x");
			assert_eq!(clone.flags, "y");
			assert_eq!(clone.last_index.get(), 0);
		}
		_ => unreachable!(),
	}
}

#[test]
fn regexp_last_index_is_kept() {
	let regexp = Value::regexp("\\d", "g");
	if let Value::RegExp(regexp) = &regexp {
		regexp.last_index.set(7);
	}
	match regexp.deep_clone() {
		Value::RegExp(clone) => assert_eq!(clone.last_index.get(), 7),
		_ => unreachable!(),
	}
}

#[test]
fn error_keeps_name_and_message() {
	match Value::error("RangeError", "out of range").deep_clone() {
		Value::Error(clone) => {
			assert_eq!(clone.name, "RangeError");
			assert_eq!(clone.message, "out of range");
		}
		_ => unreachable!(),
	}
}

#[test]
fn functions_and_opaque_values_are_shared() {
	let function = Value::function(|args| args.first().cloned().unwrap_or_default());
	let opaque = Value::opaque(vec![1_u8, 2, 3]);
	let holder = Value::array(vec![function.clone(), opaque.clone()]);

	let clone = holder.deep_clone();
	assert_ne!(clone, holder);
	assert_eq!(clone.index(0), Some(function));
	assert_eq!(clone.index(1), Some(opaque));
}

#[test]
fn primitives_are_unchanged() {
	for value in &[Value::Undefined, Value::Null, Value::Bool(false), Value::from(f64::NAN), Value::from("text")] {
		assert_eq!(&value.deep_clone(), value);
	}
}

#[test]
fn same_value_zero() {
	assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
	assert_eq!(Value::from(0.0), Value::from(-0.0));
	assert_ne!(Value::from(1), Value::from("1"));
	assert_ne!(Value::array(Vec::new()), Value::array(Vec::new()));

	let set = Value::set(vec![Value::from(0.0), Value::from(-0.0), Value::from(f64::NAN), Value::from(f64::NAN)]);
	assert_eq!(set.len(), Some(2));
}

#[test]
fn records_share_one_identity_map() {
	let shared = Value::object(vec![("tag", Value::from("hot"))]);
	let records = vec![Value::object(vec![("tag", shared.clone())]), Value::object(vec![("tag", shared.clone())])];

	let clones = records.deep_clone();
	let first = clones[0].get("tag").unwrap();
	let second = clones[1].get("tag").unwrap();
	assert_eq!(first, second);
	assert_ne!(first, shared);
}

#[test]
fn identities_are_scoped_to_one_invocation() {
	let shared = Value::array(Vec::new());
	let first = deep_clone(&shared);
	let second = deep_clone(&shared);
	assert_ne!(first, second);

	let mut identities = Identities::new();
	let third = shared.deep_clone_in(&mut identities);
	let fourth = shared.deep_clone_in(&mut identities);
	assert_eq!(third, fourth);
	assert_eq!(identities.len(), 1);
}

#[test]
fn plain_data() {
	let numbers = vec![Some(1), None, Some(3)];
	assert_eq!(numbers.deep_clone(), numbers);

	let text: Rc<str> = "shared".into();
	assert!(Rc::ptr_eq(&text.deep_clone(), &text));
}
