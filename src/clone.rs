//! Deep cloning that keeps the shape of shared and cyclic references.
//!
//! Every invocation of [`deep_clone`] owns one [`Identities`] map from original allocations to their
//! clones. A value reached a second time, whether through aliasing or through a cycle, resolves to the
//! clone made the first time, so `a.self = a` clones to `b.self = b` and never recurses forever.

use crate::value::{Entries, ErrorValue, Members, Properties, RegExpValue, Value};
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::trace;

/// Maps original allocations to their clones for the duration of one deep clone.
#[derive(Debug, Default)]
pub struct Identities(HashMap<*const (), Value>);
impl Identities {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The clone already made for `original`, if any.
	#[must_use]
	pub fn get(&self, original: &Value) -> Option<Value> {
		original.identity().and_then(|identity| self.0.get(&identity).cloned())
	}

	/// Records `clone` as the counterpart of `original`.
	///
	/// Values without identity are ignored.
	pub fn register(&mut self, original: &Value, clone: Value) {
		if let Some(identity) = original.identity() {
			self.0.insert(identity, clone);
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Structural duplication that shares nothing mutable with the original.
pub trait DeepClone: Sized {
	/// Clones `self`, resolving already visited references through `identities`.
	fn deep_clone_in(&self, identities: &mut Identities) -> Self;

	fn deep_clone(&self) -> Self {
		deep_clone(self)
	}
}

/// Clones `value` with a fresh [`Identities`] map.
pub fn deep_clone<T: DeepClone>(value: &T) -> T {
	let mut identities = Identities::new();
	let clone = value.deep_clone_in(&mut identities);
	trace!("Deep-cloned {} shared reference(s).", identities.len());
	clone
}

impl DeepClone for Value {
	fn deep_clone_in(&self, identities: &mut Identities) -> Self {
		if let Some(clone) = identities.get(self) {
			return clone;
		}

		match self {
			Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => self.clone(),

			// Shallow on purpose: callables and host objects are atomic.
			Value::Function(_) | Value::Opaque(_) => self.clone(),

			// Containers are registered before their contents are visited, which is what terminates cycles.
			Value::Array(items) => {
				let clone = Rc::new(RefCell::new(Vec::new()));
				identities.register(self, Value::Array(Rc::clone(&clone)));
				let cloned: Vec<Value> = items.borrow().iter().map(|item| item.deep_clone_in(identities)).collect();
				*clone.borrow_mut() = cloned;
				Value::Array(clone)
			}
			Value::Object(properties) => {
				let clone = Rc::new(RefCell::new(Properties::new()));
				identities.register(self, Value::Object(Rc::clone(&clone)));
				let cloned: Properties = properties.borrow().iter().map(|(key, value)| (key.clone(), value.deep_clone_in(identities))).collect();
				*clone.borrow_mut() = cloned;
				Value::Object(clone)
			}
			Value::Map(entries) => {
				let clone = Rc::new(RefCell::new(Entries::new()));
				identities.register(self, Value::Map(Rc::clone(&clone)));
				let cloned: Entries = entries.borrow().iter().map(|(key, value)| (key.deep_clone_in(identities), value.deep_clone_in(identities))).collect();
				*clone.borrow_mut() = cloned;
				Value::Map(clone)
			}
			Value::Set(members) => {
				let clone = Rc::new(RefCell::new(Members::new()));
				identities.register(self, Value::Set(Rc::clone(&clone)));
				let cloned: Members = members.borrow().iter().map(|member| member.deep_clone_in(identities)).collect();
				*clone.borrow_mut() = cloned;
				Value::Set(clone)
			}

			Value::Date(millis) => {
				let clone = Value::Date(Rc::new(Cell::new(millis.get())));
				identities.register(self, clone.clone());
				clone
			}
			Value::Error(error) => {
				let clone = Value::Error(Rc::new(ErrorValue {
					name: error.name.clone(),
					message: error.message.clone(),
				}));
				identities.register(self, clone.clone());
				clone
			}
			Value::RegExp(regexp) => {
				let clone = Value::RegExp(Rc::new(RegExpValue {
					source: regexp.source.clone(),
					flags: regexp.flags.clone(),
					last_index: Cell::new(regexp.last_index.get()),
				}));
				identities.register(self, clone.clone());
				clone
			}
		}
	}
}

impl<T: DeepClone> DeepClone for Vec<T> {
	fn deep_clone_in(&self, identities: &mut Identities) -> Self {
		self.iter().map(|item| item.deep_clone_in(identities)).collect()
	}
}

impl<T: DeepClone> DeepClone for Option<T> {
	fn deep_clone_in(&self, identities: &mut Identities) -> Self {
		self.as_ref().map(|value| value.deep_clone_in(identities))
	}
}

impl<T: DeepClone> DeepClone for Box<T> {
	fn deep_clone_in(&self, identities: &mut Identities) -> Self {
		Box::new((**self).deep_clone_in(identities))
	}
}

macro_rules! plain_clone {
	($($t:ty),*$(,)?) => {$(
		impl DeepClone for $t {
			fn deep_clone_in(&self, _: &mut Identities) -> Self {
				self.clone()
			}
		}
	)*};
}

plain_clone!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String, Rc<str>);
