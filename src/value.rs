//! Dynamically typed values with reference identity, as handed over by fetch callbacks and page code.
//!
//! Containers and other mutable leaves live behind [`Rc`], so two [`Value`]s can point at the same
//! underlying object. Equality and hashing follow ***SameValueZero***: primitives compare by value
//! (with `NaN` equal to itself and `-0.0` equal to `0.0`), everything else by identity.

use core::{
	any::Any,
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
	mem,
};
use indexmap::{IndexMap, IndexSet};
use std::rc::Rc;

/// String-keyed properties of an [`Value::Object`], in insertion order.
pub type Properties = IndexMap<String, Value>;
/// Entries of a [`Value::Map`], in insertion order.
pub type Entries = IndexMap<Value, Value>;
/// Members of a [`Value::Set`], in insertion order.
pub type Members = IndexSet<Value>;

#[derive(Clone)]
pub enum Value {
	Undefined,
	Null,
	Bool(bool),
	Number(f64),
	String(Rc<str>),
	Array(Rc<RefCell<Vec<Value>>>),
	Object(Rc<RefCell<Properties>>),
	Map(Rc<RefCell<Entries>>),
	Set(Rc<RefCell<Members>>),
	/// Milliseconds since the Unix epoch.
	Date(Rc<Cell<f64>>),
	Error(Rc<ErrorValue>),
	RegExp(Rc<RegExpValue>),
	/// Callables are never duplicated.
	Function(Rc<dyn Fn(&[Value]) -> Value>),
	/// Any other host object. Never duplicated.
	Opaque(Rc<dyn Any>),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Undefined,
	Null,
	Bool,
	Number,
	String,
	Array,
	Object,
	Map,
	Set,
	Date,
	Error,
	RegExp,
	Function,
	Opaque,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
	pub name: String,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExpValue {
	pub source: String,
	pub flags: String,
	pub last_index: Cell<usize>,
}

impl Value {
	pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
		Self::Array(Rc::new(RefCell::new(items.into_iter().collect())))
	}

	pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Value)>) -> Self {
		Self::Object(Rc::new(RefCell::new(properties.into_iter().map(|(k, v)| (k.into(), v)).collect())))
	}

	pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
		Self::Map(Rc::new(RefCell::new(entries.into_iter().collect())))
	}

	pub fn set(members: impl IntoIterator<Item = Value>) -> Self {
		Self::Set(Rc::new(RefCell::new(members.into_iter().collect())))
	}

	#[must_use]
	pub fn date(millis: f64) -> Self {
		Self::Date(Rc::new(Cell::new(millis)))
	}

	pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Error(Rc::new(ErrorValue {
			name: name.into(),
			message: message.into(),
		}))
	}

	pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
		Self::RegExp(Rc::new(RegExpValue {
			source: source.into(),
			flags: flags.into(),
			last_index: Cell::new(0),
		}))
	}

	pub fn function(f: impl 'static + Fn(&[Value]) -> Value) -> Self {
		Self::Function(Rc::new(f))
	}

	pub fn opaque(host: impl Any) -> Self {
		Self::Opaque(Rc::new(host))
	}

	#[must_use]
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Undefined => ValueKind::Undefined,
			Value::Null => ValueKind::Null,
			Value::Bool(_) => ValueKind::Bool,
			Value::Number(_) => ValueKind::Number,
			Value::String(_) => ValueKind::String,
			Value::Array(_) => ValueKind::Array,
			Value::Object(_) => ValueKind::Object,
			Value::Map(_) => ValueKind::Map,
			Value::Set(_) => ValueKind::Set,
			Value::Date(_) => ValueKind::Date,
			Value::Error(_) => ValueKind::Error,
			Value::RegExp(_) => ValueKind::RegExp,
			Value::Function(_) => ValueKind::Function,
			Value::Opaque(_) => ValueKind::Opaque,
		}
	}

	/// The address of the shared allocation, for values that have one.
	///
	/// Primitives have no identity and return [`None`].
	#[must_use]
	pub fn identity(&self) -> Option<*const ()> {
		match self {
			Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
			Value::Array(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::Object(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::Map(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::Set(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::Date(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::Error(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::RegExp(rc) => Some(Rc::as_ptr(rc).cast()),
			Value::Function(rc) => Some(Rc::as_ptr(rc) as *const u8 as *const ()),
			Value::Opaque(rc) => Some(Rc::as_ptr(rc) as *const u8 as *const ()),
		}
	}

	#[must_use]
	pub fn is_nullish(&self) -> bool {
		matches!(self, Value::Undefined | Value::Null)
	}

	#[must_use]
	pub fn as_f64(&self) -> Option<f64> {
		match *self {
			Value::Number(n) => Some(n),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_bool(&self) -> Option<bool> {
		match *self {
			Value::Bool(b) => Some(b),
			_ => None,
		}
	}

	/// Reads a property of an [`Value::Object`].
	///
	/// Returns [`None`] for missing properties and for any other kind of value.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<Value> {
		match self {
			Value::Object(properties) => properties.borrow().get(key).cloned(),
			_ => None,
		}
	}

	/// Sets a property of an [`Value::Object`], returning the previous value.
	///
	/// Does nothing for other kinds of values.
	pub fn set_property(&self, key: impl Into<String>, value: Value) -> Option<Value> {
		match self {
			Value::Object(properties) => properties.borrow_mut().insert(key.into(), value),
			_ => None,
		}
	}

	/// Reads an element of an [`Value::Array`].
	#[must_use]
	pub fn index(&self, index: usize) -> Option<Value> {
		match self {
			Value::Array(items) => items.borrow().get(index).cloned(),
			_ => None,
		}
	}

	/// Appends to an [`Value::Array`]. Returns `false` for other kinds of values.
	pub fn push(&self, item: Value) -> bool {
		match self {
			Value::Array(items) => {
				items.borrow_mut().push(item);
				true
			}
			_ => false,
		}
	}

	/// The elements of an [`Value::Array`], cloned shallowly.
	#[must_use]
	pub fn to_vec(&self) -> Option<Vec<Value>> {
		match self {
			Value::Array(items) => Some(items.borrow().clone()),
			_ => None,
		}
	}

	/// Element, property, entry or member count of a container.
	#[must_use]
	pub fn len(&self) -> Option<usize> {
		match self {
			Value::Array(items) => Some(items.borrow().len()),
			Value::Object(properties) => Some(properties.borrow().len()),
			Value::Map(entries) => Some(entries.borrow().len()),
			Value::Set(members) => Some(members.borrow().len()),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			#[allow(clippy::float_cmp)]
			(Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
			(Value::String(a), Value::String(b)) => a == b,
			_ => match (self.identity(), other.identity()) {
				(Some(a), Some(b)) => a == b,
				_ => false,
			},
		}
	}
}
impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		mem::discriminant(self).hash(state);
		match self {
			Value::Undefined | Value::Null => (),
			Value::Bool(b) => b.hash(state),
			Value::Number(n) => {
				let bits = if n.is_nan() {
					f64::NAN.to_bits()
				} else if *n == 0.0 {
					0
				} else {
					n.to_bits()
				};
				bits.hash(state)
			}
			Value::String(s) => s.hash(state),
			_ => (self.identity().map(|ptr| ptr as usize)).hash(state),
		}
	}
}

/// Containers are printed shallowly, since they may contain themselves.
impl Debug for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		fn len<T>(cell: &RefCell<T>, len: impl FnOnce(&T) -> usize) -> Option<usize> {
			cell.try_borrow().ok().map(|borrowed| len(&*borrowed))
		}

		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Null => f.write_str("null"),
			Value::Bool(b) => Debug::fmt(b, f),
			Value::Number(n) => Debug::fmt(n, f),
			Value::String(s) => Debug::fmt(s, f),
			Value::Array(rc) => write!(f, "Array({:p}, len: {:?})", Rc::as_ptr(rc), len(&**rc, Vec::len)),
			Value::Object(rc) => write!(f, "Object({:p}, len: {:?})", Rc::as_ptr(rc), len(&**rc, Properties::len)),
			Value::Map(rc) => write!(f, "Map({:p}, len: {:?})", Rc::as_ptr(rc), len(&**rc, Entries::len)),
			Value::Set(rc) => write!(f, "Set({:p}, len: {:?})", Rc::as_ptr(rc), len(&**rc, Members::len)),
			Value::Date(rc) => write!(f, "Date({})", rc.get()),
			Value::Error(rc) => write!(f, "{}({:?})", rc.name, rc.message),
			Value::RegExp(rc) => write!(f, "/{}/{}", rc.source, rc.flags),
			Value::Function(rc) => write!(f, "Function({:p})", Rc::as_ptr(rc) as *const u8),
			Value::Opaque(rc) => write!(f, "Opaque({:p})", Rc::as_ptr(rc) as *const u8),
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Self::Undefined
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Self::Number(n)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Self::Number(n.into())
	}
}

impl From<u32> for Value {
	fn from(n: u32) -> Self {
		Self::Number(n.into())
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::String(s.into())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::String(s.into())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}
