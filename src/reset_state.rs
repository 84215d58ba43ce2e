use crate::clone::DeepClone;

/// A piece of state that can be put back the way it started.
///
/// The initial state is snapshotted with [`DeepClone`], so later changes through shared references
/// don't leak into it.
#[derive(Debug)]
pub struct ResetState<S> {
	state: S,
	initial: S,
}
impl<S: DeepClone> ResetState<S> {
	pub fn new(initial: S) -> Self {
		Self {
			initial: initial.deep_clone(),
			state: initial,
		}
	}

	pub fn state(&self) -> &S {
		&self.state
	}

	pub fn state_mut(&mut self) -> &mut S {
		&mut self.state
	}

	pub fn initial(&self) -> &S {
		&self.initial
	}

	/// Replaces the state with a fresh copy of the initial snapshot.
	pub fn reset(&mut self) -> &S {
		self.state = self.initial.deep_clone();
		&self.state
	}

	pub fn into_inner(self) -> S {
		self.state
	}
}
