use core::{cell::Cell, future::Future};
use std::rc::Rc;
use tracing::trace;

/// Drops invocations while a previous one is still pending.
///
/// ```
/// use futures::executor::block_on;
/// use keep_alive_router::lock::AsyncLock;
///
/// let lock = AsyncLock::new();
/// let first = lock.run(async { 1 });
/// assert_eq!(block_on(lock.run(async { 2 })), None);
/// assert_eq!(block_on(first), Some(1));
/// assert_eq!(block_on(lock.run(async { 3 })), Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AsyncLock {
	locked: Rc<Cell<bool>>,
}
impl AsyncLock {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn is_locked(&self) -> bool {
		self.locked.get()
	}

	/// Takes the lock immediately and runs `future` under it.
	///
	/// Resolves to [`None`] without polling `future` if the lock was already taken.
	/// The lock is released once `future` completes or the returned future is dropped.
	pub fn run<F: Future>(&self, future: F) -> impl Future<Output = Option<F::Output>> {
		let release = if self.locked.replace(true) {
			trace!("Still locked; dropping invocation.");
			None
		} else {
			Some(Release(Rc::clone(&self.locked)))
		};

		async move {
			let _release = match release {
				Some(release) => release,
				None => return None,
			};
			Some(future.await)
		}
	}
}

struct Release(Rc<Cell<bool>>);
impl Drop for Release {
	fn drop(&mut self) {
		self.0.set(false)
	}
}
