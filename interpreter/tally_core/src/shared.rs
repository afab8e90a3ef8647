//! Single-threaded shared-mutable wrapper for container payloads.

// Rc is the intentional implementation detail of Shared<T>
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A single-threaded wrapper for reference-counted interior mutability.
///
/// Container values (arrays, maps, tables, host objects) and scope frames
/// share their payload through `Shared<T>`; cloning a `Shared` clones the
/// handle, not the payload, which is what gives assignment and method
/// calls their in-place mutation semantics.
///
/// # Thread Safety
/// `Shared<T>` is NOT thread-safe. Evaluation is single-threaded; the
/// read-only registries that may cross threads use `Arc` wrappers instead.
#[repr(transparent)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Create a new `Shared` wrapping the given value.
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles share one payload.
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.0).finish()
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}
