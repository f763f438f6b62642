//! Shared ownership kernel.
//!
//! Every SDK object lives behind an [`Object`]: a single-threaded
//! reference-counted cell that also carries a per-object diagnostic message.
//!
//! The classic acquire/release contract maps onto handle semantics:
//!
//! - construction yields one handle (count 1)
//! - [`acquire`] clones a handle (count + 1)
//! - [`release`] drops the handle held in a slot and empties the slot
//! - when the last handle goes away the value's `Drop` runs exactly once,
//!   which releases every child handle the value owns
//!
//! `Object` is `!Send`, so the rule that a single owner sequence must not be
//! mutated from several threads at once is checked by the compiler.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Message returned by [`get_last_error`] for an absent object.
pub const NULL_OBJECT_MESSAGE: &str = "Object is NULL.";

struct ObjectCell<T> {
    value: T,
    last_error: RefCell<String>,
}

/// A shared, reference-counted SDK object.
pub struct Object<T> {
    cell: Rc<ObjectCell<T>>,
}

impl<T> Object<T> {
    /// Wrap a value. The new object has a reference count of 1.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(ObjectCell {
                value,
                last_error: RefCell::new(String::new()),
            }),
        }
    }

    /// Number of live handles to this object.
    pub fn refcount(&self) -> usize {
        Rc::strong_count(&self.cell)
    }

    /// Record a diagnostic message, replacing the previous one.
    pub fn set_last_error(&self, message: &str) {
        let mut slot = self.cell.last_error.borrow_mut();
        slot.clear();
        slot.push_str(message);
    }

    /// The most recent diagnostic message (empty if none was set).
    pub fn last_error(&self) -> String {
        self.cell.last_error.borrow().clone()
    }

    /// Whether two handles point at the same object.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.cell, &b.cell)
    }
}

impl<T> Clone for Object<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> Deref for Object<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.cell.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Object<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cell.value.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Object<T> {
    fn eq(&self, other: &Self) -> bool {
        Object::ptr_eq(self, other) || self.cell.value == other.cell.value
    }
}

/// Common surface of every SDK handle type built on [`Object`].
pub trait Shared: Clone {
    /// Number of live handles to the underlying object.
    fn refcount(&self) -> usize;

    /// Record a diagnostic message on the object.
    fn set_last_error(&self, message: &str);

    /// The most recent diagnostic message.
    fn last_error(&self) -> String;
}

impl<T> Shared for Object<T> {
    fn refcount(&self) -> usize {
        Object::refcount(self)
    }

    fn set_last_error(&self, message: &str) {
        Object::set_last_error(self, message)
    }

    fn last_error(&self) -> String {
        Object::last_error(self)
    }
}

/// Take an additional handle. Absent objects yield `None`.
pub fn acquire<S: Shared>(object: Option<&S>) -> Option<S> {
    object.cloned()
}

/// Give up the handle held in `slot` and leave the slot empty.
///
/// Runs the destructor if this was the last handle. Empty slots are ignored.
pub fn release<S: Shared>(slot: &mut Option<S>) {
    drop(slot.take());
}

/// Reference count of an object, or 0 if absent. For diagnostics only.
pub fn refcount<S: Shared>(object: Option<&S>) -> usize {
    object.map_or(0, Shared::refcount)
}

/// Record a message on an object. Absent objects are ignored.
pub fn set_last_error<S: Shared>(object: Option<&S>, message: &str) {
    if let Some(object) = object {
        object.set_last_error(message);
    }
}

/// Read an object's last message, or [`NULL_OBJECT_MESSAGE`] if absent.
pub fn get_last_error<S: Shared>(object: Option<&S>) -> String {
    object.map_or_else(|| NULL_OBJECT_MESSAGE.to_string(), Shared::last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct DropCounter<'a>(&'a Cell<usize>);

    impl Drop for DropCounter<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_new_object_has_count_one() {
        let object = Object::new(7u32);
        assert_eq!(object.refcount(), 1);
        assert_eq!(*object, 7);
    }

    #[test]
    fn test_acquire_release_balance() {
        let drops = Cell::new(0);
        let mut slot = Some(Object::new(DropCounter(&drops)));

        let mut extra: Vec<Option<Object<DropCounter>>> =
            (0..3).map(|_| acquire(slot.as_ref())).collect();
        assert_eq!(refcount(slot.as_ref()), 4);

        for handle in extra.iter_mut() {
            release(handle);
            assert!(handle.is_none());
        }
        assert_eq!(drops.get(), 0);
        assert_eq!(refcount(slot.as_ref()), 1);

        release(&mut slot);
        assert_eq!(drops.get(), 1);
        assert!(slot.is_none());

        // Releasing an empty slot is a no-op.
        release(&mut slot);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_absent_object() {
        let absent: Option<&Object<u8>> = None;
        assert_eq!(refcount(absent), 0);
        assert!(acquire(absent).is_none());
        set_last_error(absent, "ignored");
        assert_eq!(get_last_error(absent), NULL_OBJECT_MESSAGE);
    }

    #[test]
    fn test_last_error_latest_wins() {
        let object = Object::new(());
        assert_eq!(object.last_error(), "");

        set_last_error(Some(&object), "first");
        object.set_last_error("second");
        assert_eq!(get_last_error(Some(&object)), "second");

        // Messages are not truncated.
        let long = "x".repeat(1024);
        object.set_last_error(&long);
        assert_eq!(object.last_error().len(), 1024);
    }

    #[test]
    fn test_last_error_shared_between_handles() {
        let a = Object::new(1u8);
        let b = a.clone();
        a.set_last_error("boom");
        assert_eq!(b.last_error(), "boom");
        assert!(Object::ptr_eq(&a, &b));
    }

    #[test]
    fn test_children_released_with_parent() {
        let drops = Cell::new(0);
        let child = Object::new(DropCounter(&drops));
        let parent = Object::new(vec![child.clone()]);
        assert_eq!(child.refcount(), 2);

        drop(parent);
        assert_eq!(child.refcount(), 1);
        assert_eq!(drops.get(), 0);

        drop(child);
        assert_eq!(drops.get(), 1);
    }
}
