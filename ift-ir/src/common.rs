//! `Rc`/`Weak` aliases used throughout the IR. Mirrors the teacher's
//! `calyx_ir::common` module: internal sharing is `Rc<RefCell<_>>`, parent
//! back-pointers are `Weak`, never `Arc`/`Mutex` (the instrumenter is
//! strictly single-threaded, see the Concurrency & Resource Model).

use ift_utils::GetName;
#[cfg(debug_assertions)]
use ift_utils::Id;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// An `Rc<RefCell<T>>` alias.
#[allow(clippy::upper_case_acronyms)]
pub type RRC<T> = Rc<RefCell<T>>;

/// Construct a new `RRC`.
pub fn rrc<T>(t: T) -> RRC<T> {
    Rc::new(RefCell::new(t))
}

/// A weak `RefCell` pointer, used for parent back-references (a wire's
/// owning module, a port's owning cell) so that ownership stays tree-shaped.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug)]
pub struct WRC<T>
where
    T: GetName,
{
    internal: Weak<RefCell<T>>,
    #[cfg(debug_assertions)]
    debug_name: Id,
}

impl<T: GetName> WRC<T> {
    /// Upgrade the weak pointer. Panics (with the node's original name, in
    /// debug builds) if the parent has been dropped -- this should never
    /// happen during a pass, since a module owns its cells/wires for the
    /// full scan.
    pub fn upgrade(&self) -> RRC<T> {
        let Some(r) = self.internal.upgrade() else {
            #[cfg(debug_assertions)]
            unreachable!(
                "weak reference points to a dropped value; original name: `{}'",
                self.debug_name
            );
            #[cfg(not(debug_assertions))]
            unreachable!("weak reference points to a dropped value");
        };
        r
    }
}

impl<T: GetName> From<&RRC<T>> for WRC<T> {
    fn from(internal: &RRC<T>) -> Self {
        Self {
            internal: Rc::downgrade(internal),
            #[cfg(debug_assertions)]
            debug_name: internal.borrow().name(),
        }
    }
}

impl<T: GetName> Clone for WRC<T> {
    fn clone(&self) -> Self {
        Self {
            internal: Weak::clone(&self.internal),
            #[cfg(debug_assertions)]
            debug_name: self.debug_name,
        }
    }
}
