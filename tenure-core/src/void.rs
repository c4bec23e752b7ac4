use core::{
    fmt,
    marker::{PhantomData, PhantomPinned},
};

/// The target of a type-erased handle, produced by [`Own::erase`](crate::Own::erase).
///
/// `Void` cannot be constructed, moved out of, or sent across threads. The
/// only meaningful thing to do with an `Own<Void>` is to compare its address
/// or to drop it, which destroys the complete original object.
#[repr(C)]
pub struct Void {
    _data: [u8; 0],
    _p: PhantomData<(*mut u8, PhantomPinned)>,
}

impl fmt::Debug for Void {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Void")
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::Cell;

    use crate::{heap, impl_upcast, Own};

    struct Plain {
        _i: i32,
    }

    #[repr(C)]
    struct First {
        j: i32,
    }

    #[repr(C)]
    struct Second {
        k: i32,
    }

    #[repr(C)]
    struct Derived {
        first: First,
        second: Second,
        destructor_called: Rc<Cell<bool>>,
    }

    impl Drop for Derived {
        fn drop(&mut self) {
            self.destructor_called.set(true);
        }
    }

    impl_upcast!(Derived: first => First, second => Second);

    fn derived(destructor_called: &Rc<Cell<bool>>) -> Own<Derived> {
        heap(Derived {
            first: First { j: 123 },
            second: Second { k: 456 },
            destructor_called: destructor_called.clone(),
        })
    }

    #[test]
    fn erasing_a_plain_type_keeps_the_address() {
        let own = heap(Plain { _i: 123 });
        let addr = own.addr();
        let erased = own.erase();
        assert_eq!(erased.addr(), addr);
    }

    #[test]
    fn erasing_the_complete_object_disposes_it() {
        let called = Rc::new(Cell::new(false));
        let own = derived(&called);
        let addr = own.addr();

        let mut erased = own.erase();
        assert_eq!(erased.addr(), addr);
        assert!(!called.get());

        erased.clear();
        assert!(called.get());
    }

    #[test]
    fn erasing_a_first_base_keeps_the_address() {
        let called = Rc::new(Cell::new(false));
        let own = derived(&called);
        let addr = own.addr();

        let first: Own<First> = own.upcast();
        assert_eq!(first.j, 123);
        let erased = first.erase();
        assert_eq!(erased.addr(), addr);

        drop(erased);
        assert!(called.get());
    }

    #[test]
    fn erasing_a_second_base_recovers_the_complete_object() {
        let called = Rc::new(Cell::new(false));
        let own = derived(&called);
        let addr = own.addr();

        let second: Own<Second> = own.upcast();
        assert_eq!(second.k, 456);
        assert_ne!(second.addr(), addr);

        let mut erased = second.erase();
        assert_eq!(erased.addr(), addr);

        assert!(!called.get());
        erased.clear();
        assert!(called.get());
    }

    #[test]
    fn erasing_an_empty_handle() {
        assert!(Own::<Plain>::null().erase().is_null());
    }

    #[test]
    fn erased_handles_can_be_erased_again() {
        let own = heap(1u16);
        let addr = own.addr();
        assert_eq!(own.erase().erase().addr(), addr);
    }
}
