//
// Copyright (c) 2024 ZettaScale Technology
//
// This program and the accompanying materials are made available under the
// terms of the Eclipse Public License 2.0 which is available at
// http://www.eclipse.org/legal/epl-2.0, or the Apache License, Version 2.0
// which is available at https://www.apache.org/licenses/LICENSE-2.0.
//
// SPDX-License-Identifier: EPL-2.0 OR Apache-2.0
//
// Contributors:
//   ZettaScale Zenoh Team, <zenoh@zettascale.tech>
//

//! Exhaustive dispatch from a runtime discriminant to the statically-typed
//! alternative it names.
//!
//! A visitor implements [`Visit`] (or [`VisitMut`]) once per alternative
//! type, all branches sharing one `Output`. Dispatch is a linear recursion
//! over the list: position 0 is checked first, then the tail with `tag - 1`.
//! A catch-all branch is a single generic impl:
//!
//! ```
//! use cvariant::{Alts, Variant, Visit};
//!
//! struct Render;
//! impl<T: core::fmt::Display> Visit<T> for Render {
//!     type Output = String;
//!     fn visit(self, alt: &T) -> String {
//!         format!("{alt}")
//!     }
//! }
//!
//! let v: Variant<Alts![u32, &'static str]> = Variant::new("five");
//! assert_eq!(v.visit(Render), "five");
//! let v: Variant<Alts![u32, &'static str]> = Variant::new(5u32);
//! assert_eq!(v.visit(Render), "5");
//! ```

use core::ffi::c_int;

use crate::list::{invalid_discriminant, AltList, Nil};

/// One visitor branch: shared access to an alternative of type `T`.
pub trait Visit<T> {
    /// The result type common to every branch of the visitor.
    type Output;
    /// Applies the visitor to the live alternative.
    fn visit(self, alt: &T) -> Self::Output;
}

/// One visitor branch: exclusive access to an alternative of type `T`.
pub trait VisitMut<T> {
    /// The result type common to every branch of the visitor.
    type Output;
    /// Applies the visitor to the live alternative.
    fn visit_mut(self, alt: &mut T) -> Self::Output;
}

/// Dispatches a [`Visit`] visitor over a list by shared reference.
///
/// # Safety
/// Callers must pass the tag of the alternative that is live in `storage`.
pub unsafe trait DispatchRef<V, R>: AltList {
    /// Applies `visitor` to the alternative selected by `tag`.
    ///
    /// # Safety
    /// `storage` must hold a live alternative at position `tag`.
    unsafe fn dispatch_ref(storage: &Self::Storage, tag: c_int, visitor: V) -> R;
}

unsafe impl<V, R> DispatchRef<V, R> for () {
    unsafe fn dispatch_ref(_: &Nil, _: c_int, _: V) -> R {
        invalid_discriminant()
    }
}

unsafe impl<Head, Tail, V, R> DispatchRef<V, R> for (Head, Tail)
where
    V: Visit<Head, Output = R>,
    Tail: DispatchRef<V, R>,
{
    unsafe fn dispatch_ref(storage: &Self::Storage, tag: c_int, visitor: V) -> R {
        if tag == 0 {
            let alt: &Head = unsafe { &storage.data };
            visitor.visit(alt)
        } else {
            unsafe { Tail::dispatch_ref(&storage.next, tag - 1, visitor) }
        }
    }
}

/// Dispatches a [`VisitMut`] visitor over a list by exclusive reference.
///
/// # Safety
/// Callers must pass the tag of the alternative that is live in `storage`.
pub unsafe trait DispatchMut<V, R>: AltList {
    /// Applies `visitor` to the alternative selected by `tag`.
    ///
    /// # Safety
    /// `storage` must hold a live alternative at position `tag`.
    unsafe fn dispatch_mut(storage: &mut Self::Storage, tag: c_int, visitor: V) -> R;
}

unsafe impl<V, R> DispatchMut<V, R> for () {
    unsafe fn dispatch_mut(_: &mut Nil, _: c_int, _: V) -> R {
        invalid_discriminant()
    }
}

unsafe impl<Head, Tail, V, R> DispatchMut<V, R> for (Head, Tail)
where
    V: VisitMut<Head, Output = R>,
    Tail: DispatchMut<V, R>,
{
    unsafe fn dispatch_mut(storage: &mut Self::Storage, tag: c_int, visitor: V) -> R {
        if tag == 0 {
            let alt: &mut Head = unsafe { &mut storage.data };
            visitor.visit_mut(alt)
        } else {
            unsafe { Tail::dispatch_mut(&mut storage.next, tag - 1, visitor) }
        }
    }
}
