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

//! Alternative lists and the shared storage buffer they describe.
//!
//! A list of alternatives is a nested tuple `(Head, Tail)` terminated by
//! `()`, usually written with the [`Alts!`](crate::Alts) macro. Its storage
//! is the matching chain of [`Cons`] unions: every link overlays the head
//! alternative with the rest of the chain, so the whole buffer is exactly as
//! large and as aligned as the largest alternative. This is the payload
//! layout of a `repr(C)` Rust enum with fields.

use core::cmp::Ordering;
use core::convert::Infallible;
use core::ffi::c_int;
use core::fmt;
use core::mem::ManuallyDrop;
use core::ptr;

use crate::tag::{Tag, UInt, UTerm};

/// Terminator of a storage chain.
///
/// Uninhabited: a variant over zero alternatives cannot be constructed.
pub struct Nil(pub(crate) Infallible);

/// One link of a storage chain: the head alternative overlaid with the rest
/// of the chain.
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

/// Terminal case of every tag-directed recursion. Unreachable for values
/// built through the engine's own operations; reachable only if the
/// discriminant was corrupted from outside (e.g. a bad foreign write).
#[cold]
#[inline(never)]
pub(crate) fn invalid_discriminant() -> ! {
    panic!("invalid discriminant: no alternative matches the stored tag")
}

/// An ordered list of alternative types.
///
/// # Safety
/// `Storage` must be the [`Cons`] chain matching the list, so that
/// tag-directed field accesses resolve to the alternative the tag names.
pub unsafe trait AltList {
    /// The shared buffer, sized and aligned to the largest alternative.
    type Storage;
    /// Number of alternatives in the list.
    const LEN: usize;
    /// Drops the alternative selected by `tag` in place.
    ///
    /// # Safety
    /// `storage` must hold a live alternative at position `tag`.
    unsafe fn drop_alt(storage: &mut Self::Storage, tag: c_int);
}

unsafe impl AltList for () {
    type Storage = Nil;
    const LEN: usize = 0;
    unsafe fn drop_alt(_: &mut Nil, _: c_int) {
        invalid_discriminant()
    }
}

unsafe impl<Head, Tail: AltList> AltList for (Head, Tail) {
    type Storage = Cons<Head, Tail::Storage>;
    const LEN: usize = 1 + Tail::LEN;
    unsafe fn drop_alt(storage: &mut Self::Storage, tag: c_int) {
        if tag == 0 {
            unsafe { ManuallyDrop::drop(&mut storage.data) }
        } else {
            unsafe { Tail::drop_alt(&mut storage.next, tag - 1) }
        }
    }
}

/// Positional access to the alternative at position `I`.
///
/// Out-of-range positions have no impl and fail to instantiate.
///
/// # Safety
/// The pointer accessors must resolve to the buffer slot that position `I`
/// occupies in `Storage`.
pub unsafe trait At<I: Tag>: AltList {
    /// The alternative type at position `I`.
    type Alt;
    /// Builds a buffer holding `value` at position `I`.
    fn from_alt(value: Self::Alt) -> Self::Storage;
    /// Pointer to position `I` of the buffer. Always valid to form; reading
    /// through it is only sound while position `I` is the live alternative.
    fn alt_ptr(storage: &Self::Storage) -> *const Self::Alt;
    /// Mutable counterpart of [`At::alt_ptr`].
    fn alt_ptr_mut(storage: &mut Self::Storage) -> *mut Self::Alt;
    /// Moves the alternative at position `I` out of the buffer.
    ///
    /// # Safety
    /// `storage` must hold a live alternative at position `I`.
    unsafe fn into_alt(storage: Self::Storage) -> Self::Alt;
}

unsafe impl<Head, Tail: AltList> At<UTerm> for (Head, Tail) {
    type Alt = Head;
    fn from_alt(value: Head) -> Self::Storage {
        Cons {
            data: ManuallyDrop::new(value),
        }
    }
    fn alt_ptr(storage: &Self::Storage) -> *const Head {
        ptr::addr_of!(storage.data).cast()
    }
    fn alt_ptr_mut(storage: &mut Self::Storage) -> *mut Head {
        ptr::addr_of_mut!(storage.data).cast()
    }
    unsafe fn into_alt(storage: Self::Storage) -> Head {
        ManuallyDrop::into_inner(unsafe { storage.data })
    }
}

unsafe impl<Head, Tail: At<I>, I: Tag> At<UInt<I>> for (Head, Tail) {
    type Alt = Tail::Alt;
    fn from_alt(value: Self::Alt) -> Self::Storage {
        Cons {
            next: ManuallyDrop::new(Tail::from_alt(value)),
        }
    }
    fn alt_ptr(storage: &Self::Storage) -> *const Self::Alt {
        Tail::alt_ptr(unsafe { &storage.next })
    }
    fn alt_ptr_mut(storage: &mut Self::Storage) -> *mut Self::Alt {
        Tail::alt_ptr_mut(unsafe { &mut storage.next })
    }
    unsafe fn into_alt(storage: Self::Storage) -> Self::Alt {
        unsafe { Tail::into_alt(ManuallyDrop::into_inner(storage.next)) }
    }
}

/// Selects the alternative of type `T`, requiring `T` to occur exactly once
/// in the list.
///
/// The position `I` is never written by callers, it is inferred. If `T` does
/// not occur in the list no impl applies; if it occurs more than once the
/// inference is ambiguous. Both are compile-time rejections. Positional
/// operations ([`At`]) stay available for duplicated types.
pub trait Select<T, I: Tag>: At<I, Alt = T> {}

impl<Head, Tail: AltList> Select<Head, UTerm> for (Head, Tail) {}
impl<Head, Tail: Select<T, I>, T, I: Tag> Select<T, UInt<I>> for (Head, Tail) {}

/// Capability recursion: a list is `CloneList` iff every alternative is
/// [`Clone`].
///
/// # Safety
/// Same contract as [`AltList`].
pub unsafe trait CloneList: AltList {
    /// Clones the alternative selected by `tag` into a fresh buffer.
    ///
    /// # Safety
    /// `storage` must hold a live alternative at position `tag`.
    unsafe fn clone_alt(storage: &Self::Storage, tag: c_int) -> Self::Storage;
}

unsafe impl CloneList for () {
    unsafe fn clone_alt(_: &Nil, _: c_int) -> Nil {
        invalid_discriminant()
    }
}

unsafe impl<Head: Clone, Tail: CloneList> CloneList for (Head, Tail) {
    unsafe fn clone_alt(storage: &Self::Storage, tag: c_int) -> Self::Storage {
        if tag == 0 {
            Cons {
                data: unsafe { &storage.data }.clone(),
            }
        } else {
            Cons {
                next: ManuallyDrop::new(unsafe { Tail::clone_alt(&storage.next, tag - 1) }),
            }
        }
    }
}

/// Capability recursion: a list is `PartialEqList` iff every alternative is
/// [`PartialEq`].
///
/// # Safety
/// Same contract as [`AltList`].
pub unsafe trait PartialEqList: AltList {
    /// Compares the alternatives selected by `tag` in both buffers.
    ///
    /// # Safety
    /// Both buffers must hold live alternatives at position `tag`.
    unsafe fn eq_alt(a: &Self::Storage, b: &Self::Storage, tag: c_int) -> bool;
}

unsafe impl PartialEqList for () {
    unsafe fn eq_alt(_: &Nil, _: &Nil, _: c_int) -> bool {
        invalid_discriminant()
    }
}

unsafe impl<Head: PartialEq, Tail: PartialEqList> PartialEqList for (Head, Tail) {
    unsafe fn eq_alt(a: &Self::Storage, b: &Self::Storage, tag: c_int) -> bool {
        if tag == 0 {
            unsafe { a.data == b.data }
        } else {
            unsafe { Tail::eq_alt(&a.next, &b.next, tag - 1) }
        }
    }
}

/// Marker recursion for total equality.
pub trait EqList: PartialEqList {}

impl EqList for () {}
impl<Head: Eq, Tail: EqList> EqList for (Head, Tail) {}

/// Capability recursion: a list is `PartialOrdList` iff every alternative is
/// [`PartialOrd`].
///
/// # Safety
/// Same contract as [`AltList`].
pub unsafe trait PartialOrdList: PartialEqList {
    /// Orders the alternatives selected by `tag` in both buffers.
    ///
    /// # Safety
    /// Both buffers must hold live alternatives at position `tag`.
    unsafe fn partial_cmp_alt(a: &Self::Storage, b: &Self::Storage, tag: c_int)
        -> Option<Ordering>;
}

unsafe impl PartialOrdList for () {
    unsafe fn partial_cmp_alt(_: &Nil, _: &Nil, _: c_int) -> Option<Ordering> {
        invalid_discriminant()
    }
}

unsafe impl<Head: PartialOrd, Tail: PartialOrdList> PartialOrdList for (Head, Tail) {
    unsafe fn partial_cmp_alt(
        a: &Self::Storage,
        b: &Self::Storage,
        tag: c_int,
    ) -> Option<Ordering> {
        if tag == 0 {
            unsafe { a.data.partial_cmp(&b.data) }
        } else {
            unsafe { Tail::partial_cmp_alt(&a.next, &b.next, tag - 1) }
        }
    }
}

/// Capability recursion: a list is `DebugList` iff every alternative is
/// [`fmt::Debug`].
///
/// # Safety
/// Same contract as [`AltList`].
pub unsafe trait DebugList: AltList {
    /// Formats the alternative selected by `tag`.
    ///
    /// # Safety
    /// `storage` must hold a live alternative at position `tag`.
    unsafe fn fmt_alt(
        storage: &Self::Storage,
        tag: c_int,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result;
}

unsafe impl DebugList for () {
    unsafe fn fmt_alt(_: &Nil, _: c_int, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        invalid_discriminant()
    }
}

unsafe impl<Head: fmt::Debug, Tail: DebugList> DebugList for (Head, Tail) {
    unsafe fn fmt_alt(
        storage: &Self::Storage,
        tag: c_int,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if tag == 0 {
            let alt: &Head = unsafe { &storage.data };
            alt.fmt(f)
        } else {
            unsafe { Tail::fmt_alt(&storage.next, tag - 1, f) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{U0, U1, U2};
    use crate::Alts;
    use std::string::String;

    type Abc = Alts![u8, u64, String];

    #[test]
    fn storage_is_sized_to_the_largest_alternative() {
        assert_eq!(
            core::mem::size_of::<<Abc as AltList>::Storage>(),
            core::mem::size_of::<String>()
        );
        assert_eq!(
            core::mem::align_of::<<Abc as AltList>::Storage>(),
            core::mem::align_of::<String>()
        );
        assert_eq!(<Abc as AltList>::LEN, 3);
    }

    #[test]
    fn positions_resolve_in_declaration_order() {
        assert_eq!(core::mem::size_of::<<Abc as At<U0>>::Alt>(), 1);
        assert_eq!(core::mem::size_of::<<Abc as At<U1>>::Alt>(), 8);
        let mut storage = <Abc as At<U2>>::from_alt(String::from("pos 2"));
        let s: &String = unsafe { &*<Abc as At<U2>>::alt_ptr(&storage) };
        assert_eq!(s, "pos 2");
        unsafe { <Abc as AltList>::drop_alt(&mut storage, 2) };
    }

    #[test]
    fn every_position_shares_the_buffer_start() {
        let storage = <Abc as At<U0>>::from_alt(7);
        let base = &storage as *const _ as usize;
        assert_eq!(<Abc as At<U0>>::alt_ptr(&storage) as usize, base);
        assert_eq!(<Abc as At<U1>>::alt_ptr(&storage) as usize, base);
        assert_eq!(<Abc as At<U2>>::alt_ptr(&storage) as usize, base);
    }
}
