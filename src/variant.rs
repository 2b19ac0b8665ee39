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

//! The core union engine: a discriminant plus a shared buffer, never
//! observed without a live alternative.

use core::cmp::Ordering;
use core::ffi::c_int;
use core::fmt;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ptr;

use crate::list::{
    AltList, At, CloneList, DebugList, EqList, PartialEqList, PartialOrdList, Select,
};
use crate::tag::Tag;
use crate::visit::{DispatchMut, DispatchRef};

/// Error returned by [`Variant::get`] and friends when the requested
/// alternative is not the live one. Recoverable: the variant is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAccess {
    /// The discriminant the caller asked for.
    pub expected: c_int,
    /// The discriminant currently stored.
    pub actual: c_int,
}

impl fmt::Display for InvalidAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid variant access: discriminant is {}, expected {}",
            self.actual, self.expected
        )
    }
}

#[rustversion::since(1.81)]
impl core::error::Error for InvalidAccess {}

/// A tagged union over the alternative list `S` with the memory layout of a
/// `repr(C)` Rust enum with fields: a machine-`int` discriminant followed by
/// a buffer sized and aligned to the largest alternative.
///
/// A `Variant` always holds exactly one live alternative. There is no empty
/// state: construction requires a value, and every replacement path either
/// completes or leaves the previous alternative untouched, even when
/// building the new alternative fails partway (see [`Variant::try_emplace_with`]
/// and [`Variant::try_emplace_in_place`]).
///
/// ```
/// use cvariant::{Alts, Variant, Unit};
///
/// let mut v: Variant<Alts![Unit, i64, String]> = Variant::new(5i64);
/// assert_eq!(v.index(), 1);
/// v.emplace(String::from("x"));
/// assert_eq!(v.index(), 2);
/// assert_eq!(v.get::<String, _>().unwrap(), "x");
/// ```
///
/// `Variant` is `Clone` only when every alternative is:
///
/// ```compile_fail
/// use cvariant::{Alts, Variant};
///
/// struct Opaque(*mut u8);
/// let v: Variant<Alts![u32, Opaque]> = Variant::new(3u32);
/// let _ = Variant::clone(&v);
/// ```
///
/// By-type operations require the type to occur exactly once in the list
/// (positional operations work regardless):
///
/// ```compile_fail
/// use cvariant::{Alts, Variant, tag::U0};
///
/// let v: Variant<Alts![u32, u32]> = Variant::new_at::<U0>(1u32);
/// let _ = v.get::<u32, _>();
/// ```
///
/// ```compile_fail
/// use cvariant::{Alts, Variant};
///
/// let v: Variant<Alts![u32, u64]> = Variant::new(1u32);
/// let _ = v.get::<&'static str, _>();
/// ```
///
/// Positions past the end of the list fail to instantiate:
///
/// ```compile_fail
/// use cvariant::{Alts, Variant, tag::U2};
///
/// let v: Variant<Alts![u32, u64]> = Variant::new(1u32);
/// let _ = v.get_at::<U2>();
/// ```
#[repr(C)]
pub struct Variant<S: AltList> {
    tag: c_int,
    storage: ManuallyDrop<S::Storage>,
}

impl<S: AltList> Variant<S> {
    /// Converting construction: builds the variant holding `value`, whose
    /// type must occur exactly once in `S`.
    pub fn new<T, I: Tag>(value: T) -> Self
    where
        S: Select<T, I>,
    {
        Self::new_at::<I>(value)
    }

    /// Positional construction: builds the variant holding `value` at
    /// position `I`. Valid even when the alternative's type is duplicated
    /// elsewhere in the list.
    pub fn new_at<I: Tag>(value: <S as At<I>>::Alt) -> Self
    where
        S: At<I>,
    {
        Self {
            tag: I::VALUE,
            storage: ManuallyDrop::new(S::from_alt(value)),
        }
    }

    /// The position of the live alternative.
    pub fn index(&self) -> usize {
        self.tag as usize
    }

    /// The stored discriminant, as it appears on the wire.
    pub fn discriminant(&self) -> c_int {
        self.tag
    }

    /// Returns `true` if the live alternative is the one of type `T`.
    pub fn holds<T, I: Tag>(&self) -> bool
    where
        S: Select<T, I>,
    {
        self.holds_at::<I>()
    }

    /// Returns `true` if the live alternative is the one at position `I`.
    pub fn holds_at<I: Tag>(&self) -> bool
    where
        S: At<I>,
    {
        self.tag == I::VALUE
    }

    /// Reference to the alternative of type `T`, or [`InvalidAccess`] if it
    /// is not the live one.
    pub fn get<T, I: Tag>(&self) -> Result<&T, InvalidAccess>
    where
        S: Select<T, I>,
    {
        self.get_at::<I>()
    }

    /// Mutable counterpart of [`Variant::get`].
    pub fn get_mut<T, I: Tag>(&mut self) -> Result<&mut T, InvalidAccess>
    where
        S: Select<T, I>,
    {
        self.get_at_mut::<I>()
    }

    /// Positional counterpart of [`Variant::get`].
    pub fn get_at<I: Tag>(&self) -> Result<&<S as At<I>>::Alt, InvalidAccess>
    where
        S: At<I>,
    {
        match self.get_if_at::<I>() {
            Some(alt) => Ok(alt),
            None => Err(InvalidAccess {
                expected: I::VALUE,
                actual: self.tag,
            }),
        }
    }

    /// Positional counterpart of [`Variant::get_mut`].
    pub fn get_at_mut<I: Tag>(&mut self) -> Result<&mut <S as At<I>>::Alt, InvalidAccess>
    where
        S: At<I>,
    {
        let actual = self.tag;
        match self.get_if_at_mut::<I>() {
            Some(alt) => Ok(alt),
            None => Err(InvalidAccess {
                expected: I::VALUE,
                actual,
            }),
        }
    }

    /// Reference to the alternative of type `T`, or `None` if it is not the
    /// live one.
    pub fn get_if<T, I: Tag>(&self) -> Option<&T>
    where
        S: Select<T, I>,
    {
        self.get_if_at::<I>()
    }

    /// Mutable counterpart of [`Variant::get_if`].
    pub fn get_if_mut<T, I: Tag>(&mut self) -> Option<&mut T>
    where
        S: Select<T, I>,
    {
        self.get_if_at_mut::<I>()
    }

    /// Positional counterpart of [`Variant::get_if`].
    pub fn get_if_at<I: Tag>(&self) -> Option<&<S as At<I>>::Alt>
    where
        S: At<I>,
    {
        if self.tag == I::VALUE {
            Some(unsafe { &*S::alt_ptr(&self.storage) })
        } else {
            None
        }
    }

    /// Positional counterpart of [`Variant::get_if_mut`].
    pub fn get_if_at_mut<I: Tag>(&mut self) -> Option<&mut <S as At<I>>::Alt>
    where
        S: At<I>,
    {
        if self.tag == I::VALUE {
            Some(unsafe { &mut *S::alt_ptr_mut(&mut self.storage) })
        } else {
            None
        }
    }

    /// Replaces the live alternative with `value`.
    ///
    /// `value` is fully constructed before the buffer is touched, so nothing
    /// on this path can fail: the old alternative is dropped, the new one is
    /// moved in, and the discriminant is updated last. A panicking [`Drop`]
    /// of the old alternative is outside the contract (as with C++ throwing
    /// destructors) and leaves the variant unusable.
    pub fn emplace<T, I: Tag>(&mut self, value: T) -> &mut T
    where
        S: Select<T, I>,
    {
        self.emplace_at::<I>(value)
    }

    /// Positional counterpart of [`Variant::emplace`].
    pub fn emplace_at<I: Tag>(&mut self, value: <S as At<I>>::Alt) -> &mut <S as At<I>>::Alt
    where
        S: At<I>,
    {
        unsafe { S::drop_alt(&mut self.storage, self.tag) };
        self.storage = ManuallyDrop::new(S::from_alt(value));
        self.tag = I::VALUE;
        unsafe { &mut *S::alt_ptr_mut(&mut self.storage) }
    }

    /// Fallible replacement: runs `make` to completion *before* disturbing
    /// the buffer, then replaces as [`Variant::emplace`] does.
    ///
    /// On `Err` (or a panic inside `make`) the variant still holds its
    /// previous alternative, bytes and discriminant untouched; the failure
    /// is propagated, not swallowed.
    pub fn try_emplace_with<T, I: Tag, E, F>(&mut self, make: F) -> Result<&mut T, E>
    where
        S: Select<T, I>,
        F: FnOnce() -> Result<T, E>,
    {
        let value = make()?;
        Ok(self.emplace_at::<I>(value))
    }

    /// Positional counterpart of [`Variant::try_emplace_with`].
    pub fn try_emplace_with_at<I: Tag, E, F>(
        &mut self,
        make: F,
    ) -> Result<&mut <S as At<I>>::Alt, E>
    where
        S: At<I>,
        F: FnOnce() -> Result<<S as At<I>>::Alt, E>,
    {
        let value = make()?;
        Ok(self.emplace_at::<I>(value))
    }

    /// Fallible replacement constructing directly into the live buffer, for
    /// alternatives too large (or otherwise unable) to be staged on the
    /// stack first.
    ///
    /// The protocol backs up the buffer bytes, lets `init` write the new
    /// alternative over the live one, and on failure restores the backup so
    /// the previous alternative's representation is intact. Restoration also
    /// runs if `init` unwinds. On success the previous alternative is
    /// dropped out of the backup copy, which is a valid relocation of it:
    /// Rust values are trivially relocatable by language definition.
    ///
    /// # Safety
    /// If `init` returns `Ok(())` it must have fully initialized `*slot`.
    /// `init` must not read `*slot` before writing it, and must not touch
    /// the variant through any other path. If `init` fails after partially
    /// writing `*slot`, it must release whatever resources it already
    /// stored there: the restore puts the previous alternative's bytes back
    /// without dropping the partial contents, so anything left owned in the
    /// slot leaks.
    pub unsafe fn try_emplace_in_place<T, I: Tag, E, F>(&mut self, init: F) -> Result<&mut T, E>
    where
        S: Select<T, I>,
        F: FnOnce(*mut T) -> Result<(), E>,
    {
        unsafe { self.try_emplace_in_place_at::<I, E, F>(init) }
    }

    /// Positional counterpart of [`Variant::try_emplace_in_place`].
    ///
    /// # Safety
    /// Same contract as [`Variant::try_emplace_in_place`].
    pub unsafe fn try_emplace_in_place_at<I: Tag, E, F>(
        &mut self,
        init: F,
    ) -> Result<&mut <S as At<I>>::Alt, E>
    where
        S: At<I>,
        F: FnOnce(*mut <S as At<I>>::Alt) -> Result<(), E>,
    {
        struct RestoreOnExit<U> {
            storage: *mut U,
            backup: *const U,
        }
        impl<U> Drop for RestoreOnExit<U> {
            fn drop(&mut self) {
                unsafe { ptr::copy_nonoverlapping(self.backup, self.storage, 1) };
            }
        }

        let old_tag = self.tag;
        let storage: *mut S::Storage = &mut *self.storage;
        let mut backup = MaybeUninit::<S::Storage>::uninit();
        unsafe { ptr::copy_nonoverlapping(storage as *const S::Storage, backup.as_mut_ptr(), 1) };

        let guard = RestoreOnExit {
            storage,
            backup: backup.as_ptr(),
        };
        let slot = S::alt_ptr_mut(unsafe { &mut *storage });
        match init(slot) {
            Ok(()) => {
                mem::forget(guard);
                // The new alternative is live before the old one is dropped,
                // so a panicking Drop cannot leave the variant invalid.
                self.tag = I::VALUE;
                unsafe { S::drop_alt(&mut *backup.as_mut_ptr(), old_tag) };
                Ok(unsafe { &mut *slot })
            }
            Err(e) => {
                // The guard's Drop puts the original bytes back.
                drop(guard);
                Err(e)
            }
        }
    }

    /// Converting assignment: assigns in place when the alternative of type
    /// `T` is already live, otherwise replaces the live alternative.
    pub fn set<T, I: Tag>(&mut self, value: T) -> &mut T
    where
        S: Select<T, I>,
    {
        self.set_at::<I>(value)
    }

    /// Positional counterpart of [`Variant::set`].
    pub fn set_at<I: Tag>(&mut self, value: <S as At<I>>::Alt) -> &mut <S as At<I>>::Alt
    where
        S: At<I>,
    {
        if self.tag == I::VALUE {
            let slot = unsafe { &mut *S::alt_ptr_mut(&mut self.storage) };
            *slot = value;
            slot
        } else {
            self.emplace_at::<I>(value)
        }
    }

    /// Consuming extraction of the alternative of type `T`; gives the
    /// variant back unchanged if another alternative is live.
    pub fn take<T, I: Tag>(self) -> Result<T, Self>
    where
        S: Select<T, I>,
    {
        self.take_at::<I>()
    }

    /// Positional counterpart of [`Variant::take`].
    pub fn take_at<I: Tag>(self) -> Result<<S as At<I>>::Alt, Self>
    where
        S: At<I>,
    {
        if self.tag == I::VALUE {
            let this = ManuallyDrop::new(self);
            let storage = unsafe { ptr::read(&*this.storage) };
            Ok(unsafe { S::into_alt(storage) })
        } else {
            Err(self)
        }
    }

    /// Exchanges the contents of two variants: both buffers and both
    /// discriminants. Pure byte exchange, no alternative is constructed or
    /// dropped; both sides hold live objects in buffers of identical size
    /// and alignment throughout.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Applies `visitor` to the live alternative; see [`crate::visit`].
    pub fn visit<V, R>(&self, visitor: V) -> R
    where
        S: DispatchRef<V, R>,
    {
        unsafe { S::dispatch_ref(&self.storage, self.tag, visitor) }
    }

    /// Mutable counterpart of [`Variant::visit`].
    pub fn visit_mut<V, R>(&mut self, visitor: V) -> R
    where
        S: DispatchMut<V, R>,
    {
        unsafe { S::dispatch_mut(&mut self.storage, self.tag, visitor) }
    }
}

impl<S: AltList> Drop for Variant<S> {
    fn drop(&mut self) {
        unsafe { S::drop_alt(&mut self.storage, self.tag) }
    }
}

impl<S: CloneList> Clone for Variant<S> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            storage: ManuallyDrop::new(unsafe { S::clone_alt(&self.storage, self.tag) }),
        }
    }
}

impl<S: PartialEqList> PartialEq for Variant<S> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && unsafe { S::eq_alt(&self.storage, &other.storage, self.tag) }
    }
}

impl<S: EqList> Eq for Variant<S> {}

impl<S: PartialOrdList> PartialOrd for Variant<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.tag.cmp(&other.tag) {
            Ordering::Equal => unsafe {
                S::partial_cmp_alt(&self.storage, &other.storage, self.tag)
            },
            ord => Some(ord),
        }
    }
}

impl<S: DebugList> fmt::Debug for Variant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variant[{}](", self.index())?;
        unsafe { S::fmt_alt(&self.storage, self.tag, f)? };
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use crate::tag::{U0, U1};
    use crate::{Alts, Variant};
    use std::format;
    use std::string::String;

    #[test]
    fn converting_construction_picks_the_unique_alternative() {
        let v: Variant<Alts![u32, String]> = Variant::new(7u32);
        assert_eq!(v.index(), 0);
        assert_eq!(v.discriminant(), 0);
        assert!(v.holds::<u32, _>());
        assert!(!v.holds::<String, _>());
        assert_eq!(*v.get::<u32, _>().unwrap(), 7);
    }

    #[test]
    fn mismatched_get_reports_both_discriminants() {
        let v: Variant<Alts![u32, String]> = Variant::new(String::from("x"));
        let err = v.get::<u32, _>().unwrap_err();
        assert_eq!(err.expected, 0);
        assert_eq!(err.actual, 1);
        assert_eq!(
            format!("{err}"),
            "invalid variant access: discriminant is 1, expected 0"
        );
        assert!(v.get_if::<u32, _>().is_none());
    }

    #[test]
    fn positional_operations_ignore_duplicate_types() {
        let mut v: Variant<Alts![u32, u32]> = Variant::new_at::<U1>(5u32);
        assert_eq!(v.index(), 1);
        assert!(v.get_at::<U0>().is_err());
        assert_eq!(*v.get_at::<U1>().unwrap(), 5);
        v.set_at::<U0>(9);
        assert_eq!(v.index(), 0);
        assert_eq!(*v.get_at::<U0>().unwrap(), 9);
    }

    #[test]
    fn set_assigns_in_place_when_the_type_matches() {
        let mut v: Variant<Alts![u32, String]> = Variant::new(String::from("before"));
        v.set(String::from("after"));
        assert_eq!(v.index(), 1);
        assert_eq!(v.get::<String, _>().unwrap(), "after");
        v.set(3u32);
        assert_eq!(v.index(), 0);
    }

    #[test]
    fn take_returns_the_variant_on_mismatch() {
        let v: Variant<Alts![u32, String]> = Variant::new(String::from("kept"));
        let v = v.take::<u32, _>().unwrap_err();
        assert_eq!(v.take::<String, _>().unwrap(), "kept");
    }

    #[test]
    fn clone_and_eq_follow_the_live_alternative() {
        let a: Variant<Alts![u32, String]> = Variant::new(String::from("dup"));
        let b = a.clone();
        assert_eq!(a, b);
        let c: Variant<Alts![u32, String]> = Variant::new(4u32);
        assert_ne!(a, c);
        assert!(c < a); // discriminants order first
    }

    #[test]
    fn debug_prints_the_position_and_the_alternative() {
        let v: Variant<Alts![u32, String]> = Variant::new(5u32);
        assert_eq!(format!("{v:?}"), "Variant[0](5)");
    }
}
