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

//! [`Optional`]: the two-alternative container for a value that may be
//! absent, layout-compatible with a `repr(C)` rendition of `Option<T>`.

use core::cmp::Ordering;
use core::fmt;

use crate::tag::{U0, U1};
use crate::variant::Variant;
use crate::Alts;

/// The unit alternative marking absence (and, in general, any alternative
/// that carries no payload). Zero-sized, so it never grows the buffer.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit;

/// Error returned by [`Optional::value`] when the optional is absent.
/// Recoverable: the optional is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadOptionalAccess;

impl fmt::Display for BadOptionalAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("optional access on an absent value")
    }
}

#[rustversion::since(1.81)]
impl core::error::Error for BadOptionalAccess {}

/// A value that may be absent, with absent at discriminant 0 and present at
/// discriminant 1.
///
/// Built on [`Variant`] positionally, so `Optional<Unit>` is well-formed:
/// absence and a present `Unit` stay distinct states.
#[repr(transparent)]
pub struct Optional<T> {
    inner: Variant<Alts![Unit, T]>,
}

impl<T> Optional<T> {
    /// The absent optional.
    pub fn none() -> Self {
        Self {
            inner: Variant::new_at::<U0>(Unit),
        }
    }

    /// An optional holding `value`.
    pub fn some(value: T) -> Self {
        Self {
            inner: Variant::new_at::<U1>(value),
        }
    }

    /// Returns `true` if a value is present.
    pub fn has_value(&self) -> bool {
        self.inner.holds_at::<U1>()
    }

    /// Alias of [`Optional::has_value`].
    pub fn is_some(&self) -> bool {
        self.has_value()
    }

    /// Returns `true` if the optional is absent.
    pub fn is_none(&self) -> bool {
        !self.has_value()
    }

    /// The value as a borrowed `Option`.
    pub fn as_ref(&self) -> Option<&T> {
        self.inner.get_if_at::<U1>()
    }

    /// Mutable counterpart of [`Optional::as_ref`].
    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.inner.get_if_at_mut::<U1>()
    }

    /// Reference to the value, or [`BadOptionalAccess`] if absent.
    pub fn value(&self) -> Result<&T, BadOptionalAccess> {
        self.as_ref().ok_or(BadOptionalAccess)
    }

    /// Mutable counterpart of [`Optional::value`].
    pub fn value_mut(&mut self) -> Result<&mut T, BadOptionalAccess> {
        self.as_mut().ok_or(BadOptionalAccess)
    }

    /// Consumes the optional, yielding the value if present.
    pub fn into_value(self) -> Result<T, BadOptionalAccess> {
        self.inner.take_at::<U1>().map_err(|_| BadOptionalAccess)
    }

    /// The value if present, otherwise `default`.
    pub fn value_or(self, default: T) -> T {
        self.into_value().unwrap_or(default)
    }

    /// Stores `value`, replacing the previous state.
    pub fn set(&mut self, value: T) -> &mut T {
        self.inner.set_at::<U1>(value)
    }

    /// Returns the optional to the absent state, dropping any value.
    pub fn reset(&mut self) {
        self.inner.set_at::<U0>(Unit);
    }

    /// Chains a fallible continuation over a present value.
    pub fn and_then<U, F: FnOnce(T) -> Optional<U>>(self, f: F) -> Optional<U> {
        match self.into_value() {
            Ok(value) => f(value),
            Err(_) => Optional::none(),
        }
    }

    /// Maps a present value, preserving absence.
    pub fn transform<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        match self.into_value() {
            Ok(value) => Optional::some(f(value)),
            Err(_) => Optional::none(),
        }
    }

    /// Recovers from absence; a present value passes through.
    pub fn or_else<F: FnOnce() -> Optional<T>>(self, f: F) -> Optional<T> {
        match self.into_value() {
            Ok(value) => Optional::some(value),
            Err(_) => f(),
        }
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::some(value)
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::some(value),
            None => Self::none(),
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_value().ok()
    }
}

impl<T: Clone> Clone for Optional<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Optional<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq> Eq for Optional<T> {}

/// Comparison against the absent marker: equal iff no value is present.
///
/// A generic value comparison would collide with this impl at `T = Unit`,
/// so value comparisons go through [`Optional::as_ref`] instead.
impl<T> PartialEq<Unit> for Optional<T> {
    fn eq(&self, _: &Unit) -> bool {
        self.is_none()
    }
}

/// Ordering against the absent marker: absent compares equal to it, any
/// present value compares greater.
impl<T> PartialOrd<Unit> for Optional<T> {
    fn partial_cmp(&self, _: &Unit) -> Option<Ordering> {
        if self.is_none() {
            Some(Ordering::Equal)
        } else {
            Some(Ordering::Greater)
        }
    }
}

impl<T: PartialOrd> PartialOrd for Optional<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}
