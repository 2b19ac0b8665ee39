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

//! [`Expected`]: the two-alternative container for a fallible outcome,
//! layout-compatible with a `repr(C)` rendition of `Result<T, E>`.

use core::cmp::Ordering;
use core::fmt;

use crate::list::invalid_discriminant;
use crate::tag::{U0, U1};
use crate::variant::Variant;
use crate::Alts;

/// Error returned by [`Expected::value`] on a failure outcome. Carries a
/// copy of the failure so the caller can report it without re-borrowing the
/// container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadExpectedAccess<E> {
    error: E,
}

impl<E> BadExpectedAccess<E> {
    /// The failure value that was live at the time of the access.
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Consumes the access error, yielding the failure value.
    pub fn into_error(self) -> E {
        self.error
    }
}

impl<E: fmt::Debug> fmt::Display for BadExpectedAccess<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected access on a failure value: {:?}", self.error)
    }
}

#[rustversion::since(1.81)]
impl<E: fmt::Debug> core::error::Error for BadExpectedAccess<E> {}

/// A fallible outcome: success of type `T` at discriminant 0, failure of
/// type `E` at discriminant 1.
///
/// Built on [`Variant`] positionally, so `Expected<T, T>` is well-formed:
/// a success and a failure of the same type stay distinct states.
#[repr(transparent)]
pub struct Expected<T, E> {
    inner: Variant<Alts![T, E]>,
}

impl<T, E> Expected<T, E> {
    /// A success outcome holding `value`.
    pub fn ok(value: T) -> Self {
        Self {
            inner: Variant::new_at::<U0>(value),
        }
    }

    /// A failure outcome holding `error`.
    pub fn err(error: E) -> Self {
        Self {
            inner: Variant::new_at::<U1>(error),
        }
    }

    /// Returns `true` on a success outcome.
    pub fn has_value(&self) -> bool {
        self.inner.holds_at::<U0>()
    }

    /// Alias of [`Expected::has_value`].
    pub fn is_ok(&self) -> bool {
        self.has_value()
    }

    /// Returns `true` on a failure outcome.
    pub fn is_err(&self) -> bool {
        !self.has_value()
    }

    /// The outcome as a borrowed `Result`.
    pub fn as_ref(&self) -> Result<&T, &E> {
        if let Some(value) = self.inner.get_if_at::<U0>() {
            return Ok(value);
        }
        match self.inner.get_if_at::<U1>() {
            Some(error) => Err(error),
            None => invalid_discriminant(),
        }
    }

    /// Mutable counterpart of [`Expected::as_ref`].
    pub fn as_mut(&mut self) -> Result<&mut T, &mut E> {
        if self.has_value() {
            match self.inner.get_if_at_mut::<U0>() {
                Some(value) => Ok(value),
                None => invalid_discriminant(),
            }
        } else {
            match self.inner.get_if_at_mut::<U1>() {
                Some(error) => Err(error),
                None => invalid_discriminant(),
            }
        }
    }

    /// Consumes the container, yielding the outcome as a `Result`.
    pub fn into_result(self) -> Result<T, E> {
        match self.inner.take_at::<U0>() {
            Ok(value) => Ok(value),
            Err(inner) => match inner.take_at::<U1>() {
                Ok(error) => Err(error),
                Err(_) => invalid_discriminant(),
            },
        }
    }

    /// Reference to the success value, or a [`BadExpectedAccess`] carrying a
    /// copy of the failure.
    pub fn value(&self) -> Result<&T, BadExpectedAccess<E>>
    where
        E: Clone,
    {
        self.as_ref().map_err(|error| BadExpectedAccess {
            error: error.clone(),
        })
    }

    /// Mutable counterpart of [`Expected::value`].
    pub fn value_mut(&mut self) -> Result<&mut T, BadExpectedAccess<E>>
    where
        E: Clone,
    {
        let snapshot = match self.as_ref() {
            Ok(_) => None,
            Err(error) => Some(error.clone()),
        };
        match snapshot {
            None => match self.as_mut() {
                Ok(value) => Ok(value),
                Err(_) => invalid_discriminant(),
            },
            Some(error) => Err(BadExpectedAccess { error }),
        }
    }

    /// Reference to the failure value.
    ///
    /// # Panics
    /// Panics on a success outcome; use [`Expected::error_if`] when the
    /// outcome is not already known to be a failure.
    pub fn error(&self) -> &E {
        match self.as_ref() {
            Ok(_) => panic!("Expected::error called on a success value"),
            Err(error) => error,
        }
    }

    /// Reference to the failure value, or `None` on a success outcome.
    pub fn error_if(&self) -> Option<&E> {
        self.as_ref().err()
    }

    /// The success value, or `default` on failure.
    pub fn value_or(self, default: T) -> T {
        self.into_result().unwrap_or(default)
    }

    /// The failure value, or `default` on success.
    pub fn error_or(self, default: E) -> E {
        match self.into_result() {
            Ok(_) => default,
            Err(error) => error,
        }
    }

    /// Chains a fallible continuation over a success value; a failure passes
    /// through.
    pub fn and_then<U, F: FnOnce(T) -> Expected<U, E>>(self, f: F) -> Expected<U, E> {
        match self.into_result() {
            Ok(value) => f(value),
            Err(error) => Expected::err(error),
        }
    }

    /// Maps a success value; a failure passes through.
    pub fn transform<U, F: FnOnce(T) -> U>(self, f: F) -> Expected<U, E> {
        match self.into_result() {
            Ok(value) => Expected::ok(f(value)),
            Err(error) => Expected::err(error),
        }
    }

    /// Maps a failure value; a success passes through.
    pub fn transform_error<G, F: FnOnce(E) -> G>(self, f: F) -> Expected<T, G> {
        match self.into_result() {
            Ok(value) => Expected::ok(value),
            Err(error) => Expected::err(f(error)),
        }
    }

    /// Recovers from a failure; a success passes through.
    pub fn or_else<G, F: FnOnce(E) -> Expected<T, G>>(self, f: F) -> Expected<T, G> {
        match self.into_result() {
            Ok(value) => Expected::ok(value),
            Err(error) => f(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Expected<T, E> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => Self::ok(value),
            Err(error) => Self::err(error),
        }
    }
}

impl<T, E> From<Expected<T, E>> for Result<T, E> {
    fn from(value: Expected<T, E>) -> Self {
        value.into_result()
    }
}

impl<T: Clone, E: Clone> Clone for Expected<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: PartialEq, E: PartialEq> PartialEq for Expected<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq, E: Eq> Eq for Expected<T, E> {}

impl<T: PartialOrd, E: PartialOrd> PartialOrd for Expected<T, E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Expected<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}
