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

//! Never-valueless tagged unions with the memory layout of `repr(C)` Rust
//! enums with fields: a machine-`int` discriminant followed by a union of
//! the alternatives, sized and aligned to the largest of them, with no
//! hidden validity flag.
//!
//! [`Variant`] is the core engine. It always holds exactly one live
//! alternative: every construction and replacement path either completes or
//! leaves the previous alternative untouched, even when building the new
//! alternative fails partway. [`Optional`] and [`Expected`] are the
//! two-alternative containers built on it, layout-compatible with `repr(C)`
//! renditions of `Option<T>` and `Result<T, E>`.
//!
//! ```
//! use cvariant::{Alts, Variant, Unit};
//!
//! let mut v: Variant<Alts![Unit, i64, String]> = Variant::new(5i64);
//! assert_eq!(v.index(), 1);
//!
//! v.emplace(String::from("five"));
//! assert_eq!(v.get::<String, _>().unwrap(), "five");
//! assert!(v.get::<i64, _>().is_err());
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

/// Builds an alternative-list type from a comma-separated list of types.
///
/// The list is a nested tuple, head first: `Alts![A, B]` is `(A, (B, ()))`.
/// Order is significant, it defines the discriminant of each alternative.
#[macro_export]
macro_rules! Alts {
    [] => { () };
    [$head:ty $(, $tail:ty)* $(,)?] => { ($head, $crate::Alts![$($tail),*]) };
}

pub mod list;
pub mod option;
pub mod result;
pub mod tag;
pub mod variant;
pub mod visit;

pub use crate::option::{BadOptionalAccess, Optional, Unit};
pub use crate::result::{BadExpectedAccess, Expected};
pub use crate::variant::{InvalidAccess, Variant};
pub use crate::visit::{Visit, VisitMut};
