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

//! Compile-time positions within an alternative list.
//!
//! Positions are Peano naturals: [`UTerm`] is position 0 and [`UInt<I>`] is
//! the position after `I`. The [`Tag`] trait turns a position back into the
//! runtime discriminant value stored in a [`Variant`](crate::Variant).

use core::ffi::c_int;
use core::marker::PhantomData;

/// Position 0.
pub struct UTerm;

/// The position after `I`.
pub struct UInt<I>(PhantomData<I>);

/// A compile-time position in an alternative list.
pub trait Tag {
    /// The position as the discriminant value a [`Variant`](crate::Variant) stores.
    const VALUE: c_int;
    /// The position as a plain index.
    const USIZE: usize;
}

impl Tag for UTerm {
    const VALUE: c_int = 0;
    const USIZE: usize = 0;
}

impl<I: Tag> Tag for UInt<I> {
    const VALUE: c_int = I::VALUE + 1;
    const USIZE: usize = I::USIZE + 1;
}

/// 0
pub type U0 = UTerm;
/// 1
pub type U1 = UInt<U0>;
/// 2
pub type U2 = UInt<U1>;
/// 3
pub type U3 = UInt<U2>;
/// 4
pub type U4 = UInt<U3>;
/// 5
pub type U5 = UInt<U4>;
/// 6
pub type U6 = UInt<U5>;
/// 7
pub type U7 = UInt<U6>;
/// 8
pub type U8 = UInt<U7>;
/// 9
pub type U9 = UInt<U8>;
/// 10
pub type U10 = UInt<U9>;
/// 11
pub type U11 = UInt<U10>;
/// 12
pub type U12 = UInt<U11>;
