// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::ops::Deref;

/// Read-only handle for a shared value.
///
/// `Frozen` derefs to `&T` and never to `&mut T`, so every `&mut self`
/// mutator on the wrapped matrix is unreachable: attempting one is a compile
/// error rather than a runtime failure. [`Frozen::thaw`] hands out an
/// independent mutable copy.
///
/// ```compile_fail
/// use dot_math::Mat3;
/// let shared = Mat3::IDENTITY.make_immutable();
/// shared.set_to_scale(2.0, 2.0);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frozen<T>(T);

impl<T> Frozen<T> {
    /// Wraps `value`; usable in `const` and `static` items.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Returns a mutable copy, leaving the frozen value untouched.
    pub fn thaw(&self) -> T
    where
        T: Copy,
    {
        self.0
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> AsRef<T> for Frozen<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}
