//! Wrapper type that keeps sensitive values out of logs.
//!
//! Decrypted configuration fields, the symmetric key and the components of
//! a credential bundle are held in [`Secret`]. Its `Debug` and `Display`
//! impls print [`REDACTED`], serialization emits [`REDACTED`], and the inner
//! value is zeroized on drop. Reading the value requires an explicit
//! [`Secret::expose`] call, which keeps every access site visible.

use serde::{Serialize, Serializer};
use std::fmt;
use zeroize::Zeroize;

/// Placeholder printed instead of a secret value.
pub const REDACTED: &str = "[REDACTED]";

#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
    T: Zeroize,
{
    inner: T,
}

pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
    T: Zeroize,
{
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped value.
    pub fn expose(&self) -> &T {
        &self.inner
    }

    /// Clone the wrapped value out. The wrapped copy is still zeroized on drop.
    pub fn into_inner(self) -> T
    where
        T: Clone,
    {
        self.inner.clone()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Secret::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Secret::new(value.to_string())
    }
}

impl<T> Clone for Secret<T>
where
    T: Zeroize + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Secret<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&REDACTED).finish()
    }
}

impl<T> fmt::Display for Secret<T>
where
    T: Zeroize,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> PartialEq for Secret<T>
where
    T: Zeroize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

impl<T> Serialize for Secret<T>
where
    T: Zeroize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}
