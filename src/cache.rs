//! Lazily built native key.

use crate::errors::Result;
use crate::native::NativeRsaKey;

/// Holds at most one [`NativeRsaKey`] built from the current components.
///
/// Clearing the cache drops the key, which zeroizes it.
#[derive(Default)]
pub(crate) struct NativeKeyCache {
    key: Option<NativeRsaKey>,
}

impl NativeKeyCache {
    /// Whether a key is currently cached.
    pub fn is_populated(&self) -> bool {
        self.key.is_some()
    }

    /// Returns the cached key, building it with `build` first if the cache is
    /// empty. A failed build leaves the cache empty.
    pub fn get_or_try_init<F>(&mut self, build: F) -> Result<&NativeRsaKey>
    where
        F: FnOnce() -> Result<NativeRsaKey>,
    {
        let key = match self.key.take() {
            Some(key) => key,
            None => build()?,
        };

        Ok(self.key.insert(key))
    }

    /// Releases the cached key. Returns whether there was one.
    pub fn invalidate(&mut self) -> bool {
        self.key.take().is_some()
    }
}
