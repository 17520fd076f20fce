//! Helpers for mutating `ACCESSORGEN_*` environment variables in tests.
//!
//! Each mutation takes a global re-entrant mutex and returns an RAII guard
//! that restores the previous state when dropped. Stacked guards for the same
//! key restore in LIFO order. Use [`lock`] when a test must hold the
//! environment steady across several operations, such as loading layered
//! configuration.
//!
//! # Examples
//!
//! ```
//! use accessorgen_test_helpers::env;
//!
//! let _g = env::set_var("ACCESSORGEN_STRICT", "true");
//! // `ACCESSORGEN_STRICT` is set for the duration of the guard.
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held during restoration.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held during restoration.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// RAII guard that serialises environment access for its lifetime.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvVarLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarLock").finish_non_exhaustive()
    }
}

fn mutate<F>(key: String, mutator: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}

/// Sets an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use accessorgen_test_helpers::env;
/// let _g = env::set_var("ACCESSORGEN_OUT_DIR", "generated");
/// assert!(matches!(std::env::var("ACCESSORGEN_OUT_DIR"), Ok(ref v) if v == "generated"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Removes an environment variable and returns a guard restoring its prior value.
///
/// # Examples
/// ```
/// use accessorgen_test_helpers::env;
/// let _g = env::remove_var("ACCESSORGEN_CACHE");
/// assert!(std::env::var("ACCESSORGEN_CACHE").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Acquires the global environment lock for the lifetime of the guard.
///
/// The lock is re-entrant, so [`set_var`] and [`remove_var`] may be called
/// from the same thread while it is held.
///
/// # Examples
/// ```
/// use accessorgen_test_helpers::env;
///
/// let _lock = env::lock();
/// let _guard = env::set_var("ACCESSORGEN_DRY_RUN", "true");
/// ```
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}
