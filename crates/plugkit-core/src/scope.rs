//! Revocable load scopes for shared libraries.
//!
//! A [`LoadScope`] is the unit of isolation and revocation: one plugin
//! library (plus any dependents the caller loads alongside it) lives in
//! one scope, and revoking the scope asks the platform loader to release
//! everything it holds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use parking_lot::Mutex;

use crate::error::{PluginError, Result};

/// A load scope shareable between a plugin handle and its creator.
pub type SharedScope = Arc<Mutex<LoadScope>>;

/// Opaque handle to a library loaded into a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryToken(usize);

/// An isolated, revocable scope owning loaded shared libraries.
///
/// Every scope is collectible: [`LoadScope::revoke`] drops the loaded
/// libraries, which instructs the platform loader to unmap them. Unload
/// is best-effort; code stays mapped while instances constructed from the
/// scope are still alive, so callers must drop instances before revoking.
pub struct LoadScope {
    /// Loaded library handles, kept alive until revocation.
    libraries: Vec<Library>,
    revoked: bool,
}

impl LoadScope {
    /// Create a new isolated, revocable scope.
    ///
    /// Failure here means the host environment cannot support dynamic
    /// loading at all and is not part of normal control flow.
    pub fn new() -> Result<Self> {
        Ok(Self {
            libraries: Vec::new(),
            revoked: false,
        })
    }

    /// Load the shared library at `path` into this scope.
    ///
    /// Fails with [`PluginError::NotFound`] when the path does not name an
    /// existing file and with [`PluginError::Revoked`] after revocation.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LibraryToken> {
        if self.revoked {
            return Err(PluginError::Revoked);
        }

        let path = path.as_ref();
        if !path.is_file() {
            return Err(PluginError::NotFound(path.display().to_string()));
        }

        // SAFETY: loading foreign code is inherently unsafe; the caller
        // vouches for the library by supplying its path.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            PluginError::InvalidManifest(format!(
                "failed to load library {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), "loaded shared library into scope");

        self.libraries.push(library);
        Ok(LibraryToken(self.libraries.len() - 1))
    }

    /// Resolve a symbol inside a previously loaded library.
    pub fn get<'a, T>(
        &'a self,
        token: LibraryToken,
        symbol: &[u8],
    ) -> Result<libloading::Symbol<'a, T>> {
        if self.revoked {
            return Err(PluginError::Revoked);
        }

        let library = self
            .libraries
            .get(token.0)
            .ok_or_else(|| PluginError::Environment(format!("stale library token {}", token.0)))?;

        // SAFETY: the caller supplies the expected symbol signature.
        unsafe { library.get(symbol) }.map_err(|e| {
            PluginError::InvalidManifest(format!(
                "missing symbol {}: {}",
                String::from_utf8_lossy(symbol),
                e
            ))
        })
    }

    /// Private dependency-resolution hook.
    ///
    /// Deliberately declines to resolve anything, deferring entirely to
    /// the platform loader's default search. Plugins may therefore only
    /// depend on libraries the host can already resolve (co-located or
    /// globally registered), not on sibling libraries private to the
    /// scope.
    pub fn resolve_dependency(&self, _name: &str) -> Option<PathBuf> {
        None
    }

    /// Revoke the scope, releasing every loaded library.
    ///
    /// Idempotent. After revocation the scope can load no further
    /// libraries and no symbols can be resolved through it.
    pub fn revoke(&mut self) {
        if self.revoked {
            return;
        }
        self.revoked = true;

        // Dropping each Library asks the platform loader to release it.
        let count = self.libraries.len();
        self.libraries.clear();

        tracing::debug!(libraries = count, "load scope revoked");
    }

    /// Whether this scope has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Wrap the scope for sharing with a plugin handle.
    pub fn into_shared(self) -> SharedScope {
        Arc::new(Mutex::new(self))
    }
}
