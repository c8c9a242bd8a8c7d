//! The caller-facing plugin handle.

use std::any::Any;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use plugkit_sdk::manifest::{ManifestFn, MANIFEST_SYMBOL};
use serde_json::Value;

use crate::descriptor::{parse_manifest, TypeDescriptor};
use crate::error::{PluginError, Result};
use crate::scope::{LoadScope, SharedScope};

/// A handle to one loaded plugin library.
///
/// The handle owns a revocable [`LoadScope`] holding the library. It has
/// exactly two states - open and disposed - with a single one-way
/// transition: [`Plugin::dispose`] (or [`Drop`]) revokes the scope, after
/// which every query fails with [`PluginError::Disposed`].
///
/// A handle is not safe for concurrent use; the internal lock only makes
/// a disposal racing a query fail cleanly when a scope is shared.
pub struct Plugin {
    scope: SharedScope,
    types: Vec<TypeDescriptor>,
    path: PathBuf,
    loaded_at: DateTime<Utc>,
    disposed: bool,
}

impl Plugin {
    /// Open the plugin library at `path` in a fresh load scope.
    ///
    /// The library is loaded synchronously and its type manifest read
    /// before this returns. A missing file fails with
    /// [`PluginError::NotFound`]; a file that is not a valid plugin fails
    /// with [`PluginError::InvalidManifest`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let scope = LoadScope::new()?;
        Self::open_in(path, scope.into_shared())
    }

    /// Open the plugin library at `path` in a caller-supplied scope.
    ///
    /// The scope may be shared with other handles, but this handle will
    /// still revoke it on disposal; coordinating shared lifetimes is the
    /// caller's concern.
    pub fn open_in(path: impl AsRef<Path>, scope: SharedScope) -> Result<Self> {
        let path = path.as_ref();
        let path = path
            .canonicalize()
            .map_err(|_| PluginError::NotFound(path.display().to_string()))?;

        let manifest = {
            let mut guard = scope.lock();
            let token = guard.load(&path)?;
            let entry: libloading::Symbol<'_, ManifestFn> = guard.get(token, MANIFEST_SYMBOL)?;

            // SAFETY: the entry point hands over ownership of a boxed
            // manifest allocated inside the plugin; both sides are built
            // by the same toolchain (enforced via the ABI version below).
            let raw = unsafe { entry() };
            if raw.is_null() {
                return Err(PluginError::InvalidManifest(
                    "manifest entry point returned null".to_string(),
                ));
            }
            *unsafe { Box::from_raw(raw) }
        };

        let types = parse_manifest(manifest)?;

        tracing::info!(
            path = %path.display(),
            types = types.len(),
            "plugin loaded"
        );

        Ok(Self {
            scope,
            types,
            path,
            loaded_at: Utc::now(),
            disposed: false,
        })
    }

    /// The publicly exported types of the plugin, in manifest declaration
    /// order.
    ///
    /// The order is stable within a single load but otherwise
    /// implementation-defined; callers must not assume it is sorted.
    pub fn exported_types(&self) -> Result<Vec<&TypeDescriptor>> {
        self.ensure_open()?;
        Ok(self.types.iter().filter(|t| t.is_exported()).collect())
    }

    /// Look up a type by fully qualified name among *all* manifest types,
    /// exported or not.
    ///
    /// This is a query, not an assertion: an unknown name is `Ok(None)`.
    pub fn find_type(&self, full_name: &str) -> Result<Option<&TypeDescriptor>> {
        self.ensure_open()?;
        Ok(self.types.iter().find(|t| t.full_name() == full_name))
    }

    /// Create an instance of a plugin type by fully qualified name.
    ///
    /// Resolves the type, invokes the public constructor matching the
    /// argument count, and checks the result against the requested
    /// capability `T` (typically a boxed trait object from a shared
    /// contract crate). Any failure along that path is
    /// [`PluginError::CannotCreate`].
    pub fn create_instance<T: Any>(&self, full_name: &str, args: &[Value]) -> Result<T> {
        self.ensure_open()?;
        let ty = self.find_type(full_name)?.ok_or_else(|| {
            PluginError::CannotCreate(format!("type not found in plugin: {full_name}"))
        })?;
        self.construct(ty, args)
    }

    /// Create an instance from a type descriptor.
    ///
    /// Unlike the by-name form this only constructs members of
    /// [`Plugin::exported_types`], guarding against descriptors taken
    /// from a different plugin or fabricated by the host.
    pub fn create_instance_of<T: Any>(&self, ty: &TypeDescriptor, args: &[Value]) -> Result<T> {
        self.ensure_open()?;

        let is_member = self
            .types
            .iter()
            .filter(|t| t.is_exported())
            .any(|t| std::ptr::eq(t, ty));
        if !is_member {
            return Err(PluginError::CannotCreate(format!(
                "`{}` is not an exported type of this plugin",
                ty.full_name()
            )));
        }

        self.construct(ty, args)
    }

    /// Dispose of the handle, revoking the owned load scope.
    ///
    /// Idempotent: the first call revokes, subsequent calls are no-ops.
    /// Instances created by this handle must be dropped first; the
    /// platform loader keeps the library mapped while they are alive.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.scope.lock().revoke();

        tracing::info!(path = %self.path.display(), "plugin disposed");
    }

    /// Whether this handle has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Absolute path of the loaded library.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the library was loaded.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Map a logical plugin name to the host platform's shared-library
    /// filename convention.
    ///
    /// Windows: `Foo.dll`; macOS: `libFoo.dylib`; other Unix:
    /// `libFoo.so`. The input name is used verbatim, with no case or path
    /// handling.
    pub fn platform_library_name(logical_name: &str) -> String {
        let (prefix, suffix) = match std::env::consts::OS {
            "windows" => ("", ".dll"),
            "macos" | "ios" => ("lib", ".dylib"),
            _ => ("lib", ".so"),
        };
        format!("{prefix}{logical_name}{suffix}")
    }

    fn ensure_open(&self) -> Result<()> {
        if self.disposed {
            return Err(PluginError::Disposed);
        }
        if self.scope.lock().is_revoked() {
            return Err(PluginError::Revoked);
        }
        Ok(())
    }

    fn construct<T: Any>(&self, ty: &TypeDescriptor, args: &[Value]) -> Result<T> {
        let instance = ty.construct(args)?;
        tracing::debug!(full_name = ty.full_name(), args = args.len(), "instance created");

        instance.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            PluginError::CannotCreate(format!(
                "instance of `{}` does not satisfy the requested capability",
                ty.full_name()
            ))
        })
    }
}

impl Drop for Plugin {
    fn drop(&mut self) {
        // Deterministic safety net for callers that forget to dispose.
        self.dispose();
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("path", &self.path)
            .field("types", &self.types.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_not_found() {
        let err = Plugin::open("/nonexistent/libplugin.so").unwrap_err();
        assert!(matches!(err, PluginError::NotFound(_)));
    }

    #[test]
    fn test_open_non_library_file_is_invalid() {
        let path = std::env::temp_dir().join("plugkit_not_a_library.so");
        std::fs::write(&path, b"not a shared library").unwrap();

        let err = Plugin::open(&path).unwrap_err();
        assert!(matches!(err, PluginError::InvalidManifest(_)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_platform_library_name() {
        let name = Plugin::platform_library_name("Foo");

        #[cfg(target_os = "windows")]
        assert_eq!(name, "Foo.dll");

        #[cfg(target_os = "macos")]
        assert_eq!(name, "libFoo.dylib");

        #[cfg(all(unix, not(target_os = "macos")))]
        assert_eq!(name, "libFoo.so");
    }

    #[test]
    fn test_platform_library_name_is_verbatim() {
        // No case changes, no path handling.
        let name = Plugin::platform_library_name("MiXeD_case");
        assert!(name.contains("MiXeD_case"));
    }
}
