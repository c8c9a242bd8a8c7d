//! Type manifest exported by plugins.
//!
//! Rust has no runtime reflection, so a plugin declares its constructible
//! types up front: the shared library exports a [`MANIFEST_SYMBOL`] entry
//! point returning a heap-allocated [`TypeManifest`]. The host takes
//! ownership of the returned box and copies the manifest into its own
//! records.
//!
//! The manifest is plain Rust data behind an opaque pointer, so host and
//! plugin must be built by the same toolchain. [`MANIFEST_ABI_VERSION`]
//! guards against loading a manifest with an incompatible shape.

use std::any::Any;

use serde_json::Value;

use crate::error::ConstructError;

/// Current manifest ABI version. Checked by the host at load time.
pub const MANIFEST_ABI_VERSION: u32 = 1;

/// Symbol name of the manifest entry point every plugin must export.
pub const MANIFEST_SYMBOL: &[u8] = b"plugkit_manifest";

/// A constructed plugin instance, opaque to the loader.
///
/// The concrete value is whatever the constructor boxed (usually a boxed
/// capability trait object); the host recovers it with a downcast.
pub type BoxedInstance = Box<dyn Any + Send + Sync>;

/// Signature of a registered constructor.
pub type ConstructFn = fn(&[Value]) -> Result<BoxedInstance, ConstructError>;

/// Signature of the manifest entry point.
///
/// The returned pointer is `Box::into_raw` of a [`TypeManifest`]; the
/// caller assumes ownership.
pub type ManifestFn = unsafe extern "C" fn() -> *mut TypeManifest;

/// One public constructor of a registered type.
#[derive(Debug, Clone, Copy)]
pub struct Constructor {
    /// Number of arguments this constructor accepts.
    pub arity: usize,

    /// Construction function. Receives exactly `arity` arguments.
    pub construct: ConstructFn,
}

impl Constructor {
    /// Create a constructor entry.
    pub fn new(arity: usize, construct: ConstructFn) -> Self {
        Self { arity, construct }
    }
}

/// One type registered by a plugin.
#[derive(Debug, Clone)]
pub struct TypeExport {
    /// Fully qualified type name, e.g. `my_plugin::Widget`.
    pub full_name: &'static str,

    /// Whether the type is part of the plugin's public surface.
    ///
    /// Non-exported types stay visible to by-name lookup but are excluded
    /// from the exported-type listing.
    pub exported: bool,

    /// Public constructors, in declaration order.
    pub constructors: Vec<Constructor>,
}

impl TypeExport {
    /// Create an exported type entry with no constructors.
    pub fn new(full_name: &'static str) -> Self {
        Self {
            full_name,
            exported: true,
            constructors: Vec::new(),
        }
    }

    /// Set the export visibility.
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Add a constructor.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }
}

/// The manifest a plugin hands to the host at load time.
#[derive(Debug, Clone)]
pub struct TypeManifest {
    /// ABI version - must match [`MANIFEST_ABI_VERSION`].
    pub abi_version: u32,

    /// Registered types, in declaration order.
    pub types: Vec<TypeExport>,
}

impl TypeManifest {
    /// Create an empty manifest at the current ABI version.
    pub fn new() -> Self {
        Self {
            abi_version: MANIFEST_ABI_VERSION,
            types: Vec::new(),
        }
    }

    /// Add a type entry.
    pub fn with_type(mut self, export: TypeExport) -> Self {
        self.types.push(export);
        self
    }
}

impl Default for TypeManifest {
    fn default() -> Self {
        Self::new()
    }
}
