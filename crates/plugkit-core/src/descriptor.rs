//! Host-owned type descriptors parsed from a plugin manifest.

use plugkit_sdk::manifest::{
    BoxedInstance, Constructor, TypeManifest, MANIFEST_ABI_VERSION,
};
use serde_json::Value;

use crate::error::{PluginError, Result};

/// A named, constructible type inside a loaded plugin.
///
/// The name is copied into host memory at load time; the constructor
/// function pointers still point into the plugin's code, so a descriptor
/// must never outlive its plugin's load scope.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    full_name: String,
    exported: bool,
    constructors: Vec<Constructor>,
}

impl TypeDescriptor {
    /// Fully qualified type name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Whether the type is part of the plugin's public surface.
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Arities of the type's public constructors, in declaration order.
    pub fn constructor_arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.constructors.iter().map(|c| c.arity)
    }

    /// Invoke the public constructor matching the argument count.
    pub(crate) fn construct(&self, args: &[Value]) -> Result<BoxedInstance> {
        let constructor = self
            .constructors
            .iter()
            .find(|c| c.arity == args.len())
            .ok_or_else(|| {
                PluginError::CannotCreate(format!(
                    "`{}` has no public constructor taking {} argument(s)",
                    self.full_name,
                    args.len()
                ))
            })?;

        (constructor.construct)(args).map_err(|e| {
            PluginError::CannotCreate(format!(
                "constructor of `{}` rejected its arguments: {}",
                self.full_name, e
            ))
        })
    }
}

/// Validate a manifest and copy it into host-owned descriptors.
pub(crate) fn parse_manifest(manifest: TypeManifest) -> Result<Vec<TypeDescriptor>> {
    if manifest.abi_version != MANIFEST_ABI_VERSION {
        return Err(PluginError::InvalidManifest(format!(
            "ABI version mismatch: expected {}, found {}",
            MANIFEST_ABI_VERSION, manifest.abi_version
        )));
    }

    Ok(manifest
        .types
        .into_iter()
        .map(|export| TypeDescriptor {
            full_name: export.full_name.to_string(),
            exported: export.exported,
            constructors: export.constructors,
        })
        .collect())
}
