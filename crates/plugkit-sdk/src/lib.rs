//! plugkit SDK
//!
//! Types and macros for building plugins loadable by `plugkit-core`.
//!
//! A plugin is a shared library exporting a single C ABI entry point,
//! [`MANIFEST_SYMBOL`], that returns a [`TypeManifest`]: a statically
//! declared list of the types the plugin makes constructible, each with
//! its fully qualified name, export visibility, and public constructors.
//! The [`export_manifest!`] macro generates the entry point.
//!
//! # Quick start
//!
//! ```ignore
//! use plugkit_sdk::manifest::{Constructor, TypeExport, TypeManifest};
//!
//! fn make_widget(_args: &[serde_json::Value])
//!     -> Result<plugkit_sdk::manifest::BoxedInstance, plugkit_sdk::error::ConstructError>
//! {
//!     Ok(plugkit_sdk::instance(Widget::default()))
//! }
//!
//! plugkit_sdk::export_manifest! {
//!     TypeManifest::new().with_type(
//!         TypeExport::new("my_plugin::Widget")
//!             .with_constructor(Constructor::new(0, make_widget)),
//!     )
//! }
//! ```

pub mod args;
pub mod error;
#[macro_use]
pub mod macros;
pub mod manifest;

pub use error::{ConstructError, ConstructResult};
pub use manifest::{
    BoxedInstance, Constructor, ManifestFn, TypeExport, TypeManifest, MANIFEST_ABI_VERSION,
    MANIFEST_SYMBOL,
};

/// Box a constructed value as an opaque instance for the host.
///
/// The host recovers the value by downcasting to the exact type `T`, so
/// plugins and hosts must agree on `T` through a shared capability crate
/// (typically `T` is a boxed trait object such as `Box<dyn Calculator>`).
pub fn instance<T: std::any::Any + Send + Sync>(value: T) -> BoxedInstance {
    Box::new(value)
}

/// Prelude module with common imports for plugin crates.
pub mod prelude {
    pub use crate::args;
    pub use crate::error::{ConstructError, ConstructResult};
    pub use crate::instance;
    pub use crate::manifest::{
        BoxedInstance, Constructor, TypeExport, TypeManifest, MANIFEST_ABI_VERSION,
    };
    pub use serde_json::Value;
}
