//! Export macro for plugin crates.

/// Generate the manifest entry point for a plugin.
///
/// Expands to a `#[no_mangle] extern "C"` function named
/// `plugkit_manifest` that evaluates the given expression to a
/// [`TypeManifest`](crate::manifest::TypeManifest) and leaks it to the
/// caller via `Box::into_raw`. The host takes ownership of the box.
///
/// # Example
///
/// ```ignore
/// plugkit_sdk::export_manifest! {
///     TypeManifest::new().with_type(
///         TypeExport::new("my_plugin::Widget")
///             .with_constructor(Constructor::new(0, make_widget)),
///     )
/// }
/// ```
#[macro_export]
macro_rules! export_manifest {
    ($manifest:expr) => {
        #[no_mangle]
        pub extern "C" fn plugkit_manifest() -> *mut $crate::manifest::TypeManifest {
            let manifest: $crate::manifest::TypeManifest = $manifest;
            Box::into_raw(Box::new(manifest))
        }
    };
}
