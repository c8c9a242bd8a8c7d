//! plugkit-core
//!
//! A minimal dynamic-plugin loader: load a compiled shared library into an
//! isolated, revocable [`LoadScope`], enumerate the types it registers,
//! and construct instances by name or by descriptor, checked against a
//! caller-supplied capability contract.
//!
//! Plugins are ordinary `cdylib` crates built with `plugkit-sdk`, which
//! generates the manifest entry point the loader resolves at load time.
//!
//! # Example
//!
//! ```ignore
//! use plugkit_core::Plugin;
//!
//! let name = Plugin::platform_library_name("my_plugin");
//! let mut plugin = Plugin::open(format!("plugins/{name}"))?;
//!
//! let widget: Box<dyn Widget> =
//!     plugin.create_instance("my_plugin::Widget", &[])?;
//!
//! plugin.dispose();
//! ```
//!
//! Ownership is a single-owner tree - handle, scope, libraries, types -
//! unless the caller explicitly shares a scope via [`Plugin::open_in`].

mod descriptor;
mod error;
mod plugin;
mod scope;

pub use descriptor::TypeDescriptor;
pub use error::{PluginError, Result};
pub use plugin::Plugin;
pub use scope::{LibraryToken, LoadScope, SharedScope};
