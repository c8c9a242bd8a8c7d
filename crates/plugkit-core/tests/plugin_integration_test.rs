//! Integration tests driving the loader through the calculator plugin.
//!
//! These tests locate the `plugkit-calculator` cdylib in the workspace
//! `target/` directory; build the whole workspace first (`cargo test`
//! from the workspace root does this). When the artifact is absent the
//! artifact-dependent tests skip with a message instead of failing.

use std::path::PathBuf;
use std::sync::Arc;

use plugkit_calculator_api::BoxedCalculator;
use plugkit_core::{LoadScope, Plugin, PluginError};
use serde_json::json;

const ADD_FULL_NAME: &str = "plugkit_calculator::Add";
const SUB_FULL_NAME: &str = "plugkit_calculator::Sub";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Locate the built calculator plugin, trying the configured target
/// directory and then the workspace-root default, debug before release.
fn calculator_plugin_path() -> Option<PathBuf> {
    let lib_name = Plugin::platform_library_name("plugkit_calculator");

    let mut candidates = Vec::new();
    if let Some(dir) = std::env::var_os("CARGO_TARGET_DIR") {
        let dir = PathBuf::from(dir);
        candidates.push(dir.join("debug").join(&lib_name));
        candidates.push(dir.join("release").join(&lib_name));
    }
    let workspace_target = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("target");
    candidates.push(workspace_target.join("debug").join(&lib_name));
    candidates.push(workspace_target.join("release").join(&lib_name));

    candidates.into_iter().find(|p| p.exists())
}

macro_rules! require_plugin {
    () => {
        match calculator_plugin_path() {
            Some(path) => path,
            None => {
                eprintln!("skipping: calculator plugin cdylib not built");
                return;
            }
        }
    };
}

#[test]
fn test_open_plugin() {
    init_tracing();
    let path = require_plugin!();

    let plugin = Plugin::open(&path).unwrap();
    assert!(!plugin.is_disposed());
    assert!(plugin.path().is_absolute());
}

#[test]
fn test_open_missing_plugin_is_not_found() {
    let err = Plugin::open("/nonexistent/libplugkit_calculator.so").unwrap_err();
    assert!(matches!(err, PluginError::NotFound(_)));
}

#[test]
fn test_exported_types_are_finite_and_order_stable() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let names: Vec<String> = plugin
        .exported_types()
        .unwrap()
        .iter()
        .map(|t| t.full_name().to_string())
        .collect();
    assert_eq!(names, vec![ADD_FULL_NAME.to_string()]);

    // Same order on every query within one load.
    let again: Vec<String> = plugin
        .exported_types()
        .unwrap()
        .iter()
        .map(|t| t.full_name().to_string())
        .collect();
    assert_eq!(names, again);
}

#[test]
fn test_find_type_by_full_name() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let ty = plugin.find_type(ADD_FULL_NAME).unwrap().unwrap();
    assert_eq!(ty.full_name(), ADD_FULL_NAME);
    assert!(ty.is_exported());
    assert_eq!(ty.constructor_arities().collect::<Vec<_>>(), vec![0, 1]);

    // An unknown name is an empty result, not an error.
    assert!(plugin.find_type("plugkit_calculator::Missing").unwrap().is_none());
}

#[test]
fn test_find_type_sees_non_exported_types() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let ty = plugin.find_type(SUB_FULL_NAME).unwrap().unwrap();
    assert!(!ty.is_exported());
}

#[test]
fn test_create_instance_by_name() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let calc: BoxedCalculator = plugin.create_instance(ADD_FULL_NAME, &[]).unwrap();
    assert_eq!(calc.calculate(1, 1), 2);
}

#[test]
fn test_create_instance_by_name_with_constructor_args() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let calc: BoxedCalculator = plugin
        .create_instance(ADD_FULL_NAME, &[json!(100)])
        .unwrap();
    assert_eq!(calc.calculate(1, 1), 102);
}

#[test]
fn test_create_instance_of_non_exported_type_by_name() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    // By-name creation reaches all types, exported or not.
    let calc: BoxedCalculator = plugin.create_instance(SUB_FULL_NAME, &[]).unwrap();
    assert_eq!(calc.calculate(5, 3), 2);
}

#[test]
fn test_create_instance_unknown_type_fails() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let err = plugin
        .create_instance::<BoxedCalculator>("std::string::String", &[])
        .err()
        .unwrap();
    assert!(matches!(err, PluginError::CannotCreate(_)));
}

#[test]
fn test_create_instance_wrong_arity_fails() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let err = plugin
        .create_instance::<BoxedCalculator>(ADD_FULL_NAME, &[json!(1), json!(2)])
        .err()
        .unwrap();
    assert!(matches!(err, PluginError::CannotCreate(_)));
}

#[test]
fn test_create_instance_bad_argument_type_fails() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let err = plugin
        .create_instance::<BoxedCalculator>(ADD_FULL_NAME, &[json!("not a number")])
        .err()
        .unwrap();
    assert!(matches!(err, PluginError::CannotCreate(_)));
}

#[test]
fn test_create_instance_wrong_capability_fails() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    // The instance is a calculator; asking for a String must fail the
    // capability check, not panic.
    let err = plugin
        .create_instance::<String>(ADD_FULL_NAME, &[])
        .unwrap_err();
    assert!(matches!(err, PluginError::CannotCreate(_)));
}

#[test]
fn test_create_instance_by_descriptor() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let ty = plugin.find_type(ADD_FULL_NAME).unwrap().unwrap();
    let calc: BoxedCalculator = plugin.create_instance_of(ty, &[]).unwrap();
    assert_eq!(calc.calculate(1, 1), 2);

    let calc: BoxedCalculator = plugin.create_instance_of(ty, &[json!(100)]).unwrap();
    assert_eq!(calc.calculate(1, 1), 102);
}

#[test]
fn test_create_instance_of_foreign_descriptor_fails() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();
    let other = Plugin::open(&path).unwrap();

    // A descriptor from another handle is not a member of this plugin's
    // exported surface, even for the same library on disk.
    let foreign = other.find_type(ADD_FULL_NAME).unwrap().unwrap();
    let err = plugin
        .create_instance_of::<BoxedCalculator>(foreign, &[])
        .err()
        .unwrap();
    assert!(matches!(err, PluginError::CannotCreate(_)));
}

#[test]
fn test_create_instance_of_non_exported_descriptor_fails() {
    let path = require_plugin!();
    let plugin = Plugin::open(&path).unwrap();

    let ty = plugin.find_type(SUB_FULL_NAME).unwrap().unwrap();
    let err = plugin
        .create_instance_of::<BoxedCalculator>(ty, &[])
        .err()
        .unwrap();
    assert!(matches!(err, PluginError::CannotCreate(_)));
}

#[test]
fn test_dispose_is_idempotent() {
    let path = require_plugin!();
    let mut plugin = Plugin::open(&path).unwrap();

    plugin.dispose();
    plugin.dispose();
    assert!(plugin.is_disposed());
}

#[test]
fn test_queries_fail_after_dispose() {
    let path = require_plugin!();
    let mut plugin = Plugin::open(&path).unwrap();
    plugin.dispose();

    assert!(matches!(
        plugin.exported_types().unwrap_err(),
        PluginError::Disposed
    ));
    assert!(matches!(
        plugin.find_type(ADD_FULL_NAME).unwrap_err(),
        PluginError::Disposed
    ));
    assert!(matches!(
        plugin
            .create_instance::<BoxedCalculator>(ADD_FULL_NAME, &[])
            .err()
            .unwrap(),
        PluginError::Disposed
    ));
}

#[test]
fn test_caller_supplied_scope_is_revoked_on_dispose() {
    init_tracing();
    let path = require_plugin!();

    let scope = LoadScope::new().unwrap().into_shared();
    let mut plugin = Plugin::open_in(&path, Arc::clone(&scope)).unwrap();

    let calc: BoxedCalculator = plugin.create_instance(ADD_FULL_NAME, &[]).unwrap();
    assert_eq!(calc.calculate(2, 3), 5);
    drop(calc);

    plugin.dispose();
    assert!(scope.lock().is_revoked());
}
