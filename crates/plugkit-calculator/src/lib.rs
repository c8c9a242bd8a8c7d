//! Sample calculator plugin.
//!
//! Registers two types:
//!
//! - `plugkit_calculator::Add` (exported) - adds its two operands plus an
//!   offset `i0` supplied through the single-argument constructor
//!   (default `0`).
//! - `plugkit_calculator::Sub` (not exported) - subtracts the second
//!   operand from the first; visible to by-name lookup only.
//!
//! Built as a `cdylib` for the loader integration tests and as an `rlib`
//! so the registration code is unit-testable in-process.

use plugkit_calculator_api::{BoxedCalculator, Calculator};
use plugkit_sdk::manifest::{BoxedInstance, Constructor, TypeExport, TypeManifest};
use plugkit_sdk::{args, instance, ConstructError};
use serde_json::Value;

/// Adds two integers plus a fixed offset.
pub struct Add {
    i0: i64,
}

impl Add {
    /// Create an adder with the given offset.
    pub fn new(i0: i64) -> Self {
        Self { i0 }
    }
}

impl Default for Add {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Calculator for Add {
    fn calculate(&self, i1: i64, i2: i64) -> i64 {
        self.i0 + i1 + i2
    }
}

/// Subtracts the second integer from the first. Not exported.
pub struct Sub;

impl Calculator for Sub {
    fn calculate(&self, i1: i64, i2: i64) -> i64 {
        i1 - i2
    }
}

fn construct_add_default(_args: &[Value]) -> Result<BoxedInstance, ConstructError> {
    Ok(instance(Box::new(Add::default()) as BoxedCalculator))
}

fn construct_add_with_offset(args: &[Value]) -> Result<BoxedInstance, ConstructError> {
    let i0 = args::arg_i64(args, 0)?;
    Ok(instance(Box::new(Add::new(i0)) as BoxedCalculator))
}

fn construct_sub(_args: &[Value]) -> Result<BoxedInstance, ConstructError> {
    Ok(instance(Box::new(Sub) as BoxedCalculator))
}

/// Build the manifest this plugin hands to the loader.
pub fn manifest() -> TypeManifest {
    TypeManifest::new()
        .with_type(
            TypeExport::new("plugkit_calculator::Add")
                .with_constructor(Constructor::new(0, construct_add_default))
                .with_constructor(Constructor::new(1, construct_add_with_offset)),
        )
        .with_type(
            TypeExport::new("plugkit_calculator::Sub")
                .with_exported(false)
                .with_constructor(Constructor::new(0, construct_sub)),
        )
}

plugkit_sdk::export_manifest!(crate::manifest());
