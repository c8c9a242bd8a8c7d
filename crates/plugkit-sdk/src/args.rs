//! Decoding helpers for constructor arguments.
//!
//! Constructor arguments cross the plugin boundary as `serde_json::Value`
//! slices; these helpers extract typed values with uniform errors.

use serde_json::Value;

use crate::error::ConstructError;

/// Extract a required integer argument.
pub fn arg_i64(args: &[Value], index: usize) -> Result<i64, ConstructError> {
    args.get(index)
        .and_then(Value::as_i64)
        .ok_or(ConstructError::InvalidArgument {
            index,
            expected: "integer",
        })
}

/// Extract an optional integer argument, falling back to a default.
pub fn arg_i64_or(args: &[Value], index: usize, default: i64) -> i64 {
    args.get(index).and_then(Value::as_i64).unwrap_or(default)
}

/// Extract a required string argument.
pub fn arg_str<'a>(args: &'a [Value], index: usize) -> Result<&'a str, ConstructError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or(ConstructError::InvalidArgument {
            index,
            expected: "string",
        })
}

/// Extract a required boolean argument.
pub fn arg_bool(args: &[Value], index: usize) -> Result<bool, ConstructError> {
    args.get(index)
        .and_then(Value::as_bool)
        .ok_or(ConstructError::InvalidArgument {
            index,
            expected: "boolean",
        })
}
