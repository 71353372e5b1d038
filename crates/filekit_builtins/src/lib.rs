//! Collection of built-in commands re-exported for convenient linking.

pub mod common;

pub use common::logging;
pub use common::{BuiltinError, BuiltinResult};

#[cfg(unix)]
pub mod ls;

#[cfg(unix)]
pub use ls::ls_cli as ls;
