//! Shared CLI argument types

mod common;
mod global;

pub use common::{OutputFormat, SignupPolicyArg};
pub use global::GlobalOptions;
