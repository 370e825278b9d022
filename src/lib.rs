//! Parse `.env` files and load them into an environment without overriding
//! variables that are already set.
//!
//! [`EnvLoader::load`] against the default in-memory [`TargetEnv`] is the
//! safe entry point and leaves the process untouched.
//!
//! Convenience loaders (`dotenv`, `from_filename`, `from_path`, `from_paths`)
//! mutate the process environment and are `unsafe`, because callers must
//! guarantee no concurrent process-environment access. The `read` family is
//! safe: it returns the merged map instead of writing anything.

mod env;
mod error;
mod loader;
mod model;
mod parser;

pub use env::TargetEnv;
pub use error::{Error, ParseError};
pub use loader::{
    EnvLoader, dotenv, from_filename, from_path, from_paths, read, read_from_path, read_from_paths,
};
pub use model::LoadReport;
pub use parser::{is_ignored_line, parse_line, parse_str};
