//! GitLabForm command-line interface.
//!
//! The binary in `main.rs` only parses arguments and sets up logging; the work is done
//! by [`run::execute`] so it can be tested against a mock GitLab server.

pub mod cli;
pub mod errors;
pub mod run;

pub use errors::Error;
