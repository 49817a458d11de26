//! Shebang parsing and executable resolution for prehook
//!
//! Hook scripts declare their interpreter in many ways: an absolute path,
//! `/usr/bin/env python`, or not at all for native binaries. This crate
//! turns a hook's command into one that can be spawned directly:
//!
//! - [`parse_reader`] / [`parse_file`] read and tokenize a `#!` line
//! - [`Resolver::normalize_exe`] maps a bare name to a path using the search path
//! - [`Resolver::normalize_command`] resolves, reads the shebang, and resolves again
//!
//! # Example
//!
//! ```no_run
//! use prehook_shebang::{Command, Resolver};
//!
//! let resolver = Resolver::from_env()?;
//! let cmd = resolver.normalize_command(&Command::new("my-hook", ["--check"]))?;
//! // e.g. ["/usr/bin/python3", "/home/me/bin/my-hook", "--check"]
//! println!("{cmd}");
//! # Ok::<(), prehook_shebang::Error>(())
//! ```
//!
//! The search path is captured when a [`Resolver`] is built, so lookups can
//! be pointed at any directory list without touching the process environment.

mod command;
mod error;
mod normalize;
mod resolver;
pub mod shebang;

pub use command::Command;
pub use error::{Error, Result};
pub use normalize::{normalize_command, normalize_exe};
pub use resolver::{Resolver, ResolverConfig};
pub use shebang::{parse_bytes, parse_file, parse_reader};
