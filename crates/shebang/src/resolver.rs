//! Executable resolution against an explicit search path

use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Search-path configuration for resolving bare executable names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Directories to search, in `PATH` format. `None` finds nothing.
    pub search_path: Option<OsString>,
    /// Directory that relative search-path entries are resolved against.
    /// Defaults to the process working directory.
    pub cwd: Option<PathBuf>,
}

impl ResolverConfig {
    /// Capture `PATH` from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
            cwd: None,
        }
    }

    /// Use the given search path instead of the inherited one
    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Resolve relative search-path entries against `cwd`
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Resolves executable references to paths.
///
/// The search path is captured when the resolver is built; later changes to
/// the process environment do not affect lookups.
#[derive(Debug, Clone)]
pub struct Resolver {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl Resolver {
    /// Build a resolver, filling in the working directory if the config has none
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let cwd = match config.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()
                .map_err(|e| Error::io(e, None, "read current directory"))?,
        };

        Ok(Self {
            search_path: config.search_path,
            cwd,
        })
    }

    /// Build a resolver from the process `PATH` and working directory
    pub fn from_env() -> Result<Self> {
        Self::new(ResolverConfig::from_env())
    }

    /// The search path used for lookups
    #[must_use]
    pub fn search_path(&self) -> Option<&OsStr> {
        self.search_path.as_deref()
    }

    /// The directory relative search-path entries are resolved against
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a single executable reference.
    ///
    /// References containing a path separator are returned unchanged, whether
    /// or not they exist. Bare names are looked up on the search path.
    pub fn normalize_exe(&self, exe: &str) -> Result<String> {
        if exe.contains(std::path::is_separator) {
            return Ok(exe.to_string());
        }

        let found = which::which_in(exe, self.search_path.as_ref(), &self.cwd).map_err(|e| {
            debug!(exe, error = %e, "executable lookup failed");
            Error::executable_not_found(exe)
        })?;

        let resolved = found
            .into_os_string()
            .into_string()
            .map_err(|path| Error::NonUtf8Path { path: path.into() })?;
        debug!(exe, resolved = %resolved, "resolved executable");
        Ok(resolved)
    }
}
