//! Session configuration.
//!
//! A [`SessionConfig`] is built once by the host and handed to
//! [`ScriptSession::start`](crate::ScriptSession::start). It replaces the
//! usual "mutate the interpreter's module path at startup" step with a
//! plain value the host can inspect and override.
//!
//! # Example
//!
//! ```
//! use scriptbridge::SessionConfig;
//!
//! let config = SessionConfig::default()
//!     .with_search_path("/opt/vis")
//!     .with_startup_module("init");
//!
//! assert_eq!(config.startup_module(), "init");
//! assert_eq!(
//!     config.package_path(),
//!     "/opt/vis/?.lua;/opt/vis/lexers/?.lua;"
//! );
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default name of the user's startup module.
pub const DEFAULT_STARTUP_MODULE: &str = "visrc";

/// Default name of the global root table.
pub const DEFAULT_NAMESPACE: &str = "vis";

/// System-wide script directories, searched after the user's.
const SYSTEM_PATHS: &[&str] = &["/usr/local/share/vis", "/usr/share/vis"];

/// Subdirectory of every search path holding syntax lexers.
const LEXER_DIR: &str = "lexers";

/// Configuration for one scripting session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Script module directories, highest priority first
    search_paths: Vec<PathBuf>,
    /// Module loaded after the session starts
    startup_module: String,
    /// Name of the global root table
    namespace: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            startup_module: DEFAULT_STARTUP_MODULE.to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

impl SessionConfig {
    /// Build a configuration from the process environment.
    ///
    /// Search order:
    /// - `$VIS_PATH`
    /// - `$XDG_CONFIG_HOME/vis`, or `$HOME/.config/vis` if unset
    /// - `/usr/local/share/vis`
    /// - `/usr/share/vis`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Build a configuration using `lookup` to read environment variables.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let mut search_paths = Vec::new();
        if let Some(vis_path) = var("VIS_PATH") {
            search_paths.push(PathBuf::from(vis_path));
        }
        if let Some(xdg) = var("XDG_CONFIG_HOME") {
            search_paths.push(PathBuf::from(xdg).join("vis"));
        } else if let Some(home) = var("HOME") {
            search_paths.push(PathBuf::from(home).join(".config").join("vis"));
        }
        search_paths.extend(SYSTEM_PATHS.iter().copied().map(PathBuf::from));

        Self {
            search_paths,
            ..Self::default()
        }
    }

    /// Append a search directory with the lowest priority so far.
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    /// Replace all search directories.
    pub fn with_search_paths<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the startup module name.
    pub fn with_startup_module(mut self, name: impl Into<String>) -> Self {
        self.startup_module = name.into();
        self
    }

    /// Set the name of the global root table.
    pub fn with_namespace(mut self, name: impl Into<String>) -> Self {
        self.namespace = name.into();
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn startup_module(&self) -> &str {
        &self.startup_module
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Render the search path in `?.lua` template form.
    ///
    /// Each directory contributes `dir/?.lua;dir/lexers/?.lua;`. The result
    /// is meant to be prepended to an interpreter's own search path.
    pub fn package_path(&self) -> String {
        let mut out = String::new();
        for dir in &self.search_paths {
            let dir = dir.display();
            out.push_str(&format!("{dir}/?.lua;{dir}/{LEXER_DIR}/?.lua;"));
        }
        out
    }

    /// Locate a module file by name.
    ///
    /// Returns the first existing `dir/name.lua` or `dir/lexers/name.lua`,
    /// walking the search directories in order.
    pub fn resolve_module(&self, name: &str) -> Option<PathBuf> {
        let file = format!("{name}.lua");
        self.search_paths
            .iter()
            .flat_map(|dir| [dir.join(&file), dir.join(LEXER_DIR).join(&file)])
            .find(|candidate| candidate.is_file())
    }

    /// Locate the startup module.
    pub fn resolve_startup(&self) -> Option<PathBuf> {
        self.resolve_module(&self.startup_module)
    }

    /// Check whether `path` is inside one of the search directories.
    pub fn is_searched(&self, path: &Path) -> bool {
        self.search_paths.iter().any(|dir| path.starts_with(dir))
    }
}
