//! Startup configuration
//!
//! Everything comes from the command line and the session environment:
//! launcher app ids are positional arguments, the socket is whatever the
//! window manager exported.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// Default procfs mount
const PROC_ROOT: &str = "/proc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// App ids whose windows may be swallowed, in the order given
    pub launchers: Vec<String>,
    /// Window manager IPC socket
    pub socket: PathBuf,
    /// procfs mount used for the ancestry walk (`NOMZ_PROC_ROOT`)
    pub proc_root: PathBuf,
}

impl Config {
    /// Build the configuration from `argv` and the environment
    pub fn from_env() -> Result<Self> {
        let socket = nomz_ipc::socket_path().context("Cannot locate window manager socket")?;
        let proc_root = std::env::var_os("NOMZ_PROC_ROOT").map(PathBuf::from);
        let config = Self::new(std::env::args().skip(1), socket, proc_root);
        debug!("Config: {:?}", config);
        Ok(config)
    }

    pub fn new(
        args: impl IntoIterator<Item = String>,
        socket: PathBuf,
        proc_root: Option<PathBuf>,
    ) -> Self {
        Self {
            launchers: args.into_iter().filter(|arg| !arg.is_empty()).collect(),
            socket,
            proc_root: proc_root.unwrap_or_else(|| PathBuf::from(PROC_ROOT)),
        }
    }
}
