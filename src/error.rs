use nomz_ipc::IpcError;

#[derive(Debug, thiserror::Error)]
pub enum SwallowError {
    #[error(
        "`{command}` on container {target} (child {child}, launcher {launcher}) was rejected: {error}"
    )]
    CommandRejected {
        child: i64,
        launcher: i64,
        target: i64,
        command: String,
        error: String,
    },

    #[error(transparent)]
    Ipc(#[from] IpcError),
}

impl SwallowError {
    /// Launcher involved in a rejected command, if the failure got that far
    pub fn launcher(&self) -> Option<i64> {
        match self {
            SwallowError::CommandRejected { launcher, .. } => Some(*launcher),
            SwallowError::Ipc(_) => None,
        }
    }
}
