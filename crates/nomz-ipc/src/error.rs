pub type Result<T> = std::result::Result<T, IpcError>;

#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("neither SWAYSOCK nor I3SOCK is set")]
    NoSocket,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply did not start with the i3-ipc magic")]
    BadMagic,

    #[error("expected reply of type {expected}, got {got}")]
    UnexpectedReply { expected: u32, got: u32 },

    #[error("window manager rejected subscription to {0:?}")]
    SubscribeRejected(Vec<&'static str>),
}
