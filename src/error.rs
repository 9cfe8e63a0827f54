use std::path::PathBuf;
use thiserror::Error;

#[derive(Error,Debug)]
pub enum Error {
    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("Can not read template '{}'", .0.display())]
    TemplateAccess(PathBuf, #[source] std::io::Error),

    #[error("Template '{0:}' not found")]
    TemplateNotFound(String),

    #[error("Lua error: {0:}")]
    LuaError(#[from] mlua::Error),

    #[error("No signals supplied")]
    NoSignals,

    #[error("Degenerate waveform: signal '{0:}' has no samples")]
    DegenerateWaveform(String),

    #[error("'{0:}' is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("Signal '{0:}' has invalid width {1:}, must be at least 1")]
    InvalidWidth(String, u32),

    #[error("Signal '{0:}' has invalid length {1:}, must be at least 1")]
    InvalidLength(String, usize),

    #[error("Signal '{0:}': can not interpret '{1:}' as a non-negative sample value")]
    InvalidSample(String, String),

    #[error("Missing argument '{0:}': {1:}")]
    MissingArgument(String, String),
}

pub type Result<T> = std::result::Result<T, Error>;
