use splitzy_application::{ScriptParseError, ScriptRunError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Usage: splitzy-interpreter <file>")]
    Usage,
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ScriptParseError),
    #[error(transparent)]
    Run(#[from] ScriptRunError),
}
