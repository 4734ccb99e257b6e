use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("no declaration exists")]
    NoDeclarations,

    #[error("no @grpcGen:Message declaration found")]
    NoRecordMarker,

    #[error("no @grpcGen:Service declaration found")]
    NoProcedureMarker,

    /// Diagnostics of the external schema compiler, unmodified.
    #[error("{0}")]
    Compiler(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
