use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;
use crate::error::GenError;

/// How the external schema compiler is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocConfig {
    pub program: PathBuf,
    /// Value placed before the output directory in `--go_out=<go_out>:<dir>`.
    pub go_out:  String,
}

impl Default for ProtocConfig {
    fn default() -> Self {
        ProtocConfig {
            program: PathBuf::from("protoc"),
            go_out:  "plugins=grpc".to_string(),
        }
    }
}

fn document_dir(document: &Path) -> &Path {
    match document.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Arguments for compiling `document`, using its directory both as include
/// path and as output directory.
pub fn protoc_args(config: &ProtocConfig, document: &Path) -> Vec<OsString> {
    let dir = document_dir(document);
    vec![
        OsString::from("-I"),
        dir.as_os_str().to_owned(),
        document.as_os_str().to_owned(),
        OsString::from(format!("--go_out={}:{}", config.go_out, dir.display())),
    ]
}

/// Runs the schema compiler and waits for it. A non-zero exit is returned as
/// [`GenError::Compiler`] carrying the compiler's stderr as is.
pub fn run_protoc(config: &ProtocConfig, document: &Path) -> Result<(), GenError> {
    let args = protoc_args(config, document);
    debug!(program = %config.program.display(), ?args, "running schema compiler");

    let output = Command::new(&config.program).args(&args).output()?;
    if !output.status.success() {
        return Err(GenError::Compiler(String::from_utf8_lossy(&output.stderr).into_owned()));
    }
    Ok(())
}
