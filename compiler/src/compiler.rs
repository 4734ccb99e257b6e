use std::{
    fs,
    path::{Path, PathBuf},
};
use grpc_gen_schema::SchemaModel;
use tracing::info;
use crate::{
    assembler::assemble,
    config::GenConfig,
    error::GenError,
    gen_proto::render_proto,
    parser::parse_source,
    protoc::run_protoc,
    rewrite::rewrite_source,
    tokenizer::tokenize_source,
    translate::translate_model,
};

pub const SOURCE_EXTENSION: &str = "go";
pub const DOCUMENT_SUFFIX: &str = "go.proto";

/// Compile Go source text into `(SchemaModel, proto document)`.
/// Returns `Err(GenError)` if tokenization/parsing/extraction fails.
pub fn compile_source(text: &str) -> Result<(SchemaModel, String), GenError> {
    let lexed = tokenize_source(text)?;
    let file = parse_source(&lexed)?;
    let mut model = assemble(&file)?;
    translate_model(&mut model);
    let document = render_proto(&model);
    Ok((model, document))
}

/// Checks that `input` names a Go file.
pub fn validate_input(input: &Path) -> Result<(), GenError> {
    if input.as_os_str().is_empty() {
        return Err(GenError::InvalidInput("empty input path".to_string()));
    }
    if input.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
        return Err(GenError::InvalidInput(format!(
            "path {} doesn't have .{} extension",
            input.display(),
            SOURCE_EXTENSION
        )));
    }
    Ok(())
}

/// `dir/name.go` → `dir/<subdir>/name.go.proto`.
pub fn output_path(input: &Path, subdir: &str) -> Result<PathBuf, GenError> {
    validate_input(input)?;
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| GenError::InvalidInput(format!("path {} has no file name", input.display())))?;
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(subdir).join(format!("{}.{}", stem, DOCUMENT_SUFFIX)))
}

/// Writes the document, replacing any previous file and creating the
/// directory if needed.
pub fn write_document(path: &Path, document: &str) -> Result<(), GenError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    if path.exists() {
        fs::remove_file(path)?;
    }
    fs::write(path, document)?;
    Ok(())
}

/// Runs the whole pipeline for one input file and returns the document path.
pub fn generate_file(input: &Path, config: &GenConfig) -> Result<PathBuf, GenError> {
    let out_path = output_path(input, &config.output_subdir)?;
    let text = fs::read_to_string(input)?;
    let (model, document) = compile_source(&text)?;
    info!(
        input = %input.display(),
        messages = model.records.len(),
        services = model.service_groups.len(),
        rpcs = model.procedure_count(),
        "extracted schema"
    );

    write_document(&out_path, &document)?;
    info!(output = %out_path.display(), "wrote proto document");

    if let Some(protoc) = &config.protoc {
        run_protoc(protoc, &out_path)?;
        info!(output = %out_path.display(), "schema compiler finished");
    }

    if config.rewrite && rewrite_source(input)? {
        info!(input = %input.display(), "commented out extracted messages");
    }
    Ok(out_path)
}
