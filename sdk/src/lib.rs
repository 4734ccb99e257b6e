//! grpc-gen
//!
//! Library entry point for generating proto3 documents from annotated Go
//! sources.
//!
//! - `compile_source` / `generate_file` (re-exported from the compiler)
//! - The schema model types
//! - JSON export of an extracted model

pub use grpc_gen_compiler::{compile_source, generate_file, GenConfig, GenError, ProtocConfig};
pub use grpc_gen_schema::{
    FieldDescriptor, ProcedureDescriptor, RecordDescriptor, SchemaModel, ServiceGroup,
};

/// Extract the model from Go source text and pretty-print it as JSON.
pub fn model_to_json(text: &str) -> Result<String, GenError> {
    let (model, _document) = compile_source(text)?;
    Ok(serde_json::to_string_pretty(&model)?)
}

pub mod error {
    pub use grpc_gen_compiler::error::GenError;
}

pub mod schema {
    pub use grpc_gen_schema::*;
}
