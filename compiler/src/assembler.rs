use crate::{
    error::GenError,
    extract::Extracted,
    procedure::extract_procedure,
    record::extract_record,
    types::{DeclKind, SourceFile},
    verifier::verify_model,
};
use grpc_gen_schema::SchemaModel;
use tracing::{debug, warn};

/// Collects every marked record and procedure of a parsed file.
///
/// Declarations that are unmarked or malformed are logged and skipped.
/// Field types are left in their Go spelling.
pub fn assemble(file: &SourceFile) -> Result<SchemaModel, GenError> {
    if file.decls.is_empty() {
        return Err(GenError::NoDeclarations);
    }

    let mut model = SchemaModel::new(file.package.clone());
    for (i, decl) in file.decls.iter().enumerate() {
        match &decl.kind {
            DeclKind::Type(specs) => match extract_record(specs, &decl.doc) {
                Extracted::Found(record) => {
                    debug!(decl = i, line = decl.line, record = %record.name, "found message");
                    if let Some(previous) = model.insert_record(record) {
                        warn!(decl = i, line = decl.line, record = %previous.name, "message declared twice, keeping the later one");
                    }
                }
                Extracted::Absent => debug!(decl = i, line = decl.line, "type declaration is not a message"),
                Extracted::Malformed(reason) => warn!(decl = i, line = decl.line, "skipping message: {}", reason),
            },
            DeclKind::Func(func) => match extract_procedure(func, &decl.doc) {
                Extracted::Found(entry) => {
                    debug!(decl = i, line = decl.line, service = %entry.group, rpc = %entry.procedure.name, "found rpc");
                    model.add_procedure(&entry.group, entry.procedure);
                }
                Extracted::Absent => debug!(decl = i, line = decl.line, func = %func.name, "function is not an rpc"),
                Extracted::Malformed(reason) => warn!(decl = i, line = decl.line, "skipping rpc: {}", reason),
            },
            DeclKind::Other(keyword) => {
                debug!(decl = i, line = decl.line, "skipping {} declaration", keyword)
            }
        }
    }

    verify_model(&model)?;
    Ok(model)
}
