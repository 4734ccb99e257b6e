use crate::error::GenError;
use grpc_gen_schema::SchemaModel;

/// Returns `Ok(())` if the model can be rendered, or the aggregate condition
/// that makes the source unusable otherwise. Per-declaration problems are
/// handled during extraction and never reach this point.
pub fn verify_model(model: &SchemaModel) -> Result<(), GenError> {
    if model.records.is_empty() {
        return Err(GenError::NoRecordMarker);
    }
    if model.procedure_count() == 0 {
        return Err(GenError::NoProcedureMarker);
    }

    Ok(())
}
