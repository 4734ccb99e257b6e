use std::collections::HashSet;
use crate::{
    extract::{Extracted, MESSAGE_MARKER},
    types::{GoType, TypeSpec},
};
use grpc_gen_schema::{FieldDescriptor, RecordDescriptor};

/// Builds a record from a type declaration whose doc carries
/// [`MESSAGE_MARKER`]. Field types are kept as Go text.
pub fn extract_record(specs: &[TypeSpec], doc: &[String]) -> Extracted<RecordDescriptor> {
    if !doc.iter().any(|line| line.contains(MESSAGE_MARKER)) {
        return Extracted::Absent;
    }

    let spec = match specs {
        [spec] => spec,
        _ => {
            return Extracted::Malformed(format!(
                "marked type declaration holds {} type specs, expected 1",
                specs.len()
            ))
        }
    };

    let fields = match &spec.type_ {
        GoType::Struct(fields) => fields,
        other => {
            return Extracted::Malformed(format!("type {} is {}, not a struct", spec.name, other))
        }
    };

    let mut record = RecordDescriptor { name: spec.name.clone(), fields: Vec::new() };
    let mut seen = HashSet::new();
    for field in fields {
        if field.names.is_empty() {
            return Extracted::Malformed(format!(
                "type {} embeds {} without a field name",
                spec.name, field.type_
            ));
        }
        let type_ = field.type_.to_string();
        for name in &field.names {
            if name == "_" {
                return Extracted::Malformed(format!(
                    "type {} has a blank field of type {}",
                    spec.name, type_
                ));
            }
            if !seen.insert(name.as_str()) {
                return Extracted::Malformed(format!(
                    "field {} is defined twice in type {}",
                    name, spec.name
                ));
            }
            record.fields.push(FieldDescriptor::new(name.clone(), type_.clone()));
        }
    }
    Extracted::Found(record)
}
