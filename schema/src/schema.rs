use serde::Serialize;
use std::collections::BTreeMap;

/// Well-known proto type standing in for Go's `interface{}`.
pub const WELL_KNOWN_VALUE: &str = "google.protobuf.Value";

/// Import that has to accompany any use of [`WELL_KNOWN_VALUE`].
pub const WELL_KNOWN_VALUE_IMPORT: &str = "google/protobuf/struct.proto";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name:  String,
    /// Go type text right after extraction, proto type text after translation.
    pub type_: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Self {
        FieldDescriptor { name: name.into(), type_: type_.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDescriptor {
    pub name:   String,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureDescriptor {
    pub name:        String,
    /// Empty when no parameter carried the cross-boundary prefix.
    pub input_type:  String,
    /// Empty when no result carried the cross-boundary prefix.
    pub output_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceGroup {
    pub name:       String,
    pub procedures: Vec<ProcedureDescriptor>,
}

/// Everything extracted from one source file.
///
/// Records keep the position of their first declaration. Service groups are
/// keyed by name and therefore iterate in name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaModel {
    pub package_name:   String,
    pub records:        Vec<RecordDescriptor>,
    pub service_groups: BTreeMap<String, ServiceGroup>,
}

impl SchemaModel {
    pub fn new(package_name: impl Into<String>) -> Self {
        SchemaModel {
            package_name:   package_name.into(),
            records:        Vec::new(),
            service_groups: BTreeMap::new(),
        }
    }

    /// Adds a record, replacing an earlier one with the same name.
    /// Returns the replaced record, if any.
    pub fn insert_record(&mut self, record: RecordDescriptor) -> Option<RecordDescriptor> {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(slot) => Some(std::mem::replace(slot, record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    /// Appends a procedure to the named group, creating the group on first use.
    pub fn add_procedure(&mut self, group: &str, procedure: ProcedureDescriptor) {
        self.service_groups
            .entry(group.to_string())
            .or_insert_with(|| ServiceGroup { name: group.to_string(), procedures: Vec::new() })
            .procedures
            .push(procedure);
    }

    pub fn record(&self, name: &str) -> Option<&RecordDescriptor> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn procedure_count(&self) -> usize {
        self.service_groups.values().map(|g| g.procedures.len()).sum()
    }

    /// True when any field type refers to [`WELL_KNOWN_VALUE`].
    pub fn uses_well_known_value(&self) -> bool {
        self.records
            .iter()
            .flat_map(|r| r.fields.iter())
            .any(|f| f.type_.contains(WELL_KNOWN_VALUE))
    }
}
