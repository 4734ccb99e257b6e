use grpc_gen_schema::{RecordDescriptor, SchemaModel, ServiceGroup, WELL_KNOWN_VALUE_IMPORT};

pub const GENERATED_HEADER: &str = "//\n// Generated by grpc-gen -- DO NOT EDIT\n//";
pub const SYNTAX: &str = "proto3";

fn generate_service(group: &ServiceGroup) -> String {
    let mut lines = vec![format!("service {} {{", group.name)];
    for procedure in &group.procedures {
        lines.push(format!(
            "  rpc {}({}) returns ({}) {{}}",
            procedure.name, procedure.input_type, procedure.output_type
        ));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Field numbers follow declaration order, starting at 1 in every message.
fn generate_message(record: &RecordDescriptor) -> String {
    let mut lines = vec![format!("message {} {{", record.name)];
    for (index, field) in record.fields.iter().enumerate() {
        lines.push(format!("  {} {} = {};", field.type_, field.name, index + 1));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Renders the model as a proto3 document: services sorted by name, then
/// messages in declaration order.
pub fn render_proto(model: &SchemaModel) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(format!("{}\nsyntax = \"{}\";", GENERATED_HEADER, SYNTAX));
    sections.push(format!("package {};", model.package_name));

    if model.uses_well_known_value() {
        sections.push(format!("import \"{}\";", WELL_KNOWN_VALUE_IMPORT));
    }

    for group in model.service_groups.values() {
        sections.push(generate_service(group));
    }

    for record in &model.records {
        sections.push(generate_message(record));
    }

    let mut document = sections.join("\n\n");
    document.push('\n');
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use grpc_gen_schema::{FieldDescriptor, ProcedureDescriptor};

    fn reply() -> RecordDescriptor {
        RecordDescriptor {
            name:   "Reply".into(),
            fields: vec![
                FieldDescriptor::new("Name", "string"),
                FieldDescriptor::new("Email", "string"),
                FieldDescriptor::new("Counter", "int32"),
            ],
        }
    }

    #[test]
    fn test_render_records_only() {
        let mut model = SchemaModel::new("grpc_test");
        model.insert_record(reply());

        let expected = "//\n\
                        // Generated by grpc-gen -- DO NOT EDIT\n\
                        //\n\
                        syntax = \"proto3\";\n\
                        \n\
                        package grpc_test;\n\
                        \n\
                        message Reply {\n  \
                        string Name = 1;\n  \
                        string Email = 2;\n  \
                        int32 Counter = 3;\n\
                        }\n";
        assert_eq!(render_proto(&model), expected);
    }

    #[test]
    fn test_render_services_sorted_then_messages() {
        let mut model = SchemaModel::new("grpc_test");
        model.insert_record(reply());
        model.insert_record(RecordDescriptor {
            name:   "Request".into(),
            fields: vec![FieldDescriptor::new("Name", "string")],
        });
        let rpc = |name: &str| ProcedureDescriptor {
            name:        name.into(),
            input_type:  "Request".into(),
            output_type: "Reply".into(),
        };
        model.add_procedure("Greeting", rpc("SayHello"));
        model.add_procedure("Admin", rpc("Reset"));
        model.add_procedure("Greeting", rpc("SayYa"));

        let doc = render_proto(&model);
        let admin = doc.find("service Admin {").unwrap();
        let greeting = doc.find("service Greeting {").unwrap();
        let reply = doc.find("message Reply {").unwrap();
        let request = doc.find("message Request {").unwrap();
        assert!(admin < greeting && greeting < reply && reply < request);
        assert!(doc.contains(
            "service Greeting {\n  rpc SayHello(Request) returns (Reply) {}\n  rpc SayYa(Request) returns (Reply) {}\n}"
        ));
        // Field numbers restart for every message.
        assert!(doc.contains("message Request {\n  string Name = 1;\n}"));
        assert!(!doc.contains("import"));
    }

    #[test]
    fn test_render_imports_struct_proto_for_dynamic_values() {
        let mut model = SchemaModel::new("demo");
        model.insert_record(RecordDescriptor {
            name:   "Bag".into(),
            fields: vec![FieldDescriptor::new("Values", "map<string, google.protobuf.Value>")],
        });
        let doc = render_proto(&model);
        assert!(doc.contains("package demo;\n\nimport \"google/protobuf/struct.proto\";\n\nmessage Bag {"));
        assert!(doc.contains("  map<string, google.protobuf.Value> Values = 1;"));
    }
}
