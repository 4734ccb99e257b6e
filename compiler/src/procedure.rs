use crate::{
    extract::{marker_value, Extracted, BINDING_PREFIX, SERVICE_MARKER, SERVICE_NAME_MARKER},
    types::{FuncDecl, Param},
};
use grpc_gen_schema::ProcedureDescriptor;

/// A procedure together with the service group it was declared for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    pub group:     String,
    pub procedure: ProcedureDescriptor,
}

fn binding_type(param: &Param) -> Option<String> {
    let text = param.type_.to_string();
    if !text.contains(BINDING_PREFIX) {
        return None;
    }
    Some(text.strip_prefix(BINDING_PREFIX).unwrap_or(text.as_str()).to_string())
}

/// Reads a remote procedure from a function whose doc carries both
/// [`SERVICE_MARKER`] and [`SERVICE_NAME_MARKER`].
///
/// The first parameter and the last result typed from the bindings package
/// become the input and output; either may stay empty.
pub fn extract_procedure(func: &FuncDecl, doc: &[String]) -> Extracted<ServiceEntry> {
    let mut is_service = false;
    let mut group: Option<String> = None;
    for line in doc {
        if is_service && group.is_some() {
            break;
        }
        if line.contains(SERVICE_MARKER) {
            is_service = true;
        } else if group.is_none() {
            group = marker_value(line, SERVICE_NAME_MARKER);
        }
    }

    let group = match group {
        Some(group) if is_service => group,
        _ => return Extracted::Absent,
    };
    if group.is_empty() {
        return Extracted::Malformed(format!("{} of {} names no service", SERVICE_NAME_MARKER, func.name));
    }

    let input_type = func.params.iter().find_map(binding_type).unwrap_or_default();
    let output_type = func.results.iter().filter_map(binding_type).last().unwrap_or_default();

    Extracted::Found(ServiceEntry {
        group,
        procedure: ProcedureDescriptor {
            name: func.name.clone(),
            input_type,
            output_type,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GoType;

    fn param(type_: GoType) -> Param {
        Param { name: None, type_ }
    }

    fn binding(name: &str) -> GoType {
        GoType::Pointer(Box::new(GoType::Name(format!("pb.{}", name))))
    }

    fn say_hello() -> FuncDecl {
        FuncDecl {
            name:     "SayHello".into(),
            receiver: Some(param(GoType::Pointer(Box::new(GoType::Name("server".into()))))),
            params:   vec![param(GoType::Name("context.Context".into())), param(binding("Request"))],
            results:  vec![param(binding("Reply")), param(GoType::Name("error".into()))],
        }
    }

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_extract_procedure() {
        let got = extract_procedure(
            &say_hello(),
            &doc(&["// @grpcGen:Service", "// @grpcGen:SrvName: Greeting"]),
        );
        assert_eq!(
            got,
            Extracted::Found(ServiceEntry {
                group:     "Greeting".into(),
                procedure: ProcedureDescriptor {
                    name:        "SayHello".into(),
                    input_type:  "Request".into(),
                    output_type: "Reply".into(),
                },
            })
        );
    }

    #[test]
    fn test_marker_order_does_not_matter() {
        let got = extract_procedure(
            &say_hello(),
            &doc(&["// @grpcGen:SrvName: Greeting", "// SayHello greets.", "// @grpcGen:Service"]),
        );
        assert_eq!(got.found().map(|e| e.group), Some("Greeting".to_string()));
    }

    #[test]
    fn test_first_group_name_wins() {
        let got = extract_procedure(
            &say_hello(),
            &doc(&["// @grpcGen:SrvName: First", "// @grpcGen:SrvName: Second", "// @grpcGen:Service"]),
        );
        assert_eq!(got.found().map(|e| e.group), Some("First".to_string()));
    }

    #[test]
    fn test_single_marker_is_absent() {
        assert_eq!(extract_procedure(&say_hello(), &doc(&["// @grpcGen:Service"])), Extracted::Absent);
        assert_eq!(
            extract_procedure(&say_hello(), &doc(&["// @grpcGen:SrvName: Greeting"])),
            Extracted::Absent
        );
        assert_eq!(extract_procedure(&say_hello(), &[]), Extracted::Absent);
    }

    #[test]
    fn test_empty_group_name_is_malformed() {
        let got = extract_procedure(&say_hello(), &doc(&["// @grpcGen:Service", "// @grpcGen:SrvName:"]));
        assert!(matches!(got, Extracted::Malformed(_)));
    }

    #[test]
    fn test_first_input_and_last_output_win() {
        let func = FuncDecl {
            name:     "Sync".into(),
            receiver: None,
            params:   vec![param(binding("First")), param(binding("Second"))],
            results:  vec![param(binding("Early")), param(binding("Late"))],
        };
        let entry = extract_procedure(&func, &doc(&["// @grpcGen:Service", "// @grpcGen:SrvName: Sync"]))
            .found()
            .unwrap();
        assert_eq!(entry.procedure.input_type, "First");
        assert_eq!(entry.procedure.output_type, "Late");
    }

    #[test]
    fn test_unmatched_parameters_leave_types_empty() {
        let func = FuncDecl {
            name:     "Ping".into(),
            receiver: None,
            params:   vec![param(GoType::Name("string".into()))],
            results:  vec![],
        };
        let entry = extract_procedure(&func, &doc(&["// @grpcGen:Service", "// @grpcGen:SrvName: Health"]))
            .found()
            .unwrap();
        assert_eq!(entry.procedure.input_type, "");
        assert_eq!(entry.procedure.output_type, "");
    }
}
