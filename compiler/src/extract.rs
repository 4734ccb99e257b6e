/// Doc-comment marker of a record declaration.
pub const MESSAGE_MARKER: &str = "@grpcGen:Message";
/// Doc-comment marker of a remote procedure.
pub const SERVICE_MARKER: &str = "@grpcGen:Service";
/// Doc-comment marker carrying the service group name.
pub const SERVICE_NAME_MARKER: &str = "@grpcGen:SrvName:";
/// Prefix of parameter and result types that live in the generated bindings.
pub const BINDING_PREFIX: &str = "*pb.";

/// Outcome of running an extractor over one declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Found(T),
    /// The declaration does not carry the markers; not an error.
    Absent,
    /// The markers are present but the declaration cannot be converted.
    Malformed(String),
}

impl<T> Extracted<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Extracted::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Value following `marker` on a doc line, without comment delimiters.
pub fn marker_value(line: &str, marker: &str) -> Option<String> {
    let (_, rest) = line.split_once(marker)?;
    let rest = rest.trim();
    Some(rest.strip_suffix("*/").unwrap_or(rest).trim().to_string())
}
