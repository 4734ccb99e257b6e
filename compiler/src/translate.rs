use grpc_gen_schema::{SchemaModel, WELL_KNOWN_VALUE};

/// Go's dynamic "any value" type as printed in field types.
pub const DYNAMIC_TYPE: &str = "interface{}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Int,
    Uint,
}

/// Classification of a Go type expression, one level deep.
///
/// Element, key and value types are kept as text: `[]map[string]*Bar` is a
/// `Sequence("map[string]*Bar")` and its element is never classified itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Scalar(Scalar),
    Bytes,
    Sequence(String),
    /// Key and value with their pointer markers already removed.
    Mapping(String, String),
    Dynamic,
    Named(String),
}

fn strip_indirection(text: &str) -> String {
    text.replace('*', "")
}

/// Splits `map[K]V` into `K` and `V`, honouring brackets nested in `K`.
fn split_map(rest: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&rest[..i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

impl TypeExpr {
    pub fn parse(source: &str) -> TypeExpr {
        match source {
            "int" => return TypeExpr::Scalar(Scalar::Int),
            "uint" => return TypeExpr::Scalar(Scalar::Uint),
            "[]byte" | "[]uint8" => return TypeExpr::Bytes,
            DYNAMIC_TYPE => return TypeExpr::Dynamic,
            _ => {}
        }
        if let Some(elem) = source.strip_prefix("[]") {
            return TypeExpr::Sequence(elem.to_string());
        }
        if let Some((key, value)) = source.strip_prefix("map[").and_then(split_map) {
            return TypeExpr::Mapping(strip_indirection(key), strip_indirection(value));
        }
        TypeExpr::Named(source.to_string())
    }

    fn render(&self) -> String {
        match self {
            TypeExpr::Scalar(Scalar::Int)  => "int32".to_string(),
            TypeExpr::Scalar(Scalar::Uint) => "uint32".to_string(),
            TypeExpr::Bytes                => "bytes".to_string(),
            TypeExpr::Sequence(elem)       => format!("repeated {}", elem),
            TypeExpr::Mapping(key, value)  => format!("map<{}, {}>", key, value),
            TypeExpr::Dynamic              => WELL_KNOWN_VALUE.to_string(),
            TypeExpr::Named(name)          => name.clone(),
        }
    }

    /// The proto3 spelling of this type.
    ///
    /// Dynamic types nested in the carried text are replaced and any
    /// remaining pointer markers dropped; nothing else is normalized.
    pub fn to_schema_type(&self) -> String {
        strip_indirection(&self.render().replace(DYNAMIC_TYPE, WELL_KNOWN_VALUE))
    }
}

/// Maps a Go type expression to its proto3 counterpart. Unknown types pass
/// through unchanged apart from pointer markers.
pub fn translate(source_type: &str) -> String {
    TypeExpr::parse(source_type).to_schema_type()
}

/// Rewrites every field type of the model from Go to proto3 in place.
pub fn translate_model(model: &mut SchemaModel) {
    for record in &mut model.records {
        for field in &mut record.fields {
            field.type_ = translate(&field.type_);
        }
    }
}
