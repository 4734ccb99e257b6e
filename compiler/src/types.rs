use serde::Serialize;
use std::fmt;

/// The parts of a Go source file that schema extraction looks at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub package: String,
    pub decls:   Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decl {
    pub line:     usize,
    pub end_line: usize,
    /// Lines of the doc comment directly above the declaration, comment
    /// delimiters included.
    pub doc:      Vec<String>,
    pub kind:     DeclKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeclKind {
    Type(Vec<TypeSpec>),
    Func(FuncDecl),
    /// `import`, `var` or `const`; the body is not retained.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSpec {
    pub name:     String,
    pub is_alias: bool,
    pub type_:    GoType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncDecl {
    pub name:     String,
    pub receiver: Option<Param>,
    pub params:   Vec<Param>,
    pub results:  Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name:  Option<String>,
    pub type_: GoType,
}

/// A struct field entry. Embedded fields have no names; `a, b int` has two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructField {
    pub names: Vec<String>,
    pub type_: GoType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GoType {
    /// Plain or package-qualified name, e.g. `string` or `pb.Request`.
    Name(String),
    Pointer(Box<GoType>),
    Slice(Box<GoType>),
    /// Array with its length expression kept as text.
    Array(String, Box<GoType>),
    Map(Box<GoType>, Box<GoType>),
    Chan(ChanDir, Box<GoType>),
    Func(Vec<GoType>, Vec<GoType>),
    /// `true` for the empty interface.
    Interface(bool),
    Struct(Vec<StructField>),
    Ellipsis(Box<GoType>),
    Generic(Box<GoType>, Vec<GoType>),
    Paren(Box<GoType>),
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[GoType]) -> fmt::Result {
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", t)?;
    }
    Ok(())
}

/// Prints the type the way `go/types.ExprString` does.
impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Name(name)       => write!(f, "{}", name),
            GoType::Pointer(inner)   => write!(f, "*{}", inner),
            GoType::Slice(elem)      => write!(f, "[]{}", elem),
            GoType::Array(len, elem) => write!(f, "[{}]{}", len, elem),
            GoType::Map(key, value)  => write!(f, "map[{}]{}", key, value),
            GoType::Chan(dir, elem)  => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            GoType::Func(params, results) => {
                write!(f, "func(")?;
                write_list(f, params)?;
                write!(f, ")")?;
                match results.len() {
                    0 => Ok(()),
                    1 => write!(f, " {}", results[0]),
                    _ => {
                        write!(f, " (")?;
                        write_list(f, results)?;
                        write!(f, ")")
                    }
                }
            }
            GoType::Interface(true)  => write!(f, "interface{{}}"),
            GoType::Interface(false) => write!(f, "interface{{...}}"),
            GoType::Struct(fields) => {
                write!(f, "struct{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    if field.names.is_empty() {
                        write!(f, "{}", field.type_)?;
                    } else {
                        write!(f, "{} {}", field.names.join(", "), field.type_)?;
                    }
                }
                write!(f, "}}")
            }
            GoType::Ellipsis(elem) => write!(f, "...{}", elem),
            GoType::Generic(base, args) => {
                write!(f, "{}[", base)?;
                write_list(f, args)?;
                write!(f, "]")
            }
            GoType::Paren(inner) => write!(f, "({})", inner),
        }
    }
}
