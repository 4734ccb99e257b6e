use std::{fs, path::Path};
use crate::{
    error::GenError,
    extract::Extracted,
    parser::parse_source,
    record::extract_record,
    tokenizer::tokenize_source,
    types::{DeclKind, SourceFile},
};

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// 1-based, inclusive line ranges of the declarations extracted as records,
/// from the `type` keyword through the last token of the declaration.
pub fn record_spans(file: &SourceFile) -> Vec<(usize, usize)> {
    file.decls
        .iter()
        .filter(|decl| match &decl.kind {
            DeclKind::Type(specs) => matches!(extract_record(specs, &decl.doc), Extracted::Found(_)),
            _ => false,
        })
        .map(|decl| (decl.line, decl.end_line))
        .collect()
}

/// Comments out every declaration extracted as a record so a later run does
/// not extract it again. Malformed marked declarations stay live.
///
/// Lines that already are comments are left alone, which makes the transform
/// idempotent. A blank line is inserted when code or a comment follows a
/// span directly, so the marker comment cannot become the doc comment of the
/// next declaration.
pub fn comment_out_records(text: &str) -> Result<String, GenError> {
    let file = parse_source(&tokenize_source(text)?)?;
    let spans = record_spans(&file);

    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let number = i + 1;
        let inside = spans.iter().any(|&(start, end)| (start..=end).contains(&number));
        if inside && !is_comment(line) {
            out.push(format!("// {}", line));
        } else {
            out.push(line.to_string());
        }

        let closes_span = spans.iter().any(|&(_, end)| end == number);
        if closes_span && lines.get(i + 1).is_some_and(|next| !next.trim().is_empty()) {
            out.push(String::new());
        }
    }

    Ok(out.join("\n"))
}

/// Applies [`comment_out_records`] to a file. Returns whether it changed.
pub fn rewrite_source(path: &Path) -> Result<bool, GenError> {
    let text = fs::read_to_string(path)?;
    let rewritten = comment_out_records(&text)?;
    if rewritten == text {
        return Ok(false);
    }
    fs::write(path, rewritten)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_source;

    const SOURCE: &str = "package grpc_test\n\
                          \n\
                          // @grpcGen:Message\n\
                          // Reply is sent back.\n\
                          type Reply struct {\n\
                          \tName  string\n\
                          \tInner struct {\n\
                          \t\tX int\n\
                          \t}\n\
                          }\n\
                          \n\
                          type Plain struct {\n\
                          \tA int\n\
                          }\n";

    #[test]
    fn test_comment_out_records() {
        let got = comment_out_records(SOURCE).unwrap();
        let expected = "package grpc_test\n\
                        \n\
                        // @grpcGen:Message\n\
                        // Reply is sent back.\n\
                        // type Reply struct {\n\
                        // \tName  string\n\
                        // \tInner struct {\n\
                        // \t\tX int\n\
                        // \t}\n\
                        // }\n\
                        \n\
                        type Plain struct {\n\
                        \tA int\n\
                        }\n";
        assert_eq!(got, expected);
    }

    #[test]
    fn test_comment_out_records_is_idempotent() {
        let once = comment_out_records(SOURCE).unwrap();
        assert_eq!(comment_out_records(&once).unwrap(), once);
    }

    #[test]
    fn test_single_line_and_grouped_declarations() {
        let src = "package demo\n// @grpcGen:Message\ntype Empty struct{}\nvar x = 1\n// @grpcGen:Message\ntype (\n\tA struct{ B int }\n)\nfunc f() {}\n";
        let got = comment_out_records(src).unwrap();
        assert_eq!(
            got,
            "package demo\n// @grpcGen:Message\n// type Empty struct{}\n\nvar x = 1\n// @grpcGen:Message\n// type (\n// \tA struct{ B int }\n// )\n\nfunc f() {}\n"
        );
        assert_eq!(comment_out_records(&got).unwrap(), got);
    }

    #[test]
    fn test_brackets_in_comments_and_tags_do_not_move_the_span() {
        let src = "package demo\n\
                   \n\
                   // @grpcGen:Message\n\
                   type A struct {\n\
                   \tX int // ok :)\n\
                   \tY int `json:\"y{\"`\n\
                   \tZ string // see (\n\
                   }\n\
                   \n\
                   // @grpcGen:Message\n\
                   type B struct{ X int } // see {\n\
                   func f() {}\n\
                   var y = 2\n";
        let got = comment_out_records(src).unwrap();
        let expected = "package demo\n\
                        \n\
                        // @grpcGen:Message\n\
                        // type A struct {\n\
                        // \tX int // ok :)\n\
                        // \tY int `json:\"y{\"`\n\
                        // \tZ string // see (\n\
                        // }\n\
                        \n\
                        // @grpcGen:Message\n\
                        // type B struct{ X int } // see {\n\
                        \n\
                        func f() {}\n\
                        var y = 2\n";
        assert_eq!(got, expected);

        // The rewritten file still parses; it just has no messages left.
        let err = compile_source(&got).unwrap_err();
        assert!(matches!(err, GenError::NoRecordMarker), "{:?}", err);
    }

    #[test]
    fn test_following_declaration_does_not_inherit_the_marker() {
        let src = "package demo\n// @grpcGen:Message\ntype A struct{ X int }\n// B is plain.\ntype B struct{ Y int }\n";
        let once = comment_out_records(src).unwrap();
        assert_eq!(
            once,
            "package demo\n// @grpcGen:Message\n// type A struct{ X int }\n\n// B is plain.\ntype B struct{ Y int }\n"
        );
        assert_eq!(comment_out_records(&once).unwrap(), once);
    }

    #[test]
    fn test_unextracted_declarations_are_left_alone() {
        let src = "package demo\n// @grpcGen:Message\nfunc f() {}\n// @grpcGen:Message\ntype ID int\n";
        assert_eq!(comment_out_records(src).unwrap(), src);
    }

    #[test]
    fn test_rewrite_source_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greeter.go");
        fs::write(&path, SOURCE).unwrap();

        assert!(rewrite_source(&path).unwrap());
        assert!(!rewrite_source(&path).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("// type Reply struct {"));
    }
}
