use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::error::GenError;

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(concat!(
        r"(//[^\n]*",
        r"|/\*(?s:.*?)\*/",
        r"|`[^`]*`",
        r#"|"(?:[^"\\\n]|\\.)*""#,
        r"|'(?:[^'\\\n]|\\.)*'",
        r"|(?:\d|\.\d)(?:[eEpP][+-]|[\w.])*",
        r"|[\p{L}_][\p{L}\p{N}_]*",
        r"|\.\.\.|<<=|>>=|&\^=|&&|\|\||<-|\+\+|--|==|!=|<=|>=|:=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|&\^",
        r"|[-+*/%&|^<>=!()\[\]{},;.:~]",
        r"|\s+)",
    )).unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    String,
    Char,
    Punct,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

/// One `//` or `/* */` comment. `end_line` differs from `line` only for
/// block comments spanning several lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text:     String,
    pub line:     usize,
    pub end_line: usize,
}

#[derive(Debug, Default, PartialEq)]
pub struct Lexed {
    pub tokens:   Vec<Token>,
    pub comments: Vec<Comment>,
}

fn classify(part: &str) -> TokenKind {
    let first = part.chars().next().unwrap_or(' ');
    match first {
        '"' | '`' => TokenKind::String,
        '\'' => TokenKind::Char,
        c if c.is_ascii_digit() => TokenKind::Number,
        '.' if part.len() > 1 && part.as_bytes()[1].is_ascii_digit() => TokenKind::Number,
        c if c == '_' || c.is_alphabetic() => TokenKind::Ident,
        _ => TokenKind::Punct,
    }
}

/// Whether a line break after `tok` terminates the statement.
fn ends_statement(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::Ident => match tok.text.as_str() {
            "break" | "continue" | "fallthrough" | "return" => true,
            text => !is_keyword(text),
        },
        TokenKind::Number | TokenKind::String | TokenKind::Char => true,
        TokenKind::Punct => matches!(tok.text.as_str(), "++" | "--" | ")" | "]" | "}"),
        TokenKind::Eof => false,
    }
}

pub fn is_keyword(text: &str) -> bool {
    matches!(
        text,
        "break" | "case" | "chan" | "const" | "continue" | "default" | "defer"
            | "else" | "fallthrough" | "for" | "func" | "go" | "goto" | "if"
            | "import" | "interface" | "map" | "package" | "range" | "return"
            | "select" | "struct" | "switch" | "type" | "var"
    )
}

fn insert_semicolon(tokens: &mut Vec<Token>, line: usize, column: usize) {
    if tokens.last().is_some_and(ends_statement) {
        tokens.push(Token {
            kind: TokenKind::Punct,
            text: ";".to_string(),
            line,
            column,
        });
    }
}

/// Splits Go source text into tokens and comments.
///
/// Semicolons are inserted at line ends the way the Go scanner does, so the
/// parser can rely on `;` terminating every declaration.
pub fn tokenize_source(text: &str) -> Result<Lexed, GenError> {
    let mut lexed = Lexed::default();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(error(
                &format!("Syntax error: {}", quote(unexpected)),
                line,
                column,
            ));
        }

        let is_comment = part.starts_with("//") || part.starts_with("/*");
        if is_comment {
            let newlines = part.matches('\n').count();
            lexed.comments.push(Comment {
                text:     part.to_string(),
                line,
                end_line: line + newlines,
            });
            if newlines > 0 {
                insert_semicolon(&mut lexed.tokens, line, column);
            }
        } else if part.trim().is_empty() {
            if part.contains('\n') {
                insert_semicolon(&mut lexed.tokens, line, column);
            }
        } else {
            lexed.tokens.push(Token {
                kind: classify(part),
                text: part.to_string(),
                line,
                column,
            });
        }

        // Update line/column
        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.chars().count() + 1;
            }
        } else {
            column += part.chars().count();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(error(
            &format!("Syntax error: {}", quote(unexpected)),
            line,
            column,
        ));
    }

    insert_semicolon(&mut lexed.tokens, line, column);
    lexed.tokens.push(Token {
        kind: TokenKind::Eof,
        text: "".to_string(),
        line,
        column,
    });
    Ok(lexed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lexed: &Lexed) -> Vec<&str> {
        lexed.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let input = "type A int";
        let expected = vec![
            Token { kind: TokenKind::Ident, text: "type".into(), line: 1, column: 1 },
            Token { kind: TokenKind::Ident, text: "A".into(),    line: 1, column: 6 },
            Token { kind: TokenKind::Ident, text: "int".into(),  line: 1, column: 8 },
            Token { kind: TokenKind::Punct, text: ";".into(),    line: 1, column: 11 },
            Token { kind: TokenKind::Eof,   text: "".into(),     line: 1, column: 11 },
        ];
        let got = tokenize_source(input).unwrap();
        assert_eq!(got.tokens, expected);
        assert!(got.comments.is_empty());
    }

    #[test]
    fn test_tokenize_inserts_semicolons_at_line_ends() {
        let input = "package demo\n\nimport (\n\t\"fmt\"\n)\nvar x = 1 +\n\t2\n";
        let got = tokenize_source(input).unwrap();
        assert_eq!(
            texts(&got),
            vec![
                "package", "demo", ";", "import", "(", "\"fmt\"", ";", ")", ";",
                "var", "x", "=", "1", "+", "2", ";", "",
            ]
        );
    }

    #[test]
    fn test_tokenize_collects_comments() {
        let input = "// @grpcGen:Message\n/* a\n b */\ntype A struct{} // trailing\n";
        let got = tokenize_source(input).unwrap();
        assert_eq!(got.comments.len(), 3);
        assert_eq!(got.comments[0], Comment { text: "// @grpcGen:Message".into(), line: 1, end_line: 1 });
        assert_eq!(got.comments[1].line, 2);
        assert_eq!(got.comments[1].end_line, 3);
        assert_eq!(got.comments[2].line, 4);
        assert_eq!(texts(&got), vec!["type", "A", "struct", "{", "}", ";", ""]);
    }

    #[test]
    fn test_tokenize_literals_and_operators() {
        let input = "x := map[string]interface{}{`raw\nstring`: 'a', \"s\\\"q\": 1.5e+3}...";
        let got = tokenize_source(input).unwrap();
        assert_eq!(
            texts(&got),
            vec![
                "x", ":=", "map", "[", "string", "]", "interface", "{", "}", "{",
                "`raw\nstring`", ":", "'a'", ",", "\"s\\\"q\"", ":", "1.5e+3", "}", "...", "",
            ]
        );
        assert_eq!(got.tokens[10].kind, TokenKind::String);
        assert_eq!(got.tokens[12].kind, TokenKind::Char);
        assert_eq!(got.tokens[16].kind, TokenKind::Number);
    }

    #[test]
    fn test_tokenize_unexpected_text() {
        let input = "type A int @";
        let err = tokenize_source(input).unwrap_err();
        assert!(
            matches!(err, GenError::ParseError { line: 1, column: 12, .. }),
            "expected a ParseError but got {:?}",
            err
        );
    }
}
