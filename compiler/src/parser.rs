use crate::{
    tokenizer::{is_keyword, Comment, Lexed, Token, TokenKind},
    types::{ChanDir, Decl, DeclKind, FuncDecl, GoType, Param, SourceFile, StructField, TypeSpec},
    utils::{error, quote},
    error::GenError,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").unwrap();
}

/// Keywords that open a type expression.
const TYPE_KEYWORDS: [&str; 5] = ["map", "chan", "func", "interface", "struct"];

struct Parser<'a> {
    tokens:   &'a [Token],
    comments: &'a [Comment],
    index:    usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + offset).min(last)]
    }

    fn advance(&mut self) -> &'a Token {
        let tok = self.peek();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        tok
    }

    fn is(&self, text: &str) -> bool {
        let tok = self.peek();
        tok.kind != TokenKind::Eof && tok.text == text
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.is(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, text: &str) -> Result<&'a Token, GenError> {
        if !self.is(text) {
            let tok = self.peek();
            return Err(error(
                &format!("Expected {} but found {}", quote(text), quote(&tok.text)),
                tok.line,
                tok.column,
            ));
        }
        Ok(self.advance())
    }

    /// A statement ends at `;` or at end of input.
    fn expect_end(&mut self) -> Result<(), GenError> {
        if self.peek().kind == TokenKind::Eof {
            return Ok(());
        }
        self.expect(";").map(|_| ())
    }

    fn is_ident(tok: &Token) -> bool {
        tok.kind == TokenKind::Ident && IDENTIFIER.is_match(&tok.text) && !is_keyword(&tok.text)
    }

    fn expect_ident(&mut self) -> Result<String, GenError> {
        let tok = self.peek();
        if !Self::is_ident(tok) {
            return Err(error(
                &format!("Expected identifier but found {}", quote(&tok.text)),
                tok.line,
                tok.column,
            ));
        }
        self.advance();
        Ok(tok.text.clone())
    }

    fn unexpected_token(&self) -> GenError {
        let tok = self.peek();
        error(
            &format!("Unexpected token {}", quote(&tok.text)),
            tok.line,
            tok.column,
        )
    }

    fn starts_type(tok: &Token) -> bool {
        Self::is_ident(tok)
            || TYPE_KEYWORDS.contains(&tok.text.as_str())
            || matches!(tok.text.as_str(), "*" | "[" | "(" | "<-" | "...")
    }

    /// Index of the bracket closing the one at `self.index + offset`.
    fn matching_close(&self, offset: usize) -> Result<usize, GenError> {
        let mut depth = 0usize;
        let mut i = self.index + offset;
        loop {
            let tok = &self.tokens[i.min(self.tokens.len() - 1)];
            match tok.text.as_str() {
                _ if tok.kind == TokenKind::Eof => {
                    return Err(error("Unbalanced brackets", tok.line, tok.column));
                }
                _ if tok.kind != TokenKind::Punct => {}
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// Skips a bracketed group and returns how many tokens it held.
    fn skip_balanced(&mut self) -> Result<usize, GenError> {
        let close = self.matching_close(0)?;
        let inner = close - self.index - 1;
        self.index = close + 1;
        Ok(inner)
    }

    /// Skips to the `;` ending the current statement.
    fn skip_statement(&mut self) -> Result<(), GenError> {
        while !self.is(";") && self.peek().kind != TokenKind::Eof {
            if matches!(self.peek().text.as_str(), "(" | "[" | "{") && self.peek().kind == TokenKind::Punct {
                self.skip_balanced()?;
            } else {
                self.advance();
            }
        }
        Ok(())
    }

    /// Doc comment of the declaration starting at the current token: the
    /// comment group that ends on the line right above it and does not
    /// trail code on an earlier line.
    fn doc_comment(&self) -> Vec<String> {
        let start = self.peek();
        let prev_line = if self.index == 0 { 0 } else { self.tokens[self.index - 1].line };
        let candidates: Vec<&Comment> = self
            .comments
            .iter()
            .filter(|c| c.line > prev_line && c.end_line < start.line)
            .collect();

        let mut group: Vec<&Comment> = Vec::new();
        for &comment in candidates.iter().rev() {
            let expected_end = match group.last() {
                None => start.line - 1,
                Some(later) => later.line - 1,
            };
            if comment.end_line < expected_end {
                break;
            }
            group.push(comment);
        }

        group
            .iter()
            .rev()
            .flat_map(|c| c.text.lines().map(str::to_string))
            .collect()
    }

    /// When an identifier is followed by `[`, decides whether the bracket
    /// holds type arguments (`List[int]`) or starts an array/slice type
    /// belonging to what comes next (`buf [4]byte`).
    fn brackets_are_type_args(&self) -> Result<bool, GenError> {
        if !self.is("[") || self.peek_at(1).text == "]" {
            return Ok(false);
        }
        let close = self.matching_close(0)?;
        let after = &self.tokens[(close + 1).min(self.tokens.len() - 1)];
        Ok(!Self::starts_type(after))
    }

    fn parse_type(&mut self) -> Result<GoType, GenError> {
        let tok = self.peek();
        let ty = match tok.text.as_str() {
            "*" => {
                self.advance();
                GoType::Pointer(Box::new(self.parse_type()?))
            }
            "[" => {
                self.advance();
                if self.eat("]") {
                    GoType::Slice(Box::new(self.parse_type()?))
                } else {
                    let mut len = Vec::new();
                    while !self.is("]") {
                        if self.peek().kind == TokenKind::Eof {
                            return Err(self.unexpected_token());
                        }
                        len.push(self.advance().text.clone());
                    }
                    self.expect("]")?;
                    GoType::Array(len.join(""), Box::new(self.parse_type()?))
                }
            }
            "map" => {
                self.advance();
                self.expect("[")?;
                let key = self.parse_type()?;
                self.expect("]")?;
                GoType::Map(Box::new(key), Box::new(self.parse_type()?))
            }
            "chan" => {
                self.advance();
                let dir = if self.eat("<-") { ChanDir::Send } else { ChanDir::Both };
                GoType::Chan(dir, Box::new(self.parse_type()?))
            }
            "<-" => {
                self.advance();
                self.expect("chan")?;
                GoType::Chan(ChanDir::Recv, Box::new(self.parse_type()?))
            }
            "func" => {
                self.advance();
                let (params, results) = self.parse_signature()?;
                GoType::Func(
                    params.into_iter().map(|p| p.type_).collect(),
                    results.into_iter().map(|p| p.type_).collect(),
                )
            }
            "interface" => {
                self.advance();
                if !self.is("{") {
                    return Err(self.unexpected_token());
                }
                GoType::Interface(self.skip_balanced()? == 0)
            }
            "struct" => {
                self.advance();
                GoType::Struct(self.parse_struct_body()?)
            }
            "(" => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(")")?;
                GoType::Paren(Box::new(inner))
            }
            "..." => {
                self.advance();
                GoType::Ellipsis(Box::new(self.parse_type()?))
            }
            _ if Self::is_ident(tok) => {
                let mut name = self.expect_ident()?;
                if self.eat(".") {
                    name = format!("{}.{}", name, self.expect_ident()?);
                }
                let base = GoType::Name(name);
                if self.brackets_are_type_args()? {
                    self.expect("[")?;
                    let mut args = Vec::new();
                    while !self.eat("]") {
                        args.push(self.parse_type()?);
                        if !self.is("]") {
                            self.expect(",")?;
                        }
                    }
                    GoType::Generic(Box::new(base), args)
                } else {
                    base
                }
            }
            _ => {
                return Err(error(
                    &format!("Expected type but found {}", quote(&tok.text)),
                    tok.line,
                    tok.column,
                ))
            }
        };
        Ok(ty)
    }

    fn parse_struct_body(&mut self) -> Result<Vec<StructField>, GenError> {
        self.expect("{")?;
        let mut fields = Vec::new();
        while !self.eat("}") {
            if self.eat(";") {
                continue;
            }
            fields.push(self.parse_field()?);
            // Tag
            if self.peek().kind == TokenKind::String {
                self.advance();
            }
            if !self.is("}") {
                self.expect(";")?;
            }
        }
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<StructField, GenError> {
        let tok = self.peek();
        if tok.text == "*" || !Self::is_ident(tok) {
            return Ok(StructField { names: Vec::new(), type_: self.parse_type()? });
        }

        let next = self.peek_at(1);
        let embedded = match next.text.as_str() {
            ";" | "}" | "." => true,
            _ if next.kind == TokenKind::String => true,
            "[" => {
                // `Base[T]` embeds a generic type, `buf [4]byte` names a field.
                self.index += 1;
                let type_args = self.brackets_are_type_args();
                self.index -= 1;
                type_args?
            }
            _ => false,
        };
        if embedded {
            return Ok(StructField { names: Vec::new(), type_: self.parse_type()? });
        }

        let mut names = vec![self.expect_ident()?];
        while self.eat(",") {
            names.push(self.expect_ident()?);
        }
        Ok(StructField { names, type_: self.parse_type()? })
    }

    /// Parses a parenthesized parameter or result list.
    fn parse_params(&mut self) -> Result<Vec<Param>, GenError> {
        let open = self.expect("(")?;
        let mut items: Vec<(GoType, Option<GoType>)> = Vec::new();
        while !self.eat(")") {
            let first = self.parse_type()?;
            let second = if !self.is(",") && !self.is(")") {
                Some(self.parse_type()?)
            } else {
                None
            };
            items.push((first, second));
            if !self.is(")") {
                self.expect(",")?;
            }
        }

        if items.iter().all(|(_, second)| second.is_none()) {
            return Ok(items
                .into_iter()
                .map(|(type_, _)| Param { name: None, type_ })
                .collect());
        }

        // Named list: `a, b int, c string`.
        let mut params = Vec::new();
        let mut pending = Vec::new();
        for (first, second) in items {
            let name = match first {
                GoType::Name(name) if !name.contains('.') => name,
                other => {
                    return Err(error(
                        &format!("Expected parameter name but found {}", quote(&other.to_string())),
                        open.line,
                        open.column,
                    ))
                }
            };
            pending.push(name);
            if let Some(type_) = second {
                for name in pending.drain(..) {
                    params.push(Param { name: Some(name), type_: type_.clone() });
                }
            }
        }
        if !pending.is_empty() {
            return Err(error("Mixed named and unnamed parameters", open.line, open.column));
        }
        Ok(params)
    }

    fn parse_signature(&mut self) -> Result<(Vec<Param>, Vec<Param>), GenError> {
        let params = self.parse_params()?;
        let results = if self.is("(") {
            self.parse_params()?
        } else if Self::starts_type(self.peek()) {
            vec![Param { name: None, type_: self.parse_type()? }]
        } else {
            Vec::new()
        };
        Ok((params, results))
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec, GenError> {
        let name = self.expect_ident()?;
        let next = self.peek_at(2);
        if self.is("[")
            && Self::is_ident(self.peek_at(1))
            && (next.kind == TokenKind::Ident || next.text == "," || next.text == "~")
        {
            // Type parameters
            self.skip_balanced()?;
        }
        let is_alias = self.eat("=");
        Ok(TypeSpec { name, is_alias, type_: self.parse_type()? })
    }

    fn parse_type_decl(&mut self) -> Result<Vec<TypeSpec>, GenError> {
        let mut specs = Vec::new();
        if self.eat("(") {
            while !self.eat(")") {
                if self.eat(";") {
                    continue;
                }
                specs.push(self.parse_type_spec()?);
                if !self.is(")") {
                    self.expect(";")?;
                }
            }
        } else {
            specs.push(self.parse_type_spec()?);
        }
        Ok(specs)
    }

    fn parse_func_decl(&mut self) -> Result<FuncDecl, GenError> {
        let receiver = if self.is("(") {
            self.parse_params()?.into_iter().next()
        } else {
            None
        };
        let name = self.expect_ident()?;
        if self.is("[") {
            // Type parameters
            self.skip_balanced()?;
        }
        let (params, results) = self.parse_signature()?;
        if self.is("{") {
            self.skip_balanced()?;
        }
        Ok(FuncDecl { name, receiver, params, results })
    }
}

/// Parses the top-level structure of a Go file.
///
/// Function bodies and the bodies of `import`, `var` and `const`
/// declarations are skipped; only their extent is checked.
pub fn parse_source(lexed: &Lexed) -> Result<SourceFile, GenError> {
    let mut p = Parser {
        tokens:   &lexed.tokens,
        comments: &lexed.comments,
        index:    0,
    };
    if p.tokens.is_empty() {
        return Err(error("Empty token stream", 0, 0));
    }

    // Handle package clause
    p.expect("package")?;
    let package = p.expect_ident()?;
    p.expect_end()?;

    let mut decls = Vec::new();
    while p.peek().kind != TokenKind::Eof {
        if p.eat(";") {
            continue;
        }

        let start = p.peek();
        let doc = p.doc_comment();
        let kind = match start.text.as_str() {
            "import" | "var" | "const" => {
                p.advance();
                if p.is("(") {
                    p.skip_balanced()?;
                } else {
                    p.skip_statement()?;
                }
                DeclKind::Other(start.text.clone())
            }
            "type" => {
                p.advance();
                DeclKind::Type(p.parse_type_decl()?)
            }
            "func" => {
                p.advance();
                DeclKind::Func(p.parse_func_decl()?)
            }
            _ => return Err(p.unexpected_token()),
        };
        let end_line = p.tokens[p.index.saturating_sub(1)].line;
        p.expect_end()?;

        decls.push(Decl {
            line: start.line,
            end_line,
            doc,
            kind,
        });
    }

    Ok(SourceFile { package, decls })
}
