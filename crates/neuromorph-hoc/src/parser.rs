// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
HOC statement parser.

Turns the token stream into a flat list of [`Statement`]s. Only syntax is
checked here; whether referenced sections exist is decided by the builder.

## Supported statements

```text
create soma[1], dend[3]
soma[0] { pt3dclear() pt3dadd(0, 0, 0, 25) nseg = 1 }
dend[0] pt3dadd(0, 0, 35, 5)
connect dend[0](0), soma[0](1)
connect dend[1], dend[0]          // child defaults to 0, parent to 1
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use neuromorph_structures::{MorphologyError, MorphologyResult, SectionId, RESERVED_WORDS};

use crate::lexer::{tokenize, Token, TokenKind};

/// Default child attachment point when `connect` omits it
pub const DEFAULT_CHILD_POSITION: f64 = 0.0;
/// Default parent attachment point when `connect` omits it
pub const DEFAULT_PARENT_POSITION: f64 = 1.0;

/// A section reference as written in the source
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRef {
    pub id: SectionId,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyStatement {
    Pt3dAdd { x: f64, y: f64, z: f64, diam: f64, line: usize },
    Pt3dClear { line: usize },
    Nseg { value: u32, line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `create name[count], ...`
    Create { declarations: Vec<(String, usize)>, line: usize },
    /// `sec { ... }` or `sec stmt`
    Block { section: SectionRef, body: Vec<BodyStatement> },
    /// `connect child(x), parent(y)`
    Connect {
        child: SectionRef,
        child_position: f64,
        parent: SectionRef,
        parent_position: f64,
        line: usize,
    },
}

/// Parse HOC source into statements.
pub fn parse_statements(source: &str) -> MorphologyResult<Vec<Statement>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut statements = Vec::new();
    while !parser.at_eof() {
        statements.push(parser.statement()?);
    }
    Ok(statements)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error_at(token: &Token, message: impl Into<String>) -> MorphologyError {
        MorphologyError::Syntax {
            line: token.line,
            column: token.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> MorphologyResult<Token> {
        let token = self.advance();
        if token.kind == expected {
            Ok(token)
        } else {
            Err(Self::error_at(
                &token,
                format!("expected {}, found {}", expected.describe(), token.kind.describe()),
            ))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> MorphologyResult<(String, Token)> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Ident(name) => Ok((name.clone(), token.clone())),
            other => Err(Self::error_at(
                &token,
                format!("expected identifier, found {}", other.describe()),
            )),
        }
    }

    fn number(&mut self) -> MorphologyResult<(f64, Token)> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok((value, token)),
            ref other => Err(Self::error_at(
                &token,
                format!("expected number, found {}", other.describe()),
            )),
        }
    }

    /// A non-negative integer such as an array index or count
    fn integer(&mut self, what: &str) -> MorphologyResult<usize> {
        let (value, token) = self.number()?;
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(Self::error_at(
                &token,
                format!("{} must be a non-negative integer, found {}", what, value),
            ));
        }
        Ok(value as usize)
    }

    fn statement(&mut self) -> MorphologyResult<Statement> {
        let start = self.peek().clone();
        let keyword = match &start.kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(Self::error_at(
                    &start,
                    format!("expected a statement, found {}", other.describe()),
                ))
            }
        };

        match keyword.as_str() {
            "create" => self.create(),
            "connect" => self.connect(),
            "pt3dadd" | "pt3dclear" | "nseg" => Err(Self::error_at(
                &start,
                format!("'{}' must be applied to a section", keyword),
            )),
            _ => self.block(),
        }
    }

    fn create(&mut self) -> MorphologyResult<Statement> {
        let keyword = self.advance();
        let mut declarations = Vec::new();
        loop {
            let (name, name_token) = self.identifier()?;
            if RESERVED_WORDS.contains(&name.as_str()) {
                return Err(Self::error_at(
                    &name_token,
                    format!("'{}' is a reserved word and cannot name a section", name),
                ));
            }
            if self.peek().kind != TokenKind::LBracket {
                return Err(Self::error_at(
                    &name_token,
                    format!("section '{}' must be declared as an array, e.g. {}[1]", name, name),
                ));
            }
            self.expect(TokenKind::LBracket)?;
            let count_token = self.peek().clone();
            let count = self.integer("section count")?;
            if count == 0 {
                return Err(Self::error_at(&count_token, "section count must be at least 1"));
            }
            self.expect(TokenKind::RBracket)?;
            declarations.push((name, count));

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(Statement::Create {
            declarations,
            line: keyword.line,
        })
    }

    fn section_ref(&mut self) -> MorphologyResult<SectionRef> {
        let (name, token) = self.identifier()?;
        if self.peek().kind != TokenKind::LBracket {
            return Err(Self::error_at(
                &token,
                format!("expected an indexed section such as {}[0]", name),
            ));
        }
        self.expect(TokenKind::LBracket)?;
        let index = self.integer("section index")?;
        self.expect(TokenKind::RBracket)?;
        Ok(SectionRef {
            id: SectionId::new(name, index),
            line: token.line,
            column: token.column,
        })
    }

    fn optional_position(&mut self) -> MorphologyResult<Option<f64>> {
        if !self.eat(&TokenKind::LParen) {
            return Ok(None);
        }
        let (value, _) = self.number()?;
        self.expect(TokenKind::RParen)?;
        Ok(Some(value))
    }

    fn connect(&mut self) -> MorphologyResult<Statement> {
        let keyword = self.advance();
        let child = self.section_ref()?;
        let child_position = self.optional_position()?.unwrap_or(DEFAULT_CHILD_POSITION);
        self.expect(TokenKind::Comma)?;
        let parent = self.section_ref()?;
        let parent_position = self.optional_position()?.unwrap_or(DEFAULT_PARENT_POSITION);
        Ok(Statement::Connect {
            child,
            child_position,
            parent,
            parent_position,
            line: keyword.line,
        })
    }

    fn block(&mut self) -> MorphologyResult<Statement> {
        let section = self.section_ref()?;
        let mut body = Vec::new();
        if self.eat(&TokenKind::LBrace) {
            while !self.eat(&TokenKind::RBrace) {
                if self.at_eof() {
                    let token = self.peek().clone();
                    return Err(Self::error_at(
                        &token,
                        format!("unclosed block for section {}", section.id),
                    ));
                }
                body.push(self.body_statement()?);
            }
        } else {
            body.push(self.body_statement()?);
        }
        Ok(Statement::Block { section, body })
    }

    fn body_statement(&mut self) -> MorphologyResult<BodyStatement> {
        let (name, token) = self.identifier()?;
        match name.as_str() {
            "pt3dadd" => {
                self.expect(TokenKind::LParen)?;
                let mut values = [0.0; 4];
                for (i, value) in values.iter_mut().enumerate() {
                    if i > 0 {
                        self.expect(TokenKind::Comma)?;
                    }
                    *value = self.number()?.0;
                }
                self.expect(TokenKind::RParen)?;
                let [x, y, z, diam] = values;
                Ok(BodyStatement::Pt3dAdd {
                    x,
                    y,
                    z,
                    diam,
                    line: token.line,
                })
            }
            "pt3dclear" => {
                self.expect(TokenKind::LParen)?;
                self.expect(TokenKind::RParen)?;
                Ok(BodyStatement::Pt3dClear { line: token.line })
            }
            "nseg" => {
                self.expect(TokenKind::Equals)?;
                let value_token = self.peek().clone();
                let value = self.integer("nseg")?;
                if value == 0 {
                    return Err(Self::error_at(&value_token, "nseg must be at least 1"));
                }
                Ok(BodyStatement::Nseg {
                    value: value as u32,
                    line: token.line,
                })
            }
            other => Err(Self::error_at(
                &token,
                format!("unsupported section statement '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_list() {
        let statements = parse_statements("create soma[1], dend[3]").unwrap();
        assert_eq!(
            statements,
            vec![Statement::Create {
                declarations: vec![("soma".to_string(), 1), ("dend".to_string(), 3)],
                line: 1,
            }]
        );
    }

    #[test]
    fn test_create_requires_array() {
        let err = parse_statements("create soma").unwrap_err();
        assert!(matches!(err, MorphologyError::Syntax { line: 1, column: 8, .. }));

        let zero = parse_statements("create soma[0]").unwrap_err();
        assert!(matches!(zero, MorphologyError::Syntax { message, .. } if message.contains("at least 1")));
    }

    #[test]
    fn test_block_forms() {
        let statements = parse_statements(
            "soma[0] {\n  pt3dclear()\n  pt3dadd(1, 2, 3, 4)\n  nseg = 3\n}\ndend[2] pt3dadd(0, 0, -1.5, 0.5)",
        )
        .unwrap();
        assert_eq!(statements.len(), 2);

        match &statements[0] {
            Statement::Block { section, body } => {
                assert_eq!(section.id, SectionId::new("soma", 0));
                assert_eq!(
                    body,
                    &vec![
                        BodyStatement::Pt3dClear { line: 2 },
                        BodyStatement::Pt3dAdd { x: 1.0, y: 2.0, z: 3.0, diam: 4.0, line: 3 },
                        BodyStatement::Nseg { value: 3, line: 4 },
                    ]
                );
            }
            other => panic!("unexpected statement {:?}", other),
        }
        match &statements[1] {
            Statement::Block { section, body } => {
                assert_eq!(section.id.to_string(), "dend[2]");
                assert_eq!(section.line, 6);
                assert_eq!(body.len(), 1);
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_connect_defaults() {
        let statements = parse_statements("connect dend[1], dend[0]\nconnect dend[2](1), soma[0](0.5)").unwrap();
        match &statements[0] {
            Statement::Connect { child_position, parent_position, .. } => {
                assert_eq!(*child_position, DEFAULT_CHILD_POSITION);
                assert_eq!(*parent_position, DEFAULT_PARENT_POSITION);
            }
            other => panic!("unexpected statement {:?}", other),
        }
        match &statements[1] {
            Statement::Connect { child, child_position, parent, parent_position, line } => {
                assert_eq!(child.id.to_string(), "dend[2]");
                assert_eq!(*child_position, 1.0);
                assert_eq!(parent.id.to_string(), "soma[0]");
                assert_eq!(*parent_position, 0.5);
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            ("soma[0] { pt3dadd(1, 2, 3) }", "expected ','"),
            ("soma[0] { pt3dadd(1, 2, 3, 4)", "unclosed block"),
            ("pt3dadd(1, 2, 3, 4)", "must be applied to a section"),
            ("soma[0] { access }", "unsupported section statement"),
            ("connect dend[0](0) soma[0](1)", "expected ','"),
            ("soma[1.5] { }", "non-negative integer"),
            ("soma[0] { nseg = 0 }", "at least 1"),
            ("create nseg[1]", "reserved word"),
            ("create soma[1], connect[2]", "reserved word"),
            ("42", "expected a statement"),
        ];
        for (source, fragment) in cases {
            match parse_statements(source) {
                Err(MorphologyError::Syntax { message, .. }) => {
                    assert!(message.contains(fragment), "{:?}: {}", source, message)
                }
                other => panic!("{:?}: expected syntax error, got {:?}", source, other),
            }
        }
    }
}
