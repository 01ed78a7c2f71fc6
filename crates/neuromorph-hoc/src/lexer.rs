// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Tokenizer for the HOC morphology subset.

Whitespace (including newlines), `// line` comments and `/* block */`
comments are skipped. Numbers may carry a sign, a fractional part and an
exponent; there is no arithmetic, so a leading `-` always belongs to the
number that follows it.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use neuromorph_structures::{MorphologyError, MorphologyResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Number(f64),
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Equals,
    Eof,
}

impl TokenKind {
    /// Human-readable form used in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Number(value) => format!("number {}", value),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token with its 1-based source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Tokenize `source`. The returned vector always ends with [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> MorphologyResult<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Character after the next one, without consuming anything
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> MorphologyError {
        MorphologyError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn run(mut self) -> MorphologyResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    column,
                });
                return Ok(tokens);
            };

            let kind = match c {
                '[' | ']' | '(' | ')' | '{' | '}' | ',' | '=' => {
                    self.bump();
                    match c {
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        ',' => TokenKind::Comma,
                        _ => TokenKind::Equals,
                    }
                }
                c if c.is_ascii_alphabetic() || c == '_' => TokenKind::Ident(self.identifier()),
                c if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' => {
                    TokenKind::Number(self.number(line, column)?)
                }
                other => {
                    return Err(self.error(line, column, format!("unexpected character '{}'", other)));
                }
            };
            tokens.push(Token { kind, line, column });
        }
    }

    fn skip_trivia(&mut self) -> MorphologyResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || c == ';' => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    let mut previous = '\0';
                    loop {
                        match self.bump() {
                            Some('/') if previous == '*' => break,
                            Some(c) => previous = c,
                            None => return Err(self.error(line, column, "unterminated block comment")),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    fn number(&mut self, line: usize, column: usize) -> MorphologyResult<f64> {
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek() {
            text.push(sign);
            self.bump();
        }
        self.digits(&mut text);
        if self.peek() == Some('.') {
            text.push('.');
            self.bump();
            self.digits(&mut text);
        }
        if let Some(e @ ('e' | 'E')) = self.peek() {
            text.push(e);
            self.bump();
            if let Some(sign @ ('-' | '+')) = self.peek() {
                text.push(sign);
                self.bump();
            }
            self.digits(&mut text);
        }

        text.parse::<f64>()
            .map_err(|_| self.error(line, column, format!("malformed number '{}'", text)))
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_statement_tokens() {
        assert_eq!(
            kinds("connect dend[0](0), soma[0](1)"),
            vec![
                TokenKind::Ident("connect".into()),
                TokenKind::Ident("dend".into()),
                TokenKind::LBracket,
                TokenKind::Number(0.0),
                TokenKind::RBracket,
                TokenKind::LParen,
                TokenKind::Number(0.0),
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Ident("soma".into()),
                TokenKind::LBracket,
                TokenKind::Number(0.0),
                TokenKind::RBracket,
                TokenKind::LParen,
                TokenKind::Number(1.0),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("-1.5 +2 .25 3. 1e3 -2.5E-2"),
            vec![
                TokenKind::Number(-1.5),
                TokenKind::Number(2.0),
                TokenKind::Number(0.25),
                TokenKind::Number(3.0),
                TokenKind::Number(1000.0),
                TokenKind::Number(-0.025),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_number() {
        let err = tokenize("pt3dadd(-, 1)").unwrap_err();
        assert_eq!(
            err,
            MorphologyError::Syntax {
                line: 1,
                column: 9,
                message: "malformed number '-'".to_string()
            }
        );
    }

    #[test]
    fn test_comments_and_locations() {
        let tokens = tokenize("/* header\n spans lines */\ncreate // trailing\n  soma[1]").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident("create".into()));
        assert_eq!((tokens[0].line, tokens[0].column), (3, 1));
        assert_eq!(tokens[1].kind, TokenKind::Ident("soma".into()));
        assert_eq!((tokens[1].line, tokens[1].column), (4, 3));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("create soma[1]\n/* never closed").unwrap_err();
        assert!(matches!(err, MorphologyError::Syntax { line: 2, column: 1, .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("soma[0] { pt3dadd(0, 0, 0, 1) } @").unwrap_err();
        assert!(matches!(err, MorphologyError::Syntax { message, .. } if message.contains('@')));
    }
}
