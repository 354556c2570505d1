//! Tokenizer for the DOT language.
//!
//! Comments (`//`, `/* */` and `#` lines) and whitespace are dropped here.
//! Quoted strings joined with `+` come out as a single token.

use super::error::DotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// An identifier, numeral, quoted string or HTML string. `quoted` is set
    /// for the last two, which can never be keywords.
    Id { text: String, quoted: bool },
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Colon,
    Equals,
    /// `->`
    Arrow,
    /// `--`
    DashDash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Cursor state. Copied to backtrack over whitespace when looking for `+`.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
}

struct Lexer {
    chars: Vec<char>,
    cursor: Cursor,
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, DotError> {
    let mut lexer = Lexer {
        chars: input.chars().collect(),
        cursor: Cursor {
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
        },
    };
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor.pos).copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.chars.get(self.cursor.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor.pos += 1;
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
            self.cursor.at_line_start = true;
        } else {
            self.cursor.column += 1;
            if !c.is_whitespace() {
                self.cursor.at_line_start = false;
            }
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> DotError {
        DotError::syntax(self.cursor.line, self.cursor.column, message)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_trivia(&mut self) -> Result<(), DotError> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                // C preprocessor output lines.
                '#' if self.cursor.at_line_start => self.skip_line(),
                '/' if self.peek_second() == Some('/') => self.skip_line(),
                '/' if self.peek_second() == Some('*') => {
                    let (line, column) = (self.cursor.line, self.cursor.column);
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(DotError::syntax(
                                    line,
                                    column,
                                    "unterminated block comment",
                                ));
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<Option<Token>, DotError> {
        self.skip_trivia()?;
        let (line, column) = (self.cursor.line, self.cursor.column);
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '{' | '}' | '[' | ']' | ';' | ',' | ':' | '=' => {
                self.bump();
                match c {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ';' => TokenKind::Semi,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    _ => TokenKind::Equals,
                }
            }
            '-' => match self.peek_second() {
                Some('>') => {
                    self.bump();
                    self.bump();
                    TokenKind::Arrow
                }
                Some('-') => {
                    self.bump();
                    self.bump();
                    TokenKind::DashDash
                }
                Some(d) if d.is_ascii_digit() || d == '.' => self.numeral()?,
                _ => return Err(self.error("expected `->`, `--` or a numeral")),
            },
            '"' => self.quoted()?,
            '<' => self.html()?,
            c if c.is_ascii_digit() || c == '.' => self.numeral()?,
            c if is_id_start(c) => {
                let mut text = String::new();
                while let Some(c) = self.peek().filter(|&c| is_id_continue(c)) {
                    text.push(c);
                    self.bump();
                }
                TokenKind::Id {
                    text,
                    quoted: false,
                }
            }
            other => {
                return Err(self.error(format!("unexpected character `{other}`")));
            }
        };

        Ok(Some(Token { kind, line, column }))
    }

    fn numeral(&mut self) -> Result<TokenKind, DotError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        let mut seen_dot = false;
        let mut digits = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits += 1;
            } else if c == '.' && !seen_dot {
                seen_dot = true;
            } else {
                break;
            }
            text.push(c);
            self.bump();
        }
        if digits == 0 {
            return Err(self.error("numeral has no digits"));
        }
        Ok(TokenKind::Id {
            text,
            quoted: false,
        })
    }

    /// Reads one quoted string, plus any `+ "..."` continuations.
    fn quoted(&mut self) -> Result<TokenKind, DotError> {
        let mut text = self.quoted_part()?;
        loop {
            let saved = self.cursor;
            self.skip_trivia()?;
            if self.peek() != Some('+') {
                self.cursor = saved;
                break;
            }
            self.bump();
            self.skip_trivia()?;
            if self.peek() != Some('"') {
                return Err(self.error("expected a quoted string after `+`"));
            }
            text.push_str(&self.quoted_part()?);
        }
        Ok(TokenKind::Id { text, quoted: true })
    }

    fn quoted_part(&mut self) -> Result<String, DotError> {
        let (line, column) = (self.cursor.line, self.cursor.column);
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.peek() {
                    // An escaped backslash cannot escape what follows it.
                    Some('\\') => {
                        self.bump();
                        text.push_str("\\\\");
                    }
                    Some('"') => {
                        self.bump();
                        text.push('"');
                    }
                    // Line continuation.
                    Some('\n') => {
                        self.bump();
                    }
                    Some('\r') if self.peek_second() == Some('\n') => {
                        self.bump();
                        self.bump();
                    }
                    _ => text.push('\\'),
                },
                Some(c) => text.push(c),
                None => {
                    return Err(DotError::syntax(
                        line,
                        column,
                        "unterminated quoted string",
                    ));
                }
            }
        }
    }

    /// Reads `<...>` with balanced angle brackets; the outer pair is dropped.
    fn html(&mut self) -> Result<TokenKind, DotError> {
        let (line, column) = (self.cursor.line, self.cursor.column);
        self.bump();
        let mut depth = 1usize;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('<') => depth += 1,
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(TokenKind::Id { text, quoted: true });
                    }
                }
                Some(_) => {}
                None => {
                    return Err(DotError::syntax(
                        line,
                        column,
                        "unterminated HTML string",
                    ));
                }
            }
            if let Some(c) = self.chars.get(self.cursor.pos - 1) {
                text.push(*c);
            }
        }
    }
}
