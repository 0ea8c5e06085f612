use crate::source_location::{SourceLocation, SourceSpan};
use crate::string_interner::{StringInterner, Symbol};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub span: SourceSpan,
    pub kind: TokenKind,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(Symbol),

    ParenOpen,
    ParenClose,

    AngleOpen,
    AngleClose,

    Comma,

    // Anything the type grammar has no use for. The parser reports it.
    Unrecognized(char),
}

impl From<TokenKind> for &'static str {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::ParenOpen => "(",
            TokenKind::ParenClose => ")",
            TokenKind::AngleOpen => "<",
            TokenKind::AngleClose => ">",
            TokenKind::Comma => ",",
            TokenKind::Unrecognized(_) => "unrecognized character",
        }
    }
}

pub struct Tokenizer<'a> {
    source: &'a str,
    iter: Peekable<Chars<'a>>,
    loc: SourceLocation,
    offset: usize,
    str_interner: &'a mut StringInterner,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str, str_interner: &'a mut StringInterner) -> Self {
        Tokenizer {
            source,
            iter: source.chars().peekable(),
            loc: SourceLocation::start(),
            offset: 0,
            str_interner,
        }
    }

    fn advance(&mut self) -> Option<(usize, SourceLocation, char)> {
        let c = self.iter.next()?;

        let offset = self.offset;
        let loc = self.loc;

        if c == '\n' {
            self.loc.line += 1;
            self.loc.col = 1;
        } else {
            self.loc.col += 1;
        }

        self.offset += c.len_utf8();

        Some((offset, loc, c))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.iter.peek() {
            if !c.is_whitespace() {
                break;
            }

            self.advance();
        }
    }

    // Return str offset and location of the last character of the identifier.
    fn read_identifier(&mut self, start: SourceLocation) -> (usize, SourceLocation) {
        let mut last = start;

        while let Some(c) = self.iter.peek() {
            if !is_identifier_rest_char(*c) {
                break;
            }

            if let Some((_, loc, _)) = self.advance() {
                last = loc;
            }
        }

        (self.offset, last)
    }
}

fn is_identifier_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_rest_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let (offset, start, c) = self.advance()?;

        #[rustfmt::skip]
        let tok = match c {
            _ if is_identifier_start_char(c) => {
                let (end_offset, end) = self.read_identifier(start);
                let sym = self.str_interner.add(&self.source[offset..end_offset]);

                Token {
                    span: SourceSpan { start, end },
                    kind: TokenKind::Identifier(sym),
                }
            }

            '(' => Token { span: SourceSpan::single(start), kind: TokenKind::ParenOpen, },
            ')' => Token { span: SourceSpan::single(start), kind: TokenKind::ParenClose, },
            '<' => Token { span: SourceSpan::single(start), kind: TokenKind::AngleOpen, },
            '>' => Token { span: SourceSpan::single(start), kind: TokenKind::AngleClose, },
            ',' => Token { span: SourceSpan::single(start), kind: TokenKind::Comma, },

            _ => Token { span: SourceSpan::single(start), kind: TokenKind::Unrecognized(c), },
        };

        Some(tok)
    }
}
