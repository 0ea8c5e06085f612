use crate::ast::*;
use crate::error::ParseError;
use crate::string_interner::StringInterner;
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use std::iter::Peekable;

type Result<T> = std::result::Result<T, ParseError>;

/// Deepest tuple or generic-argument nesting a type expression may have.
pub const MAX_NESTING: usize = 256;

pub struct Parser<'a> {
    tokens: Peekable<Tokenizer<'a>>,
    depth: usize,
}

macro_rules! expect_token {
    // The pattern matching code for `pattern` is taken from:
    // https://doc.rust-lang.org/src/core/macros/mod.rs.html#342
    ($token:expr, $(|)? $( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => {
        match $token {
            Some(tok) => {
                if matches!(tok.kind, $( $pattern )|+ $( if $guard )?) {
                    Ok(tok)
                } else {
                    Err(ParseError::UnexpectedToken {
                        span: tok.span,
                        found: tok.kind.into(),
                    })
                }
            }
            None => Err(ParseError::UnexpectedEnd),
        }
    };
}

impl Parser<'_> {
    pub fn new<'a>(source: &'a str, string_interner: &'a mut StringInterner) -> Parser<'a> {
        Parser {
            tokens: Tokenizer::new(source, string_interner).peekable(),
            depth: 0,
        }
    }

    /// Parse one type expression and require that nothing follows it.
    pub fn parse_complete(&mut self) -> Result<TypeExpr> {
        let ty = self.parse_type()?;

        if let Some(tok) = self.tokens.next() {
            return Err(ParseError::UnexpectedToken {
                span: tok.span,
                found: tok.kind.into(),
            });
        }

        Ok(ty)
    }

    fn parse_type(&mut self) -> Result<TypeExpr> {
        use TokenKind::*;

        let tok = expect_token!(self.tokens.next(), Identifier(_) | ParenOpen)?;

        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                span: tok.span,
                limit: MAX_NESTING,
            });
        }

        self.depth += 1;
        let ty = match tok.kind {
            Identifier(_) => self.parse_named(tok),
            ParenOpen => self.parse_tuple(tok),
            _ => unreachable!(),
        };
        self.depth -= 1;

        ty
    }

    fn parse_named(&mut self, name_token: Token) -> Result<TypeExpr> {
        use TokenKind::*;

        let Identifier(name) = name_token.kind else {
            unreachable!()
        };

        let mut span = name_token.span;
        let mut args = Vec::new();

        if matches!(self.tokens.peek().map(|tok| tok.kind), Some(AngleOpen)) {
            self.tokens.next();

            loop {
                args.push(self.parse_type()?);

                let tok = expect_token!(self.tokens.next(), Comma | AngleClose)?;
                if matches!(tok.kind, AngleClose) {
                    span = span.extend(&tok.span);
                    break;
                }
            }
        }

        Ok(TypeExpr {
            span,
            kind: TypeExprKind::Named { name, args },
        })
    }

    fn parse_tuple(&mut self, open: Token) -> Result<TypeExpr> {
        use TokenKind::*;

        let mut elements = Vec::new();
        let mut saw_comma = false;

        let peeked = expect_token!(self.tokens.peek().copied(), _)?;
        let close = if matches!(peeked.kind, ParenClose) {
            self.tokens.next();
            peeked
        } else {
            loop {
                elements.push(self.parse_type()?);

                let tok = expect_token!(self.tokens.next(), Comma | ParenClose)?;
                if matches!(tok.kind, ParenClose) {
                    break tok;
                }
                saw_comma = true;
            }
        };

        if elements.len() == 1 && !saw_comma {
            return Ok(elements.remove(0));
        }

        Ok(TypeExpr {
            span: open.span.extend(&close.span),
            kind: TypeExprKind::Tuple(elements),
        })
    }
}

pub fn parse_type_expr(source: &str, symbols: &mut StringInterner) -> Result<TypeExpr> {
    Parser::new(source, symbols).parse_complete()
}
