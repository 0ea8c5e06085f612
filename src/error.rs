use crate::source_location::SourceSpan;
use crate::type_interner::TypeToken;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of type expression")]
    UnexpectedEnd,

    #[error("unexpected token \"{found}\" at {span}")]
    UnexpectedToken {
        span: SourceSpan,
        found: &'static str,
    },

    #[error("type expression nests deeper than {limit} levels at {span}")]
    NestingTooDeep { span: SourceSpan, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot find type '{0}'")]
    UnknownType(String),

    #[error("type '{name}' expects {expected} generic argument(s), found {found}")]
    GenericArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("type '{0}' does not take generic arguments")]
    NotGeneric(String),

    /// Names along the cycle, starting and ending with the same struct.
    #[error("type contains itself by value: {}", .0.join(" -> "))]
    RecursiveType(Vec<String>),

    #[error("struct instantiations nest deeper than {0} levels")]
    DepthLimit(usize),

    #[error("type nests deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("canonical type name exceeds {0} bytes")]
    NameTooLong(usize),
}

#[derive(Debug, Error)]
pub enum DeclarationError {
    #[error("malformed declaration file: {0}")]
    Syntax(#[from] ron::error::SpannedError),

    #[error("field '{field}' of '{struct_name}' has an invalid type: {source}")]
    FieldType {
        struct_name: String,
        field: String,
        source: ParseError,
    },

    #[error("'{0}' is not a valid type name")]
    InvalidName(String),

    #[error("struct '{0}' is declared twice")]
    DuplicateStruct(String),

    #[error("struct '{0}' shadows a primitive type")]
    ShadowsPrimitive(String),

    #[error("struct '{struct_name}' declares field '{field}' twice")]
    DuplicateField { struct_name: String, field: String },

    #[error("struct '{struct_name}' declares generic parameter '{param}' twice")]
    DuplicateGenericParam { struct_name: String, param: String },
}

/// The one per-query outcome that is not a failure of the tool itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("type has no member named '{0}'")]
    MemberNotFound(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error("no type metadata for {0:?}")]
    UnknownMetadata(TypeToken),
}
