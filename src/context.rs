use crate::{
    declarations::{DeclarationTable, StructSource},
    error::Error,
    parser::parse_type_expr,
    query::{self, QueryOutcome},
    resolver::Resolver,
    string_interner::StringInterner,
    target::Target,
    type_interner::{TypeInterner, TypeToken},
    types::TypeDescriptor,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub target: Target,
}

/// Owns the declaration table and the descriptor cache. Every query goes
/// through here.
pub struct Context {
    pub symbols: StringInterner,
    pub declarations: DeclarationTable,
    pub type_tokens: TypeInterner,
    target: Target,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::with_options(&Options::default())
    }

    pub fn with_options(options: &Options) -> Self {
        Context {
            symbols: StringInterner::new(),
            declarations: DeclarationTable::new(),
            type_tokens: TypeInterner::new(),
            target: options.target,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Add the structs of a RON declaration file. Returns how many were added.
    pub fn load_declarations(&mut self, source: &str) -> Result<usize, Error> {
        Ok(self.declarations.load_ron(source, &mut self.symbols)?)
    }

    pub fn declare_struct(&mut self, source: StructSource) -> Result<(), Error> {
        self.declarations.declare(source, &mut self.symbols)?;
        Ok(())
    }

    /// Resolve a type expression to its cached metadata token.
    pub fn resolve(&mut self, type_source: &str) -> Result<TypeToken, Error> {
        let expr = parse_type_expr(type_source, &mut self.symbols)?;

        let mut resolver = Resolver::new(
            &self.symbols,
            &self.declarations,
            &mut self.type_tokens,
            self.target,
        );

        Ok(resolver.resolve(&expr)?)
    }

    pub fn metadata(&self, tok: TypeToken) -> Result<Arc<TypeDescriptor>, Error> {
        self.type_tokens
            .get(tok)
            .cloned()
            .ok_or(Error::UnknownMetadata(tok))
    }

    /// Offset of member `key` in the type spelled by `type_source`.
    ///
    /// The outer `Result` fails only when the type itself cannot be parsed or
    /// resolved. A missing member is a normal outcome and comes back as
    /// `Ok(Err(QueryError::MemberNotFound(..)))`.
    pub fn member_offset(&mut self, type_source: &str, key: &str) -> Result<QueryOutcome, Error> {
        debug!(ty = type_source, key, "member offset query");

        let tok = self.resolve(type_source)?;
        let ty = self.metadata(tok)?;

        Ok(query::member_offset(&ty, key, &self.symbols))
    }

    /// Same lookup as `member_offset`, but starting from metadata that has
    /// already been resolved. Nothing is parsed or resolved again.
    pub fn member_offset_of_metadata(
        &self,
        tok: TypeToken,
        key: &str,
    ) -> Result<QueryOutcome, Error> {
        let ty = self.metadata(tok)?;

        debug!(ty = %ty.name, key, "member offset query via metadata");

        Ok(query::member_offset(&ty, key, &self.symbols))
    }

    pub fn describe(&mut self, type_source: &str) -> Result<String, Error> {
        let tok = self.resolve(type_source)?;
        let ty = self.metadata(tok)?;

        Ok(query::describe(&ty, &self.symbols))
    }
}
