use crate::string_interner::Symbol;
use crate::types::{Primitive, TypeDescriptor};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Handle to a resolved type in a `TypeInterner`. This is the "metadata" a
/// caller can hold on to and query again without re-resolving the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeToken(u32);

/// Structural identity of a resolved type. Two type expressions that resolve
/// to the same key share one descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    Primitive(Primitive),
    Tuple(Vec<TypeToken>),
    Struct { decl: Symbol, args: Vec<TypeToken> },
}

/// Append-only cache of resolved descriptors. Descriptors are never mutated
/// once added, so the `Arc`s handed out can be shared freely across threads.
#[derive(Default)]
pub struct TypeInterner {
    tokens: HashMap<CanonicalType, TypeToken>,
    types: Vec<Arc<TypeDescriptor>>,
}

impl TypeInterner {
    pub fn new() -> TypeInterner {
        TypeInterner {
            tokens: HashMap::new(),
            types: Vec::new(),
        }
    }

    /// Intern `ty` under `key`. If `key` is already present the existing
    /// token is returned and `ty` is dropped.
    pub fn add(&mut self, key: CanonicalType, ty: TypeDescriptor) -> TypeToken {
        if let Some(tok) = self.tokens.get(&key) {
            return *tok;
        }

        let tok = TypeToken(self.types.len() as u32);

        trace!(name = %ty.name, ?tok, "caching type descriptor");

        self.types.push(Arc::new(ty));
        self.tokens.insert(key, tok);

        tok
    }

    pub fn find_token(&self, key: &CanonicalType) -> Option<TypeToken> {
        self.tokens.get(key).copied()
    }

    pub fn get(&self, tok: TypeToken) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(tok.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
