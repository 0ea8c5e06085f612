//! The table of nominal struct declarations types are resolved against.
//!
//! Declarations are loaded once, up front, from a RON file or built in code.
//! Field types are kept as unresolved type expressions; they are only
//! resolved, with generic arguments substituted, when a concrete
//! instantiation is queried.

use crate::ast::TypeExpr;
use crate::error::DeclarationError;
use crate::parser::parse_type_expr;
use crate::string_interner::{StringInterner, Symbol};
use crate::types::Primitive;
use nohash_hasher::{IntMap, IntSet};
use serde::Deserialize;
use tracing::debug;

/// On-disk shape of a declaration file.
#[derive(Debug, Default, Deserialize)]
pub struct DeclarationFile {
    #[serde(default)]
    pub structs: Vec<StructSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructSource {
    pub name: String,
    #[serde(default)]
    pub generic_params: Vec<String>,
    pub fields: Vec<FieldSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSource {
    pub name: String,
    pub ty: String,
}

impl StructSource {
    pub fn new(name: &str) -> StructSource {
        StructSource {
            name: name.to_string(),
            generic_params: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn generic_param(mut self, name: &str) -> StructSource {
        self.generic_params.push(name.to_string());
        self
    }

    pub fn field(mut self, name: &str, ty: &str) -> StructSource {
        self.fields.push(FieldSource {
            name: name.to_string(),
            ty: ty.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: Symbol,
    pub generic_params: Vec<Symbol>,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: Symbol,
    pub ty: TypeExpr,
}

#[derive(Default)]
pub struct DeclarationTable {
    structs: IntMap<Symbol, StructDecl>,
}

impl DeclarationTable {
    pub fn new() -> DeclarationTable {
        DeclarationTable {
            structs: IntMap::default(),
        }
    }

    pub fn get(&self, name: &Symbol) -> Option<&StructDecl> {
        self.structs.get(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    pub fn declare(
        &mut self,
        source: StructSource,
        symbols: &mut StringInterner,
    ) -> Result<Symbol, DeclarationError> {
        let decl = self.build(&source, symbols)?;
        let name = decl.name;

        self.structs.insert(name, decl);

        Ok(name)
    }

    /// Load every struct in `source`. Either all of them are added or, on
    /// the first invalid one, none are.
    pub fn load_ron(
        &mut self,
        source: &str,
        symbols: &mut StringInterner,
    ) -> Result<usize, DeclarationError> {
        let file: DeclarationFile = ron::from_str(source)?;

        let mut pending: Vec<StructDecl> = Vec::with_capacity(file.structs.len());
        let mut pending_names = IntSet::default();

        for source in &file.structs {
            let decl = self.build(source, symbols)?;

            if !pending_names.insert(decl.name) {
                return Err(DeclarationError::DuplicateStruct(source.name.clone()));
            }

            pending.push(decl);
        }

        let count = pending.len();
        for decl in pending {
            self.structs.insert(decl.name, decl);
        }

        debug!(count, "loaded struct declarations");

        Ok(count)
    }

    fn build(
        &self,
        source: &StructSource,
        symbols: &mut StringInterner,
    ) -> Result<StructDecl, DeclarationError> {
        let struct_name = &source.name;

        check_identifier(struct_name)?;

        if Primitive::from_name(struct_name).is_some() {
            return Err(DeclarationError::ShadowsPrimitive(struct_name.clone()));
        }

        let name = symbols.add(struct_name);
        if self.structs.contains_key(&name) {
            return Err(DeclarationError::DuplicateStruct(struct_name.clone()));
        }

        let mut generic_params = Vec::with_capacity(source.generic_params.len());
        for param in &source.generic_params {
            check_identifier(param)?;

            let sym = symbols.add(param);
            if generic_params.contains(&sym) {
                return Err(DeclarationError::DuplicateGenericParam {
                    struct_name: struct_name.clone(),
                    param: param.clone(),
                });
            }
            generic_params.push(sym);
        }

        let mut fields: Vec<FieldDecl> = Vec::with_capacity(source.fields.len());
        for field in &source.fields {
            check_identifier(&field.name)?;

            let field_name = symbols.add(&field.name);
            if fields.iter().any(|f| f.name == field_name) {
                return Err(DeclarationError::DuplicateField {
                    struct_name: struct_name.clone(),
                    field: field.name.clone(),
                });
            }

            let ty = parse_type_expr(&field.ty, symbols).map_err(|err| {
                DeclarationError::FieldType {
                    struct_name: struct_name.clone(),
                    field: field.name.clone(),
                    source: err,
                }
            })?;

            fields.push(FieldDecl {
                name: field_name,
                ty,
            });
        }

        Ok(StructDecl {
            name,
            generic_params,
            fields,
        })
    }
}

// Same rule the tokenizer applies, so every declared name can be written in
// a type expression and no field name can be mistaken for a tuple index.
fn check_identifier(name: &str) -> Result<(), DeclarationError> {
    let mut chars = name.chars();

    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DeclarationError::InvalidName(name.to_string()))
    }
}
