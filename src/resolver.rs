//! Turns type expressions into concrete, laid-out `TypeDescriptor`s.
//!
//! Resolution happens in two phases. Generic arguments are substituted first,
//! producing member types that are all concrete. Only then are member layouts
//! fed to `layout::layout_sequential`, which never sees a generic parameter.

use crate::ast::{TypeExpr, TypeExprKind};
use crate::declarations::{DeclarationTable, StructDecl};
use crate::error::ResolveError;
use crate::layout::{layout_sequential, LayoutData, LayoutResult};
use crate::parser::MAX_NESTING;
use crate::string_interner::{StringInterner, Symbol};
use crate::target::Target;
use crate::type_interner::{CanonicalType, TypeInterner, TypeToken};
use crate::types::{MemberDescriptor, Primitive, TypeDescriptor, TypeKind};
use nohash_hasher::IntMap;
use std::sync::Arc;
use tracing::debug;

type Result<T> = std::result::Result<T, ResolveError>;

/// Struct instantiations nested deeper than this are rejected. Catches
/// declarations like `G<T> { x: G<(T, Bool)> }` whose expansion never repeats.
pub const MAX_DEPTH: usize = 64;

/// Longest canonical name a resolved type may have. Instantiations whose
/// arguments grow geometrically, like `G<T> { x: G<(T, T)> }`, hit this long
/// before `MAX_DEPTH`.
pub const MAX_NAME_LEN: usize = 4096;

/// Generic parameter bindings in scope while resolving a struct's fields.
pub type Substitutions = IntMap<Symbol, TypeToken>;

pub struct Resolver<'a> {
    symbols: &'a StringInterner,
    declarations: &'a DeclarationTable,
    types: &'a mut TypeInterner,
    target: Target,

    // Struct instantiations currently being resolved, outermost first.
    history: Vec<(CanonicalType, String)>,

    // Type expressions currently being resolved, across struct boundaries.
    depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(
        symbols: &'a StringInterner,
        declarations: &'a DeclarationTable,
        types: &'a mut TypeInterner,
        target: Target,
    ) -> Resolver<'a> {
        Resolver {
            symbols,
            declarations,
            types,
            target,
            history: Vec::new(),
            depth: 0,
        }
    }

    pub fn resolve(&mut self, expr: &TypeExpr) -> Result<TypeToken> {
        self.history.clear();
        self.depth = 0;
        self.resolve_in(expr, &Substitutions::default())
    }

    fn resolve_in(&mut self, expr: &TypeExpr, env: &Substitutions) -> Result<TypeToken> {
        if self.depth >= MAX_NESTING {
            return Err(ResolveError::NestingTooDeep(MAX_NESTING));
        }

        self.depth += 1;
        let tok = match &expr.kind {
            TypeExprKind::Named { name, args } => self.resolve_named(*name, args, env),
            TypeExprKind::Tuple(elements) => self.resolve_tuple(elements, env),
        };
        self.depth -= 1;

        tok
    }

    fn resolve_named(
        &mut self,
        name: Symbol,
        args: &[TypeExpr],
        env: &Substitutions,
    ) -> Result<TypeToken> {
        let symbols = self.symbols;
        let declarations = self.declarations;
        let text = symbols.get(&name);

        // Generic parameters shadow everything else.
        if let Some(tok) = env.get(&name) {
            if !args.is_empty() {
                return Err(ResolveError::NotGeneric(text.to_string()));
            }
            return Ok(*tok);
        }

        if let Some(prim) = Primitive::from_name(text) {
            if !args.is_empty() {
                return Err(ResolveError::NotGeneric(text.to_string()));
            }
            return Ok(self.intern_primitive(prim));
        }

        let Some(decl) = declarations.get(&name) else {
            return Err(ResolveError::UnknownType(text.to_string()));
        };

        if decl.generic_params.len() != args.len() {
            return Err(ResolveError::GenericArity {
                name: text.to_string(),
                expected: decl.generic_params.len(),
                found: args.len(),
            });
        }

        let arg_tokens = args
            .iter()
            .map(|arg| self.resolve_in(arg, env))
            .collect::<Result<Vec<_>>>()?;

        self.instantiate(decl, arg_tokens)
    }

    fn instantiate(&mut self, decl: &StructDecl, args: Vec<TypeToken>) -> Result<TypeToken> {
        let key = CanonicalType::Struct {
            decl: decl.name,
            args: args.clone(),
        };

        if let Some(tok) = self.types.find_token(&key) {
            return Ok(tok);
        }

        if let Some(idx) = self.history.iter().position(|(k, _)| *k == key) {
            let mut cycle: Vec<String> = self.history[idx..]
                .iter()
                .map(|(_, n)| n.clone())
                .collect();
            cycle.push(self.history[idx].1.clone());
            return Err(ResolveError::RecursiveType(cycle));
        }

        if self.history.len() >= MAX_DEPTH {
            return Err(ResolveError::DepthLimit(MAX_DEPTH));
        }

        let name = self.instance_name(decl.name, &args)?;

        debug!(%name, "instantiating struct");

        // Phase one: substitute and resolve every field to a concrete type.
        let env: Substitutions = decl
            .generic_params
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();

        self.history.push((key.clone(), name.clone()));
        let fields = decl
            .fields
            .iter()
            .map(|field| {
                self.resolve_in(&field.ty, &env)
                    .map(|tok| (Some(field.name), tok))
            })
            .collect::<Result<Vec<_>>>();
        self.history.pop();

        // Phase two: lay out the resolved members.
        let descriptor = self.aggregate(name, TypeKind::Struct { decl: decl.name }, fields?);

        Ok(self.types.add(key, descriptor))
    }

    fn resolve_tuple(&mut self, elements: &[TypeExpr], env: &Substitutions) -> Result<TypeToken> {
        let tokens = elements
            .iter()
            .map(|element| self.resolve_in(element, env))
            .collect::<Result<Vec<_>>>()?;

        let key = CanonicalType::Tuple(tokens.clone());
        if let Some(tok) = self.types.find_token(&key) {
            return Ok(tok);
        }

        let name = self.canonical_name("", ('(', ')'), &tokens)?;
        let members = tokens.into_iter().map(|tok| (None, tok)).collect();
        let descriptor = self.aggregate(name, TypeKind::Tuple, members);

        Ok(self.types.add(key, descriptor))
    }

    fn intern_primitive(&mut self, prim: Primitive) -> TypeToken {
        let key = CanonicalType::Primitive(prim);
        if let Some(tok) = self.types.find_token(&key) {
            return tok;
        }

        let descriptor = TypeDescriptor {
            name: prim.name(),
            kind: TypeKind::Primitive(prim),
            members: Vec::new(),
            layout: LayoutResult::atom(prim.layout(&self.target)),
        };

        self.types.add(key, descriptor)
    }

    fn aggregate(
        &self,
        name: String,
        kind: TypeKind,
        members: Vec<(Option<Symbol>, TypeToken)>,
    ) -> TypeDescriptor {
        let member_types: Vec<Arc<TypeDescriptor>> = members
            .iter()
            .map(|(_, tok)| self.descriptor(*tok))
            .collect();

        let data: Vec<LayoutData> = member_types.iter().map(|ty| ty.layout.data()).collect();
        let layout = layout_sequential(&data);

        let members = members
            .into_iter()
            .zip(member_types)
            .enumerate()
            .map(|(index, ((member_name, _), ty))| MemberDescriptor {
                name: member_name,
                index,
                ty,
                offset: layout.offsets[index],
            })
            .collect();

        TypeDescriptor {
            name,
            kind,
            members,
            layout,
        }
    }

    fn descriptor(&self, tok: TypeToken) -> Arc<TypeDescriptor> {
        self.types
            .get(tok)
            .cloned()
            .expect("resolved tokens come from this interner")
    }

    fn instance_name(&self, decl: Symbol, args: &[TypeToken]) -> Result<String> {
        let base = self.symbols.get(&decl);

        if args.is_empty() {
            Ok(base.to_string())
        } else {
            self.canonical_name(base, ('<', '>'), args)
        }
    }

    // Length is checked before anything is allocated.
    fn canonical_name(
        &self,
        base: &str,
        (open, close): (char, char),
        tokens: &[TypeToken],
    ) -> Result<String> {
        let parts: Vec<Arc<TypeDescriptor>> =
            tokens.iter().map(|tok| self.descriptor(*tok)).collect();

        let len = base.len() + 2 + parts.iter().map(|ty| ty.name.len() + 2).sum::<usize>();
        if len > MAX_NAME_LEN {
            return Err(ResolveError::NameTooLong(MAX_NAME_LEN));
        }

        let mut name = String::with_capacity(len);
        name.push_str(base);
        name.push(open);
        for (i, ty) in parts.iter().enumerate() {
            if i > 0 {
                name.push_str(", ");
            }
            name.push_str(&ty.name);
        }
        name.push(close);

        Ok(name)
    }
}
