use crate::error::QueryError;
use crate::string_interner::StringInterner;
use crate::types::{MemberDescriptor, TypeDescriptor, TypeKind};
use std::fmt;
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl<'a> MemberKey<'a> {
    /// All-digit keys are tuple indices, anything else is a field name.
    pub fn parse(key: &'a str) -> MemberKey<'a> {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = key.parse() {
                return MemberKey::Index(index);
            }
        }

        MemberKey::Name(key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoundOffset(pub u64);

impl fmt::Display for FoundOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "found offset: {}", self.0)
    }
}

pub type QueryOutcome = Result<FoundOffset, QueryError>;

/// The single line a query prints, success or not.
pub fn render_outcome(outcome: &QueryOutcome) -> String {
    match outcome {
        Ok(found) => found.to_string(),
        Err(err) => err.to_string(),
    }
}

pub fn find_member<'t>(
    ty: &'t TypeDescriptor,
    key: &str,
    symbols: &StringInterner,
) -> Result<&'t MemberDescriptor, QueryError> {
    let member = match (&ty.kind, MemberKey::parse(key)) {
        (TypeKind::Tuple, MemberKey::Index(index)) => ty.member_by_index(index),
        (TypeKind::Struct { .. }, MemberKey::Name(name)) => symbols
            .find_symbol(name)
            .and_then(|sym| ty.member_by_name(sym)),
        _ => None,
    };

    member.ok_or_else(|| QueryError::MemberNotFound(key.to_string()))
}

pub fn member_offset(ty: &TypeDescriptor, key: &str, symbols: &StringInterner) -> QueryOutcome {
    find_member(ty, key, symbols).map(|member| FoundOffset(member.offset))
}

/// Multi-line dump of a type's layout, one member per line.
pub fn describe(ty: &TypeDescriptor, symbols: &StringInterner) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}: size {}, align {}, stride {}",
        ty.name, ty.layout.byte_size, ty.layout.align, ty.layout.stride
    );

    for member in &ty.members {
        let label = match member.name {
            Some(sym) => symbols.get(&sym).to_string(),
            None => member.index.to_string(),
        };

        let _ = writeln!(
            out,
            "  {label}: {} at offset {} (size {}, align {})",
            member.ty.name, member.offset, member.ty.layout.byte_size, member.ty.layout.align
        );
    }

    out
}
