use crate::layout::{LayoutData, LayoutResult};
use crate::string_interner::Symbol;
use crate::target::Target;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signedness {
    Signed,
    Unsigned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Pointer-sized integer.
    Word(Signedness),
    Int {
        signedness: Signedness,
        width: u8,
    },
    Bool,
    Float32,
    Float64,
    RawPointer,
    Void,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Primitive> {
        use Signedness::*;

        let prim = match name {
            "Int" => Primitive::Word(Signed),
            "UInt" => Primitive::Word(Unsigned),
            "Int8" => Primitive::Int { signedness: Signed, width: 8 },
            "Int16" => Primitive::Int { signedness: Signed, width: 16 },
            "Int32" => Primitive::Int { signedness: Signed, width: 32 },
            "Int64" => Primitive::Int { signedness: Signed, width: 64 },
            "UInt8" => Primitive::Int { signedness: Unsigned, width: 8 },
            "UInt16" => Primitive::Int { signedness: Unsigned, width: 16 },
            "UInt32" => Primitive::Int { signedness: Unsigned, width: 32 },
            "UInt64" => Primitive::Int { signedness: Unsigned, width: 64 },
            "Bool" => Primitive::Bool,
            "Float" | "Float32" => Primitive::Float32,
            "Double" | "Float64" => Primitive::Float64,
            "UnsafeRawPointer" | "OpaquePointer" => Primitive::RawPointer,
            "Void" => Primitive::Void,
            _ => return None,
        };

        Some(prim)
    }

    pub fn name(&self) -> String {
        match self {
            Primitive::Word(Signedness::Signed) => "Int".to_string(),
            Primitive::Word(Signedness::Unsigned) => "UInt".to_string(),
            Primitive::Int {
                signedness: Signedness::Signed,
                width,
            } => format!("Int{width}"),
            Primitive::Int {
                signedness: Signedness::Unsigned,
                width,
            } => format!("UInt{width}"),
            Primitive::Bool => "Bool".to_string(),
            Primitive::Float32 => "Float".to_string(),
            Primitive::Float64 => "Double".to_string(),
            Primitive::RawPointer => "UnsafeRawPointer".to_string(),
            Primitive::Void => "Void".to_string(),
        }
    }

    /// Scalars are naturally aligned: alignment equals size.
    pub fn layout(&self, target: &Target) -> LayoutData {
        match self {
            Primitive::Word(_) | Primitive::RawPointer => {
                LayoutData::new(target.pointer_size(), target.pointer_size())
            }
            Primitive::Int { width, .. } => {
                let bytes = u64::from(*width) / 8;
                LayoutData::new(bytes, bytes)
            }
            Primitive::Bool => LayoutData::new(1, 1),
            Primitive::Float32 => LayoutData::new(4, 4),
            Primitive::Float64 => LayoutData::new(8, 8),
            Primitive::Void => LayoutData::new(0, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(Primitive),
    Struct { decl: Symbol },
    Tuple,
}

/// Resolved, concrete description of a type. Generic parameters have been
/// substituted, so nothing in here refers to a declaration's parameters.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    /// Canonical spelling, e.g. `B<Float>` or `(Int, Bool)`.
    pub name: String,
    pub kind: TypeKind,
    pub members: Vec<MemberDescriptor>,
    pub layout: LayoutResult,
}

#[derive(Clone, Debug)]
pub struct MemberDescriptor {
    /// Field name. Tuple elements have none and are found by `index`.
    pub name: Option<Symbol>,
    pub index: usize,
    pub ty: Arc<TypeDescriptor>,
    pub offset: u64,
}

impl TypeDescriptor {
    pub fn is_tuple(&self) -> bool {
        matches!(self.kind, TypeKind::Tuple)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct { .. })
    }

    pub fn member_by_index(&self, index: usize) -> Option<&MemberDescriptor> {
        self.members.get(index)
    }

    pub fn member_by_name(&self, name: Symbol) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == Some(name))
    }
}
