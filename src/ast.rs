use crate::source_location::SourceSpan;
use crate::string_interner::{StringInterner, Symbol};

/// A type as written in a query or in a field declaration, before any name
/// has been resolved.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub span: SourceSpan,
    pub kind: TypeExprKind,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// A primitive, a declared struct or a generic parameter, with optional
    /// generic arguments: `Int`, `T`, `B<Float>`.
    Named { name: Symbol, args: Vec<TypeExpr> },

    /// `()` is the empty tuple. A parenthesized single type is not a tuple.
    Tuple(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn render(&self, symbols: &StringInterner) -> String {
        let mut out = String::new();
        self.render_into(symbols, &mut out);
        out
    }

    fn render_into(&self, symbols: &StringInterner, out: &mut String) {
        match &self.kind {
            TypeExprKind::Named { name, args } => {
                out.push_str(symbols.get(name));

                if !args.is_empty() {
                    out.push('<');
                    render_list(args, symbols, out);
                    out.push('>');
                }
            }
            TypeExprKind::Tuple(elements) => {
                out.push('(');
                render_list(elements, symbols, out);
                out.push(')');
            }
        }
    }
}

fn render_list(exprs: &[TypeExpr], symbols: &StringInterner, out: &mut String) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        expr.render_into(symbols, out);
    }
}
