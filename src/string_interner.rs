use std::collections::HashMap;

/// Interned type or member name.
#[derive(PartialEq, Debug, Clone, Copy, Hash, Eq, PartialOrd, Ord)]
pub struct Symbol(u32);

// `Symbol` hashes as a single `u32`, so it can key a `nohash_hasher::IntMap`.
impl nohash_hasher::IsEnabled for Symbol {}

#[derive(Default)]
pub struct StringInterner {
    symbols: HashMap<Box<str>, Symbol>,
    strings: Vec<Box<str>>,
}

impl StringInterner {
    pub fn new() -> StringInterner {
        StringInterner {
            symbols: HashMap::new(),
            strings: Vec::new(),
        }
    }

    pub fn add(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.symbols.get(name) {
            return *sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        let s: Box<str> = name.into();

        self.strings.push(s.clone());
        self.symbols.insert(s, sym);

        sym
    }

    /// Lookup without interning. Member lookups go through here so that a
    /// query for an unknown name never grows the table.
    pub fn find_symbol(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    pub fn get(&self, symbol: &Symbol) -> &str {
        &self.strings[symbol.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_names_are_interned_once() {
        let mut interner = StringInterner::new();

        let a = interner.add("a");
        let e = interner.add("e");
        let again = interner.add("a");

        assert_eq!(a, again);
        assert_ne!(a, e);
        assert_eq!(interner.len(), 2);

        assert_eq!(interner.get(&a), "a");
        assert_eq!(interner.get(&e), "e");
    }

    #[test]
    fn find_symbol_does_not_intern() {
        let mut interner = StringInterner::new();
        interner.add("Int");

        assert!(interner.find_symbol("f").is_none());
        assert_eq!(interner.len(), 1);
        assert_eq!(interner.find_symbol("Int"), Some(interner.add("Int")));
    }
}
