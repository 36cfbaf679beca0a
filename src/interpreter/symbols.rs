use indexmap::IndexMap;

use super::Value;

/// Name to value bindings of one session. There is a single flat scope; a
/// new assignment replaces the old binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: IndexMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    /// Binds `name`, returning the value it was bound to before.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.symbols.insert(name.into(), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Bindings in the order the names were first assigned.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.symbols.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}
