//! Case-insensitive column name resolution.

use std::collections::HashMap;

/// A catalog of a table's column names, resolvable case-insensitively.
///
/// When two columns differ only by case, the first one seen wins.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    map: HashMap<String, String>,
}

impl ColumnCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(name.to_ascii_uppercase())
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Resolve a requested name to the actual column name, if present.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}
