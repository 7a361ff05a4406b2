use std::collections::BTreeSet;

/// One scannable security: symbol, display name, sector/theme label.
/// Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseItem {
    pub symbol: String,
    pub name: String,
    pub sector: String,
}

impl UniverseItem {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            sector: sector.into(),
        }
    }
}

/// The full scan universe plus the curated favorites subset.
///
/// Sector assignment is a function, not a relation: a symbol appears in
/// exactly one item, and the first assignment wins. Curated entries are
/// therefore merged before index constituents.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    items: Vec<UniverseItem>,
    favorites: BTreeSet<String>,
}

impl Universe {
    /// Build a universe from candidate items, dropping repeated symbols.
    pub fn from_items(candidates: Vec<UniverseItem>, favorites: BTreeSet<String>) -> Self {
        let mut seen = BTreeSet::new();
        let mut items = Vec::with_capacity(candidates.len());
        for item in candidates {
            if seen.insert(item.symbol.clone()) {
                items.push(item);
            }
        }
        Self { items, favorites }
    }

    pub fn items(&self) -> &[UniverseItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_favorite(&self, symbol: &str) -> bool {
        self.favorites.contains(symbol)
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }
}
