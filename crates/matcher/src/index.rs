use ahash::AHashMap;

use crate::dataset::{Dataset, Row};

/// Enterprise number of a source row: the cell's string form, trimmed.
/// Blank or absent cells have no identifier.
pub fn extract_identifier(row: Row<'_>, field: &str) -> Option<String> {
    let text = row.text(field)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Exact-equality lookup of registry rows by enterprise number.
///
/// Keys are the stringified identifier cells; each key maps to its row
/// positions in ascending (registry) order.
#[derive(Debug, Default)]
pub struct RegistryIndex {
    positions: AHashMap<String, Vec<usize>>,
}

impl RegistryIndex {
    pub fn build(registry: &Dataset, identifier_field: &str) -> Self {
        let mut positions: AHashMap<String, Vec<usize>> = AHashMap::new();
        for row in registry.iter() {
            if let Some(key) = row.text(identifier_field) {
                if key.is_empty() {
                    continue;
                }
                positions.entry(key.into_owned()).or_default().push(row.index());
            }
        }
        log::info!(
            "indexed {} {} rows under {} enterprise numbers",
            registry.len(),
            registry.name,
            positions.len()
        );
        Self { positions }
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Row positions sharing `identifier`, in registry order.
    pub fn positions(&self, identifier: &str) -> &[usize] {
        self.positions.get(identifier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registry rows sharing `identifier`, in registry order.
    pub fn candidates<'a>(&self, registry: &'a Dataset, identifier: &str) -> Vec<Row<'a>> {
        self.positions(identifier)
            .iter()
            .filter_map(|&i| registry.row(i))
            .collect()
    }
}
