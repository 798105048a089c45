//! Lookup of mounted grids by table id.

use std::collections::HashMap;

use super::GridBinding;

/// Mounted grids by the id of their table element.
#[derive(Debug, Clone, Default)]
pub struct GridRegistry {
    grids: HashMap<String, GridBinding>,
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a grid under its table id, replacing any grid already there.
    pub fn insert(&mut self, grid: GridBinding) -> Option<GridBinding> {
        self.grids.insert(grid.table_id().to_string(), grid)
    }

    pub fn get(&self, table_id: &str) -> Option<&GridBinding> {
        self.grids.get(table_id)
    }

    pub fn contains(&self, table_id: &str) -> bool {
        self.grids.contains_key(table_id)
    }

    /// Table ids of the mounted grids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.grids.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridBinding> {
        self.grids.values()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
