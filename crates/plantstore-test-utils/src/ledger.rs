//! Ids created by the current scenario, kept for cleanup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HarnessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Category,
    Plant,
    Sale,
}

impl ResourceKind {
    /// Deletion order: dependents before the things they reference.
    pub const CLEANUP_ORDER: [ResourceKind; 3] =
        [ResourceKind::Sale, ResourceKind::Plant, ResourceKind::Category];

    pub fn collection_path(&self) -> &'static str {
        match self {
            ResourceKind::Category => "/api/categories",
            ResourceKind::Plant => "/api/plants",
            ResourceKind::Sale => "/api/sales",
        }
    }

    pub fn resource_path(&self, id: i64) -> String {
        format!("{}/{}", self.collection_path(), id)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Category => "category",
            ResourceKind::Plant => "plant",
            ResourceKind::Sale => "sale",
        };
        f.write_str(name)
    }
}

impl FromStr for ResourceKind {
    type Err = HarnessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(ResourceKind::Category),
            "plant" | "plants" => Ok(ResourceKind::Plant),
            "sale" | "sales" => Ok(ResourceKind::Sale),
            other => Err(HarnessError::Config(format!("unknown resource kind '{other}'"))),
        }
    }
}

/// Ordered ids per kind, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedResources {
    categories: Vec<i64>,
    plants: Vec<i64>,
    sales: Vec<i64>,
}

impl CreatedResources {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: ResourceKind) -> &Vec<i64> {
        match kind {
            ResourceKind::Category => &self.categories,
            ResourceKind::Plant => &self.plants,
            ResourceKind::Sale => &self.sales,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut Vec<i64> {
        match kind {
            ResourceKind::Category => &mut self.categories,
            ResourceKind::Plant => &mut self.plants,
            ResourceKind::Sale => &mut self.sales,
        }
    }

    pub fn record(&mut self, kind: ResourceKind, id: i64) {
        self.slot_mut(kind).push(id);
    }

    pub fn ids(&self, kind: ResourceKind) -> &[i64] {
        self.slot(kind)
    }

    pub fn len(&self) -> usize {
        self.categories.len() + self.plants.len() + self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every id out, in the order it must be deleted:
    /// kinds by [`ResourceKind::CLEANUP_ORDER`], newest first within a kind.
    pub fn drain_for_cleanup(&mut self) -> Vec<(ResourceKind, i64)> {
        let mut drained = Vec::with_capacity(self.len());
        for kind in ResourceKind::CLEANUP_ORDER {
            let ids = std::mem::take(self.slot_mut(kind));
            drained.extend(ids.into_iter().rev().map(|id| (kind, id)));
        }
        drained
    }
}
