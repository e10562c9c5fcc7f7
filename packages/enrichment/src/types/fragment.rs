//! Scraped evidence about a product's ingredients and packaging.

use serde::{Deserialize, Serialize};

/// Partial, possibly-empty evidence gathered from one or more providers.
///
/// Accumulates across providers within one aggregation run. Ordered
/// collections keep first-seen order and contain no duplicates
/// (case-sensitive distinctness). `recyclable` is monotonic: once any
/// provider shows evidence, it stays `true`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScrapedFragment {
    /// Ingredient strings in order of first appearance.
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Packaging material keywords (plastic, cardboard, glass, metal, paper).
    #[serde(default)]
    pub packaging_materials: Vec<String>,

    /// Whether any packaging text mentioned recyclability.
    #[serde(default)]
    pub recyclable: bool,

    /// Other text fragments worth keeping (raw packaging lines, claims).
    #[serde(default)]
    pub additional_info: Vec<String>,
}

impl ScrapedFragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ingredient if it is not already present.
    pub fn push_ingredient(&mut self, ingredient: impl Into<String>) {
        push_if_absent(&mut self.ingredients, ingredient.into());
    }

    /// Append a packaging material keyword if not already present.
    pub fn push_material(&mut self, material: impl Into<String>) {
        push_if_absent(&mut self.packaging_materials, material.into());
    }

    /// Append an additional-info line if not already present.
    pub fn push_info(&mut self, info: impl Into<String>) {
        push_if_absent(&mut self.additional_info, info.into());
    }

    /// Merge another fragment into this one.
    ///
    /// Append-if-absent for all ordered collections, OR for `recyclable`.
    pub fn merge(&mut self, other: ScrapedFragment) {
        for ingredient in other.ingredients {
            push_if_absent(&mut self.ingredients, ingredient);
        }
        for material in other.packaging_materials {
            push_if_absent(&mut self.packaging_materials, material);
        }
        for info in other.additional_info {
            push_if_absent(&mut self.additional_info, info);
        }
        self.recyclable |= other.recyclable;
    }

    /// Whether at least one ingredient has been found.
    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }

    /// Whether the fragment carries no signal at all.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
            && self.packaging_materials.is_empty()
            && self.additional_info.is_empty()
            && !self.recyclable
    }
}

fn push_if_absent(items: &mut Vec<String>, item: String) {
    if !items.iter().any(|existing| *existing == item) {
        items.push(item);
    }
}
