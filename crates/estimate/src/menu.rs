//! Menu catalog loaded from `data/menu.json`.
//!
//! The file is an object of groups, each a list of items: `{"canapes": [...], "sets": [...]}`.
//! Group keys are informational; items with `is_set` become sets. Group order is preserved.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::{EstimateError, Result};
use crate::models::{MenuCategory, MenuItem};

/// Menu groups in file order.
struct MenuGroups(Vec<(String, Vec<MenuItem>)>);

impl<'de> Deserialize<'de> for MenuGroups {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = MenuGroups;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping group names to lists of menu items")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::new();
                while let Some((key, items)) = map.next_entry::<String, Vec<MenuItem>>()? {
                    groups.push((key, items));
                }
                Ok(MenuGroups(groups))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    sets: Vec<MenuItem>,
    by_id: HashMap<String, MenuItem>,
}

impl MenuCatalog {
    /// Builds the catalog from items, validating each and filling search terms.
    pub fn from_items(all: impl IntoIterator<Item = MenuItem>) -> Result<Self> {
        let mut catalog = Self::default();
        for mut item in all {
            item.validate()?;
            item.fill_search_terms();
            if catalog.by_id.contains_key(&item.id) {
                return Err(EstimateError::InvalidItem {
                    id: item.id,
                    reason: "duplicate id".to_string(),
                });
            }
            catalog.by_id.insert(item.id.clone(), item.clone());
            if item.is_set {
                catalog.sets.push(item);
            } else {
                catalog.items.push(item);
            }
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let groups: MenuGroups = serde_json::from_str(json)?;
        Self::from_items(groups.0.into_iter().flat_map(|(_, items)| items))
    }

    /// Loads the menu file; writes the sample menu first when the file does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Menu data file not found, creating sample data");
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, Self::sample_json())?;
        }

        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            items = catalog.items.len(),
            sets = catalog.sets.len(),
            "Menu loaded"
        );
        Ok(catalog)
    }

    /// Sample menu: two canapes and one business set.
    pub fn sample_json() -> String {
        let sample = json!({
            "canapes": [
                {
                    "id": "1",
                    "name": "Канапе с лососем",
                    "weight": 25,
                    "price": 150,
                    "category": "канапе",
                    "nutrition": {"fats": 8.2, "proteins": 6.3, "carbs": 5.1, "calories": 120}
                },
                {
                    "id": "2",
                    "name": "Канапе с икрой",
                    "weight": 18,
                    "price": 250,
                    "category": "канапе",
                    "nutrition": {"fats": 12.1, "proteins": 8.9, "carbs": 3.2, "calories": 180}
                }
            ],
            "sets": [
                {
                    "id": "set1",
                    "name": "Сет Деловой на 20 персон",
                    "weight": 5000,
                    "price": 25000,
                    "category": "наборы",
                    "is_set": true,
                    "guests_range": "20-25",
                    "includes": ["Канапе ассорти", "Брускетты", "Десерты"],
                    "nutrition": {"fats": 10.5, "proteins": 7.8, "carbs": 12.3, "calories": 165}
                }
            ]
        });
        serde_json::to_string_pretty(&sample).unwrap_or_default()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn sets(&self) -> &[MenuItem] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&MenuItem> {
        self.by_id.get(id)
    }

    fn all(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().chain(self.sets.iter())
    }

    pub fn by_category(&self, category: MenuCategory) -> Vec<&MenuItem> {
        self.all().filter(|i| i.category == category).collect()
    }

    /// Case-insensitive substring search over names. An empty query matches everything.
    pub fn search(&self, query: &str, category: Option<MenuCategory>, limit: usize) -> Vec<&MenuItem> {
        let query = query.trim().to_lowercase();
        self.all()
            .filter(|i| category.map_or(true, |c| i.category == c))
            .filter(|i| query.is_empty() || i.name.to_lowercase().contains(&query))
            .take(limit)
            .collect()
    }

    /// First `limit` regular items in file order.
    pub fn popular(&self, limit: usize) -> Vec<&MenuItem> {
        self.items.iter().take(limit).collect()
    }

    pub fn categories() -> Vec<&'static str> {
        MenuCategory::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Compact JSON given to the model: one object per position.
    pub fn to_prompt_json(&self) -> String {
        let entries: Vec<serde_json::Value> = self
            .all()
            .map(|i| {
                let mut entry = json!({
                    "id": i.id,
                    "name": i.name,
                    "weight": i.weight,
                    "price": i.price,
                    "category": i.category.as_str(),
                });
                if i.is_set {
                    entry["is_set"] = json!(true);
                    if let Some(range) = &i.guests_range {
                        entry["guests_range"] = json!(range);
                    }
                    if !i.includes.is_empty() {
                        entry["includes"] = json!(i.includes);
                    }
                }
                entry
            })
            .collect();
        serde_json::Value::Array(entries).to_string()
    }
}
