use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::error::{EstimateError, Result};

/// Menu category; serialized with the Russian names used in the menu file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MenuCategory {
    #[serde(rename = "канапе")]
    Canapes,
    #[serde(rename = "брускетты")]
    Bruschettas,
    #[serde(rename = "сэндвичи")]
    Sandwiches,
    #[serde(rename = "салаты")]
    Salads,
    #[serde(rename = "десерты")]
    Desserts,
    #[serde(rename = "горячие закуски")]
    HotDishes,
    #[serde(rename = "наборы")]
    Sets,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 7] = [
        MenuCategory::Canapes,
        MenuCategory::Bruschettas,
        MenuCategory::Sandwiches,
        MenuCategory::Salads,
        MenuCategory::Desserts,
        MenuCategory::HotDishes,
        MenuCategory::Sets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Canapes => "канапе",
            MenuCategory::Bruschettas => "брускетты",
            MenuCategory::Sandwiches => "сэндвичи",
            MenuCategory::Salads => "салаты",
            MenuCategory::Desserts => "десерты",
            MenuCategory::HotDishes => "горячие закуски",
            MenuCategory::Sets => "наборы",
        }
    }

    /// Case-insensitive lookup by Russian name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition per 100 g.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub fats: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub calories: f64,
}

/// One menu position or a ready-made set (`is_set`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Grams per piece.
    pub weight: u32,
    /// Rubles per piece.
    pub price: u32,
    pub category: MenuCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub is_set: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list", skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub search_terms: Vec<String>,
}

impl MenuItem {
    /// Checks field constraints of a menu file entry.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| EstimateError::InvalidItem {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > 200 {
            return Err(invalid("name must be 1..=200 characters"));
        }
        if self.weight == 0 {
            return Err(invalid("weight must be positive"));
        }
        if self.price == 0 {
            return Err(invalid("price must be positive"));
        }
        if let Some(n) = &self.nutrition {
            if [n.fats, n.proteins, n.carbs, n.calories]
                .iter()
                .any(|v| *v < 0.0 || !v.is_finite())
            {
                return Err(invalid("nutrition values must be non-negative"));
            }
        }
        Ok(())
    }

    /// Fills `search_terms` with the distinct lowercase words of the name when empty.
    pub fn fill_search_terms(&mut self) {
        if !self.search_terms.is_empty() {
            return;
        }
        let mut terms: Vec<String> = Vec::new();
        for word in self.name.to_lowercase().split_whitespace() {
            if !terms.iter().any(|t| t == word) {
                terms.push(word.to_string());
            }
        }
        self.search_terms = terms;
    }

    pub fn price_per_gram(&self) -> f64 {
        self.price as f64 / self.weight.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> MenuItem {
        MenuItem {
            id: "1".to_string(),
            name: "Канапе с лососем и Лососем".to_string(),
            weight: 25,
            price: 150,
            category: MenuCategory::Canapes,
            nutrition: None,
            is_set: false,
            guests_range: None,
            includes: Vec::new(),
            search_terms: Vec::new(),
        }
    }

    #[test]
    fn test_fill_search_terms_distinct_lowercase() {
        let mut item = item();
        item.fill_search_terms();
        assert_eq!(item.search_terms, vec!["канапе", "с", "лососем", "и"]);
    }

    #[test]
    fn test_validate_rejects_zero_price() {
        let mut item = item();
        assert!(item.validate().is_ok());
        item.price = 0;
        let err = item.validate().unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn test_category_serde_uses_russian_names() {
        let json = serde_json::to_string(&MenuCategory::HotDishes).unwrap();
        assert_eq!(json, "\"горячие закуски\"");
        assert_eq!(MenuCategory::parse("Салаты"), Some(MenuCategory::Salads));
    }
}
