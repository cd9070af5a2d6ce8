use serde::{Deserialize, Serialize};

use super::lenient;

/// One line of a proposal: `quantity` pieces of `weight` grams at `price_per_item` rubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalItem {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub weight: u32,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub price_per_item: u32,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub quantity: u32,
}

impl ProposalItem {
    pub fn line_price(&self) -> u64 {
        self.price_per_item as u64 * self.quantity as u64
    }

    pub fn line_weight(&self) -> u64 {
        self.weight as u64 * self.quantity as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalCategory {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub category: String,
    #[serde(default)]
    pub items: Vec<ProposalItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalSummary {
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub price_per_guest: u64,
    #[serde(default, deserialize_with = "lenient::u32_or_zero")]
    pub weight_per_guest_grams: u32,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub total_menu_price: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceCalculation {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub service_details: String,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub total_service_cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiters_count: Option<u32>,
}

/// Menu proposal shown to the client and turned into an estimate on acceptance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub proposal_text: String,
    #[serde(default)]
    pub menu_items: Vec<ProposalCategory>,
    #[serde(default)]
    pub summary: ProposalSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_calculation: Option<ServiceCalculation>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub warnings: Vec<String>,
}
