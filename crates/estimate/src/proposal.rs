//! Proposal arithmetic and the bridge from a proposal to the rules engine.

use crate::models::{
    EventDetails, OrderData, OrderInfo, OrderMenuItem, OrderService, OrderTotals, Proposal,
    ServiceCalculation,
};
use crate::rules::ValidationReport;

impl Proposal {
    /// Recomputes the summary from the item lines. `service`, when given, replaces the service block.
    pub fn recalculate(&mut self, guests: u32, service: Option<ServiceCalculation>) {
        if let Some(service) = service {
            self.service_calculation = Some(service);
        }

        let guests = guests.max(1) as u64;
        let total_price = self.total_menu_price();
        let total_weight = self.total_weight_grams();

        self.summary.total_menu_price = total_price;
        self.summary.price_per_guest = (total_price + guests / 2) / guests;
        self.summary.weight_per_guest_grams = ((total_weight + guests / 2) / guests) as u32;
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &crate::models::ProposalItem)> {
        self.menu_items
            .iter()
            .flat_map(|c| c.items.iter().map(move |i| (c.category.as_str(), i)))
    }

    pub fn item_count(&self) -> usize {
        self.menu_items.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn total_menu_price(&self) -> u64 {
        self.items().map(|(_, i)| i.line_price()).sum()
    }

    pub fn total_weight_grams(&self) -> u64 {
        self.items().map(|(_, i)| i.line_weight()).sum()
    }

    pub fn service_cost(&self) -> u64 {
        self.service_calculation
            .as_ref()
            .map_or(0, |s| s.total_service_cost)
    }

    /// Menu plus service.
    pub fn total_cost(&self) -> u64 {
        self.total_menu_price() + self.service_cost()
    }

    /// Order view for validation, sized for [`EventDetails::planned_guests`]. Waiters are listed only
    /// when the service block has a cost.
    pub fn to_order_data(&self, details: &EventDetails, order_number: Option<&str>) -> OrderData {
        let menu_items = self
            .items()
            .map(|(category, item)| OrderMenuItem {
                name: item.name.clone(),
                category: (!category.trim().is_empty()).then(|| category.to_string()),
                quantity: item.quantity,
                weight_per_set: item.weight as f64,
                price_per_set: item.price_per_item as f64,
            })
            .collect();

        let services = match &self.service_calculation {
            Some(s) if s.total_service_cost > 0 => vec![OrderService {
                name: "Официант".to_string(),
                quantity: s.waiters_count.unwrap_or(1),
                duration: details.duration_hours.unwrap_or(6.0),
                cost: s.total_service_cost as f64,
            }],
            _ => Vec::new(),
        };

        OrderData {
            order_info: OrderInfo {
                guests: i64::from(details.planned_guests()),
                event_type: details.event_kind().as_str().to_string(),
                date: details.event_date.clone(),
                number: order_number.map(str::to_string),
            },
            menu_items,
            services,
            totals: OrderTotals {
                total_weight: self.total_weight_grams() as f64,
                total_cost: self.total_cost() as f64,
                service_cost: self.service_cost() as f64,
            },
        }
    }

    /// Appends warning, error and critical messages of the report that are not already listed.
    pub fn apply_report(&mut self, report: &ValidationReport) {
        for message in report.problem_messages() {
            if !self.warnings.iter().any(|w| w == message) {
                self.warnings.push(message.to_string());
            }
        }
    }
}
