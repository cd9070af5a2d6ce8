//! Deterministic proposal builder used without a language model.
//!
//! Cheapest-per-gram items are taken round-robin across categories, `guests` pieces at a time, until the
//! optimal grams per guest is reached or the next addition would exceed the budget. Small menus are
//! walked again, raising quantities.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::calculator::ServiceCalculator;
use crate::models::{
    EventDetails, MenuCategory, MenuItem, Proposal, ProposalCategory, ProposalItem,
};
use crate::menu::MenuCatalog;
use crate::standards::BusinessStandards;

pub struct ProposalPlanner<'a> {
    menu: &'a MenuCatalog,
    standards: &'a BusinessStandards,
}

impl<'a> ProposalPlanner<'a> {
    pub fn new(menu: &'a MenuCatalog, standards: &'a BusinessStandards) -> Self {
        Self { menu, standards }
    }

    pub fn plan(&self, details: &EventDetails) -> Proposal {
        let guests = details.planned_guests();
        let event = details.event_kind();
        let portion = self.standards.portion_standards.get(event);
        let target_weight = portion.optimal as u64 * guests as u64;

        let calculator = ServiceCalculator::new(self.standards);
        let service = calculator
            .service_quote(
                guests,
                details.duration_hours,
                details.wants_service(),
                details.is_outside_mkad(),
            )
            .to_calculation();
        let menu_budget = details
            .budget_limit
            .map(|b| b.saturating_sub(service.total_service_cost));

        let mut chosen: Vec<(&MenuItem, u32)> = Vec::new();
        let mut weight = 0u64;
        let mut cost = 0u64;

        // Each pass adds another `guests` pieces of every item until a stop condition holds.
        let order = round_robin(self.menu.items());
        if !order.is_empty() {
            'fill: loop {
                for &item in &order {
                    if weight >= target_weight {
                        break 'fill;
                    }
                    let add_cost = item.price as u64 * guests as u64;
                    if let Some(limit) = menu_budget {
                        if cost + add_cost > limit {
                            break 'fill;
                        }
                    }
                    weight += item.weight as u64 * guests as u64;
                    cost += add_cost;
                    match chosen.iter_mut().find(|(chosen_item, _)| chosen_item.id == item.id) {
                        Some((_, quantity)) => *quantity += guests,
                        None => chosen.push((item, guests)),
                    }
                }
            }
        }

        debug!(
            guests,
            target_weight,
            weight,
            cost,
            items = chosen.len(),
            "Planner filled menu"
        );

        let mut proposal = Proposal {
            proposal_text: format!(
                "{} на {} гостей: подобрали позиции по нашим стандартам граммовки ({}г на гостя).",
                event.display_name(),
                guests,
                portion.optimal
            ),
            menu_items: group_by_category(&chosen),
            ..Default::default()
        };
        proposal.recalculate(guests, Some(service));

        let per_guest = proposal.summary.weight_per_guest_grams;
        if self.menu.items().is_empty() {
            proposal
                .warnings
                .push("В меню нет позиций для составления предложения".to_string());
        } else if per_guest < portion.min {
            // Only a budget stop leaves the menu below the minimum.
            proposal.warnings.push(format!(
                "Бюджет {} руб. не покрывает минимальную граммовку {}г на гостя",
                details.budget_limit.unwrap_or_default(),
                portion.min
            ));
        }

        info!(
            event_type = event.as_str(),
            guests,
            total = proposal.summary.total_menu_price,
            "step: fallback proposal planned"
        );
        proposal
    }
}

/// Regular items ordered cheapest-per-gram first, interleaved across categories.
fn round_robin(items: &[MenuItem]) -> Vec<&MenuItem> {
    let mut by_category: BTreeMap<MenuCategory, Vec<&MenuItem>> = BTreeMap::new();
    for item in items {
        by_category.entry(item.category).or_default().push(item);
    }
    for list in by_category.values_mut() {
        list.sort_by(|a, b| {
            a.price_per_gram()
                .total_cmp(&b.price_per_gram())
                .then_with(|| a.id.cmp(&b.id))
        });
    }

    let mut queues: Vec<_> = by_category.into_values().map(|v| v.into_iter()).collect();
    // Categories whose cheapest item is cheapest go first.
    queues.sort_by(|a, b| {
        let pa = a.as_slice().first().map_or(f64::MAX, |i| i.price_per_gram());
        let pb = b.as_slice().first().map_or(f64::MAX, |i| i.price_per_gram());
        pa.total_cmp(&pb)
    });

    let mut out = Vec::with_capacity(items.len());
    loop {
        let mut progressed = false;
        for queue in queues.iter_mut() {
            if let Some(item) = queue.next() {
                out.push(item);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    out
}

fn group_by_category(chosen: &[(&MenuItem, u32)]) -> Vec<ProposalCategory> {
    let mut groups: Vec<ProposalCategory> = Vec::new();
    for (item, quantity) in chosen {
        let line = ProposalItem {
            name: item.name.clone(),
            weight: item.weight,
            price_per_item: item.price,
            quantity: *quantity,
        };
        let category = item.category.as_str();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.items.push(line),
            None => groups.push(ProposalCategory {
                category: category.to_string(),
                items: vec![line],
            }),
        }
    }
    groups
}
