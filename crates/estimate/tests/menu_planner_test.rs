//! Tests for the menu catalog (file loading, lookups) and the fallback planner.

use estimate::{
    BusinessRulesEngine, BusinessStandards, EventDetails, MenuCatalog, MenuCategory,
    OverallStatus, ProposalPlanner, DEFAULT_GUESTS,
};

const MENU_JSON: &str = r#"{
    "canapes": [
        {"id": "1", "name": "Канапе с лососем", "weight": 25, "price": 150, "category": "канапе"},
        {"id": "2", "name": "Канапе с икрой", "weight": 18, "price": 250, "category": "канапе"}
    ],
    "salads": [
        {"id": "10", "name": "Салат Цезарь в тарталетке", "weight": 40, "price": 120, "category": "салаты"}
    ],
    "desserts": [
        {"id": "20", "name": "Макарон ассорти", "weight": 15, "price": 90, "category": "десерты"}
    ],
    "sets": [
        {"id": "set1", "name": "Сет Деловой на 20 персон", "weight": 5000, "price": 25000,
         "category": "наборы", "is_set": true, "guests_range": "20-25", "includes": ["Канапе ассорти"]}
    ]
}"#;

fn menu() -> MenuCatalog {
    MenuCatalog::from_json(MENU_JSON).unwrap()
}

/// **Test: Missing menu file is created from the sample and loaded.**
///
/// **Setup:** Temp dir without `data/menu.json`.
/// **Action:** `MenuCatalog::load_or_create`.
/// **Expected:** File exists afterwards; 2 regular items and 1 set; lookups work.
#[test]
fn test_load_or_create_writes_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("menu.json");

    let catalog = MenuCatalog::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(catalog.items().len(), 2);
    assert_eq!(catalog.sets().len(), 1);
    assert_eq!(catalog.get_by_id("1").unwrap().name, "Канапе с лососем");
    let set = catalog.get_by_id("set1").unwrap();
    assert!(set.is_set);
    assert_eq!(set.includes.len(), 3);

    // Second load reads the file that was just written.
    let again = MenuCatalog::load_or_create(&path).unwrap();
    assert_eq!(again.len(), 3);
}

/// **Test: Invalid menu entries are rejected with the item id.**
#[test]
fn test_invalid_menu_is_rejected() {
    let json = r#"{"x": [{"id": "7", "name": "Пусто", "weight": 0, "price": 10, "category": "канапе"}]}"#;
    let err = MenuCatalog::from_json(json).unwrap_err();
    assert!(err.to_string().contains("'7'"));

    let dup = r#"{"x": [
        {"id": "1", "name": "A", "weight": 1, "price": 1, "category": "канапе"},
        {"id": "1", "name": "B", "weight": 1, "price": 1, "category": "канапе"}
    ]}"#;
    assert!(MenuCatalog::from_json(dup).is_err());
}

/// **Test: Search, category filter, popular items and prompt JSON.**
#[test]
fn test_lookups() {
    let catalog = menu();

    let found = catalog.search("КАНАПЕ", None, 50);
    assert_eq!(found.len(), 2);
    assert_eq!(catalog.search("канапе", None, 1).len(), 1);
    assert_eq!(catalog.search("", Some(MenuCategory::Sets), 50).len(), 1);
    assert!(catalog.search("борщ", None, 50).is_empty());

    assert_eq!(catalog.by_category(MenuCategory::Canapes).len(), 2);
    let popular: Vec<&str> = catalog.popular(3).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(popular, vec!["1", "2", "10"]);

    assert_eq!(MenuCatalog::categories().len(), 7);
    assert_eq!(
        catalog.get_by_id("1").unwrap().search_terms,
        vec!["канапе", "с", "лососем"]
    );

    let prompt: serde_json::Value = serde_json::from_str(&catalog.to_prompt_json()).unwrap();
    let entries = prompt.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[4]["is_set"], true);
    assert!(entries[0].get("is_set").is_none());
}

/// **Test: Planner reaches the optimal grammage and passes validation.**
///
/// **Setup:** Buffet for 20 guests, no budget.
/// **Expected:** ≥ 335 g/guest, three categories, summary recalculated from items, no warnings.
#[test]
fn test_planner_reaches_optimal_grammage() {
    let catalog = menu();
    let standards = BusinessStandards::default();
    let details = EventDetails {
        event_type: Some("buffet".to_string()),
        guests_count: Some(20),
        ..Default::default()
    };

    let proposal = ProposalPlanner::new(&catalog, &standards).plan(&details);

    assert!(proposal.summary.weight_per_guest_grams >= 335);
    assert_eq!(proposal.menu_items.len(), 3);
    assert_eq!(proposal.summary.total_menu_price, proposal.total_menu_price());
    assert!(proposal.warnings.is_empty());
    assert!(proposal.menu_items.iter().all(|c| c.category != "наборы"));
    // Small menu: items are repeated in multiples of the guest count.
    assert!(proposal
        .items()
        .all(|(_, item)| item.quantity > 0 && item.quantity % 20 == 0));

    let order = proposal.to_order_data(&details, None);
    let report = BusinessRulesEngine::new(standards).validate_order(&order);
    assert!(report
        .validations
        .iter()
        .any(|v| v.field == "menu_composition" && v.message.contains("категорий")));
}

/// **Test: Without a guest count the plan and its validation agree on the default.**
///
/// **Setup:** Buffet request with no `guests_count`.
/// **Action:** Plan, then validate the proposal's order view.
/// **Expected:** Quantities are multiples of 20, the order lists 20 guests and no guest-count error.
#[test]
fn test_planner_default_guests_validate() {
    let catalog = menu();
    let standards = BusinessStandards::default();
    let details = EventDetails {
        event_type: Some("buffet".to_string()),
        ..Default::default()
    };

    let proposal = ProposalPlanner::new(&catalog, &standards).plan(&details);
    assert!(proposal
        .items()
        .all(|(_, item)| item.quantity % DEFAULT_GUESTS == 0));

    let order = proposal.to_order_data(&details, None);
    assert_eq!(order.order_info.guests, i64::from(DEFAULT_GUESTS));

    let report = BusinessRulesEngine::new(standards).validate_order(&order);
    assert_eq!(report.overall_status, OverallStatus::Valid);
    assert!(report.validations.iter().all(|v| v.field != "guests"));
}

/// **Test: A tight budget stops the planner and explains why.**
///
/// **Setup:** Buffet for 20 guests with 5 000 ₽.
/// **Expected:** Total within budget, warning about minimum grammage.
#[test]
fn test_planner_respects_budget() {
    let catalog = menu();
    let standards = BusinessStandards::default();
    let details = EventDetails {
        event_type: Some("фуршет".to_string()),
        guests_count: Some(20),
        budget_limit: Some(5_000),
        ..Default::default()
    };

    let proposal = ProposalPlanner::new(&catalog, &standards).plan(&details);

    assert!(proposal.summary.total_menu_price <= 5_000);
    assert_eq!(proposal.warnings.len(), 1);
    assert!(proposal.warnings[0].contains("Бюджет 5000 руб."));
}

/// **Test: Service is priced locally when requested.**
#[test]
fn test_planner_adds_service() {
    let catalog = menu();
    let standards = BusinessStandards::default();
    let details = EventDetails {
        guests_count: Some(60),
        need_service: Some(true),
        duration_hours: Some(7.0),
        ..Default::default()
    };

    let proposal = ProposalPlanner::new(&catalog, &standards).plan(&details);

    let service = proposal.service_calculation.as_ref().unwrap();
    assert_eq!(service.waiters_count, Some(2));
    assert_eq!(service.total_service_cost, 2 * 10_500);
}
