//! Tests for CSV quote files: content layout and age-based cleanup.

use std::fs;
use std::time::Duration;

use chrono::NaiveDate;
use estimate::{
    cleanup_old_quotes, write_quote, EventDetails, Proposal, ProposalCategory, ProposalItem,
    ServiceCalculation,
};

fn proposal() -> Proposal {
    let mut proposal = Proposal {
        proposal_text: "Фуршет для команды".to_string(),
        menu_items: vec![ProposalCategory {
            category: "канапе".to_string(),
            items: vec![ProposalItem {
                name: "Канапе с лососем, сливочным сыром".to_string(),
                weight: 25,
                price_per_item: 150,
                quantity: 40,
            }],
        }],
        warnings: vec!["Заказ менее чем за 24 часа".to_string()],
        ..Default::default()
    };
    proposal.recalculate(
        20,
        Some(ServiceCalculation {
            service_details: "Официанты: 1 x 9500 руб. (6 ч)".to_string(),
            total_service_cost: 9_500,
            waiters_count: Some(1),
        }),
    );
    proposal
}

/// **Test: Quote file carries order info, item lines, totals, service and warnings.**
///
/// **Setup:** Proposal with one line (40 x 150 руб.) and a 9500 руб. service block; 20 guests.
/// **Action:** `write_quote` into a temp dir that does not exist yet.
/// **Expected:** File named by order/event/guests/date; quoted item name; totals 6000 and 15500.
#[test]
fn test_write_quote_layout() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = dir.path().join("quotes");
    let details = EventDetails {
        event_type: Some("buffet".to_string()),
        guests_count: Some(20),
        event_date: Some("2025-06-01".to_string()),
        ..Default::default()
    };
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

    let path = write_quote(&quotes, "P-202505011200-abcd", &details, &proposal(), today).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "P-202505011200-abcd_Смета_Фуршет_20гост_2025-06-01.csv"
    );
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with('\u{feff}'));
    assert!(content.contains("Номер заказа,P-202505011200-abcd"));
    assert!(content.contains("Адрес,Адрес не указан"));
    assert!(content.contains("канапе,\"Канапе с лососем, сливочным сыром\",25,150,40,6000"));
    assert!(content.contains("Итого по меню (руб.),6000"));
    assert!(content.contains("Стоимость обслуживания (руб.),9500"));
    assert!(content.contains("Итого к оплате (руб.),15500"));
    assert!(content.contains("Заказ менее чем за 24 часа"));
}

/// **Test: Cleanup keeps fresh quotes and ignores other files.**
#[test]
fn test_cleanup_old_quotes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fresh.csv"), "x").unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();

    assert_eq!(cleanup_old_quotes(dir.path(), Duration::from_secs(3600)).unwrap(), 0);
    assert_eq!(cleanup_old_quotes(dir.path(), Duration::ZERO).unwrap(), 1);
    assert!(!dir.path().join("fresh.csv").exists());
    assert!(dir.path().join("notes.txt").exists());

    let missing = dir.path().join("missing");
    assert_eq!(cleanup_old_quotes(&missing, Duration::ZERO).unwrap(), 0);
}
