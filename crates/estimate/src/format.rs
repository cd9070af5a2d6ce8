//! Proposal rendering for Telegram: HTML with a plain-text twin for when markup is rejected.

use crate::models::Proposal;

const DEFAULT_INTRO: &str = "Ваше предложение по меню готово:";
const EMPTY_PROPOSAL: &str = "К сожалению, не удалось составить предложение. Попробуйте еще раз.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedProposal {
    pub html: String,
    pub plain: String,
}

/// `1234567` → `1,234,567`. Negative values keep their sign.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Clone, Copy)]
enum Markup {
    Html,
    Plain,
}

impl Markup {
    fn text(self, s: &str) -> String {
        match self {
            Markup::Html => escape_html(s),
            Markup::Plain => s.to_string(),
        }
    }

    fn bold(self, s: &str) -> String {
        match self {
            Markup::Html => format!("<b>{}</b>", escape_html(s)),
            Markup::Plain => s.to_string(),
        }
    }
}

fn render(p: &Proposal, m: Markup) -> String {
    if p.is_empty() {
        return EMPTY_PROPOSAL.to_string();
    }

    let intro = if p.proposal_text.trim().is_empty() {
        DEFAULT_INTRO
    } else {
        p.proposal_text.trim()
    };
    let mut out = format!("{}\n\n", m.text(intro));

    for category in &p.menu_items {
        if category.items.is_empty() {
            continue;
        }
        let name = if category.category.trim().is_empty() {
            "Категория"
        } else {
            category.category.as_str()
        };
        out.push_str(&m.bold(name));
        out.push('\n');
        for item in &category.items {
            out.push_str(&format!(
                "- {} ({}г, {} руб.) x {} шт.\n",
                m.text(&item.name),
                item.weight,
                item.price_per_item,
                item.quantity
            ));
        }
        out.push('\n');
    }

    out.push_str(&m.bold("Итого по меню:"));
    out.push('\n');
    out.push_str(&format!(
        "- На одного гостя: ~{} руб.\n- Общая граммовка на гостя: {}г\n- Общая стоимость меню: {} руб.\n\n",
        p.summary.price_per_guest, p.summary.weight_per_guest_grams, p.summary.total_menu_price
    ));

    if let Some(service) = p.service_calculation.as_ref().filter(|s| s.total_service_cost > 0) {
        let details = if service.service_details.trim().is_empty() {
            "Детали не указаны."
        } else {
            service.service_details.as_str()
        };
        out.push_str(&m.bold("Расчет обслуживания:"));
        out.push('\n');
        out.push_str(&format!(
            "{}\nИтого за обслуживание: {} руб.\n\n",
            m.text(details),
            service.total_service_cost
        ));
    }

    if !p.warnings.is_empty() {
        out.push_str(&m.bold("Важные моменты:"));
        out.push('\n');
        for warning in &p.warnings {
            out.push_str(&format!("- {}\n", m.text(warning)));
        }
    }

    out.trim_end().to_string()
}

pub fn format_for_telegram(proposal: &Proposal) -> FormattedProposal {
    FormattedProposal {
        html: render(proposal, Markup::Html),
        plain: render(proposal, Markup::Plain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProposalCategory, ProposalItem, ServiceCalculation};

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(10_000), "10,000");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn test_empty_proposal_message() {
        let formatted = format_for_telegram(&Proposal::default());
        assert_eq!(formatted.plain, EMPTY_PROPOSAL);
    }

    #[test]
    fn test_html_is_escaped_and_plain_is_not() {
        let mut proposal = Proposal {
            proposal_text: "Меню <для> вас & гостей".to_string(),
            menu_items: vec![ProposalCategory {
                category: "канапе".to_string(),
                items: vec![ProposalItem {
                    name: "Канапе с лососем".to_string(),
                    weight: 25,
                    price_per_item: 150,
                    quantity: 40,
                }],
            }],
            service_calculation: Some(ServiceCalculation {
                service_details: "Официанты: 1 x 9500 руб. (6 ч)".to_string(),
                total_service_cost: 9_500,
                waiters_count: Some(1),
            }),
            warnings: vec!["⚠️ Мало разнообразия в меню".to_string()],
            ..Default::default()
        };
        proposal.recalculate(20, None);

        let formatted = format_for_telegram(&proposal);
        assert!(formatted.html.contains("Меню &lt;для&gt; вас &amp; гостей"));
        assert!(formatted.html.contains("<b>канапе</b>"));
        assert!(formatted.html.contains("- Канапе с лососем (25г, 150 руб.) x 40 шт."));
        assert!(formatted.html.contains("- На одного гостя: ~300 руб."));
        assert!(formatted.html.contains("Итого за обслуживание: 9500 руб."));
        assert!(formatted.html.contains("<b>Важные моменты:</b>"));

        assert!(formatted.plain.starts_with("Меню <для> вас & гостей"));
        assert!(!formatted.plain.contains("<b>"));
    }
}
