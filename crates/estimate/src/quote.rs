//! CSV quote documents for accepted proposals.
//!
//! Layout: order info block, items table, menu totals, service block, warnings. The file starts with a
//! UTF-8 BOM so spreadsheet programs detect the Cyrillic text.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{EventDetails, Proposal};

const FORBIDDEN_FILE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `P-{YYYYMMDDHHMM}-{4 hex chars}`.
pub fn generate_order_number(now: DateTime<Local>) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(4).collect();
    format!("P-{}-{}", now.format("%Y%m%d%H%M"), suffix)
}

fn write_pair<W: Write>(
    writer: &mut csv::Writer<W>,
    label: &str,
    value: impl Display,
) -> csv::Result<()> {
    writer.write_record([label.to_string(), value.to_string()])
}

/// `{order}_Смета_{event type}_{guests}гост_{date}.csv`; the event date defaults to `today`.
pub fn quote_file_name(order_number: &str, details: &EventDetails, today: NaiveDate) -> String {
    let date = details
        .event_date
        .clone()
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let name = format!(
        "{}_Смета_{}_{}гост_{}.csv",
        order_number,
        details.event_kind().display_name(),
        details.planned_guests(),
        date
    );
    name.chars()
        .map(|c| if FORBIDDEN_FILE_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Writes the quote into `dir` (created when missing) and returns the file path.
pub fn write_quote(
    dir: &Path,
    order_number: &str,
    details: &EventDetails,
    proposal: &Proposal,
    today: NaiveDate,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(quote_file_name(order_number, details, today));

    let mut file = File::create(&path)?;
    file.write_all("\u{feff}".as_bytes())?;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

    write_pair(&mut writer, "Коммерческое предложение Rest Delivery", "")?;
    write_pair(&mut writer, "Номер заказа", order_number)?;
    write_pair(&mut writer, "Формат", details.event_kind().display_name())?;
    write_pair(&mut writer, "Дата мероприятия", details.event_date.as_deref().unwrap_or(""))?;
    write_pair(&mut writer, "Время начала", details.event_time.as_deref().unwrap_or(""))?;
    write_pair(
        &mut writer,
        "Адрес",
        details.event_address.as_deref().unwrap_or("Адрес не указан"),
    )?;
    write_pair(&mut writer, "Количество гостей", details.planned_guests())?;
    writer.write_record([""])?;

    writer.write_record([
        "Категория",
        "Наименование",
        "Вес порции (г)",
        "Цена за порцию (руб.)",
        "Количество",
        "Сумма (руб.)",
    ])?;
    for (category, item) in proposal.items() {
        writer.write_record([
            category.to_string(),
            item.name.clone(),
            item.weight.to_string(),
            item.price_per_item.to_string(),
            item.quantity.to_string(),
            item.line_price().to_string(),
        ])?;
    }
    writer.write_record([""])?;

    write_pair(&mut writer, "Итого по меню (руб.)", proposal.total_menu_price())?;
    write_pair(&mut writer, "Граммовка на гостя (г)", proposal.summary.weight_per_guest_grams)?;
    write_pair(&mut writer, "Стоимость на гостя (руб.)", proposal.summary.price_per_guest)?;

    if let Some(service) = proposal.service_calculation.as_ref().filter(|s| s.total_service_cost > 0) {
        writer.write_record([""])?;
        write_pair(&mut writer, "Обслуживание", &service.service_details)?;
        write_pair(&mut writer, "Стоимость обслуживания (руб.)", service.total_service_cost)?;
    }
    write_pair(&mut writer, "Итого к оплате (руб.)", proposal.total_cost())?;

    if !proposal.warnings.is_empty() {
        writer.write_record([""])?;
        writer.write_record(["Важные моменты"])?;
        for warning in &proposal.warnings {
            writer.write_record([warning.as_str()])?;
        }
    }
    writer.flush()?;

    info!(path = %path.display(), order_number, "Quote written");
    Ok(path)
}

/// Removes `.csv` files in `dir` last modified more than `max_age` ago. A missing directory is empty.
pub fn cleanup_old_quotes(dir: &Path, max_age: Duration) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if modified < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Old quote removed");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove old quote"),
            }
        }
    }
    if removed > 0 {
        info!(removed, dir = %dir.display(), "Old quotes cleaned up");
    }
    Ok(removed)
}
