//! Formatting and time helpers shared by the server and its clients.

use chrono::{Datelike, NaiveDate};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date in the server's local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format a rupee amount with Indian digit grouping, e.g. `₹1,00,000`.
///
/// The last three digits form one group, every group above it has two digits.
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), tail)
}

/// `dd/mm/yyyy`, the format used on every screen.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Next occurrence of `due_day` on or after `from`.
///
/// Months shorter than `due_day` use their last day instead.
pub fn next_due_date(from: NaiveDate, due_day: u8) -> NaiveDate {
    let this_month = clamp_day(from.year(), from.month(), due_day);
    if this_month >= from {
        return this_month;
    }
    let (year, month) = if from.month() == 12 {
        (from.year() + 1, 1)
    } else {
        (from.year(), from.month() + 1)
    };
    clamp_day(year, month, due_day)
}

fn clamp_day(year: i32, month: u32, day: u8) -> NaiveDate {
    let last = last_day_of_month(year, month);
    let day = u32::from(day).clamp(1, last);
    // day is within 1..=last for a valid (year, month)
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
