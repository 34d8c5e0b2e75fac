//! Member Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, ErrorCode};
use crate::util::format_date;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, normalize_mobile, validate_mobile, validate_not_blank,
};

/// One contribution received from a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub date: NaiveDate,
    pub amount: u64,
}

/// Member entity (a participant in one chit group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub primary_phone: String,
    pub alternate_phone: Option<String>,
    pub joining_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub payments_completed: u32,
    pub last_payment_date: Option<NaiveDate>,
    pub last_payment_amount: Option<u64>,
    pub last_payment_upi: Option<String>,
    /// Most recent first
    #[serde(default)]
    pub payment_history: Vec<PaymentEntry>,
}

impl Member {
    /// Build a fresh member from a validated form.
    pub fn from_form(id: String, form: &MemberForm, today: NaiveDate) -> Self {
        let mut member = Self {
            id,
            group_id: String::new(),
            name: String::new(),
            primary_phone: String::new(),
            alternate_phone: None,
            joining_date: today,
            notes: String::new(),
            payments_completed: 0,
            last_payment_date: None,
            last_payment_amount: None,
            last_payment_upi: None,
            payment_history: Vec::new(),
        };
        form.apply_to(&mut member, today);
        member
    }

    /// True when a payment was recorded in the same calendar month as `today`.
    pub fn paid_in_month_of(&self, today: NaiveDate) -> bool {
        use chrono::Datelike;
        self.last_payment_date
            .is_some_and(|d| d.year() == today.year() && d.month() == today.month())
    }
}

/// Add/edit member form
///
/// Phone numbers are normalized to 10 digits when applied.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_distinct_phones"))]
pub struct MemberForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub group_id: String,
    #[validate(
        length(max = MAX_NAME_LEN),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_mobile"))]
    pub primary_phone: String,
    #[validate(custom(function = "validate_mobile"))]
    pub alternate_phone: Option<String>,
    /// Defaults to today
    pub joining_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = MAX_NOTE_LEN))]
    pub notes: String,
}

fn validate_distinct_phones(form: &MemberForm) -> Result<(), ValidationError> {
    let (Some(primary), Some(alternate)) = (
        normalize_mobile(&form.primary_phone),
        form.alternate_phone.as_deref().and_then(normalize_mobile),
    ) else {
        return Ok(());
    };
    if primary == alternate {
        let mut err = ValidationError::new("distinct_phones");
        err.message = Some("alternate number must differ from primary".into());
        return Err(err);
    }
    Ok(())
}

impl MemberForm {
    /// Validate, reporting a lone bad phone number as `InvalidPhoneNumber`
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            AppError::from(errors).narrow_validation(&[
                ("primary_phone", ErrorCode::InvalidPhoneNumber),
                ("alternate_phone", ErrorCode::InvalidPhoneNumber),
            ])
        })
    }

    /// Treat a blank alternate number as absent.
    pub fn normalized(mut self) -> Self {
        if self
            .alternate_phone
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            self.alternate_phone = None;
        }
        self
    }

    /// Prefill the edit form from an existing member.
    pub fn from_member(member: &Member) -> Self {
        Self {
            group_id: member.group_id.clone(),
            name: member.name.clone(),
            primary_phone: member.primary_phone.clone(),
            alternate_phone: member.alternate_phone.clone(),
            joining_date: Some(member.joining_date),
            notes: member.notes.clone(),
        }
    }

    /// Copy the form fields onto `member`. Payment data is untouched.
    pub fn apply_to(&self, member: &mut Member, today: NaiveDate) {
        member.group_id = self.group_id.trim().to_string();
        member.name = self.name.trim().to_string();
        member.primary_phone =
            normalize_mobile(&self.primary_phone).unwrap_or_else(|| self.primary_phone.clone());
        member.alternate_phone = self
            .alternate_phone
            .as_deref()
            .map(|p| normalize_mobile(p).unwrap_or_else(|| p.to_string()));
        member.joining_date = self.joining_date.unwrap_or(today);
        member.notes = self.notes.trim().to_string();
    }
}

/// Row in a group's member table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub primary_phone: String,
    pub alternate_phone: Option<String>,
    pub payments_completed: u32,
    pub last_payment_date: Option<String>,
    pub last_payment_amount: Option<u64>,
    pub last_payment_upi: Option<String>,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            primary_phone: m.primary_phone.clone(),
            alternate_phone: m.alternate_phone.clone(),
            payments_completed: m.payments_completed,
            last_payment_date: m.last_payment_date.map(format_date),
            last_payment_amount: m.last_payment_amount,
            last_payment_upi: m.last_payment_upi.clone(),
        }
    }
}

/// Payment history popup content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistoryView {
    pub member_id: String,
    pub member_name: String,
    pub payments_completed: u32,
    pub entries: Vec<PaymentHistoryLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistoryLine {
    pub date: String,
    pub amount: u64,
    pub amount_display: String,
}

impl From<&Member> for PaymentHistoryView {
    fn from(m: &Member) -> Self {
        let mut history = m.payment_history.clone();
        // keep the most-recent-first convention even if the source drifted
        history.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            member_id: m.id.clone(),
            member_name: m.name.clone(),
            payments_completed: m.payments_completed,
            entries: history
                .iter()
                .map(|p| PaymentHistoryLine {
                    date: format_date(p.date),
                    amount: p.amount,
                    amount_display: crate::util::format_inr(p.amount),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form() -> MemberForm {
        MemberForm {
            group_id: "g1".into(),
            name: "  Lakshmi  ".into(),
            primary_phone: "+91 98765 43210".into(),
            alternate_phone: Some("9123456780".into()),
            joining_date: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_form_builds_normalized_member() {
        let f = form();
        assert!(f.validate().is_ok());
        let m = Member::from_form("m9".into(), &f, date(2026, 10, 18));
        assert_eq!(m.name, "Lakshmi");
        assert_eq!(m.primary_phone, "9876543210");
        assert_eq!(m.alternate_phone.as_deref(), Some("9123456780"));
        assert_eq!(m.joining_date, date(2026, 10, 18));
        assert_eq!(m.payments_completed, 0);
    }

    #[test]
    fn test_form_requires_primary_phone() {
        let mut f = form();
        f.primary_phone = String::new();
        let errors = f.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("primary_phone"));
    }

    #[test]
    fn test_form_rejects_bad_alternate_and_blank_name() {
        let mut f = form();
        f.name = " ".into();
        f.alternate_phone = Some("12".into());
        let errors = f.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("alternate_phone"));
    }

    #[test]
    fn test_check_reports_bad_phone_code() {
        let mut f = form();
        f.alternate_phone = Some("12".into());
        assert_eq!(f.check().unwrap_err().code, ErrorCode::InvalidPhoneNumber);
        f.name = String::new();
        assert_eq!(f.check().unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_name_and_notes_length_limits() {
        let mut f = form();
        f.name = "n".repeat(MAX_NAME_LEN as usize + 1);
        f.notes = "n".repeat(MAX_NOTE_LEN as usize + 1);
        let errors = f.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("notes"));
    }

    #[test]
    fn test_form_rejects_same_primary_and_alternate() {
        let mut f = form();
        f.alternate_phone = Some("98765 43210".into());
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_normalized_drops_empty_alternate() {
        let mut f = form();
        f.alternate_phone = Some("  ".into());
        let f = f.normalized();
        assert!(f.alternate_phone.is_none());
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_edit_keeps_payment_data() {
        let mut m = Member::from_form("m1".into(), &form(), date(2026, 1, 1));
        m.payments_completed = 4;
        m.payment_history.push(PaymentEntry { date: date(2026, 9, 10), amount: 5000 });

        let mut edit = MemberForm::from_member(&m);
        edit.notes = "moved to Chennai".into();
        edit.apply_to(&mut m, date(2026, 10, 18));

        assert_eq!(m.notes, "moved to Chennai");
        assert_eq!(m.payments_completed, 4);
        assert_eq!(m.payment_history.len(), 1);
        assert_eq!(m.joining_date, date(2026, 1, 1));
    }

    #[test]
    fn test_payment_history_view_most_recent_first() {
        let mut m = Member::from_form("m1".into(), &form(), date(2026, 1, 1));
        m.payment_history = vec![
            PaymentEntry { date: date(2026, 8, 10), amount: 5000 },
            PaymentEntry { date: date(2026, 9, 10), amount: 5000 },
        ];
        let view = PaymentHistoryView::from(&m);
        assert_eq!(view.entries[0].date, "10/09/2026");
        assert_eq!(view.entries[1].date, "10/08/2026");
        assert_eq!(view.entries[0].amount_display, "₹5,000");
    }

    #[test]
    fn test_paid_in_month_of() {
        let mut m = Member::from_form("m1".into(), &form(), date(2026, 1, 1));
        assert!(!m.paid_in_month_of(date(2026, 10, 18)));
        m.last_payment_date = Some(date(2026, 10, 2));
        assert!(m.paid_in_month_of(date(2026, 10, 18)));
        assert!(!m.paid_in_month_of(date(2027, 10, 18)));
    }
}
