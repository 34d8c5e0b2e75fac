//! Reminder delivery
//!
//! Renders the group template for one member and pushes it through the SMS
//! gateway, falling back from the primary to the alternate number.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chit_sms::{DeliveryReceipt, SmsError, SmsGateway, SmsMessage};
use shared::models::{Group, Member};
use shared::template::{self, TemplateVars};
use shared::util::{format_date, next_due_date};

use super::error::ReminderError;

/// Template values for `member` in `group` as of `today`
pub fn template_vars(group: &Group, member: &Member, today: NaiveDate) -> TemplateVars {
    TemplateVars {
        name: member.name.clone(),
        group: group.name.clone(),
        date: format_date(next_due_date(today, group.due_day)),
        place: group.place.clone(),
    }
}

/// The reminder text `member` would receive today
pub fn render_message(group: &Group, member: &Member, today: NaiveDate) -> String {
    template::render(&group.message_template, &template_vars(group, member, today))
}

/// One recipient's frozen delivery parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryJob {
    pub member_id: String,
    pub member_name: String,
    pub primary_phone: String,
    pub alternate_phone: Option<String>,
    pub body: String,
}

impl DeliveryJob {
    pub fn new(group: &Group, member: &Member, today: NaiveDate) -> Self {
        Self {
            member_id: member.id.clone(),
            member_name: member.name.clone(),
            primary_phone: member.primary_phone.clone(),
            alternate_phone: member
                .alternate_phone
                .clone()
                .filter(|alt| !alt.trim().is_empty() && *alt != member.primary_phone),
            body: render_message(group, member, today),
        }
    }
}

/// A successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub number: String,
    pub via_alternate: bool,
    pub receipt: DeliveryReceipt,
}

/// Send `job` to its primary number, then the alternate if the primary fails
///
/// A gateway-wide failure skips the alternate since it would fail the same way.
pub async fn deliver(
    gateway: &dyn SmsGateway,
    sender_id: &str,
    job: &DeliveryJob,
) -> Result<Delivered, ReminderError> {
    let mut attempted = Vec::with_capacity(2);

    let primary_err = match send_to(gateway, sender_id, job, &job.primary_phone).await {
        Ok(receipt) => {
            return Ok(Delivered {
                number: job.primary_phone.clone(),
                via_alternate: false,
                receipt,
            });
        }
        Err(err) => err,
    };
    attempted.push(job.primary_phone.clone());

    let last_err = match job.alternate_phone.as_deref() {
        Some(alternate) if !primary_err.is_gateway_wide() => {
            tracing::info!(
                member_id = %job.member_id,
                error = %primary_err,
                "Primary number failed, trying alternate"
            );
            attempted.push(alternate.to_string());
            match send_to(gateway, sender_id, job, alternate).await {
                Ok(receipt) => {
                    return Ok(Delivered {
                        number: alternate.to_string(),
                        via_alternate: true,
                        receipt,
                    });
                }
                Err(err) => err,
            }
        }
        _ => primary_err,
    };

    tracing::warn!(
        member_id = %job.member_id,
        attempted = ?attempted,
        error = %last_err,
        "Reminder delivery failed"
    );
    Err(ReminderError::DeliveryFailed {
        member_id: job.member_id.clone(),
        attempted,
        reason: last_err.to_string(),
    })
}

async fn send_to(
    gateway: &dyn SmsGateway,
    sender_id: &str,
    job: &DeliveryJob,
    number: &str,
) -> Result<DeliveryReceipt, SmsError> {
    gateway
        .send(&SmsMessage::new(number, sender_id, job.body.as_str()))
        .await
}
