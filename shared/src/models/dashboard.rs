//! Dashboard Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Group, Member};

/// Headline counts shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_groups: usize,
    pub total_members: usize,
    /// Members with no payment recorded in the current calendar month
    pub pending_reminders: usize,
}

impl DashboardStats {
    pub fn compute(groups: &[Group], members: &[Member], today: NaiveDate) -> Self {
        Self {
            total_groups: groups.len(),
            total_members: members.len(),
            pending_reminders: members.iter().filter(|m| !m.paid_in_month_of(today)).count(),
        }
    }
}
