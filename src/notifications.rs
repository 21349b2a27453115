use std::str::FromStr;

use chrono::{Duration, NaiveDate};

use crate::error::DataError;
use crate::models::{Intern, Notification, Priority};

pub const NO_INTERN_LABEL: &str = "N/A";
pub const UNKNOWN_INTERN_LABEL: &str = "Stagiaire inconnu";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Priority(Priority),
}

impl FromStr for NotificationFilter {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(NotificationFilter::All),
            "unread" => Ok(NotificationFilter::Unread),
            "high" => Ok(NotificationFilter::Priority(Priority::High)),
            "medium" => Ok(NotificationFilter::Priority(Priority::Medium)),
            "low" => Ok(NotificationFilter::Priority(Priority::Low)),
            other => Err(DataError::InvalidValue {
                field: "notification filter",
                value: other.to_string(),
            }),
        }
    }
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.read,
            NotificationFilter::Priority(priority) => notification.priority == *priority,
        }
    }
}

pub fn filter_notifications<'a>(
    notifications: &'a [Notification],
    filter: NotificationFilter,
) -> Vec<&'a Notification> {
    notifications
        .iter()
        .filter(|notification| filter.matches(notification))
        .collect()
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

pub fn priority_count(notifications: &[Notification], priority: Priority) -> usize {
    notifications
        .iter()
        .filter(|n| n.priority == priority)
        .count()
}

/// Notifications dated on or after `today - days`, in their original order.
pub fn filter_recent(
    notifications: &[Notification],
    today: NaiveDate,
    days: i64,
) -> Vec<&Notification> {
    let cutoff = today - Duration::days(days);
    notifications.iter().filter(|n| n.date >= cutoff).collect()
}

pub fn recent_count(notifications: &[Notification], today: NaiveDate, days: i64) -> usize {
    filter_recent(notifications, today, days).len()
}

pub fn mark_read(notifications: &[Notification], id: &str) -> Vec<Notification> {
    notifications
        .iter()
        .map(|notification| {
            let mut notification = notification.clone();
            if notification.id == id {
                notification.read = true;
            }
            notification
        })
        .collect()
}

pub fn mark_all_read(notifications: &[Notification]) -> Vec<Notification> {
    notifications
        .iter()
        .map(|notification| Notification {
            read: true,
            ..notification.clone()
        })
        .collect()
}

pub fn delete(notifications: &[Notification], id: &str) -> Vec<Notification> {
    notifications
        .iter()
        .filter(|notification| notification.id != id)
        .cloned()
        .collect()
}

/// Empties the list, returning how many notifications were dropped.
pub fn clear(notifications: &mut Vec<Notification>) -> usize {
    let removed = notifications.len();
    notifications.clear();
    removed
}

/// Display name for the intern a record points at. Dangling references
/// resolve to a placeholder rather than failing.
pub fn intern_label(interns: &[Intern], intern_id: Option<&str>) -> String {
    let Some(id) = intern_id else {
        return NO_INTERN_LABEL.to_string();
    };
    interns
        .iter()
        .find(|intern| intern.id == id)
        .map(Intern::full_name)
        .unwrap_or_else(|| UNKNOWN_INTERN_LABEL.to_string())
}
