use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    AppSettings, Evaluation, Intern, NewEvaluation, NewIntern, Notification, NotificationKind,
    Priority,
};
use crate::notifications;

/// Everything the dashboard holds in memory, in the shape `--data` reads and
/// `export-snapshot` writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub interns: Vec<Intern>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub settings: AppSettings,
}

/// What a cascading intern removal took with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub intern_removed: bool,
    pub evaluations_removed: usize,
    pub notifications_removed: usize,
}

#[derive(Debug, Default)]
pub struct Store {
    interns: Vec<Intern>,
    evaluations: Vec<Evaluation>,
    notifications: Vec<Notification>,
    settings: AppSettings,
}

fn next_id() -> String {
    Uuid::new_v4().to_string()
}

impl Store {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            interns: snapshot.interns,
            evaluations: snapshot.evaluations,
            notifications: snapshot.notifications,
            settings: snapshot.settings,
        }
    }

    pub fn seeded() -> anyhow::Result<Self> {
        Ok(Self::from_snapshot(crate::seed::mock_snapshot()?))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            interns: self.interns.clone(),
            evaluations: self.evaluations.clone(),
            notifications: self.notifications.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn interns(&self) -> &[Intern] {
        &self.interns
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn find_intern(&self, id: &str) -> Option<&Intern> {
        self.interns.iter().find(|intern| intern.id == id)
    }

    pub fn evaluations_for(&self, intern_id: &str) -> Vec<&Evaluation> {
        self.evaluations
            .iter()
            .filter(|evaluation| evaluation.intern_id == intern_id)
            .collect()
    }

    pub fn add_intern(&mut self, intern: NewIntern) -> &Intern {
        let intern = intern.into_intern(next_id());
        info!(id = %intern.id, name = %intern.full_name(), "intern added");
        self.interns.push(intern);
        &self.interns[self.interns.len() - 1]
    }

    pub fn update_intern(&mut self, updated: Intern) -> Result<(), StoreError> {
        let slot = self
            .interns
            .iter_mut()
            .find(|intern| intern.id == updated.id)
            .ok_or_else(|| StoreError::InternNotFound(updated.id.clone()))?;
        info!(id = %updated.id, "intern updated");
        *slot = updated;
        Ok(())
    }

    /// Removes the intern together with every evaluation and notification that
    /// references it. All three collections change in the same call.
    pub fn remove_intern(&mut self, id: &str) -> CascadeOutcome {
        let before = (
            self.interns.len(),
            self.evaluations.len(),
            self.notifications.len(),
        );

        self.interns.retain(|intern| intern.id != id);
        self.evaluations.retain(|evaluation| evaluation.intern_id != id);
        self.notifications
            .retain(|notification| notification.intern_id.as_deref() != Some(id));

        let outcome = CascadeOutcome {
            intern_removed: self.interns.len() < before.0,
            evaluations_removed: before.1 - self.evaluations.len(),
            notifications_removed: before.2 - self.notifications.len(),
        };
        info!(
            id,
            removed = outcome.intern_removed,
            evaluations = outcome.evaluations_removed,
            notifications = outcome.notifications_removed,
            "intern removed"
        );
        outcome
    }

    pub fn add_evaluation(&mut self, evaluation: NewEvaluation) -> &Evaluation {
        let evaluation = evaluation.into_evaluation(next_id());
        info!(
            id = %evaluation.id,
            intern_id = %evaluation.intern_id,
            score = evaluation.overall_score,
            "evaluation added"
        );
        self.evaluations.push(evaluation);
        &self.evaluations[self.evaluations.len() - 1]
    }

    pub fn mark_notification_read(&mut self, id: &str) {
        self.notifications = notifications::mark_read(&self.notifications, id);
        debug!(id, "notification marked read");
    }

    pub fn mark_all_notifications_read(&mut self) {
        self.notifications = notifications::mark_all_read(&self.notifications);
        debug!("all notifications marked read");
    }

    pub fn delete_notification(&mut self, id: &str) {
        self.notifications = notifications::delete(&self.notifications, id);
        debug!(id, "notification deleted");
    }

    pub fn clear_notifications(&mut self) {
        let removed = notifications::clear(&mut self.notifications);
        info!(removed, "notifications cleared");
    }

    pub fn update_settings(&mut self, settings: AppSettings) {
        self.settings = settings;
        debug!(settings = ?self.settings, "settings replaced");
    }

    /// Empties every collection and leaves a single unread notice saying so.
    pub fn clear_all_data(&mut self, today: NaiveDate) {
        self.interns.clear();
        self.evaluations.clear();
        self.notifications = vec![Notification {
            id: next_id(),
            kind: NotificationKind::HiringRecommendation,
            title: "Données supprimées".to_string(),
            message: "Toutes les données ont été supprimées avec succès.".to_string(),
            intern_id: None,
            date: today,
            read: false,
            priority: Priority::Medium,
        }];
        info!("all data cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractType, EvaluationKind, InternStatus};

    fn sample_new_intern(first_name: &str) -> NewIntern {
        NewIntern {
            first_name: first_name.to_string(),
            last_name: "Garnier".to_string(),
            email: "nina@example.com".to_string(),
            phone: String::new(),
            department: "Design".to_string(),
            tutor: "Paul Durand".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            status: InternStatus::Active,
            contract_type: ContractType::Stage,
            skills: vec!["Figma".to_string()],
            profile_image: None,
        }
    }

    fn sample_evaluation(intern_id: &str, score: f64) -> NewEvaluation {
        NewEvaluation {
            intern_id: intern_id.to_string(),
            evaluator_id: "tutor1".to_string(),
            evaluator_name: "Jean Martin".to_string(),
            kind: EvaluationKind::Tutor,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            soft_skills: Vec::new(),
            hard_skills: Vec::new(),
            overall_score: score,
            comments: String::new(),
            recommendations: String::new(),
        }
    }

    #[test]
    fn add_intern_assigns_fresh_ids() {
        let mut store = Store::default();
        let first = store.add_intern(sample_new_intern("Nina")).id.clone();
        let second = store.add_intern(sample_new_intern("Hugo")).id.clone();

        assert_ne!(first, second);
        assert_eq!(store.interns().len(), 2);
        assert_eq!(store.find_intern(&second).unwrap().first_name, "Hugo");
    }

    #[test]
    fn update_replaces_whole_record() {
        let mut store = Store::seeded().unwrap();
        let mut intern = store.find_intern("2").unwrap().clone();
        intern.status = InternStatus::Renewed;
        intern.skills.clear();

        store.update_intern(intern).unwrap();

        let stored = store.find_intern("2").unwrap();
        assert_eq!(stored.status, InternStatus::Renewed);
        assert!(stored.skills.is_empty());
        assert_eq!(store.interns()[1].id, "2");
    }

    #[test]
    fn update_unknown_intern_is_reported() {
        let mut store = Store::seeded().unwrap();
        let mut intern = store.find_intern("2").unwrap().clone();
        intern.id = "missing".to_string();

        assert!(matches!(
            store.update_intern(intern),
            Err(StoreError::InternNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn removing_an_intern_cascades_to_dependents() {
        let mut store = Store::seeded().unwrap();
        store.add_evaluation(sample_evaluation("3", 3.5));
        store.add_evaluation(sample_evaluation("1", 4.5));

        let outcome = store.remove_intern("3");

        assert_eq!(
            outcome,
            CascadeOutcome {
                intern_removed: true,
                evaluations_removed: 1,
                notifications_removed: 1,
            }
        );
        assert!(store.find_intern("3").is_none());
        assert!(store.evaluations().iter().all(|e| e.intern_id != "3"));
        assert!(store
            .notifications()
            .iter()
            .all(|n| n.intern_id.as_deref() != Some("3")));
        assert_eq!(store.evaluations().len(), 2);
        assert_eq!(store.notifications().len(), 1);
    }

    #[test]
    fn removing_unknown_intern_changes_nothing() {
        let mut store = Store::seeded().unwrap();
        let before = store.snapshot();

        let outcome = store.remove_intern("42");

        assert_eq!(outcome, CascadeOutcome::default());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn evaluations_do_not_check_intern_reference() {
        let mut store = Store::default();
        let evaluation = store.add_evaluation(sample_evaluation("ghost", 2.0));
        assert_eq!(evaluation.intern_id, "ghost");
        assert_eq!(store.evaluations_for("ghost").len(), 1);
    }

    #[test]
    fn notification_commands_flow_through_store() {
        let mut store = Store::seeded().unwrap();
        store.mark_notification_read("n1");
        assert!(store.notifications()[0].read);
        assert!(!store.notifications()[1].read);

        store.mark_all_notifications_read();
        assert!(store.notifications().iter().all(|n| n.read));

        store.delete_notification("n1");
        assert_eq!(store.notifications().len(), 1);

        store.clear_notifications();
        assert!(store.notifications().is_empty());
    }

    #[test]
    fn clear_all_data_leaves_single_notice() {
        let mut store = Store::seeded().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        store.clear_all_data(today);

        assert!(store.interns().is_empty());
        assert!(store.evaluations().is_empty());
        assert_eq!(store.notifications().len(), 1);
        let notice = &store.notifications()[0];
        assert!(!notice.read);
        assert_eq!(notice.priority, Priority::Medium);
        assert_eq!(notice.date, today);
        assert!(notice.intern_id.is_none());
    }

    #[test]
    fn settings_are_replaced_wholesale() {
        let mut store = Store::seeded().unwrap();
        let mut settings = store.settings().clone();
        settings.data_retention.archive_after_months = 3;
        settings.notifications.email_notifications = false;

        store.update_settings(settings.clone());

        assert_eq!(store.settings(), &settings);
    }
}
