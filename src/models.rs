use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum InternStatus {
    Active,
    EndingSoon,
    Completed,
    Renewed,
}

impl InternStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternStatus::Active => "active",
            InternStatus::EndingSoon => "ending_soon",
            InternStatus::Completed => "completed",
            InternStatus::Renewed => "renewed",
        }
    }

    /// Completed and renewed contracts count as conversions.
    pub fn is_converted(&self) -> bool {
        matches!(self, InternStatus::Completed | InternStatus::Renewed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    Stage,
    Apprentissage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    Completed,
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Cv,
    Contract,
    Report,
    Evaluation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub url: String,
    pub upload_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intern {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub tutor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: InternStatus,
    pub contract_type: ContractType,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl Intern {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole days between start and end. Negative when the dates are inverted,
    /// which is accepted as entered.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Intern payload before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIntern {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department: String,
    pub tutor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: InternStatus,
    pub contract_type: ContractType,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl NewIntern {
    pub fn into_intern(self, id: String) -> Intern {
        Intern {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            department: self.department,
            tutor: self.tutor,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            contract_type: self.contract_type,
            skills: self.skills,
            projects: Vec::new(),
            documents: Vec::new(),
            profile_image: self.profile_image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum EvaluationKind {
    #[serde(rename = "tutor")]
    Tutor,
    #[serde(rename = "self")]
    #[value(name = "self")]
    SelfAssessment,
    #[serde(rename = "360_feedback")]
    #[value(name = "360_feedback")]
    Feedback360,
    #[serde(rename = "manager")]
    Manager,
}

impl EvaluationKind {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationKind::Tutor => "Tuteur",
            EvaluationKind::SelfAssessment => "Auto-évaluation",
            EvaluationKind::Feedback360 => "Feedback 360°",
            EvaluationKind::Manager => "Manager",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRating {
    pub skill: String,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub id: String,
    pub intern_id: String,
    pub evaluator_id: String,
    pub evaluator_name: String,
    #[serde(rename = "type")]
    pub kind: EvaluationKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub soft_skills: Vec<SkillRating>,
    #[serde(default)]
    pub hard_skills: Vec<SkillRating>,
    pub overall_score: f64,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub recommendations: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub intern_id: String,
    pub evaluator_id: String,
    pub evaluator_name: String,
    pub kind: EvaluationKind,
    pub date: NaiveDate,
    pub soft_skills: Vec<SkillRating>,
    pub hard_skills: Vec<SkillRating>,
    pub overall_score: f64,
    pub comments: String,
    pub recommendations: String,
}

impl NewEvaluation {
    pub fn into_evaluation(self, id: String) -> Evaluation {
        Evaluation {
            id,
            intern_id: self.intern_id,
            evaluator_id: self.evaluator_id,
            evaluator_name: self.evaluator_name,
            kind: self.kind,
            date: self.date,
            soft_skills: self.soft_skills,
            hard_skills: self.hard_skills,
            overall_score: self.overall_score,
            comments: self.comments,
            recommendations: self.recommendations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ContractExpiring,
    EvaluationDue,
    RenewalProposal,
    HiringRecommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intern_id: Option<String>,
    pub date: NaiveDate,
    pub read: bool,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub contract_expiry: bool,
    pub evaluation_reminders: bool,
    pub email_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            contract_expiry: true,
            evaluation_reminders: true,
            email_notifications: true,
        }
    }
}

/// Stored as entered; nothing schedules archival or deletion from these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataRetention {
    pub archive_after_months: u32,
    pub auto_delete_after_years: u32,
}

impl Default for DataRetention {
    fn default() -> Self {
        Self {
            archive_after_months: 12,
            auto_delete_after_years: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub notifications: NotificationSettings,
    pub data_retention: DataRetention,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: NotificationSettings::default(),
            data_retention: DataRetention::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Hr,
    Tutor,
    Manager,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCount {
    pub department: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentConversion {
    pub department: String,
    pub total: usize,
    pub converted: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub year: i32,
    pub month: u32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyHires {
    pub year: i32,
    pub month: u32,
    pub hires: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub total_active_interns: usize,
    pub contracts_ending_soon: usize,
    pub conversion_rate: f64,
    pub average_evaluation_score: f64,
    pub department_distribution: Vec<DepartmentCount>,
    pub monthly_hirings: Vec<MonthlyHires>,
}
