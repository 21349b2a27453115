use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::DataError;
use crate::models::{Evaluation, Intern, InternStatus, Kpi};
use crate::stats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    #[default]
    General,
    Evaluations,
    Contracts,
    Departments,
    Trends,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::General => "general",
            ReportType::Evaluations => "evaluations",
            ReportType::Contracts => "contracts",
            ReportType::Departments => "departments",
            ReportType::Trends => "trends",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::General => "Rapport Général",
            ReportType::Evaluations => "Rapport d'Évaluations",
            ReportType::Contracts => "Rapport Contractuel",
            ReportType::Departments => "Rapport par Département",
            ReportType::Trends => "Rapport de Tendances",
        }
    }
}

/// Echoed into the report; intern and evaluation lists are not narrowed by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ReportPeriod {
    #[default]
    CurrentMonth,
    LastMonth,
    CurrentQuarter,
    LastQuarter,
    CurrentYear,
    LastYear,
    AllTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Excel,
}

impl ReportFormat {
    /// Nominal extension. The body is JSON either way.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "json",
            ReportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DepartmentFilter {
    #[default]
    All,
    Named(String),
}

impl DepartmentFilter {
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            DepartmentFilter::All
        } else {
            DepartmentFilter::Named(value.to_string())
        }
    }

    pub fn includes(&self, intern: &Intern) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Named(name) => intern.department == *name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DepartmentFilter::All => "all",
            DepartmentFilter::Named(name) => name,
        }
    }
}

impl Serialize for DepartmentFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub period: ReportPeriod,
    pub department: DepartmentFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_interns: usize,
    pub active_interns: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    pub interns: Vec<Intern>,
    pub evaluations: Vec<Evaluation>,
    pub kpis: Kpi,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub period: ReportPeriod,
    pub department: DepartmentFilter,
    pub generated_at: DateTime<Utc>,
    pub data: ReportData,
}

pub fn build_report(
    request: &ReportRequest,
    interns: &[Intern],
    evaluations: &[Evaluation],
    generated_at: DateTime<Utc>,
) -> Report {
    let filtered: Vec<Intern> = interns
        .iter()
        .filter(|intern| request.department.includes(intern))
        .cloned()
        .collect();
    let related: Vec<Evaluation> = evaluations
        .iter()
        .filter(|evaluation| filtered.iter().any(|i| i.id == evaluation.intern_id))
        .cloned()
        .collect();

    let summary = ReportSummary {
        total_interns: filtered.len(),
        active_interns: filtered
            .iter()
            .filter(|i| i.status == InternStatus::Active)
            .count(),
        // Scored over every evaluation, not just the filtered department.
        average_score: stats::average_evaluation_score(evaluations),
    };

    Report {
        report_type: request.report_type,
        period: request.period,
        department: request.department.clone(),
        generated_at,
        data: ReportData {
            kpis: stats::compute_kpis(interns, evaluations),
            interns: filtered,
            evaluations: related,
            summary,
        },
    }
}

pub fn report_file_name(report_type: ReportType, format: ReportFormat, date: NaiveDate) -> String {
    format!(
        "rapport_{}_{}.{}",
        report_type.as_str(),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn write_report(report: &Report, dir: &Path, format: ReportFormat) -> Result<PathBuf, DataError> {
    let body = serde_json::to_string_pretty(report)?;
    let path = dir.join(report_file_name(
        report.report_type,
        format,
        report.generated_at.date_naive(),
    ));
    std::fs::write(&path, body).map_err(|source| DataError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), interns = report.data.interns.len(), "report written");
    Ok(path)
}

pub fn render_preview(report: &Report) -> String {
    let mut output = String::new();
    let summary = &report.data.summary;

    let _ = writeln!(output, "# {}", report.report_type.title());
    let _ = writeln!(
        output,
        "Generated {} for department {} (period {:?})",
        report.generated_at.format("%d/%m/%Y %H:%M"),
        report.department.label(),
        report.period
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Interns: {}", summary.total_interns);
    let _ = writeln!(output, "- Active: {}", summary.active_interns);
    let _ = writeln!(output, "- Average score: {:.1}/5", summary.average_score);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Interns");
    if report.data.interns.is_empty() {
        let _ = writeln!(output, "No interns match this department.");
    } else {
        for intern in &report.data.interns {
            let _ = writeln!(
                output,
                "- {} ({}, {}) until {}",
                intern.full_name(),
                intern.department,
                intern.status.as_str(),
                intern.end_date.format("%d/%m/%Y")
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Evaluations");
    if report.data.evaluations.is_empty() {
        let _ = writeln!(output, "No evaluations recorded for these interns.");
    } else {
        for evaluation in &report.data.evaluations {
            let _ = writeln!(
                output,
                "- {} by {} on {}: {:.1}",
                evaluation.kind.label(),
                evaluation.evaluator_name,
                evaluation.date.format("%d/%m/%Y"),
                evaluation.overall_score
            );
        }
    }

    output
}
