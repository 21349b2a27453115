use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{
    DepartmentConversion, DepartmentCount, Evaluation, Intern, InternStatus, Kpi, MonthlyAverage,
    MonthlyHires, SkillCount,
};

pub const TOP_SKILLS: usize = 10;
pub const TREND_MONTHS: usize = 6;
pub const EXCELLENT_SCORE: f64 = 4.5;

fn ratio_percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub fn average_evaluation_score(evaluations: &[Evaluation]) -> f64 {
    if evaluations.is_empty() {
        return 0.0;
    }
    let total: f64 = evaluations.iter().map(|e| e.overall_score).sum();
    total / evaluations.len() as f64
}

/// Average score expressed on a 0-100 scale, rounded.
pub fn score_percentage(average: f64) -> u32 {
    (average * 20.0).round() as u32
}

pub fn excellent_evaluation_count(evaluations: &[Evaluation]) -> usize {
    evaluations
        .iter()
        .filter(|e| e.overall_score >= EXCELLENT_SCORE)
        .count()
}

/// Evaluations dated in the same calendar month as `today`, whatever the year.
pub fn evaluations_in_month(evaluations: &[Evaluation], today: NaiveDate) -> usize {
    evaluations
        .iter()
        .filter(|e| e.date.month() == today.month())
        .count()
}

/// Distinct department names in first-occurrence order.
pub fn departments(interns: &[Intern]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for intern in interns {
        if !names.contains(&intern.department) {
            names.push(intern.department.clone());
        }
    }
    names
}

pub fn department_distribution(interns: &[Intern]) -> Vec<DepartmentCount> {
    let mut counts: Vec<DepartmentCount> = Vec::new();
    for intern in interns {
        match counts.iter_mut().find(|c| c.department == intern.department) {
            Some(entry) => entry.count += 1,
            None => counts.push(DepartmentCount {
                department: intern.department.clone(),
                count: 1,
            }),
        }
    }
    counts
}

pub fn conversion_rate(interns: &[Intern]) -> f64 {
    let converted = interns.iter().filter(|i| i.status.is_converted()).count();
    ratio_percent(converted, interns.len())
}

pub fn conversion_by_department(interns: &[Intern]) -> Vec<DepartmentConversion> {
    departments(interns)
        .into_iter()
        .map(|department| {
            let members: Vec<&Intern> = interns
                .iter()
                .filter(|i| i.department == department)
                .collect();
            let converted = members.iter().filter(|i| i.status.is_converted()).count();
            DepartmentConversion {
                rate: ratio_percent(converted, members.len()),
                total: members.len(),
                converted,
                department,
            }
        })
        .collect()
}

fn skill_counts(interns: &[Intern]) -> Vec<SkillCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SkillCount> = Vec::new();

    for skill in interns.iter().flat_map(|i| i.skills.iter()) {
        match index.get(skill.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(skill.as_str(), counts.len());
                counts.push(SkillCount {
                    skill: skill.clone(),
                    count: 1,
                });
            }
        }
    }
    counts
}

/// Most frequent skills, case-sensitive. Ties keep the order in which the
/// skills were first seen.
pub fn skills_distribution(interns: &[Intern]) -> Vec<SkillCount> {
    let mut counts = skill_counts(interns);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_SKILLS);
    counts
}

pub fn distinct_skill_count(interns: &[Intern]) -> usize {
    skill_counts(interns).len()
}

pub fn average_internship_duration_days(interns: &[Intern]) -> Option<f64> {
    if interns.is_empty() {
        return None;
    }
    let total: i64 = interns.iter().map(Intern::duration_days).sum();
    Some(total as f64 / interns.len() as f64)
}

pub fn monthly_evaluation_averages(evaluations: &[Evaluation]) -> Vec<MonthlyAverage> {
    let mut groups: HashMap<(i32, u32), (usize, f64)> = HashMap::new();
    for evaluation in evaluations {
        let entry = groups
            .entry((evaluation.date.year(), evaluation.date.month()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += evaluation.overall_score;
    }

    let mut averages: Vec<MonthlyAverage> = groups
        .into_iter()
        .map(|((year, month), (count, sum))| MonthlyAverage {
            year,
            month,
            average: sum / count as f64,
        })
        .collect();
    averages.sort_by_key(|m| (m.year, m.month));

    let skip = averages.len().saturating_sub(TREND_MONTHS);
    averages.split_off(skip)
}

pub fn monthly_hirings(interns: &[Intern]) -> Vec<MonthlyHires> {
    let mut groups: HashMap<(i32, u32), usize> = HashMap::new();
    for intern in interns {
        *groups
            .entry((intern.start_date.year(), intern.start_date.month()))
            .or_insert(0) += 1;
    }

    let mut hires: Vec<MonthlyHires> = groups
        .into_iter()
        .map(|((year, month), hires)| MonthlyHires { year, month, hires })
        .collect();
    hires.sort_by_key(|m| (m.year, m.month));
    hires
}

pub fn compute_kpis(interns: &[Intern], evaluations: &[Evaluation]) -> Kpi {
    Kpi {
        total_active_interns: interns
            .iter()
            .filter(|i| i.status == InternStatus::Active)
            .count(),
        contracts_ending_soon: interns
            .iter()
            .filter(|i| i.status == InternStatus::EndingSoon)
            .count(),
        conversion_rate: conversion_rate(interns),
        average_evaluation_score: average_evaluation_score(evaluations),
        department_distribution: department_distribution(interns),
        monthly_hirings: monthly_hirings(interns),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub department: Option<String>,
    pub intern_count: usize,
    pub average_internship_duration_days: Option<f64>,
    pub distinct_skills: usize,
    pub average_evaluation_score: f64,
    pub success_rate: u32,
    pub top_skills: Vec<SkillCount>,
    pub conversion_by_department: Vec<DepartmentConversion>,
    pub monthly_evaluation_averages: Vec<MonthlyAverage>,
}

/// Statistics screen bundle. The department only sets the headline intern
/// count; every table and average covers the whole collection.
pub fn statistics(
    interns: &[Intern],
    evaluations: &[Evaluation],
    department: Option<&str>,
) -> Statistics {
    let filtered: Vec<Intern> = interns
        .iter()
        .filter(|i| department.map_or(true, |d| i.department == d))
        .cloned()
        .collect();
    let average = average_evaluation_score(evaluations);

    Statistics {
        department: department.map(str::to_string),
        intern_count: filtered.len(),
        average_internship_duration_days: average_internship_duration_days(interns),
        distinct_skills: distinct_skill_count(interns),
        average_evaluation_score: average,
        success_rate: score_percentage(average),
        top_skills: skills_distribution(interns),
        conversion_by_department: conversion_by_department(interns),
        monthly_evaluation_averages: monthly_evaluation_averages(evaluations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractType, EvaluationKind};

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn intern(id: &str, department: &str, status: InternStatus, skills: &[&str]) -> Intern {
        Intern {
            id: id.to_string(),
            first_name: "Avery".to_string(),
            last_name: format!("Lee{id}"),
            email: "avery@example.com".to_string(),
            phone: String::new(),
            department: department.to_string(),
            tutor: "Jean Martin".to_string(),
            start_date: day(2024, 1, 1),
            end_date: day(2024, 1, 31),
            status,
            contract_type: ContractType::Stage,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            projects: Vec::new(),
            documents: Vec::new(),
            profile_image: None,
        }
    }

    fn evaluation(date: NaiveDate, score: f64) -> Evaluation {
        Evaluation {
            id: "e".to_string(),
            intern_id: "1".to_string(),
            evaluator_id: "tutor1".to_string(),
            evaluator_name: "Jean Martin".to_string(),
            kind: EvaluationKind::Tutor,
            date,
            soft_skills: Vec::new(),
            hard_skills: Vec::new(),
            overall_score: score,
            comments: String::new(),
            recommendations: String::new(),
        }
    }

    #[test]
    fn average_score_handles_empty_and_mean() {
        assert_eq!(average_evaluation_score(&[]), 0.0);
        let evals = vec![evaluation(day(2024, 3, 1), 4.0), evaluation(day(2024, 3, 2), 5.0)];
        assert!((average_evaluation_score(&evals) - 4.5).abs() < 1e-9);
        assert_eq!(score_percentage(4.5), 90);
    }

    #[test]
    fn conversion_rate_for_half_converted_department() {
        let interns = vec![
            intern("1", "Dev", InternStatus::Active, &[]),
            intern("2", "Dev", InternStatus::Completed, &[]),
        ];
        let rates = conversion_by_department(&interns);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].department, "Dev");
        assert!((rates[0].rate - 50.0).abs() < 1e-9);
        assert!((conversion_rate(&interns) - 50.0).abs() < 1e-9);
        assert_eq!(conversion_rate(&[]), 0.0);
    }

    #[test]
    fn conversion_rates_stay_within_bounds() {
        let interns = vec![
            intern("1", "Dev", InternStatus::Renewed, &[]),
            intern("2", "Design", InternStatus::Active, &[]),
            intern("3", "Dev", InternStatus::Completed, &[]),
            intern("4", "RH", InternStatus::EndingSoon, &[]),
        ];
        for entry in conversion_by_department(&interns) {
            assert!((0.0..=100.0).contains(&entry.rate));
        }
        assert!(conversion_by_department(&[]).is_empty());
    }

    #[test]
    fn distribution_counts_sum_to_total_in_first_seen_order() {
        let interns = vec![
            intern("1", "Marketing", InternStatus::Active, &[]),
            intern("2", "Dev", InternStatus::Active, &[]),
            intern("3", "Marketing", InternStatus::Active, &[]),
        ];
        let distribution = department_distribution(&interns);
        let names: Vec<&str> = distribution.iter().map(|d| d.department.as_str()).collect();
        assert_eq!(names, vec!["Marketing", "Dev"]);
        let total: usize = distribution.iter().map(|d| d.count).sum();
        assert_eq!(total, interns.len());
    }

    #[test]
    fn skills_rank_by_frequency_case_sensitive() {
        let interns = vec![
            intern("1", "Dev", InternStatus::Active, &["React", "CSS"]),
            intern("2", "Dev", InternStatus::Active, &["React", "react"]),
        ];
        let top = skills_distribution(&interns);
        assert_eq!(top[0].skill, "React");
        assert_eq!(top[0].count, 2);
        let rest: Vec<&str> = top[1..].iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(rest, vec!["CSS", "react"]);
        assert_eq!(distinct_skill_count(&interns), 3);
    }

    #[test]
    fn skills_truncate_to_top_ten() {
        let many: Vec<String> = (0..15).map(|n| format!("skill-{n}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let interns = vec![intern("1", "Dev", InternStatus::Active, &refs)];
        let top = skills_distribution(&interns);
        assert_eq!(top.len(), TOP_SKILLS);
        assert_eq!(top[0].skill, "skill-0");
        assert_eq!(distinct_skill_count(&interns), 15);
    }

    #[test]
    fn duration_average_is_guarded() {
        assert_eq!(average_internship_duration_days(&[]), None);
        let mut long = intern("2", "Dev", InternStatus::Active, &[]);
        long.end_date = day(2024, 3, 1);
        let interns = vec![intern("1", "Dev", InternStatus::Active, &[]), long];
        assert_eq!(average_internship_duration_days(&interns), Some(45.0));
    }

    #[test]
    fn monthly_averages_keep_last_six_months_in_order() {
        let mut evals = Vec::new();
        for month in (1..=8).rev() {
            evals.push(evaluation(day(2024, month, 10), month as f64 / 2.0));
        }
        evals.push(evaluation(day(2024, 8, 20), 5.0));
        evals.push(evaluation(day(2023, 12, 1), 1.0));

        let trend = monthly_evaluation_averages(&evals);
        let months: Vec<(i32, u32)> = trend.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(
            months,
            vec![(2024, 3), (2024, 4), (2024, 5), (2024, 6), (2024, 7), (2024, 8)]
        );
        assert!((trend[5].average - 4.5).abs() < 1e-9);
    }

    #[test]
    fn kpis_reflect_seed_collections() {
        let snapshot = crate::seed::mock_snapshot().unwrap();
        let kpi = compute_kpis(&snapshot.interns, &snapshot.evaluations);

        assert_eq!(kpi.total_active_interns, 3);
        assert_eq!(kpi.contracts_ending_soon, 1);
        assert!((kpi.conversion_rate - 20.0).abs() < 1e-9);
        assert!((kpi.average_evaluation_score - 4.0).abs() < 1e-9);
        assert_eq!(kpi.department_distribution[0].department, "Développement");
        assert_eq!(kpi.department_distribution[0].count, 2);
        let first = &kpi.monthly_hirings[0];
        assert_eq!((first.year, first.month, first.hires), (2023, 10, 1));
        let total: usize = kpi.monthly_hirings.iter().map(|m| m.hires).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn evaluation_counters() {
        let evals = vec![
            evaluation(day(2024, 5, 1), 4.5),
            evaluation(day(2023, 5, 20), 3.0),
            evaluation(day(2024, 6, 1), 4.9),
        ];
        assert_eq!(excellent_evaluation_count(&evals), 2);
        assert_eq!(evaluations_in_month(&evals, day(2024, 5, 31)), 2);
    }

    #[test]
    fn department_selection_keeps_full_conversion_table() {
        let snapshot = crate::seed::mock_snapshot().unwrap();
        let stats = statistics(&snapshot.interns, &snapshot.evaluations, Some("RH"));

        assert_eq!(stats.intern_count, 1);
        assert_eq!(stats.conversion_by_department.len(), 4);
        let rh = stats
            .conversion_by_department
            .iter()
            .find(|c| c.department == "RH")
            .unwrap();
        assert!((rh.rate - 100.0).abs() < 1e-9);
        assert_eq!(stats.distinct_skills, 15);
        assert_eq!(stats.success_rate, 80);
    }
}
