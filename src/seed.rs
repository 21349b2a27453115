use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::debug;

use crate::error::DataError;
use crate::models::{
    AppSettings, ContractType, Document, DocumentKind, Evaluation, EvaluationKind, Intern,
    InternStatus, NewIntern, Notification, NotificationKind, Priority, Project, ProjectStatus,
    SkillRating, User, UserRole,
};
use crate::store::{Snapshot, Store};

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid date")
}

fn skills(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn mock_user() -> User {
    User {
        id: "1".to_string(),
        name: "Admin RH".to_string(),
        email: "admin@company.com".to_string(),
        role: UserRole::Hr,
        department: Some("Ressources Humaines".to_string()),
    }
}

/// The dataset the dashboard starts from when no snapshot is supplied.
pub fn mock_snapshot() -> anyhow::Result<Snapshot> {
    let people = vec![
        (
            "1",
            "Marie",
            "Dubois",
            "+33 1 23 45 67 89",
            "Développement",
            "Jean Martin",
            date(2024, 1, 15)?,
            date(2024, 7, 15)?,
            InternStatus::Active,
            ContractType::Stage,
            skills(&["React", "JavaScript", "CSS"]),
            Some("https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg"),
        ),
        (
            "2",
            "Thomas",
            "Bernard",
            "+33 1 23 45 67 90",
            "Marketing",
            "Sophie Leclerc",
            date(2024, 2, 1)?,
            date(2024, 8, 1)?,
            InternStatus::Active,
            ContractType::Stage,
            skills(&["Marketing Digital", "Analytics", "SEO"]),
            Some("https://images.pexels.com/photos/1222271/pexels-photo-1222271.jpeg"),
        ),
        (
            "3",
            "Emma",
            "Moreau",
            "+33 1 23 45 67 91",
            "Design",
            "Paul Durand",
            date(2023, 12, 1)?,
            date(2024, 6, 1)?,
            InternStatus::EndingSoon,
            ContractType::Stage,
            skills(&["UI/UX", "Figma", "Adobe Creative"]),
            Some("https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg"),
        ),
        (
            "4",
            "Lucas",
            "Petit",
            "+33 1 23 45 67 92",
            "Développement",
            "Jean Martin",
            date(2024, 3, 1)?,
            date(2024, 9, 1)?,
            InternStatus::Active,
            ContractType::Apprentissage,
            skills(&["Python", "Django", "PostgreSQL"]),
            Some("https://images.pexels.com/photos/1681010/pexels-photo-1681010.jpeg"),
        ),
        (
            "5",
            "Léa",
            "Roux",
            "+33 1 23 45 67 93",
            "RH",
            "Claire Rousseau",
            date(2023, 10, 1)?,
            date(2024, 4, 1)?,
            InternStatus::Completed,
            ContractType::Stage,
            skills(&["Recrutement", "GPEC", "Droit du travail"]),
            None,
        ),
    ];

    let mut interns = Vec::new();
    for (id, first, last, phone, department, tutor, start, end, status, contract, skills, image) in
        people
    {
        interns.push(Intern {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!(
                "{}.{}@example.com",
                first.to_lowercase().replace('é', "e"),
                last.to_lowercase()
            ),
            phone: phone.to_string(),
            department: department.to_string(),
            tutor: tutor.to_string(),
            start_date: start,
            end_date: end,
            status,
            contract_type: contract,
            skills,
            projects: Vec::new(),
            documents: Vec::new(),
            profile_image: image.map(str::to_string),
        });
    }

    interns[0].projects.push(Project {
        id: "p1".to_string(),
        name: "Application E-commerce".to_string(),
        description: "Développement d'une interface utilisateur moderne".to_string(),
        start_date: date(2024, 2, 1)?,
        end_date: None,
        status: ProjectStatus::InProgress,
        skills: skills(&["React", "TypeScript"]),
    });
    interns[0].documents.push(Document {
        id: "d1".to_string(),
        name: "CV_Marie_Dubois.pdf".to_string(),
        kind: DocumentKind::Cv,
        url: "/documents/cv_marie.pdf".to_string(),
        upload_date: date(2024, 1, 10)?,
    });
    interns[1].projects.push(Project {
        id: "p2".to_string(),
        name: "Campagne Social Media".to_string(),
        description: "Stratégie de communication digitale".to_string(),
        start_date: date(2024, 2, 15)?,
        end_date: None,
        status: ProjectStatus::InProgress,
        skills: skills(&["Marketing Digital", "Communication"]),
    });
    interns[2].projects.push(Project {
        id: "p3".to_string(),
        name: "Refonte Interface".to_string(),
        description: "Amélioration de l'expérience utilisateur".to_string(),
        start_date: date(2024, 1, 1)?,
        end_date: Some(date(2024, 5, 15)?),
        status: ProjectStatus::Completed,
        skills: skills(&["UI/UX", "Prototypage"]),
    });

    let rating = |skill: &str, rating: u8| SkillRating {
        skill: skill.to_string(),
        rating,
    };
    let evaluations = vec![Evaluation {
        id: "e1".to_string(),
        intern_id: "1".to_string(),
        evaluator_id: "tutor1".to_string(),
        evaluator_name: "Jean Martin".to_string(),
        kind: EvaluationKind::Tutor,
        date: date(2024, 3, 15)?,
        soft_skills: vec![
            rating("Communication", 4),
            rating("Autonomie", 3),
            rating("Travail en équipe", 5),
        ],
        hard_skills: vec![rating("React", 4), rating("JavaScript", 4), rating("CSS", 3)],
        overall_score: 4.0,
        comments: "Excellent travail, très motivée et impliquée dans ses projets.".to_string(),
        recommendations: "Continuer le développement des compétences techniques avancées."
            .to_string(),
    }];

    let notifications = vec![
        Notification {
            id: "n1".to_string(),
            kind: NotificationKind::ContractExpiring,
            title: "Contrat arrivant à échéance".to_string(),
            message: "Le contrat d'Emma Moreau se termine dans 15 jours".to_string(),
            intern_id: Some("3".to_string()),
            date: date(2024, 5, 15)?,
            read: false,
            priority: Priority::High,
        },
        Notification {
            id: "n2".to_string(),
            kind: NotificationKind::EvaluationDue,
            title: "Évaluation en attente".to_string(),
            message: "Évaluation trimestrielle de Thomas Bernard à réaliser".to_string(),
            intern_id: Some("2".to_string()),
            date: date(2024, 5, 10)?,
            read: false,
            priority: Priority::Medium,
        },
    ];

    Ok(Snapshot {
        interns,
        evaluations,
        notifications,
        settings: AppSettings::default(),
    })
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, DataError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    debug!(
        path = %path.display(),
        interns = snapshot.interns.len(),
        evaluations = snapshot.evaluations.len(),
        notifications = snapshot.notifications.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), DataError> {
    let body = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, body).map_err(|source| DataError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(serde::Deserialize)]
struct CsvRow {
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default)]
    phone: String,
    department: String,
    tutor: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: InternStatus,
    contract_type: ContractType,
    #[serde(default)]
    skills: String,
}

impl From<CsvRow> for NewIntern {
    fn from(row: CsvRow) -> Self {
        NewIntern {
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            department: row.department,
            tutor: row.tutor,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status,
            contract_type: row.contract_type,
            skills: split_skills(&row.skills),
            profile_image: None,
        }
    }
}

/// Skills are a `;`-separated list inside one CSV column.
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn import_csv<R: std::io::Read>(store: &mut Store, source: R) -> Result<usize, DataError> {
    let mut reader = csv::Reader::from_reader(source);
    let rows = reader
        .deserialize::<CsvRow>()
        .collect::<Result<Vec<CsvRow>, csv::Error>>()?;

    // Nothing reaches the store unless every row parsed.
    let inserted = rows.len();
    for row in rows {
        store.add_intern(row.into());
    }

    Ok(inserted)
}

pub fn import_csv_file(store: &mut Store, csv_path: &Path) -> Result<usize, DataError> {
    let file = std::fs::File::open(csv_path).map_err(|source| DataError::Read {
        path: csv_path.to_path_buf(),
        source,
    })?;
    import_csv(store, file)
}
