use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod models;
mod notifications;
mod report;
mod seed;
mod stats;
mod store;
mod table;

use models::{ContractType, EvaluationKind, InternStatus, NewEvaluation, NewIntern, SkillRating};
use notifications::NotificationFilter;
use report::{DepartmentFilter, ReportFormat, ReportPeriod, ReportRequest, ReportType};
use store::Store;
use table::{SortDirection, SortField, SortState, TableQuery};

#[derive(Parser)]
#[command(name = "internboard")]
#[command(about = "Intern tracking dashboard: profiles, evaluations, statistics and reports", long_about = None)]
struct Cli {
    /// Start from a JSON snapshot instead of the built-in sample data
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Append interns from a CSV file before running the command
    #[arg(long, global = true)]
    import_csv: Option<PathBuf>,
    /// Settings TOML file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show KPIs and the intern table
    Dashboard,
    /// List interns with search, status filter and sorting
    Interns {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<InternStatus>,
        #[arg(long, value_enum, default_value_t = SortField::Name)]
        sort: SortField,
        #[arg(long)]
        desc: bool,
    },
    /// Show one intern with projects, documents and evaluations
    ShowIntern {
        #[arg(long)]
        id: String,
    },
    /// Add an intern
    AddIntern {
        #[command(flatten)]
        fields: InternArgs,
    },
    /// Replace fields of an existing intern
    EditIntern {
        #[arg(long)]
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        tutor: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        status: Option<InternStatus>,
        #[arg(long)]
        contract_type: Option<ContractType>,
        /// Comma-separated; replaces the whole list
        #[arg(long)]
        skills: Option<String>,
    },
    /// Delete an intern with its evaluations and notifications
    DeleteIntern {
        #[arg(long)]
        id: String,
    },
    /// List evaluations
    Evaluations,
    /// Record an evaluation
    AddEvaluation {
        #[arg(long)]
        intern_id: String,
        #[arg(long)]
        evaluator_id: String,
        #[arg(long)]
        evaluator_name: String,
        #[arg(long = "type", value_enum, default_value_t = EvaluationKind::Tutor)]
        kind: EvaluationKind,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        score: f64,
        /// Soft skill rating as NAME=RATING, repeatable
        #[arg(long = "soft", value_parser = parse_skill_rating)]
        soft_skills: Vec<SkillRating>,
        /// Hard skill rating as NAME=RATING, repeatable
        #[arg(long = "hard", value_parser = parse_skill_rating)]
        hard_skills: Vec<SkillRating>,
        #[arg(long, default_value = "")]
        comments: String,
        #[arg(long, default_value = "")]
        recommendations: String,
    },
    /// Detailed statistics
    Stats {
        /// Department name or "all"
        #[arg(long, default_value = "all")]
        department: String,
    },
    /// List notifications
    Notifications {
        /// all, unread, high, medium or low
        #[arg(long, default_value = "all")]
        filter: NotificationFilter,
    },
    /// Mark one notification as read
    MarkRead {
        #[arg(long)]
        id: String,
    },
    /// Mark every notification as read
    MarkAllRead,
    /// Delete one notification
    DeleteNotification {
        #[arg(long)]
        id: String,
    },
    /// Delete every notification
    ClearNotifications,
    /// Generate a report file
    Report {
        #[arg(long = "type", value_enum, default_value_t = ReportType::General)]
        report_type: ReportType,
        #[arg(long, value_enum, default_value_t = ReportPeriod::CurrentMonth)]
        period: ReportPeriod,
        /// Department name or "all"
        #[arg(long, default_value = "all")]
        department: String,
        #[arg(long, value_enum, default_value_t = ReportFormat::Pdf)]
        format: ReportFormat,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Print a markdown preview instead of writing the file
        #[arg(long)]
        preview: bool,
        /// Simulated generation time in milliseconds
        #[arg(long, default_value_t = 2000)]
        delay_ms: u64,
    },
    /// Print the effective settings
    Settings,
    /// Delete all interns, evaluations and notifications
    ClearData,
    /// Write the current in-memory state as a JSON snapshot
    ExportSnapshot {
        #[arg(long, default_value = "snapshot.json")]
        out: PathBuf,
    },
}

#[derive(clap::Args)]
struct InternArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long)]
    department: String,
    #[arg(long)]
    tutor: String,
    #[arg(long)]
    start_date: NaiveDate,
    #[arg(long)]
    end_date: NaiveDate,
    #[arg(long, default_value = "active")]
    status: InternStatus,
    #[arg(long, value_enum, default_value_t = ContractType::Stage)]
    contract_type: ContractType,
    /// Comma-separated
    #[arg(long, default_value = "")]
    skills: String,
}

impl From<InternArgs> for NewIntern {
    fn from(args: InternArgs) -> Self {
        NewIntern {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            department: args.department,
            tutor: args.tutor,
            start_date: args.start_date,
            end_date: args.end_date,
            status: args.status,
            contract_type: args.contract_type,
            skills: split_list(&args.skills),
            profile_image: None,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_skill_rating(raw: &str) -> Result<SkillRating, String> {
    let (skill, rating) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=RATING, got '{raw}'"))?;
    let rating = rating
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("rating in '{raw}' is not a number"))?;
    Ok(SkillRating {
        skill: skill.trim().to_string(),
        rating,
    })
}

fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "o" | "oui"))
}

fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn print_intern_table(store: &Store, query: &TableQuery) {
    let rows = table::filter_and_sort(store.interns(), query);
    if rows.is_empty() {
        println!("No interns match these filters.");
        return;
    }
    for intern in rows {
        println!(
            "- [{}] {} | {} | tutor {} | {} → {} | {}",
            intern.id,
            intern.full_name(),
            intern.department,
            intern.tutor,
            display_date(intern.start_date),
            display_date(intern.end_date),
            intern.status.as_str()
        );
    }
}

fn print_notifications(store: &Store, filter: NotificationFilter) {
    let all = store.notifications();
    let list = notifications::filter_notifications(all, filter);
    println!(
        "Notifications: {} total, {} unread, {} high priority, {} this week",
        all.len(),
        notifications::unread_count(all),
        notifications::priority_count(all, models::Priority::High),
        notifications::recent_count(all, Utc::now().date_naive(), 7)
    );
    if list.is_empty() {
        println!("No notifications for this filter.");
        return;
    }
    for notification in list {
        println!(
            "- [{}] {} {} ({}) {}: {} | intern {}",
            notification.id,
            if notification.read { " " } else { "*" },
            notification.title,
            notification.priority.as_str(),
            display_date(notification.date),
            notification.message,
            notifications::intern_label(store.interns(), notification.intern_id.as_deref())
        );
    }
}

fn print_dashboard(store: &Store) {
    let kpi = stats::compute_kpis(store.interns(), store.evaluations());
    println!("Active interns: {}", kpi.total_active_interns);
    println!("Contracts ending soon: {}", kpi.contracts_ending_soon);
    println!("Conversion rate: {:.0}%", kpi.conversion_rate);
    println!("Average evaluation: {:.1}/5", kpi.average_evaluation_score);
    println!();
    println!("Interns by department:");
    for entry in &kpi.department_distribution {
        println!("- {}: {}", entry.department, entry.count);
    }
    println!();
    println!("Hires per month:");
    for month in &kpi.monthly_hirings {
        println!("- {:02}/{}: {}", month.month, month.year, month.hires);
    }
    println!();
    print_intern_table(store, &TableQuery::default());
}

fn print_statistics(store: &Store, department: Option<&str>) {
    let stats = stats::statistics(store.interns(), store.evaluations(), department);

    println!(
        "Statistics for {} ({} interns)",
        department.unwrap_or("all departments"),
        stats.intern_count
    );
    match stats.average_internship_duration_days {
        Some(days) => println!("Average internship: {} days", days.round()),
        None => println!("Average internship: no data"),
    }
    println!("Distinct skills: {}", stats.distinct_skills);
    println!("Success rate: {}%", stats.success_rate);
    println!();
    println!("Top skills:");
    for skill in &stats.top_skills {
        println!("- {}: {}", skill.skill, skill.count);
    }
    println!();
    println!("Conversion by department:");
    for entry in &stats.conversion_by_department {
        println!(
            "- {}: {}/{} ({:.0}%)",
            entry.department, entry.converted, entry.total, entry.rate
        );
    }
    println!();
    println!("Evaluation trend:");
    if stats.monthly_evaluation_averages.is_empty() {
        println!("No evaluations recorded.");
    }
    for month in &stats.monthly_evaluation_averages {
        println!("- {:02}/{}: {:.1}", month.month, month.year, month.average);
    }
}

fn print_evaluations(store: &Store) {
    let evaluations = store.evaluations();
    let today = Utc::now().date_naive();
    println!(
        "{} evaluations, average {:.1}, {} this month, {} excellent",
        evaluations.len(),
        stats::average_evaluation_score(evaluations),
        stats::evaluations_in_month(evaluations, today),
        stats::excellent_evaluation_count(evaluations)
    );
    for evaluation in evaluations {
        println!(
            "- [{}] {} | {} by {} on {} | {:.1}/5",
            evaluation.id,
            notifications::intern_label(store.interns(), Some(&evaluation.intern_id)),
            evaluation.kind.label(),
            evaluation.evaluator_name,
            display_date(evaluation.date),
            evaluation.overall_score
        );
    }
}

fn print_intern_detail(store: &Store, id: &str) -> anyhow::Result<()> {
    let intern = store
        .find_intern(id)
        .ok_or_else(|| error::StoreError::InternNotFound(id.to_string()))?;

    println!("{} ({})", intern.full_name(), intern.status.as_str());
    println!("{} | {}", intern.email, intern.phone);
    println!("{} | tutor {}", intern.department, intern.tutor);
    println!(
        "{:?} contract {} → {} ({} days)",
        intern.contract_type,
        display_date(intern.start_date),
        display_date(intern.end_date),
        intern.duration_days()
    );
    if !intern.skills.is_empty() {
        println!("Skills: {}", intern.skills.join(", "));
    }
    for project in &intern.projects {
        println!(
            "Project {} ({:?}) since {}: {}",
            project.name,
            project.status,
            display_date(project.start_date),
            project.description
        );
    }
    for document in &intern.documents {
        println!(
            "Document {} ({:?}) added {}",
            document.name,
            document.kind,
            display_date(document.upload_date)
        );
    }
    for evaluation in store.evaluations_for(id) {
        println!(
            "Evaluation {} on {}: {:.1}/5 {}",
            evaluation.kind.label(),
            display_date(evaluation.date),
            evaluation.overall_score,
            evaluation.comments
        );
    }
    Ok(())
}

fn department_arg(value: &str) -> Option<&str> {
    match DepartmentFilter::parse(value) {
        DepartmentFilter::All => None,
        DepartmentFilter::Named(_) => Some(value),
    }
}

fn load_store(cli: &Cli) -> anyhow::Result<Store> {
    let mut store = match &cli.data {
        Some(path) => Store::from_snapshot(
            seed::load_snapshot(path)
                .with_context(|| format!("failed to load snapshot {}", path.display()))?,
        ),
        None => Store::seeded()?,
    };

    if let Some(csv) = &cli.import_csv {
        let inserted = seed::import_csv_file(&mut store, csv)
            .with_context(|| format!("failed to import {}", csv.display()))?;
        info!(inserted, path = %csv.display(), "interns imported");
    }

    let settings = config::load_settings(cli.settings.as_deref())
        .context("failed to load settings")?;
    store.update_settings(settings);
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut store = load_store(&cli)?;

    match cli.command {
        Commands::Dashboard => print_dashboard(&store),
        Commands::Interns {
            search,
            status,
            sort,
            desc,
        } => {
            let mut state = SortState::new(sort, SortDirection::Ascending);
            if desc {
                state = state.toggle(sort);
            }
            let query = TableQuery {
                search,
                status,
                sort: state,
            };
            print_intern_table(&store, &query);
        }
        Commands::ShowIntern { id } => print_intern_detail(&store, &id)?,
        Commands::AddIntern { fields } => {
            let intern = store.add_intern(fields.into());
            println!("Added {} with id {}.", intern.full_name(), intern.id);
            println!();
            print_intern_table(&store, &TableQuery::default());
        }
        Commands::EditIntern {
            id,
            first_name,
            last_name,
            email,
            phone,
            department,
            tutor,
            start_date,
            end_date,
            status,
            contract_type,
            skills,
        } => {
            let mut intern = store
                .find_intern(&id)
                .cloned()
                .ok_or_else(|| error::StoreError::InternNotFound(id.clone()))?;
            if let Some(v) = first_name {
                intern.first_name = v;
            }
            if let Some(v) = last_name {
                intern.last_name = v;
            }
            if let Some(v) = email {
                intern.email = v;
            }
            if let Some(v) = phone {
                intern.phone = v;
            }
            if let Some(v) = department {
                intern.department = v;
            }
            if let Some(v) = tutor {
                intern.tutor = v;
            }
            if let Some(v) = start_date {
                intern.start_date = v;
            }
            if let Some(v) = end_date {
                intern.end_date = v;
            }
            if let Some(v) = status {
                intern.status = v;
            }
            if let Some(v) = contract_type {
                intern.contract_type = v;
            }
            if let Some(v) = skills {
                intern.skills = split_list(&v);
            }
            if intern.end_date < intern.start_date {
                warn!(id = %intern.id, "end date precedes start date");
            }
            store.update_intern(intern)?;
            print_intern_detail(&store, &id)?;
        }
        Commands::DeleteIntern { id } => {
            if !confirm("Delete this intern?", cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            let outcome = store.remove_intern(&id);
            if outcome.intern_removed {
                println!(
                    "Deleted intern {id} with {} evaluations and {} notifications.",
                    outcome.evaluations_removed, outcome.notifications_removed
                );
            } else {
                println!("No intern with id {id}.");
            }
            println!();
            print_intern_table(&store, &TableQuery::default());
        }
        Commands::Evaluations => print_evaluations(&store),
        Commands::AddEvaluation {
            intern_id,
            evaluator_id,
            evaluator_name,
            kind,
            date,
            score,
            soft_skills,
            hard_skills,
            comments,
            recommendations,
        } => {
            if store.find_intern(&intern_id).is_none() {
                warn!(%intern_id, "evaluation references an unknown intern");
            }
            let evaluation = store.add_evaluation(NewEvaluation {
                intern_id,
                evaluator_id,
                evaluator_name,
                kind,
                date: date.unwrap_or_else(|| Utc::now().date_naive()),
                soft_skills,
                hard_skills,
                overall_score: score,
                comments,
                recommendations,
            });
            println!("Recorded evaluation {}.", evaluation.id);
            println!();
            print_evaluations(&store);
        }
        Commands::Stats { department } => print_statistics(&store, department_arg(&department)),
        Commands::Notifications { filter } => print_notifications(&store, filter),
        Commands::MarkRead { id } => {
            store.mark_notification_read(&id);
            print_notifications(&store, NotificationFilter::All);
        }
        Commands::MarkAllRead => {
            store.mark_all_notifications_read();
            print_notifications(&store, NotificationFilter::All);
        }
        Commands::DeleteNotification { id } => {
            store.delete_notification(&id);
            print_notifications(&store, NotificationFilter::All);
        }
        Commands::ClearNotifications => {
            if !confirm("Delete every notification?", cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            store.clear_notifications();
            print_notifications(&store, NotificationFilter::All);
        }
        Commands::Report {
            report_type,
            period,
            department,
            format,
            out,
            preview,
            delay_ms,
        } => {
            let request = ReportRequest {
                report_type,
                period,
                department: DepartmentFilter::parse(&department),
            };
            let report = report::build_report(
                &request,
                store.interns(),
                store.evaluations(),
                Utc::now(),
            );

            if preview {
                print!("{}", report::render_preview(&report));
                return Ok(());
            }

            eprintln!("Generating…");
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let path = report::write_report(&report, &out, format)
                .with_context(|| format!("failed to write report into {}", out.display()))?;
            println!("Report written to {}.", path.display());
        }
        Commands::Settings => {
            let user = seed::mock_user();
            println!("# Signed in as {} <{}> ({:?})", user.name, user.email, user.role);
            let body = toml::to_string_pretty(store.settings())
                .context("failed to render settings")?;
            print!("{body}");
        }
        Commands::ClearData => {
            if !confirm("Delete ALL interns, evaluations and notifications?", cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            store.clear_all_data(Utc::now().date_naive());
            print_notifications(&store, NotificationFilter::All);
        }
        Commands::ExportSnapshot { out } => {
            seed::write_snapshot(&store.snapshot(), &out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Snapshot written to {}.", out.display());
        }
    }

    Ok(())
}
