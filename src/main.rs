//! Infirmary CLI
//!
//! Command-line front end for the hospital dashboard data layer:
//! - Dashboard summaries
//! - Filtered listings of every collection
//! - Claim toggling and record removal
//! - The local attendance scratch pad
//! - CSV export

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infirmary::analytics::{
    by_boolean_field, by_enum_field, by_exact_date, DashboardSummary, MonthlySeries, Selection,
    Tally,
};
use infirmary::attendance_log::{AttendanceLog, LogEntry};
use infirmary::config::{generate_default_config, Config, LoggingConfig};
use infirmary::gateway::Gateway;
use infirmary::notify::{Notice, Notifier, Severity};
use infirmary::records::{
    AttendanceRecord, AttendanceStatus, EntityKind, FinancialRecord, Patient, PatientStatus,
    PaymentStatus, RecordId, Staff, Transaction,
};
use infirmary::store::RecordStore;

#[derive(Parser)]
#[command(name = "infirmary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hospital dashboard data layer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: searched in the usual locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hospital API base URL, overriding the config file
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every collection and print the dashboard overviews
    Summary {
        /// Day for the attendance panel (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List a collection, optionally filtered
    List {
        /// patients, staff, financial, attendance or transactions
        entity: EntityKind,
        /// Status to keep, or "All". Staff accept on-duty / off-duty
        #[arg(short, long)]
        status: Option<String>,
        /// Keep only records dated on this day
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Flip the insurance claim status of a bill
    ToggleClaim {
        /// Financial record id
        id: String,
    },

    /// Delete a record
    Remove {
        entity: EntityKind,
        id: String,
    },

    /// Local attendance scratch pad
    Attendance {
        #[command(subcommand)]
        action: AttendanceCommand,
    },

    /// Export a collection as CSV
    Export {
        entity: EntityKind,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AttendanceCommand {
    /// Mark an employee present or absent
    Mark {
        employee_id: String,
        name: String,
        /// present or absent
        status: AttendanceStatus,
        /// Day to mark (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show the marks for one day
    Show {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging)?;

    let notifier = Notifier::default();
    let mut notices = notifier.subscribe();

    let result = run(cli.command, cli.format, &config, notifier).await;
    print_notices(&mut notices);
    result
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("infirmary={}", logging.level)));

    // Logs never go to stdout, which carries command output
    let writer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }
    Ok(())
}

fn print_notices(notices: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        if notice.severity >= Severity::Warning {
            eprintln!("{}: {}", notice.severity, notice.message);
        }
    }
}

async fn run(
    command: Commands,
    format: OutputFormat,
    config: &Config,
    notifier: Notifier,
) -> anyhow::Result<()> {
    if let Commands::Config { output } = &command {
        return write_default_config(output.as_deref());
    }
    if let Commands::Attendance { action } = command {
        return attendance(action, format, config);
    }

    let gateway = Gateway::new(config.api.clone())?;
    let store = RecordStore::new().with_notifier(notifier);

    match command {
        Commands::Summary { date } => {
            let today = Local::now().date_naive();
            let report = store.load_initial(&gateway).await;
            if let Err(e) = store.load_attendance(&gateway).await {
                tracing::warn!(error = %e, "Attendance panel unavailable");
            }

            let day = date.unwrap_or(today).format("%Y-%m-%d").to_string();
            let summary = store.dashboard(today, Some(&day)).await;
            print_summary(&summary, format)?;

            if !report.is_complete() {
                let failed: Vec<String> =
                    report.failed_kinds().iter().map(|k| k.to_string()).collect();
                eprintln!("Partial data: could not load {}", failed.join(", "));
            }
        }

        Commands::List {
            entity,
            status,
            date,
        } => {
            store.load(&gateway, entity).await?;
            let date = date.map(|d| d.format("%Y-%m-%d").to_string());
            list(&store, entity, status.as_deref(), date.as_deref(), format).await?;
        }

        Commands::ToggleClaim { id } => {
            let id = RecordId::from(id);
            let record = store.toggle_claim_status(&gateway, &id).await?;
            let status = record
                .claim_status
                .map(|s| s.label())
                .unwrap_or("Unknown");
            println!("Claim for bill {} is now {}", id, status);
        }

        Commands::Remove { entity, id } => {
            let id = RecordId::from(id);
            let removed = match entity {
                EntityKind::Patients => store.remove::<Patient>(&gateway, &id).await?,
                EntityKind::Staff => store.remove::<Staff>(&gateway, &id).await?,
                EntityKind::Financial => store.remove::<FinancialRecord>(&gateway, &id).await?,
                EntityKind::Attendance => store.remove::<AttendanceRecord>(&gateway, &id).await?,
                EntityKind::Transactions => store.remove::<Transaction>(&gateway, &id).await?,
            };
            if removed {
                println!("Removed {} record {}", entity, id);
            }
        }

        Commands::Export { entity, output } => {
            store.load(&gateway, entity).await?;
            let count = export(&store, entity, output.as_deref()).await?;
            if let Some(path) = output {
                println!("Exported {} {} records to {:?}", count, entity, path);
            }
        }

        Commands::Attendance { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

// ============================================================================
// Listing
// ============================================================================

async fn list(
    store: &RecordStore,
    entity: EntityKind,
    status: Option<&str>,
    date: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match entity {
        EntityKind::Patients => {
            let records = store.patients().await;
            let selection: Selection<PatientStatus> = parse_selection(status)?;
            let rows = by_enum_field(&records, |p| p.status, &selection);
            emit(&on_date(rows, date, |p| p.last_visit.as_deref()), format)
        }
        EntityKind::Staff => {
            let records = store.staff().await;
            let rows = match parse_duty(status)? {
                Some(on_duty) => by_boolean_field(&records, |s| s.on_duty, on_duty),
                None => records.iter().collect(),
            };
            if date.is_some() {
                tracing::warn!("Staff records carry no date; --date ignored");
            }
            emit(&rows, format)
        }
        EntityKind::Financial => {
            let records = store.financial().await;
            let selection: Selection<PaymentStatus> = parse_selection(status)?;
            let rows = by_enum_field(&records, |r| r.payment_status, &selection);
            emit(&on_date(rows, date, |r| r.bill_date.as_deref()), format)
        }
        EntityKind::Attendance => {
            let records = store.attendance().await;
            let selection: Selection<AttendanceStatus> = parse_selection(status)?;
            let rows = by_enum_field(&records, |r| r.status, &selection);
            emit(&on_date(rows, date, |r| r.date.as_deref()), format)
        }
        EntityKind::Transactions => {
            let records = store.transactions().await;
            let selection: Selection<String> = parse_selection(status)?;
            let rows = by_enum_field(&records, |t| t.status.clone(), &selection);
            emit(&on_date(rows, date, |t| t.date.as_deref()), format)
        }
    }
}

fn parse_selection<V>(status: Option<&str>) -> anyhow::Result<Selection<V>>
where
    V: std::str::FromStr,
    V::Err: std::error::Error + Send + Sync + 'static,
{
    match status {
        Some(value) => Ok(value.parse()?),
        None => Ok(Selection::All),
    }
}

fn parse_duty(status: Option<&str>) -> anyhow::Result<Option<bool>> {
    let Some(value) = status else {
        return Ok(None);
    };
    match value.trim().to_lowercase().as_str() {
        "all" => Ok(None),
        "on" | "on-duty" | "true" => Ok(Some(true)),
        "off" | "off-duty" | "false" => Ok(Some(false)),
        other => anyhow::bail!(
            "Unknown duty filter '{}' (expected on-duty, off-duty or All)",
            other
        ),
    }
}

fn on_date<'a, T, F>(rows: Vec<&'a T>, date: Option<&str>, field: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    match date {
        Some(date) => by_exact_date(&rows, |r: &&T| field(*r), date)
            .into_iter()
            .copied()
            .collect(),
        None => rows,
    }
}

// ============================================================================
// Attendance scratch pad
// ============================================================================

fn attendance(
    action: AttendanceCommand,
    format: OutputFormat,
    config: &Config,
) -> anyhow::Result<()> {
    let mut log = AttendanceLog::open(&config.attendance_log.path)?;
    let today = Local::now().date_naive();

    match action {
        AttendanceCommand::Mark {
            employee_id,
            name,
            status,
            date,
        } => {
            let day = date.unwrap_or(today);
            let entry = log.mark(employee_id, name, day, status).clone();
            log.save()?;
            println!(
                "Marked {} ({}) {} on {}",
                entry.employee_name, entry.employee_id, entry.status, entry.date
            );
        }
        AttendanceCommand::Show { date } => {
            let day = date.unwrap_or(today);
            let entries = log.for_date(day);
            emit(&entries, format)?;

            if format == OutputFormat::Table && !entries.is_empty() {
                let overview = log.overview(day);
                println!();
                println!(
                    "Present: {}  Absent: {}  Attendance: {:.1}%",
                    overview.present, overview.absent, overview.attendance_percentage
                );
            }
        }
    }
    Ok(())
}

// ============================================================================
// Export and config
// ============================================================================

async fn export(
    store: &RecordStore,
    entity: EntityKind,
    output: Option<&Path>,
) -> anyhow::Result<usize> {
    match entity {
        EntityKind::Patients => write_export(&store.patients().await, output),
        EntityKind::Staff => write_export(&store.staff().await, output),
        EntityKind::Financial => write_export(&store.financial().await, output),
        EntityKind::Attendance => write_export(&store.attendance().await, output),
        EntityKind::Transactions => write_export(&store.transactions().await, output),
    }
}

fn write_export<R: Tabular>(rows: &[R], output: Option<&Path>) -> anyhow::Result<usize> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::File::create(path)
                .with_context(|| format!("Cannot create {:?}", path))?;
            write_csv(rows, file)?;
        }
        None => write_csv(rows, io::stdout())?,
    }
    Ok(rows.len())
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

/// A record that can be printed as one table or CSV row
trait Tabular: Serialize {
    fn headers() -> &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl<T: Tabular> Tabular for &T {
    fn headers() -> &'static [&'static str] {
        T::headers()
    }

    fn row(&self) -> Vec<String> {
        (**self).row()
    }
}

impl Tabular for Patient {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Age", "Gender", "Blood Group", "Status", "Last Visit", "Next Appointment"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            self.name.clone(),
            cell(&self.age),
            cell(&self.gender),
            cell(&self.blood_group),
            self.status.map(|s| s.label()).unwrap_or("-").to_string(),
            cell(&self.last_visit),
            cell(&self.next_appointment),
        ]
    }
}

impl Tabular for Staff {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Department", "Shift", "On Duty", "Salary"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            self.name.clone(),
            cell(&self.department),
            cell(&self.shift),
            if self.on_duty { "yes" } else { "no" }.to_string(),
            amount(self.salary),
        ]
    }
}

impl Tabular for FinancialRecord {
    fn headers() -> &'static [&'static str] {
        &["ID", "Bill Date", "Amount", "Payment", "Claim"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.bill_date),
            amount(self.amount),
            cell(&self.payment_status),
            cell(&self.claim_status),
        ]
    }
}

impl Tabular for AttendanceRecord {
    fn headers() -> &'static [&'static str] {
        &["ID", "Employee ID", "Employee", "Date", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.employee_id),
            self.employee_name.clone(),
            cell(&self.date),
            cell(&self.status),
        ]
    }
}

impl Tabular for Transaction {
    fn headers() -> &'static [&'static str] {
        &["ID", "Date", "Description", "Amount", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.date),
            cell(&self.description),
            amount(self.amount),
            cell(&self.status),
        ]
    }
}

impl Tabular for LogEntry {
    fn headers() -> &'static [&'static str] {
        &["Employee ID", "Employee", "Date", "Status", "Marked At"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.employee_id.to_string(),
            self.employee_name.clone(),
            self.date.to_string(),
            self.status.to_string(),
            self.marked_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

fn cell<V: std::fmt::Display>(value: &Option<V>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn amount(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn emit<R: Tabular>(rows: &[R], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => write_csv(rows, io::stdout())?,
        OutputFormat::Table => print_table(rows),
    }
    Ok(())
}

fn write_csv<R: Tabular, W: Write>(rows: &[R], writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(R::headers())?;
    for row in rows {
        csv.write_record(row.row())?;
    }
    csv.flush()?;
    Ok(())
}

fn print_table<R: Tabular>(rows: &[R]) {
    if rows.is_empty() {
        println!("No records");
        return;
    }

    let headers = R::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.row()).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row.get(i).map_or(0, |c| c.chars().count()))
                .max()
                .unwrap_or(0)
                .max(h.len())
        })
        .collect();

    let line = |values: Vec<&str>| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers.to_vec());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &cells {
        line(row.iter().map(String::as_str).collect());
    }
    println!();
    println!("{} record(s)", rows.len());
}

fn print_summary(summary: &DashboardSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(io::stdout());
            csv.write_record(["panel", "metric", "value"])?;
            for (panel, metric, value) in summary_rows(summary) {
                csv.write_record([panel, metric.as_str(), value.as_str()])?;
            }
            csv.flush()?;
        }
        OutputFormat::Table => {
            let mut current = "";
            for (panel, metric, value) in summary_rows(summary) {
                if panel != current {
                    if !current.is_empty() {
                        println!();
                    }
                    println!("{}", panel);
                    println!("{}", "-".repeat(40));
                    current = panel;
                }
                println!("  {:<30} {}", metric, value);
            }
        }
    }
    Ok(())
}

/// Flatten the summary into (panel, metric, value) rows
fn summary_rows(summary: &DashboardSummary) -> Vec<(&'static str, String, String)> {
    let mut rows = Vec::new();
    let mut push = |panel: &'static str, metric: String, value: String| {
        rows.push((panel, metric, value));
    };

    let patients = &summary.patients;
    push("Patients", "Total".into(), patients.total.to_string());
    push("Patients", "Active %".into(), format!("{:.1}", patients.active_percentage));
    push("Patients", "Upcoming appointments".into(), patients.upcoming_appointments.to_string());
    counts(&mut push, "Patients", "Status", &patients.by_status);
    counts(&mut push, "Patients", "Gender", &patients.by_gender);
    counts(&mut push, "Patients", "Blood group", &patients.by_blood_group);
    series(&mut push, "Patients", "Visits", "active", &patients.visits);

    let staff = &summary.staff;
    push("Staff", "Total".into(), staff.total.to_string());
    for (label, count) in staff.duty_labels() {
        push("Staff", label.into(), count.to_string());
    }
    push("Staff", "On duty %".into(), format!("{:.1}", staff.on_duty_percentage));
    counts(&mut push, "Staff", "Department", &staff.by_department);
    counts(&mut push, "Staff", "Shift", &staff.by_shift);
    amounts(&mut push, "Staff", "Salary", &staff.salary_by_department);

    let finance = &summary.finance;
    push("Finance", "Bills".into(), finance.total_records.to_string());
    push("Finance", "Billed total".into(), format!("{:.2}", finance.billed_total));
    push("Finance", "Collected %".into(), format!("{:.1}", finance.collected_percentage));
    amounts(&mut push, "Finance", "Payment", &finance.amount_by_payment);
    counts(&mut push, "Finance", "Claim", &finance.by_claim);
    series(&mut push, "Finance", "Bills", "paid", &finance.billing);

    if let Some(attendance) = &summary.attendance {
        push("Attendance", "Date".into(), attendance.date.clone());
        push("Attendance", "Present".into(), attendance.present.to_string());
        push("Attendance", "Absent".into(), attendance.absent.to_string());
        push(
            "Attendance",
            "Attendance %".into(),
            format!("{:.1}", attendance.attendance_percentage),
        );
    }

    rows
}

fn counts<F>(push: &mut F, panel: &'static str, label: &str, tally: &Tally<usize>)
where
    F: FnMut(&'static str, String, String),
{
    for (key, count) in tally.iter() {
        push(panel, format!("{}: {}", label, key), count.to_string());
    }
}

fn amounts<F>(push: &mut F, panel: &'static str, label: &str, tally: &Tally<f64>)
where
    F: FnMut(&'static str, String, String),
{
    for (key, total) in tally.iter() {
        push(panel, format!("{}: {}", label, key), format!("{:.2}", total));
    }
}

fn series<F>(push: &mut F, panel: &'static str, label: &str, subset: &str, series: &MonthlySeries)
where
    F: FnMut(&'static str, String, String),
{
    for (all, matching) in series.all.iter().zip(&series.matching) {
        push(
            panel,
            format!("{} {}", label, all.bucket),
            format!("{} ({} {})", all.count, matching.count, subset),
        );
    }
}
