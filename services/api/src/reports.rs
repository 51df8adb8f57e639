use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tender_compliance::compliance::{
    assess_all, month_grid, summarize, summarize_by_owner, tender_conformity, CalendarGrid,
    CalendarRecord, ChecklistImporter, ClassificationThresholds, ComplianceSummary,
    DocumentAssessment, DocumentImporter, DocumentOwner, ReportScope, TenderChecklistItem,
    TenderConformitySummary,
};
use tender_compliance::config::{AppConfig, ClassificationConfig};
use tender_compliance::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct DocumentReportArgs {
    /// Document register CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reference date for the report (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Which expiring-soon window to apply: dashboard or detail
    #[arg(long, default_value = "dashboard")]
    pub(crate) scope: ReportScope,
    /// Override the configured window for the chosen scope
    #[arg(long)]
    pub(crate) window_days: Option<i64>,
    /// Treat required documents without an expiry date as expired
    #[arg(long)]
    pub(crate) missing_expired: bool,
    /// Print one summary per company or tender
    #[arg(long)]
    pub(crate) by_owner: bool,
    /// List every document with its status
    #[arg(long)]
    pub(crate) list: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ConformityArgs {
    /// Tender checklist CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct CalendarArgs {
    /// Document register CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Any day of the month to display (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) month: NaiveDate,
}

pub(crate) fn run_document_report(args: DocumentReportArgs) -> Result<(), AppError> {
    let classification = AppConfig::load()?.classification;
    let thresholds = report_thresholds(&classification, &args);
    let documents = DocumentImporter::from_path(&args.csv)?;

    let summary = summarize(&documents, &thresholds)?;
    render_summary_header(args.scope, &summary);
    render_attention(&summary.attention);

    if args.by_owner {
        println!("\nBy owner");
        for group in summarize_by_owner(&documents, &thresholds)? {
            println!(
                "- {}: {} documents | {} valid | {} expiring soon | {} expired",
                owner_label(group.owner.as_ref()),
                group.summary.total,
                group.summary.valid_count,
                group.summary.expiring_soon_count,
                group.summary.expired_count
            );
        }
    }

    if args.list {
        println!("\nDocuments");
        for assessment in assess_all(&documents, &thresholds)? {
            println!("- {}", describe_assessment(&assessment));
        }
    }

    Ok(())
}

pub(crate) fn run_tender_conformity(args: ConformityArgs) -> Result<(), AppError> {
    let items = ChecklistImporter::from_path(&args.csv)?;
    render_conformity(&tender_conformity(&items));
    Ok(())
}

pub(crate) fn run_calendar(args: CalendarArgs) -> Result<(), AppError> {
    let documents = DocumentImporter::from_path(&args.csv)?;
    let records: Vec<CalendarRecord> = documents.iter().map(CalendarRecord::from).collect();
    render_calendar(&month_grid(&records, args.month));
    Ok(())
}

fn report_thresholds(
    classification: &ClassificationConfig,
    args: &DocumentReportArgs,
) -> ClassificationThresholds {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let mut thresholds = classification.thresholds_for(args.scope, today);
    if let Some(days) = args.window_days {
        thresholds.window_days = days;
    }
    if args.missing_expired {
        thresholds.missing_expiry_means_expired_when_required = true;
    }
    thresholds
}

fn render_summary_header(scope: ReportScope, summary: &ComplianceSummary) {
    println!(
        "Compliance report for {} ({} window, {} days)",
        summary.reference_date,
        scope.label(),
        summary.window_days
    );
    println!(
        "- {} documents | {} valid | {} expiring soon | {} expired",
        summary.total, summary.valid_count, summary.expiring_soon_count, summary.expired_count
    );
}

fn render_attention(attention: &[DocumentAssessment]) {
    if attention.is_empty() {
        println!("\nNeeds attention: none");
        return;
    }

    println!("\nNeeds attention");
    for assessment in attention {
        println!("- {}", describe_assessment(assessment));
    }
}

fn describe_assessment(assessment: &DocumentAssessment) -> String {
    let name = assessment
        .name
        .as_deref()
        .map(|name| format!(" ({name})"))
        .unwrap_or_default();

    let timing = match (assessment.expires_on, assessment.days_until_expiry) {
        (Some(expires_on), Some(days)) if days < 0 => {
            format!("expired {expires_on}, {} days ago", -days)
        }
        (Some(expires_on), Some(0)) => format!("expires today ({expires_on})"),
        (Some(expires_on), Some(days)) => format!("expires {expires_on}, in {days} days"),
        _ => "no expiry on record".to_string(),
    };

    format!(
        "[{}] {}{}: {} (v{})",
        assessment.status_label, assessment.id, name, timing, assessment.version
    )
}

fn owner_label(owner: Option<&DocumentOwner>) -> String {
    match owner {
        Some(DocumentOwner::Company(id)) => format!("company {id}"),
        Some(DocumentOwner::Tender(id)) => format!("tender {id}"),
        None => "unassigned".to_string(),
    }
}

fn render_conformity(summary: &TenderConformitySummary) {
    println!("Tender conformity");
    println!(
        "- {} required | {} submitted ({:.1}%) | {} signed ({:.1}%)",
        summary.total_required,
        summary.total_submitted,
        summary.coverage_percent,
        summary.total_signed,
        summary.signature_percent
    );

    render_items("Pending submission", &summary.pending);
    render_items("Awaiting signature", &summary.awaiting_signature);
}

fn render_items(title: &str, items: &[TenderChecklistItem]) {
    if items.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for item in items {
        match &item.name {
            Some(name) => println!("- {} ({})", item.id, name),
            None => println!("- {}", item.id),
        }
    }
}

fn render_calendar(grid: &CalendarGrid<'_, CalendarRecord>) {
    println!("Calendar for {}", grid.month.format("%B %Y"));
    println!(
        "Grid {} -> {} | {} records placed",
        grid.start().map(|day| day.to_string()).unwrap_or_default(),
        grid.days
            .last()
            .map(|day| day.key.to_string())
            .unwrap_or_default(),
        grid.record_count()
    );

    let populated: Vec<_> = grid
        .days
        .iter()
        .filter(|day| !day.records.is_empty())
        .collect();
    if populated.is_empty() {
        println!("\nNo dated records in this view");
        return;
    }

    println!();
    for day in populated {
        let marker = if day.in_month { "" } else { " (adjacent month)" };
        println!("{} {}{}", day.key, day.key.date().format("%a"), marker);
        for record in &day.records {
            match &record.title {
                Some(title) => println!("  - {} ({})", record.id, title),
                None => println!("  - {}", record.id),
            }
        }
    }
}
