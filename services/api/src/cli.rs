use crate::reports::{
    run_calendar, run_document_report, run_tender_conformity, CalendarArgs, ConformityArgs,
    DocumentReportArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tender_compliance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tender Compliance",
    about = "Classify compliance documents and check tender checklists from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Report expiry status for a document register
    Documents {
        #[command(subcommand)]
        command: DocumentsCommand,
    },
    /// Inspect tender checklists
    Tenders {
        #[command(subcommand)]
        command: TendersCommand,
    },
    /// Place documents on a six-week month calendar
    Calendar(CalendarArgs),
}

#[derive(Subcommand, Debug)]
enum DocumentsCommand {
    /// Summarize expired and expiring documents from a CSV export
    Report(DocumentReportArgs),
}

#[derive(Subcommand, Debug)]
enum TendersCommand {
    /// Compute submission and signature coverage from a checklist CSV
    Conformity(ConformityArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Documents {
            command: DocumentsCommand::Report(args),
        } => run_document_report(args),
        Command::Tenders {
            command: TendersCommand::Conformity(args),
        } => run_tender_conformity(args),
        Command::Calendar(args) => run_calendar(args),
    }
}
