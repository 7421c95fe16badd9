//! site-report - Site-visit report editor
//!
//! Edits a report draft stored as a JSON file and exports it as PDF,
//! DOCX, or plain text.

mod commands;
mod state;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{CommandError, ErrorKind, HeaderUpdate};
use report_model::Participant;
use state::ReportSession;
use std::path::PathBuf;
use std::process::ExitCode;
use store::ExportFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "site-report")]
#[command(version, about = "Site-visit report editor", long_about = None)]
#[command(after_help = "EXAMPLES:
    site-report new --client \"ACME\"              Start a new draft
    site-report add-section --title \"Boiler\"     Add a section
    site-report add-photos 1 gauge.jpg valve.jpg  Attach photos to section 1
    site-report export --format pdf               Write Report_ACME_<date>.pdf")]
struct Cli {
    /// Draft file to work on
    #[arg(short, long, value_name = "FILE", default_value = "draft.json")]
    draft: PathBuf,

    /// Directory holding settings.json and the relative resource paths
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    config_dir: PathBuf,

    /// Print errors as JSON descriptors, and export results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a new, empty draft
    New {
        #[arg(long)]
        client: Option<String>,
        /// Visit date (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Start a draft with a problem section and a work-done section
    Quick {
        #[arg(long)]
        client: String,
        #[arg(long, default_value = "")]
        problem: String,
        #[arg(long, default_value = "")]
        solution: String,
    },
    /// Change header fields
    Set {
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        technician: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    AddParticipant {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Remove a participant by position (starting at 1)
    RemoveParticipant { position: usize },
    AddSection {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change the title or description of a section
    EditSection {
        position: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a section by position (starting at 1)
    RemoveSection { position: usize },
    /// Attach image files to a section
    AddPhotos {
        section: usize,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Replace the section's photos instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// Print the draft as text
    Show,
    /// Export the draft
    Export {
        #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
        format: Format,
        /// Output file, or a directory for the default file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Docx,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Pdf => ExportFormat::Pdf,
            Format::Docx => ExportFormat::Docx,
            Format::Text => ExportFormat::Text,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected a date like 2024-03-05: {}", e))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let command_error = err.downcast_ref::<CommandError>().cloned();
            if json {
                let descriptor = command_error
                    .clone()
                    .unwrap_or_else(|| CommandError::new(ErrorKind::Storage, format!("{:#}", err)));
                match serde_json::to_string(&descriptor) {
                    Ok(text) => eprintln!("{}", text),
                    Err(_) => eprintln!("error: {:#}", err),
                }
            } else {
                eprintln!("error: {:#}", err);
            }
            match command_error.map(|e| e.kind) {
                Some(ErrorKind::InvalidArgument) | Some(ErrorKind::Validation) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut session = ReportSession::open(cli.draft.clone(), &cli.config_dir)
        .map_err(CommandError::from)
        .with_context(|| format!("Failed to open draft {}", cli.draft.display()))?;

    match cli.command {
        Command::New { client, date } => {
            commands::new_draft(&mut session, client, date)?;
            println!("New draft written to {}", session.draft_path().display());
        }
        Command::Quick {
            client,
            problem,
            solution,
        } => {
            commands::quick_report(&mut session, client, problem, solution)?;
            println!("Quick report written to {}", session.draft_path().display());
        }
        Command::Set {
            client,
            address,
            technician,
            date,
        } => {
            commands::set_header(
                &mut session,
                HeaderUpdate {
                    client_name: client,
                    site_address: address,
                    technician,
                    visit_date: date,
                },
            )?;
        }
        Command::AddParticipant { name, phone, email } => {
            let position =
                commands::add_participant(&mut session, Participant::new(name, phone, email))?;
            println!("Participant {} added", position);
        }
        Command::RemoveParticipant { position } => {
            let removed = commands::remove_participant(&mut session, position)?;
            println!("Removed participant {:?}", removed.name);
        }
        Command::AddSection { title, description } => {
            let position = commands::add_section(&mut session, title, description)?;
            println!("Section {} added", position);
        }
        Command::EditSection {
            position,
            title,
            description,
        } => {
            commands::edit_section(&mut session, position, title, description)?;
        }
        Command::RemoveSection { position } => {
            let removed = commands::remove_section(&mut session, position)?;
            println!(
                "Removed section {:?} ({} photo(s))",
                removed.title,
                removed.photos.len()
            );
        }
        Command::AddPhotos {
            section,
            files,
            replace,
        } => {
            let count = commands::add_photos(&mut session, section, &files, replace)?;
            println!("Section {} now has {} photo(s)", section, count);
        }
        Command::Show => {
            print!("{}", commands::show(&session));
        }
        Command::Export { format, output } => {
            let summary = commands::export_report(&session, format.into(), output.as_deref())?;
            if cli.json {
                println!("{}", serde_json::to_string(&summary)?);
                return Ok(());
            }
            println!(
                "Wrote {} ({} bytes, {} photo(s))",
                summary.path.display(),
                summary.bytes,
                summary.placed_photos
            );
            for name in &summary.skipped_photos {
                println!("  skipped unreadable photo {}", name);
            }
        }
    }
    Ok(())
}
