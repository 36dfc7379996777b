// pebbles: command-line front end for the dataset folder.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use engine::config::StoreSettings;
use engine::data::scan::{pick_latest, scan, scan_paths};
use engine::services::DatasetService;
use engine::SeriesKey;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pebbles", version, about = "Treat a folder of timestamped files as a small database")]
struct Cli {
    /// JSON settings file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the data folder from the settings.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List entries whose name matches a regex, oldest first.
    Scan {
        pattern: String,
        /// Print full paths instead of names.
        #[arg(long)]
        paths: bool,
    },
    /// Print the newest entry matching a regex.
    Latest { pattern: String },
    /// Show the fields encoded in a file name.
    Decode { file_name: String },
    /// Reconcile the two latest range snapshots of one series.
    Update(SeriesArgs),
    /// Reconcile every fund code found for a subject.
    UpdateAll {
        #[arg(long, default_value = "timeseries")]
        subject: String,
        #[arg(long)]
        menu: Option<String>,
    },
    /// Delete all but the newest files matching a regex.
    Prune {
        pattern: String,
        /// Files to keep; the settings value when omitted.
        #[arg(long)]
        keep: Option<usize>,
    },
    /// Draw the data folder as a tree.
    Tree,
}

#[derive(Debug, clap::Args)]
struct SeriesArgs {
    #[arg(long, default_value = "timeseries")]
    subject: String,
    #[arg(long)]
    menu: Option<String>,
    #[arg(long)]
    code: String,
}

impl SeriesArgs {
    fn key(&self) -> SeriesKey {
        let mut key = SeriesKey::new(self.subject.clone()).with_fund_code(self.code.clone());
        key.menu_code = self.menu.clone();
        key
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<StoreSettings> {
    let settings = match &cli.config {
        Some(path) => StoreSettings::load_from_file(path)?,
        None => StoreSettings::default(),
    };
    Ok(match &cli.data_dir {
        Some(dir) => settings.with_data_dir(dir.clone()),
        None => settings,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    info!(data_dir = %settings.data_dir.display(), "Using data folder");
    let service = DatasetService::new(settings)?;
    let folder = service.data_dir();

    match &cli.command {
        Command::Scan { pattern, paths } => {
            if *paths {
                for path in scan_paths(folder, pattern)? {
                    println!("{}", path.display());
                }
            } else {
                for name in scan(folder, pattern)? {
                    println!("{}", name);
                }
            }
        }
        Command::Latest { pattern } => println!("{}", pick_latest(folder, pattern)?),
        Command::Decode { file_name } => {
            let record = service.codec().decode(file_name)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Update(args) => match service.update_series(&args.key())? {
            Some(report) => println!("{} ({:?}, {} rows)", report.saved_path.display(), report.outcome, report.rows),
            None => println!("Nothing to update for fund {}", args.code),
        },
        Command::UpdateAll { subject, menu } => {
            let mut base = SeriesKey::new(subject.clone());
            base.menu_code = menu.clone();
            for update in service.update_all_series(&base)? {
                match update.report {
                    Some(report) => println!("{}: {}", update.fund_code, report.saved_path.display()),
                    None => println!("{}: skipped", update.fund_code),
                }
            }
        }
        Command::Prune { pattern, keep } => {
            let report = match keep {
                Some(keep) => service.prune_keep(pattern, *keep)?,
                None => service.prune(pattern)?,
            };
            println!("kept {}, deleted {}", report.kept, report.deleted.len());
            for (path, reason) in &report.failed {
                eprintln!("failed to delete {}: {}", path.display(), reason);
            }
        }
        Command::Tree => print!("{}", service.render_tree()?),
    }

    Ok(())
}
