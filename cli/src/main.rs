mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    LogInput, cmd_badges, cmd_delete, cmd_demo, cmd_export_csv, cmd_export_json, cmd_goals_clear,
    cmd_goals_set, cmd_goals_show, cmd_history, cmd_import_json, cmd_log, cmd_show, cmd_stats,
};
use crate::config::Config;
use dolevtrack_core::service::TrackerService;

#[derive(Parser)]
#[command(
    name = "dolevtrack",
    version,
    about = "Daily nutrition and weight tracker",
    long_about = "Daily nutrition and weight tracker.\n\n\
        Log calories, macros and weight once per day, set daily goals, and see\n\
        weekly balance, week-over-week weight, streaks and badges."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or update the log for a day
    Log {
        /// Calories eaten (kcal)
        #[arg(long)]
        calories: Option<f64>,
        /// Protein (g)
        #[arg(long)]
        protein: Option<f64>,
        /// Carbs (g)
        #[arg(long)]
        carbs: Option<f64>,
        /// Fat (g)
        #[arg(long)]
        fat: Option<f64>,
        /// Body weight (kg); omit or 0 if not weighed
        #[arg(short, long)]
        weight: Option<f64>,
        /// Date to log for (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one day's log and how it compares to goals (defaults to today)
    Show {
        /// Date to show (YYYY-MM-DD or today/yesterday)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List logged days, newest first
    History {
        /// Only show the N most recent logs
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the log for a day
    Delete {
        /// Date of the log to delete (YYYY-MM-DD or today/yesterday)
        date: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage daily calorie and macro goals
    Goals {
        #[command(subcommand)]
        command: GoalsCommands,
    },
    /// Weekly balance, weight trend and streaks
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Streak badges and progress to the next one
    Badges {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export logs to CSV or a JSON backup
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Import data from a backup
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
    /// Replace all logs with 100 days of generated sample data
    Demo {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GoalsCommands {
    /// Set daily goals; unspecified values keep their current (or default) value
    Set {
        /// Daily calories (kcal)
        #[arg(long)]
        calories: Option<f64>,
        /// Daily protein (g)
        #[arg(long)]
        protein: Option<f64>,
        /// Daily carbs (g)
        #[arg(long)]
        carbs: Option<f64>,
        /// Daily fat (g)
        #[arg(long)]
        fat: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show current goals
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove goals
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Write all logs as CSV (default: nutrition_logs_<date>.csv)
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a JSON backup of logs and goals (default: stdout)
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Restore logs and goals from a JSON backup
    Json {
        /// Path to the backup file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    log::debug!("data directory {}", config.data_dir.display());
    let svc = TrackerService::open(&config.db_path)?;

    match cli.command {
        Commands::Log {
            calories,
            protein,
            carbs,
            fat,
            weight,
            date,
            json,
        } => {
            let input = LogInput {
                weight,
                calories,
                protein,
                carbs,
                fat,
            };
            cmd_log(&svc, &input, date, json)
        }
        Commands::Show { date, json } => cmd_show(&svc, date, json),
        Commands::History { limit, json } => cmd_history(&svc, limit, json),
        Commands::Delete { date, json } => cmd_delete(&svc, &date, json),
        Commands::Goals { command } => match command {
            GoalsCommands::Set {
                calories,
                protein,
                carbs,
                fat,
                json,
            } => cmd_goals_set(&svc, calories, protein, carbs, fat, json),
            GoalsCommands::Show { json } => cmd_goals_show(&svc, json),
            GoalsCommands::Clear { json } => cmd_goals_clear(&svc, json),
        },
        Commands::Stats { json } => cmd_stats(&svc, json),
        Commands::Badges { json } => cmd_badges(&svc, json),
        Commands::Export { command } => match command {
            ExportCommands::Csv { output, json } => cmd_export_csv(&svc, output, json),
            ExportCommands::Json { output } => cmd_export_json(&svc, output),
        },
        Commands::Import { command } => match command {
            ImportCommands::Json { file, json } => cmd_import_json(&svc, &file, json),
        },
        Commands::Demo { json } => cmd_demo(&svc, json),
    }
}
