//! checkride CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "checkride", version, about = "Oral exam coverage planning and grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a session and produce the exam result
    Grade {
        /// Path to the session JSON (plan, attempts, trigger)
        #[arg(long)]
        session: PathBuf,

        /// Rating override for critical-area selection (e.g. "private")
        #[arg(long)]
        rating: Option<String>,

        /// Plan-based score needed to pass overall
        #[arg(long, default_value = "0.70")]
        overall_threshold: f64,

        /// Area score needed to pass an area
        #[arg(long, default_value = "0.60")]
        area_threshold: f64,

        /// Fewest asked elements needed to judge an area
        #[arg(long, default_value = "2")]
        min_area_attempts: u32,

        /// Output directory
        #[arg(long, default_value = "./checkride-results")]
        output: PathBuf,

        /// Output format: json, markdown, html, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Show the next questions for a session
    Queue {
        /// Path to the session JSON
        #[arg(long)]
        session: PathBuf,

        /// Path to the syllabus TOML the plan was built from
        #[arg(long)]
        syllabus: PathBuf,

        /// Study mode override (linear, cross_acs, weak_areas, quick_drill)
        #[arg(long)]
        mode: Option<String>,

        /// Path to a performance history JSON; defaults to the session's
        /// own attempts
        #[arg(long)]
        history: Option<PathBuf>,

        /// Show at most this many upcoming questions
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Validate syllabus TOML files
    Validate {
        /// Path to a syllabus file or directory
        #[arg(long)]
        syllabus: PathBuf,
    },

    /// Compare two exam results to track study progress
    Compare {
        /// Baseline result JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current result JSON
        #[arg(long)]
        current: PathBuf,

        /// Area score change below which movement is noise
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if any area regressed
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter syllabus and sample session
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("checkride=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            session,
            rating,
            overall_threshold,
            area_threshold,
            min_area_attempts,
            output,
            format,
        } => commands::grade::execute(
            session,
            rating,
            overall_threshold,
            area_threshold,
            min_area_attempts,
            output,
            format,
        ),
        Commands::Queue {
            session,
            syllabus,
            mode,
            history,
            limit,
        } => commands::queue::execute(session, syllabus, mode, history, limit),
        Commands::Validate { syllabus } => commands::validate::execute(syllabus),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
