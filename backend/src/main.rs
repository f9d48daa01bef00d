//! EcoWeek CLI - survey statistics, trivia and comments
//!
//! # Main Commands
//!
//! ```bash
//! ecoweek serve                    # Start HTTP server (port 3000)
//! ecoweek stats ECOWEEK.csv        # Aggregate the survey export
//! ecoweek trivia play              # Spin the wheel and play in the terminal
//! ```
//!
//! # Data Commands
//!
//! ```bash
//! ecoweek parse ECOWEEK.csv        # Records as JSON
//! ecoweek export ECOWEEK.csv       # Normalized CSV
//! ecoweek check ECOWEEK.csv        # Header/column diagnostics
//! ecoweek comments list            # Comments from the remote store
//! ```

use clap::{Parser, Subcommand};
use ecoweek::{
    aggregate, feedback_message, load_source, percentage_full, ranked, to_csv,
    top_environmental_issues, AppConfig, CommentStore, Histogram, NewComment, QuestionBank,
    SupabaseStore, TriviaGame,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecoweek")]
#[command(about = "Survey statistics, trivia and comments for the EcoWeek campaign", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a survey export and output its records as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Aggregate a survey export into frequency tables
    Stats {
        /// Input CSV file
        input: PathBuf,

        /// Output file for the JSON result (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of environmental issues to highlight
        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Rewrite a survey export with the canonical header
    Export {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the export's header and row widths
    Check {
        /// Input CSV file
        input: PathBuf,
    },

    /// Trivia mini-game
    Trivia {
        #[command(subcommand)]
        action: TriviaAction,
    },

    /// Community comments in the remote store
    Comments {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: ECOWEEK_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum TriviaAction {
    /// List categories
    List,

    /// Play one category in the terminal
    Play {
        /// Category id (default: spin the wheel)
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum CommentAction {
    /// List comments, newest first
    List,

    /// Post a comment
    Post {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Stats { input, output, top } => cmd_stats(&input, output.as_deref(), top),

        Commands::Export { input, output } => cmd_export(&input, output.as_deref()),

        Commands::Check { input } => cmd_check(&input),

        Commands::Trivia { action } => cmd_trivia(action),

        Commands::Comments { action } => cmd_comments(action).await,

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing survey export: {}", input.display());

    let source = load_source(input)?;
    eprintln!("   Encoding: {}", source.encoding);
    eprintln!("   Columns: {}", source.header.columns.join(", "));
    eprintln!("✅ Parsed {} responses", source.records.len());

    let json = serde_json::to_string_pretty(&source.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_stats(
    input: &Path,
    output: Option<&Path>,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📊 Aggregating: {}", input.display());

    let source = load_source(input)?;
    let result = aggregate(&source.records);
    let total = result.total_responses;

    eprintln!("   Responses: {}", total);
    print_histogram("Recycling frequency", &result.recycling_stats, total);
    print_histogram("Transportation", &result.transportation_stats, total);
    print_histogram("Eco-friendly payment", &result.payment_willingness, total);
    print_histogram("Bring own container", &result.container_willingness, total);
    print_histogram("Water conservation", &result.water_conservation_stats, total);

    eprintln!("\n   🌍 Top environmental issues:");
    for (i, entry) in top_environmental_issues(&result, top).iter().enumerate() {
        eprintln!("      {}. {} - {}% ({} responses)", i + 1, entry.label, entry.percentage, entry.count);
    }

    let json = serde_json::to_string_pretty(&result)?;
    write_output(&json, output)?;

    Ok(())
}

fn print_histogram(title: &str, histogram: &Histogram, total: u64) {
    eprintln!("\n   {}:", title);
    for entry in ranked(histogram, total) {
        let label = if entry.label.is_empty() { "(blank)" } else { entry.label.as_str() };
        eprintln!(
            "      {:<40} {:>5} {:>7}%",
            label,
            entry.count,
            percentage_full(entry.count, total)
        );
    }
}

fn cmd_export(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📤 Exporting: {}", input.display());

    let source = load_source(input)?;
    let csv = to_csv(&source.records)?;
    eprintln!("✅ Wrote {} responses", source.records.len());

    write_output(csv.trim_end(), output)?;
    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔎 Checking: {}", input.display());

    let source = load_source(input)?;
    let header = &source.header;

    eprintln!("   Encoding: {}", source.encoding);
    eprintln!("   Header columns: {} (expected {})", header.header_width, header.expected);
    for (i, column) in header.columns.iter().enumerate() {
        let mapped = ecoweek::COLUMNS.get(i).copied().unwrap_or("(ignored)");
        eprintln!("      {:>2}. {:<40} → {}", i, column, mapped);
    }
    eprintln!("   Short rows: {}", header.short_rows);
    eprintln!("   Long rows: {}", header.long_rows);

    if header.is_consistent() {
        eprintln!("✅ Layout matches the positional mapping");
        Ok(())
    } else {
        eprintln!("⚠️  Layout differs; fields may be misassigned");
        std::process::exit(1);
    }
}

fn cmd_trivia(action: TriviaAction) -> Result<(), Box<dyn std::error::Error>> {
    let bank = QuestionBank::builtin();

    match action {
        TriviaAction::List => {
            for (i, category) in bank.categories.iter().enumerate() {
                println!("  {}. {} ({}) - {} questions", i, category.name, category.id, category.questions.len());
            }
        }

        TriviaAction::Play { category } => {
            let category = match category {
                Some(id) => bank.get(&id)?,
                None => {
                    let index = bank
                        .spin(&mut rand::thread_rng())
                        .ok_or("No trivia categories available")?;
                    bank.by_index(index)?
                }
            };
            play(category)?;
        }
    }

    Ok(())
}

fn play(category: &ecoweek::Category) -> Result<(), Box<dyn std::error::Error>> {
    println!("🎡 The wheel landed on: {}\n", category.name);

    let mut game = TriviaGame::new(category);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(question) = game.current() {
        println!("Question {} of {}: {}", game.position() + 1, game.total(), question.question);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }

        let outcome = loop {
            print!("Your answer: ");
            io::stdout().flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => return Ok(()),
            };
            let choice = match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n - 1,
                _ => {
                    println!("Enter a number between 1 and {}", question.options.len());
                    continue;
                }
            };
            match game.answer(choice) {
                Ok(outcome) => break outcome,
                Err(e) => println!("{}", e),
            }
        };

        if outcome.correct {
            println!("✅ Correct!");
        } else {
            println!("❌ The answer was: {}", question.correct_answer().unwrap_or("(unknown)"));
        }
        println!("   {}\n", outcome.explanation);
        game.next()?;
    }

    println!("You got {} out of {} correct!", game.score(), game.total());
    println!("{}", feedback_message(game.score(), game.total()));
    Ok(())
}

async fn cmd_comments(action: CommentAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let supabase = config
        .supabase
        .as_ref()
        .ok_or("SUPABASE_URL and SUPABASE_ANON_KEY must be set")?;
    let store = SupabaseStore::from_config(supabase);

    match action {
        CommentAction::List => {
            let comments = store.list().await?;
            if comments.is_empty() {
                eprintln!("💬 No comments yet.");
                return Ok(());
            }

            eprintln!("💬 Comments ({}):\n", comments.len());
            for c in comments {
                println!("  {} <{}> - {}", c.name, c.email, c.created_at.format("%B %-d, %Y %H:%M"));
                println!("     {}", c.message);
                println!();
            }
        }

        CommentAction::Post { name, email, message } => {
            let stored = store.submit(NewComment { name, email, message }).await?;
            eprintln!("✅ Comment posted ({})", stored.id);
        }
    }

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }

    eprintln!("🚀 EcoWeek server on http://localhost:{}", config.port);
    eprintln!("   GET  /api/stats      - Survey statistics");
    eprintln!("   GET  /api/comments   - Community comments");
    eprintln!("   POST /api/trivia/spin - Spin the wheel");
    eprintln!("   GET  /health         - Health check");

    ecoweek::server::start_server(config).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
