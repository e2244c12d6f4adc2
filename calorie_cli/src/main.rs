use calorie_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kcal")]
#[command(about = "Calorie tracker for meals and workouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calorie balance (default)
    Status,

    /// Log a meal
    Meal {
        name: String,
        calories: u32,
    },

    /// Log a workout
    Workout {
        name: String,
        calories: u32,
    },

    /// Remove a logged meal by id
    RemoveMeal {
        id: Uuid,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Remove a logged workout by id
    RemoveWorkout {
        id: Uuid,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Set the daily calorie limit
    Limit {
        calories: u32,
    },

    /// List logged meals and workouts
    List {
        /// Only list meals
        #[arg(long, conflicts_with = "workouts")]
        meals: bool,

        /// Only list workouts
        #[arg(long, conflicts_with = "meals")]
        workouts: bool,

        /// Only show entries whose name contains this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Remove every meal and workout and zero the balance (keeps the limit)
    Reset,
}

fn main() -> Result<()> {
    calorie_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = Config::store_path(&data_dir);
    tracing::debug!("Using tracker file {:?}", store_path);

    let store = JsonFileStore::open(&store_path)?;
    let mut ledger =
        Ledger::open_with_default_limit(store, config.tracker.default_calorie_limit)?;

    match cli.command {
        Some(Commands::Status) | None => {
            display_summary(&ledger.summary());
            Ok(())
        }
        Some(Commands::Meal { name, calories }) => {
            cmd_add(&mut ledger, EntryKind::Meal, &name, calories)
        }
        Some(Commands::Workout { name, calories }) => {
            cmd_add(&mut ledger, EntryKind::Workout, &name, calories)
        }
        Some(Commands::RemoveMeal { id, yes }) => cmd_remove(&mut ledger, EntryKind::Meal, id, yes),
        Some(Commands::RemoveWorkout { id, yes }) => {
            cmd_remove(&mut ledger, EntryKind::Workout, id, yes)
        }
        Some(Commands::Limit { calories }) => cmd_limit(&mut ledger, calories),
        Some(Commands::List {
            meals,
            workouts,
            filter,
        }) => {
            cmd_list(&ledger, meals, workouts, filter.as_deref());
            Ok(())
        }
        Some(Commands::Reset) => cmd_reset(&mut ledger),
    }
}

fn cmd_add(
    ledger: &mut Ledger<JsonFileStore>,
    kind: EntryKind,
    name: &str,
    calories: u32,
) -> Result<()> {
    let entry = match Entry::new(name, calories) {
        Ok(entry) => entry,
        Err(e) => {
            eprintln!("please fill in all fields");
            return Err(e);
        }
    };

    let added = ledger.add(kind, entry)?;
    println!("\n✓ Added {}: {}", kind, format_entry(added));

    display_summary(&ledger.summary());
    Ok(())
}

fn cmd_remove(
    ledger: &mut Ledger<JsonFileStore>,
    kind: EntryKind,
    id: Uuid,
    yes: bool,
) -> Result<()> {
    let Some(entry) = ledger.entries(kind).iter().find(|e| e.id == id) else {
        println!("No {} with id {}", kind, id);
        return Ok(());
    };

    if !yes && !prompt_confirm(&format!("Remove {} '{}'?", kind, entry.name))? {
        println!("Cancelled.");
        return Ok(());
    }

    if let Some(removed) = ledger.remove(kind, id)? {
        println!("\n✓ Removed {}: {}", kind, format_entry(&removed));
    }

    display_summary(&ledger.summary());
    Ok(())
}

fn cmd_limit(ledger: &mut Ledger<JsonFileStore>, calories: u32) -> Result<()> {
    ledger.set_limit(calories)?;
    println!("\n✓ Daily limit set to {} kcal", calories);

    display_summary(&ledger.summary());
    Ok(())
}

fn cmd_reset(ledger: &mut Ledger<JsonFileStore>) -> Result<()> {
    ledger.reset()?;
    println!("\n✓ Tracker reset");

    display_summary(&ledger.summary());
    Ok(())
}

fn cmd_list(
    ledger: &Ledger<JsonFileStore>,
    meals_only: bool,
    workouts_only: bool,
    filter: Option<&str>,
) {
    let kinds: &[EntryKind] = if meals_only {
        &[EntryKind::Meal]
    } else if workouts_only {
        &[EntryKind::Workout]
    } else {
        &[EntryKind::Meal, EntryKind::Workout]
    };

    let text = filter.unwrap_or("");
    for &kind in kinds {
        let entries = ledger.filter(kind, text);
        match kind {
            EntryKind::Meal => println!("Meals ({}):", entries.len()),
            EntryKind::Workout => println!("Workouts ({}):", entries.len()),
        }
        for entry in entries {
            println!("  {}", format_entry(entry));
        }
    }
}

fn format_entry(entry: &Entry) -> String {
    format!("{:<24} {:>6} kcal  [{}]", entry.name, entry.calories, entry.id)
}

fn display_summary(summary: &LedgerSummary) {
    const BAR_WIDTH: usize = 30;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  CALORIE TRACKER");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Daily limit:  {:>6} kcal", summary.calorie_limit);
    println!("  Gain/Loss:    {:>6} kcal", summary.total_calories);
    println!("  Consumed:     {:>6} kcal", summary.consumed);
    println!("  Burned:       {:>6} kcal", summary.burned);
    println!("  Remaining:    {:>6} kcal", summary.remaining);

    let filled = ((summary.progress_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    println!(
        "  [{}{}] {:.0}%",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        summary.progress_percent
    );

    if summary.over_limit {
        println!();
        println!("  ⚠ Daily limit reached");
    }
    println!();
}

fn prompt_confirm(question: &str) -> Result<bool> {
    print!("{} Sure? [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
