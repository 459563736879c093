use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use lift_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Resistance training session planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log planner decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a session and store it (default: today)
    Plan {
        /// Day to plan (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Seed for a reproducible exercise selection
        #[arg(long)]
        seed: Option<u64>,

        /// Force a category (upper, lower, full_body) instead of the weekly split
        #[arg(long)]
        category: Option<String>,

        /// Exercise catalog CSV to plan from instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Dry run - show the plan without storing it
        #[arg(long)]
        dry_run: bool,

        /// Replace a stored plan for the same day if it has not been started
        #[arg(long)]
        force: bool,
    },

    /// Record completed reps for one exercise
    Log {
        /// Session day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Exercise ID
        #[arg(long)]
        exercise: String,

        /// Completed reps per set, comma separated (e.g. 10,10,9)
        #[arg(long, value_delimiter = ',', required = true)]
        reps: Vec<u32>,
    },

    /// Mark a session completed with a difficulty rating
    Finish {
        /// Session day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// 1 = too easy, 3 = about right, 5 = too difficult
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },

    /// Show a stored session
    Show {
        /// Session day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the raw session as JSON
        #[arg(long)]
        json: bool,

        /// Exercise catalog CSV used to name the exercises
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        lift_core::logging::init_with_level("debug");
    } else {
        lift_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let store = SessionStore::in_dir(&data_dir);
    tracing::debug!("Using session file {:?}", store.path());
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Plan {
            date,
            seed,
            category,
            catalog,
            dry_run,
            force,
        }) => cmd_plan(
            &store,
            &config,
            PlanOptions {
                date: date.unwrap_or(today),
                seed,
                category,
                catalog,
                dry_run,
                force,
            },
        ),
        Some(Commands::Log {
            date,
            exercise,
            reps,
        }) => cmd_log(&store, date.unwrap_or(today), &exercise, &reps),
        Some(Commands::Finish { date, rating }) => {
            cmd_finish(&store, date.unwrap_or(today), rating)
        }
        Some(Commands::Show {
            date,
            json,
            catalog,
        }) => cmd_show(&store, date.unwrap_or(today), json, catalog.as_deref()),
        None => {
            // Default to planning today
            cmd_plan(
                &store,
                &config,
                PlanOptions {
                    date: today,
                    seed: None,
                    category: None,
                    catalog: None,
                    dry_run: false,
                    force: false,
                },
            )
        }
    }
}

struct PlanOptions {
    date: NaiveDate,
    seed: Option<u64>,
    category: Option<String>,
    catalog: Option<PathBuf>,
    dry_run: bool,
    force: bool,
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => load_catalog_csv(path)?,
        None => get_default_catalog().clone(),
    };

    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }
    Ok(catalog)
}

fn cmd_plan(store: &SessionStore, config: &Config, options: PlanOptions) -> Result<()> {
    let date = options.date;
    let catalog = load_catalog(options.catalog.as_deref())?;

    // Fail fast before planning; the store re-checks under its lock below
    if let Some(existing) = store.get(date)? {
        check_replaceable(&existing, options.force)?;
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let session = match options.category.as_deref() {
        Some(label) => {
            let category = Category::from_label(label);
            let since = date
                .checked_sub_signed(chrono::Duration::days(config.history_lookback_days))
                .unwrap_or(NaiveDate::MIN);
            let history = store.list(since)?;
            Planner::new(config.clone()).generate_for_category(
                &catalog.exercises,
                &history,
                category,
                date,
                &mut rng,
            )?
        }
        None => service::plan_day(&catalog, store, config, config, date, &mut rng)?,
    };

    display_session(&session, &catalog);

    if options.dry_run {
        println!("\n[Dry run - not saving session]");
        return Ok(());
    }

    store.update(date, |slot| {
        if let Some(existing) = slot.as_ref() {
            check_replaceable(existing, options.force)?;
        }
        *slot = Some(session);
        Ok(())
    })?;

    println!("\n✓ Session saved!");
    println!("  File: {}", store.path().display());
    Ok(())
}

fn check_replaceable(existing: &Session, force: bool) -> Result<()> {
    match (existing.status(), force) {
        (SessionStatus::Planned, true) => Ok(()),
        (SessionStatus::Planned, false) => Err(Error::Store(format!(
            "a session is already planned for {} (use --force to replace it)",
            existing.date
        ))),
        _ => Err(Error::Store(format!(
            "the session for {} has already been started",
            existing.date
        ))),
    }
}

fn cmd_log(store: &SessionStore, date: NaiveDate, exercise: &str, reps: &[u32]) -> Result<()> {
    store.update(date, |slot| {
        let session = slot
            .as_mut()
            .ok_or_else(|| Error::Store(format!("no session stored for {}", date)))?;
        session.record_reps(exercise, reps, Utc::now())
    })?;

    println!("✓ Logged {} for {}", exercise, date);
    Ok(())
}

fn cmd_finish(store: &SessionStore, date: NaiveDate, rating: u8) -> Result<()> {
    store.update(date, |slot| {
        let session = slot
            .as_mut()
            .ok_or_else(|| Error::Store(format!("no session stored for {}", date)))?;
        session.finish(Utc::now(), rating)
    })?;

    println!("✓ Session for {} completed (rating {})", date, rating);
    Ok(())
}

fn cmd_show(
    store: &SessionStore,
    date: NaiveDate,
    json: bool,
    catalog: Option<&Path>,
) -> Result<()> {
    let Some(session) = store.get(date)? else {
        println!("No session stored for {}", date);
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        display_session(&session, &load_catalog(catalog)?);
    }
    Ok(())
}

fn display_session(session: &Session, catalog: &Catalog) {
    let status = match session.status() {
        SessionStatus::Planned => "planned",
        SessionStatus::Started => "started",
        SessionStatus::Completed => "completed",
    };

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} {} ({})", session.date.weekday(), session.date, status);
    println!("╰─────────────────────────────────────────╯");

    for exercise_set in &session.exercise_sets {
        let name = catalog
            .get(&exercise_set.exercise_id)
            .map(|e| e.name.as_str())
            .unwrap_or(exercise_set.exercise_id.as_str());
        println!();
        println!("  {} [{}]", name, exercise_set.exercise_id);

        for (i, set) in exercise_set.sets.iter().enumerate() {
            let load = match set.load {
                Load::Bodyweight => "bodyweight".to_string(),
                Load::Weighted(kg) if kg == 0.0 => "choose a working weight".to_string(),
                Load::Weighted(kg) => format!("{} kg", kg),
            };
            let reps = if set.min_reps == set.max_reps {
                format!("{} reps", set.min_reps)
            } else {
                format!("{}-{} reps", set.min_reps, set.max_reps)
            };
            match set.completed_reps {
                Some(done) => println!("    {}. {} × {}  → {} done", i + 1, load, reps, done),
                None => println!("    {}. {} × {}", i + 1, load, reps),
            }
        }
    }

    if let Some(rating) = session.difficulty_rating {
        println!();
        println!("  Difficulty: {}/5", rating);
    }
    println!();
}
