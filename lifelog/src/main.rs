//! lifelog - personal tracker for mood, meals, money, and health
//!
//! Logs entries, shows today's totals, lists, edits, and deletes records.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/lifelog/data.db (~/.local/share/lifelog/data.db)
//! - Config: $XDG_CONFIG_HOME/lifelog/config.toml (~/.config/lifelog/config.toml)

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use lifelog_core::analytics::{AnalyticsService, CalendarZone, DailySummary};
use lifelog_core::format::{format_amount, format_count, format_net, format_optional, format_relative_time};
use lifelog_core::{
    Config, Database, EntryKind, HealthMetric, MealType, NewFinancialEntry, NewHealthSample,
    NewMoodEntry, NewNutritionEntry,
};

#[derive(Parser)]
#[command(name = "lifelog")]
#[command(about = "Track mood, meals, money, and health readings")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log a mood check-in (1-10)
    Mood {
        level: i64,

        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,

        /// When it happened (RFC3339, default: now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Log a food item
    Meal(MealArgs),

    /// Log income
    Income(MoneyArgs),

    /// Log an expense
    Expense(MoneyArgs),

    /// Record a health reading (replaces that day's reading of the same metric)
    Health {
        /// steps, sleep, weight, or calories_burned
        metric: HealthMetric,

        value: f64,

        /// Defaults to the metric's unit
        #[arg(short, long)]
        unit: Option<String>,

        #[arg(short, long, default_value = "manual")]
        source: String,

        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Manage transaction categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Show one day's totals
    Today {
        /// Day to show (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the most recent records of a collection
    Recent {
        collection: Collection,

        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Health metric to list
        #[arg(short, long, default_value = "steps")]
        metric: HealthMetric,
    },

    /// Replace the fields of a stored record
    Edit {
        #[command(subcommand)]
        command: EditCommand,
    },

    /// Delete a record by id
    Delete { collection: Collection, id: String },
}

#[derive(clap::Args)]
struct MealArgs {
    food: String,

    #[arg(short, long)]
    calories: f64,

    /// breakfast, lunch, dinner, or snack
    #[arg(short, long, default_value = "snack")]
    meal_type: MealType,

    #[arg(long, default_value_t = 0.0)]
    protein: f64,

    #[arg(long, default_value_t = 0.0)]
    fat: f64,

    #[arg(long, default_value_t = 0.0)]
    carbs: f64,

    #[arg(long, default_value = "")]
    serving: String,

    /// When it was eaten (RFC3339; on edit, omit to keep the stored time)
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

impl MealArgs {
    fn into_entry(self) -> NewNutritionEntry {
        NewNutritionEntry {
            meal_type: self.meal_type,
            food_name: self.food,
            calories: self.calories,
            protein: self.protein,
            fat: self.fat,
            carbs: self.carbs,
            serving_size: self.serving,
            created_at: self.at,
        }
    }
}

#[derive(clap::Args)]
struct MoneyArgs {
    amount: f64,

    #[arg(short, long, default_value = "")]
    description: String,

    #[arg(short, long, default_value = "other")]
    category: String,

    /// When it happened (RFC3339; on edit, omit to keep the stored time)
    #[arg(long)]
    at: Option<DateTime<Utc>>,
}

impl MoneyArgs {
    fn into_entry(self, kind: EntryKind) -> NewFinancialEntry {
        NewFinancialEntry {
            kind,
            amount: self.amount,
            description: self.description,
            category: self.category,
            created_at: self.at,
        }
    }
}

#[derive(Subcommand)]
enum EditCommand {
    /// Replace a food item
    Meal {
        id: String,

        #[command(flatten)]
        meal: MealArgs,
    },

    /// Replace a transaction, making it income
    Income {
        id: String,

        #[command(flatten)]
        money: MoneyArgs,
    },

    /// Replace a transaction, making it an expense
    Expense {
        id: String,

        #[command(flatten)]
        money: MoneyArgs,
    },

    /// Rename or recolor a category
    Category {
        id: String,

        name: String,

        #[arg(short, long, default_value = "expense")]
        kind: EntryKind,

        #[arg(long, default_value = "#9e9e9e")]
        color: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// Create a category
    Add {
        name: String,

        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: EntryKind,

        #[arg(long, default_value = "#9e9e9e")]
        color: String,
    },

    /// List categories
    List,

    /// Delete a category by id
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Mood,
    Nutrition,
    Finance,
    Health,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        lifelog_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let zone = config
        .analytics
        .calendar_zone()
        .context("invalid analytics configuration")?;

    // Open database
    let db_path = config.resolved_database_path();
    tracing::debug!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match args.command {
        Command::Mood { level, notes, at } => {
            let entry = db
                .insert_mood(&NewMoodEntry {
                    mood_level: level,
                    notes,
                    created_at: at,
                })
                .context("failed to log mood")?;
            println!("Logged mood {} ({})", entry.mood_level, entry.id);
        }
        Command::Meal(meal) => {
            let entry = db
                .insert_nutrition(&meal.into_entry())
                .context("failed to log meal")?;
            println!(
                "Logged {} ({} kcal, {}) ({})",
                entry.food_name,
                format_count(entry.calories),
                entry.meal_type.as_str(),
                entry.id
            );
        }
        Command::Income(money) => cmd_money(&db, EntryKind::Income, money)?,
        Command::Expense(money) => cmd_money(&db, EntryKind::Expense, money)?,
        Command::Health {
            metric,
            value,
            unit,
            source,
            at,
        } => {
            let sample = db
                .record_health_sample(
                    &NewHealthSample {
                        metric,
                        value,
                        unit,
                        source,
                        recorded_at: at,
                    },
                    &zone,
                )
                .context("failed to record health reading")?;
            println!(
                "Recorded {} {} {} ({})",
                sample.metric.as_str(),
                sample.value,
                sample.unit,
                sample.id
            );
        }
        Command::Category { command } => cmd_category(&db, command)?,
        Command::Today { date, format } => {
            let date = date.unwrap_or_else(|| zone.today());
            let service = AnalyticsService::new(Arc::new(db), zone);
            let summary = service
                .daily_summary_blocking(date)
                .context("failed to compute daily summary")?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_daily_summary(&summary);
            }
        }
        Command::Recent {
            collection,
            limit,
            metric,
        } => cmd_recent(&db, &zone, collection, limit, metric)?,
        Command::Edit { command } => cmd_edit(&db, command)?,
        Command::Delete { collection, id } => {
            match collection {
                Collection::Mood => db.delete_mood(&id),
                Collection::Nutrition => db.delete_nutrition(&id),
                Collection::Finance => db.delete_financial(&id),
                Collection::Health => db.delete_health_sample(&id),
            }
            .context("failed to delete record")?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

fn cmd_money(db: &Database, kind: EntryKind, money: MoneyArgs) -> Result<()> {
    let entry = db
        .insert_financial(&money.into_entry(kind))
        .context("failed to log transaction")?;
    println!(
        "Logged {} {} [{}] ({})",
        entry.kind.as_str(),
        format_amount(entry.amount),
        entry.category,
        entry.id
    );
    Ok(())
}

fn cmd_edit(db: &Database, command: EditCommand) -> Result<()> {
    match command {
        EditCommand::Meal { id, meal } => {
            let entry = db
                .update_nutrition(&id, &meal.into_entry())
                .context("failed to update meal")?;
            println!(
                "Updated {} ({} kcal, {}) ({})",
                entry.food_name,
                format_count(entry.calories),
                entry.meal_type.as_str(),
                entry.id
            );
        }
        EditCommand::Income { id, money } => edit_money(db, &id, EntryKind::Income, money)?,
        EditCommand::Expense { id, money } => edit_money(db, &id, EntryKind::Expense, money)?,
        EditCommand::Category {
            id,
            name,
            kind,
            color,
        } => {
            let category = db
                .update_category(&id, &name, kind, &color)
                .context("failed to update category")?;
            println!(
                "Updated {} category {} ({})",
                category.kind.as_str(),
                category.name,
                category.id
            );
        }
    }
    Ok(())
}

fn edit_money(db: &Database, id: &str, kind: EntryKind, money: MoneyArgs) -> Result<()> {
    let entry = db
        .update_financial(id, &money.into_entry(kind))
        .context("failed to update transaction")?;
    println!(
        "Updated {} {} [{}] ({})",
        entry.kind.as_str(),
        format_amount(entry.amount),
        entry.category,
        entry.id
    );
    Ok(())
}

fn cmd_category(db: &Database, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::Add { name, kind, color } => {
            let category = db
                .create_category(&name, kind, &color)
                .context("failed to create category")?;
            println!(
                "Created {} category {} ({})",
                category.kind.as_str(),
                category.name,
                category.id
            );
        }
        CategoryCommand::List => {
            let categories = db.list_categories()?;
            if categories.is_empty() {
                println!("No categories.");
            }
            for c in categories {
                println!("{:<20} {:<8} {:<8} {}", c.name, c.kind.as_str(), c.color, c.id);
            }
        }
        CategoryCommand::Delete { id } => {
            db.delete_category(&id)
                .context("failed to delete category")?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn cmd_recent(
    db: &Database,
    zone: &CalendarZone,
    collection: Collection,
    limit: usize,
    metric: HealthMetric,
) -> Result<()> {
    let rows: Vec<(String, DateTime<Utc>, String)> = match collection {
        Collection::Mood => db
            .recent_mood(limit)?
            .into_iter()
            .map(|e| {
                let detail = if e.notes.is_empty() {
                    format!("mood {}", e.mood_level)
                } else {
                    format!("mood {}  {}", e.mood_level, e.notes)
                };
                (e.id, e.created_at, detail)
            })
            .collect(),
        Collection::Nutrition => db
            .recent_nutrition(limit)?
            .into_iter()
            .map(|e| {
                let detail = format!(
                    "{:<9} {} ({} kcal)",
                    e.meal_type.as_str(),
                    e.food_name,
                    format_count(e.calories)
                );
                (e.id, e.created_at, detail)
            })
            .collect(),
        Collection::Finance => db
            .recent_financial(limit)?
            .into_iter()
            .map(|e| {
                let signed = match e.kind {
                    EntryKind::Income => e.amount,
                    EntryKind::Expense => -e.amount,
                };
                let detail = format!("{:>10}  {} [{}]", format_net(signed), e.description, e.category);
                (e.id, e.created_at, detail)
            })
            .collect(),
        Collection::Health => db
            .recent_health(metric, limit)?
            .into_iter()
            .map(|s| {
                let detail = format!("{} {} {} ({})", s.metric.as_str(), s.value, s.unit, s.source);
                (s.id, s.recorded_at, detail)
            })
            .collect(),
    };

    if rows.is_empty() {
        println!("No records.");
        return Ok(());
    }

    for (id, at, detail) in rows {
        println!(
            "{}  {:<10} {}  {}",
            zone.local_time(at).format("%Y-%m-%d %H:%M"),
            format_relative_time(at),
            detail,
            id
        );
    }
    Ok(())
}

fn print_daily_summary(summary: &DailySummary) {
    println!("{}", summary.date.format("%A, %B %-d, %Y"));
    println!(
        "  Mood:      {} ({} check-ins)",
        format_optional(summary.mood_average),
        summary.mood_count
    );
    println!("  Calories:  {}", format_count(summary.total_calories));
    println!("  Income:    {}", format_amount(summary.total_income));
    println!("  Expenses:  {}", format_amount(summary.total_expenses));
    println!("  Net:       {}", format_net(summary.net_amount));
    println!("  Steps:     {}", format_count(summary.steps));
}
