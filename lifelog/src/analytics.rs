//! lifelog-analytics - range analytics over everything logged
//!
//! Prints summary statistics and per-day trends for the last week, month, or
//! year.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lifelog_core::analytics::{AnalyticsReport, AnalyticsService, TimeRange, TrendSeries};
use lifelog_core::format::{format_amount, format_count, format_net, format_optional, MISSING};
use lifelog_core::{Config, Database};

#[derive(Parser)]
#[command(name = "lifelog-analytics")]
#[command(about = "Summaries and daily trends across mood, nutrition, finance, and steps")]
#[command(version)]
struct Args {
    /// Time range: week, month, or year (default: from config)
    #[arg(short, long)]
    range: Option<TimeRange>,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Show summary only, without the per-day table
    #[arg(short, long)]
    summary: bool,
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
    let range = args.range.unwrap_or(config.analytics.default_range);

    // Open database
    let db = Database::open(&config.resolved_database_path()).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let service = AnalyticsService::new(Arc::new(db), zone);
    let report = service
        .compute_analytics_blocking(range)
        .context("failed to compute analytics")?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report, args.summary),
    }

    Ok(())
}

fn print_text(report: &AnalyticsReport, summary_only: bool) {
    let summary = &report.summary;

    println!(
        "Analytics: last {} ({} to {})",
        report.time_range, report.start_date, report.end_date
    );
    println!("{}", "=".repeat(48));
    println!("  Average mood:      {}", format_optional(summary.avg_mood));
    println!("  Average calories:  {}", format_optional(summary.avg_calories));
    println!("  Average steps:     {}", format_optional(summary.avg_steps));
    println!("  Average sleep:     {}", format_optional(summary.avg_sleep));
    println!("  Total income:      {}", format_amount(summary.total_income));
    println!("  Total expenses:    {}", format_amount(summary.total_expenses));
    println!("  Net:               {}", format_net(summary.net_amount()));

    if !report.is_complete() {
        let names: Vec<_> = report.unavailable.iter().map(|d| d.as_str()).collect();
        println!();
        println!("  Unavailable (shown as empty): {}", names.join(", "));
    }

    if summary_only {
        return;
    }

    println!();
    println!(
        "{:<12} {:>6} {:>10} {:>10} {:>10}",
        "Date", "Mood", "Calories", "Net", "Steps"
    );
    println!("{}", "-".repeat(52));

    let rows = report
        .mood_trend
        .points
        .iter()
        .zip(&report.nutrition_trend.points)
        .zip(&report.finance_trend)
        .zip(&report.health_trend.points);
    for (((mood, calories), money), steps) in rows {
        println!(
            "{:<12} {:>6} {:>10} {:>10} {:>10}",
            mood.date.to_string(),
            format_optional(mood.value),
            count_or_missing(calories.value),
            format_net(money.net_amount),
            count_or_missing(steps.value),
        );
    }

    println!("{}", "-".repeat(52));
    println!(
        "{} days, {} with mood logged",
        report.mood_trend.len(),
        days_with_values(&report.mood_trend)
    );
}

fn count_or_missing(value: Option<f64>) -> String {
    value.map(format_count).unwrap_or_else(|| MISSING.to_string())
}

fn days_with_values(series: &TrendSeries) -> usize {
    series.present_values().count()
}
