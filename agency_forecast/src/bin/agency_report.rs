use agency_forecast::forecast::{accumulate, window, ForecastSummary};
use agency_forecast::margin::{all_project_margins, portfolio_margin};
use agency_forecast::pipeline::{
    director_pipeline_demand, pipeline_summary, rank_by_score, ExportsSplit, PipelineTotals,
};
use agency_forecast::utilization::{director_capacity, employee_utilization, UtilizationSummary};
use agency_forecast::{AnalyticsConfig, ProjectStore, SnapshotLoader};
use agency_math::YearMonth;
use chrono::{Datelike, Local};
use clap::{Parser, ValueEnum};
use log::info;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable tables
    Text,
    /// A single JSON document
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "agency-report")]
#[command(about = "Revenue forecast, pipeline and margin report for an agency snapshot", long_about = None)]
#[command(version)]
struct Cli {
    /// Snapshot to report on: a directory of CSV exports or a JSON file
    snapshot: PathBuf,

    /// JSON analytics configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First forecast month as YYYY-MM (defaults to the current month)
    #[arg(short, long, value_parser = parse_year_month)]
    start: Option<YearMonth>,

    /// Number of months to forecast (defaults to the configured horizon)
    #[arg(short, long)]
    months: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn parse_year_month(text: &str) -> Result<YearMonth, String> {
    let (year, month) = text
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got '{}'", text))?;
    let year: i32 = year.parse().map_err(|e| format!("bad year: {}", e))?;
    let month: u32 = month.parse().map_err(|e| format!("bad month: {}", e))?;
    YearMonth::new(year, month).map_err(|e| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::from_json_file(path)?,
        None => AnalyticsConfig::default(),
    };
    let snapshot = SnapshotLoader::load(&cli.snapshot)?;

    let start = match cli.start {
        Some(start) => start,
        None => {
            let today = Local::now().date_naive();
            YearMonth::new(today.year(), today.month())?
        }
    };
    let months = cli.months.unwrap_or(config.default_horizon_months);
    info!("Forecasting {} months from {}", months, start);

    let projects = snapshot.projects(None);
    let accumulation = accumulate(&projects);
    let buckets = window(&accumulation.buckets, start, months);
    let summary = ForecastSummary::from_buckets(&buckets);

    let mut pipeline = pipeline_summary(&projects, &config.score_weights);
    let totals = PipelineTotals::from_entries(&pipeline);
    let exports = ExportsSplit::from_entries(&pipeline);
    let demand = director_pipeline_demand(&pipeline);
    rank_by_score(&mut pipeline);

    let margins = all_project_margins(&snapshot);
    let portfolio = portfolio_margin(&margins);

    let utilization = employee_utilization(&snapshot, start.year(), start.month(), &config.utilization);
    let utilization_summary = UtilizationSummary::from_rows(&utilization);
    let directors = director_capacity(&snapshot, start.year(), start.month(), demand);

    match cli.format {
        OutputFormat::Json => {
            let report = json!({
                "start": start.to_string(),
                "forecast": buckets,
                "forecast_summary": summary,
                "skipped_projects": accumulation
                    .skipped
                    .iter()
                    .map(|s| json!({ "project_id": s.project_id, "name": s.name, "reason": s.issue.to_string() }))
                    .collect::<Vec<_>>(),
                "pipeline": pipeline,
                "pipeline_totals": totals,
                "exports_split": exports,
                "margins": margins,
                "portfolio_margin": portfolio,
                "utilization": utilization,
                "utilization_summary": utilization_summary,
                "director_capacity": directors,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Revenue & Profit Forecast");
            println!("=========================");
            println!(
                "{:<10} {:>8} {:>14} {:>14} {:>10}",
                "Month", "Projects", "Wtd Revenue", "Wtd Profit", "Director %"
            );
            for bucket in &buckets {
                println!(
                    "{:<10} {:>8} {:>14.0} {:>14.0} {:>9.0}%",
                    bucket.period.label(),
                    bucket.project_count,
                    bucket.weighted_revenue,
                    bucket.weighted_profit,
                    bucket.director_involvement
                );
            }
            println!(
                "Total weighted revenue {:.0}, weighted profit {:.0}, avg director load {:.0}%",
                summary.total_weighted_revenue, summary.total_weighted_profit, summary.average_director_load
            );
            for skipped in &accumulation.skipped {
                println!("  Excluded {} ({}): {}", skipped.name, skipped.project_id, skipped.issue);
            }

            println!("\nPipeline (by score)");
            println!("===================");
            for entry in &pipeline {
                println!(
                    "{:<40} {:>5.2}  value {:>10.0}  weighted {:>10.0}  likelihood {:>3.0}%",
                    entry.name, entry.score, entry.contract_value, entry.weighted_value, entry.likelihood_pct
                );
            }
            println!(
                "Total {:.0}, weighted {:.0}, weighted profit {:.0}, exports {:.0} / domestic {:.0}",
                totals.total_value,
                totals.weighted_value,
                totals.weighted_profit,
                exports.exports_value,
                exports.domestic_value
            );

            println!("\nProject Margins");
            println!("===============");
            for row in &margins {
                println!(
                    "{:<40} {:<10} revenue {:>10.0}  cost {:>10.0}  margin {:>10.0} ({:.1}%)",
                    row.project_name,
                    row.status,
                    row.margin.revenue,
                    row.margin.total_cost,
                    row.margin.margin,
                    row.margin.margin_pct
                );
            }
            println!(
                "Portfolio margin {:.0} ({:.1}%)",
                portfolio.margin, portfolio.margin_pct
            );

            println!("\nUtilization {}", start.label());
            println!("================");
            for row in &utilization {
                println!(
                    "{:<25} {:<12} {:>5.0}%  {}",
                    row.name,
                    row.role.to_string(),
                    row.total_allocation,
                    row.status
                );
            }
            println!(
                "Average {:.0}%, unallocated salary {:.0}, over-allocated {}",
                utilization_summary.average_utilization,
                utilization_summary.total_unallocated_salary,
                utilization_summary.over_allocated
            );

            for director in &directors {
                let flag = if director.projected_total >= config.director_capacity_warning {
                    "  (stretched)"
                } else {
                    ""
                };
                println!(
                    "Director {}: current {:.0}% + pipeline {:.0}% = {:.0}%{}",
                    director.name,
                    director.current_allocation,
                    director.pipeline_share,
                    director.projected_total,
                    flag
                );
            }
        }
    }

    Ok(())
}
