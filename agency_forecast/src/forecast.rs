//! Monthly revenue, profit and director-load forecast
//!
//! Forecasting runs in two phases. [`accumulate`] spreads every eligible
//! project's contract value over its whole life into per-month buckets;
//! [`window`] then reads a run of consecutive months out of those buckets,
//! zero-filling months nothing contributed to. The window never limits what
//! gets accumulated.

use crate::error::Result;
use crate::model::{AnchorIssue, Project, ProjectId};
use agency_math::YearMonth;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Forecast figures for one calendar month, summed over contributing projects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastBucket {
    pub period: YearMonth,
    pub revenue: f64,
    /// Revenue scaled by win likelihood
    pub weighted_revenue: f64,
    pub profit: f64,
    pub weighted_profit: f64,
    /// Summed director involvement; may exceed 100 when projects overlap
    pub director_involvement: f64,
    pub project_count: u32,
}

impl ForecastBucket {
    /// An empty bucket for `period`
    pub fn zero(period: YearMonth) -> Self {
        Self {
            period,
            revenue: 0.0,
            weighted_revenue: 0.0,
            profit: 0.0,
            weighted_profit: 0.0,
            director_involvement: 0.0,
            project_count: 0,
        }
    }

    fn add(&mut self, contribution: &MonthlyContribution) {
        self.revenue += contribution.revenue;
        self.weighted_revenue += contribution.weighted_revenue;
        self.profit += contribution.profit;
        self.weighted_profit += contribution.weighted_profit;
        self.director_involvement += contribution.director_involvement;
        self.project_count += 1;
    }
}

/// What a single project adds to each month of its life
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyContribution {
    pub revenue: f64,
    pub weighted_revenue: f64,
    pub profit: f64,
    pub weighted_profit: f64,
    pub director_involvement: f64,
}

impl MonthlyContribution {
    pub fn for_project(project: &Project) -> Self {
        let likelihood = project.effective_likelihood();
        let margin_pct = project.expected_margin_pct;

        let revenue = project.contract_value / f64::from(project.duration_months());
        let weighted_revenue = revenue * likelihood / 100.0;

        Self {
            revenue,
            weighted_revenue,
            profit: revenue * margin_pct / 100.0,
            weighted_profit: weighted_revenue * margin_pct / 100.0,
            director_involvement: project.director_involvement_pct,
        }
    }
}

/// A project left out of the forecast because it has no usable anchor date
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedProject {
    pub project_id: ProjectId,
    pub name: String,
    pub issue: AnchorIssue,
}

/// Result of the accumulation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulation {
    /// Buckets for every month any project contributes to
    pub buckets: BTreeMap<YearMonth, ForecastBucket>,
    /// Non-terminal projects excluded for lack of a valid anchor
    pub skipped: Vec<SkippedProject>,
}

impl Accumulation {
    /// Lifetime totals over every accumulated month
    pub fn lifetime_totals(&self) -> ForecastSummary {
        let buckets: Vec<ForecastBucket> = self.buckets.values().copied().collect();
        ForecastSummary::from_buckets(&buckets)
    }
}

/// Spread each eligible project's figures over its months.
///
/// Lost and completed projects are ignored. Projects without a valid anchor
/// date are reported in [`Accumulation::skipped`] and contribute nothing.
pub fn accumulate(projects: &[Project]) -> Accumulation {
    let mut accumulation = Accumulation::default();

    for project in projects {
        if project.status.is_terminal() {
            continue;
        }

        let anchor = match project.anchor_month() {
            Ok(anchor) => anchor,
            Err(issue) => {
                warn!(
                    "Excluding project {} ({}) from forecast: {}",
                    project.id, project.name, issue
                );
                accumulation.skipped.push(SkippedProject {
                    project_id: project.id,
                    name: project.name.clone(),
                    issue,
                });
                continue;
            }
        };

        let contribution = MonthlyContribution::for_project(project);
        for period in anchor.iter_months(project.duration_months() as usize) {
            accumulation
                .buckets
                .entry(period)
                .or_insert_with(|| ForecastBucket::zero(period))
                .add(&contribution);
        }
    }

    debug!(
        "Accumulated {} projects into {} months ({} skipped)",
        projects.len(),
        accumulation.buckets.len(),
        accumulation.skipped.len()
    );
    accumulation
}

/// Read `num_months` consecutive months starting at `start`, in order
pub fn window(
    buckets: &BTreeMap<YearMonth, ForecastBucket>,
    start: YearMonth,
    num_months: usize,
) -> Vec<ForecastBucket> {
    start
        .iter_months(num_months)
        .map(|period| {
            buckets
                .get(&period)
                .copied()
                .unwrap_or_else(|| ForecastBucket::zero(period))
        })
        .collect()
}

/// Forecast `num_months` months starting at `start_year`/`start_month`.
///
/// Fails only when `start_month` is outside 1..=12.
pub fn forecast(
    projects: &[Project],
    start_year: i32,
    start_month: u32,
    num_months: usize,
) -> Result<Vec<ForecastBucket>> {
    let start = YearMonth::new(start_year, start_month)?;
    let accumulation = accumulate(projects);
    Ok(window(&accumulation.buckets, start, num_months))
}

/// Totals and running sums over a forecast window
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForecastSummary {
    pub total_revenue: f64,
    pub total_weighted_revenue: f64,
    pub total_profit: f64,
    pub total_weighted_profit: f64,
    pub average_monthly_weighted_revenue: f64,
    pub average_director_load: f64,
    pub cumulative_weighted_revenue: Vec<f64>,
    pub cumulative_weighted_profit: Vec<f64>,
}

impl ForecastSummary {
    pub fn from_buckets(buckets: &[ForecastBucket]) -> Self {
        let mut summary = ForecastSummary::default();
        if buckets.is_empty() {
            return summary;
        }

        let mut director_total = 0.0;
        for bucket in buckets {
            summary.total_revenue += bucket.revenue;
            summary.total_weighted_revenue += bucket.weighted_revenue;
            summary.total_profit += bucket.profit;
            summary.total_weighted_profit += bucket.weighted_profit;
            director_total += bucket.director_involvement;

            summary
                .cumulative_weighted_revenue
                .push(summary.total_weighted_revenue);
            summary
                .cumulative_weighted_profit
                .push(summary.total_weighted_profit);
        }

        let months = buckets.len() as f64;
        summary.average_monthly_weighted_revenue = summary.total_weighted_revenue / months;
        summary.average_director_load = director_total / months;
        summary
    }
}
