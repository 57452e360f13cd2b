//! Project margin calculator
//!
//! Revenue is the contract value; costs are personnel (salary share of every
//! allocation on the project) plus non-personnel budget items.

use crate::model::{Project, ProjectId, ProjectStatus};
use crate::store::ProjectStore;
use agency_math::{compute_margin, margin_pct, MarginBreakdown};
use serde::Serialize;

/// Margin figures for a single project
pub type ProjectMargin = MarginBreakdown;

/// Compute the margin of `project` given already-aggregated costs
pub fn margin(project: &Project, personnel_cost: f64, non_personnel_cost: f64) -> ProjectMargin {
    compute_margin(project.contract_value, personnel_cost, non_personnel_cost)
}

/// Margin for a stored project over all months; `None` when the project is unknown
pub fn project_margin<S: ProjectStore + ?Sized>(store: &S, project_id: ProjectId) -> Option<ProjectMargin> {
    let project = store.project(project_id)?;
    let personnel = store.personnel_cost(project_id, None, None);
    let non_personnel = store.budget_total(project_id);
    Some(margin(&project, personnel, non_personnel))
}

/// A project's margin tagged with its identity, for portfolio tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMarginRow {
    pub project_id: ProjectId,
    pub project_name: String,
    pub client: String,
    pub status: ProjectStatus,
    #[serde(flatten)]
    pub margin: ProjectMargin,
}

/// Margins for every project that has not been lost
pub fn all_project_margins<S: ProjectStore + ?Sized>(store: &S) -> Vec<ProjectMarginRow> {
    store
        .projects(None)
        .into_iter()
        .filter(|p| p.status != ProjectStatus::Lost)
        .filter_map(|p| {
            let margin = project_margin(store, p.id)?;
            Some(ProjectMarginRow {
                project_id: p.id,
                project_name: p.name,
                client: p.client,
                status: p.status,
                margin,
            })
        })
        .collect()
}

/// Portfolio totals with the overall margin percentage
pub fn portfolio_margin(rows: &[ProjectMarginRow]) -> MarginBreakdown {
    MarginBreakdown::total(rows.iter().map(|row| &row.margin))
}

/// One project's profit and loss for a single month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPnl {
    pub project_id: ProjectId,
    pub project_name: String,
    pub status: ProjectStatus,
    pub monthly_revenue: f64,
    pub personnel_cost: f64,
    pub monthly_margin: f64,
    pub margin_pct: f64,
    /// Number of allocation rows costed this month
    pub employees: usize,
}

/// Monthly P&L for active, pipeline and on-hold projects.
///
/// Monthly revenue is the contract value spread evenly over the duration; only
/// personnel cost varies by month, so budget items are not included.
pub fn monthly_pnl<S: ProjectStore + ?Sized>(store: &S, year: i32, month: u32) -> Vec<MonthlyPnl> {
    store
        .projects(None)
        .into_iter()
        .filter(|p| {
            matches!(
                p.status,
                ProjectStatus::Active | ProjectStatus::Pipeline | ProjectStatus::OnHold
            )
        })
        .map(|p| {
            let lines = store.personnel_cost_lines(p.id, Some(year), Some(month));
            let personnel_cost: f64 = lines.iter().map(|l| l.cost).sum();
            let monthly_revenue = p.contract_value / f64::from(p.duration_months());
            let monthly_margin = monthly_revenue - personnel_cost;

            MonthlyPnl {
                project_id: p.id,
                project_name: p.name,
                status: p.status,
                monthly_revenue,
                personnel_cost,
                monthly_margin,
                margin_pct: margin_pct(monthly_margin, monthly_revenue),
                employees: lines.len(),
            }
        })
        .collect()
}
