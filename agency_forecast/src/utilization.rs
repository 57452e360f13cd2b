//! Staff utilization and director capacity

use crate::config::UtilizationThresholds;
use crate::model::{EmployeeId, Role};
use crate::store::ProjectStore;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// How fully an employee's month is allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UtilizationStatus {
    OverAllocated,
    WellUtilized,
    Moderate,
    UnderUtilized,
    Unallocated,
}

impl UtilizationStatus {
    pub fn classify(total_allocation: f64, thresholds: &UtilizationThresholds) -> Self {
        if total_allocation > thresholds.full {
            UtilizationStatus::OverAllocated
        } else if total_allocation >= thresholds.well_utilized {
            UtilizationStatus::WellUtilized
        } else if total_allocation >= thresholds.moderate {
            UtilizationStatus::Moderate
        } else if total_allocation > 0.0 {
            UtilizationStatus::UnderUtilized
        } else {
            UtilizationStatus::Unallocated
        }
    }
}

impl fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UtilizationStatus::OverAllocated => "Over-allocated",
            UtilizationStatus::WellUtilized => "Well-utilized",
            UtilizationStatus::Moderate => "Moderate",
            UtilizationStatus::UnderUtilized => "Under-utilized",
            UtilizationStatus::Unallocated => "Unallocated",
        };
        f.pad(label)
    }
}

/// One employee's allocation for a month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeUtilization {
    pub employee_id: EmployeeId,
    pub name: String,
    pub role: Role,
    pub monthly_salary: f64,
    pub total_allocation: f64,
    pub status: UtilizationStatus,
    /// `max(0, 100 - total_allocation)`
    pub unallocated_pct: f64,
    /// Salary not covered by any project allocation
    pub unallocated_salary: f64,
}

fn totals_by_employee<S: ProjectStore + ?Sized>(store: &S, year: i32, month: u32) -> HashMap<EmployeeId, f64> {
    let mut totals = HashMap::new();
    for allocation in store.allocations_for_month(year, month) {
        *totals.entry(allocation.employee_id).or_insert(0.0) += allocation.allocation_pct;
    }
    totals
}

/// Utilization for every active employee in a month
pub fn employee_utilization<S: ProjectStore + ?Sized>(
    store: &S,
    year: i32,
    month: u32,
    thresholds: &UtilizationThresholds,
) -> Vec<EmployeeUtilization> {
    let totals = totals_by_employee(store, year, month);

    store
        .employees(true)
        .into_iter()
        .map(|e| {
            let total_allocation = totals.get(&e.id).copied().unwrap_or(0.0);
            let unallocated_pct = (100.0 - total_allocation).max(0.0);
            EmployeeUtilization {
                employee_id: e.id,
                status: UtilizationStatus::classify(total_allocation, thresholds),
                unallocated_salary: e.monthly_salary * unallocated_pct / 100.0,
                name: e.name,
                role: e.role,
                monthly_salary: e.monthly_salary,
                total_allocation,
                unallocated_pct,
            }
        })
        .collect()
}

/// Team-level utilization KPIs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct UtilizationSummary {
    pub average_utilization: f64,
    pub total_unallocated_salary: f64,
    pub over_allocated: usize,
}

impl UtilizationSummary {
    pub fn from_rows(rows: &[EmployeeUtilization]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        Self {
            average_utilization: rows.iter().map(|r| r.total_allocation).sum::<f64>() / rows.len() as f64,
            total_unallocated_salary: rows.iter().map(|r| r.unallocated_salary).sum(),
            over_allocated: rows
                .iter()
                .filter(|r| r.status == UtilizationStatus::OverAllocated)
                .count(),
        }
    }
}

/// A director's current load plus an even share of the pipeline demand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorCapacity {
    pub employee_id: EmployeeId,
    pub name: String,
    pub current_allocation: f64,
    pub pipeline_share: f64,
    pub projected_total: f64,
}

/// Project each active director's load for a month.
///
/// `pipeline_demand` is split evenly across directors.
pub fn director_capacity<S: ProjectStore + ?Sized>(
    store: &S,
    year: i32,
    month: u32,
    pipeline_demand: f64,
) -> Vec<DirectorCapacity> {
    let totals = totals_by_employee(store, year, month);
    let mut directors: Vec<_> = store
        .employees(true)
        .into_iter()
        .filter(|e| e.role == Role::Director)
        .collect();
    directors.sort_by(|a, b| a.name.cmp(&b.name));

    if directors.is_empty() {
        return Vec::new();
    }
    let pipeline_share = pipeline_demand / directors.len() as f64;

    directors
        .into_iter()
        .map(|d| {
            let current_allocation = totals.get(&d.id).copied().unwrap_or(0.0);
            DirectorCapacity {
                employee_id: d.id,
                name: d.name,
                current_allocation,
                pipeline_share,
                projected_total: current_allocation + pipeline_share,
            }
        })
        .collect()
}
