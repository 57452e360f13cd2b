//! Snapshot loading from CSV exports or a JSON document
//!
//! A CSV snapshot is a directory holding `projects.csv` and, optionally,
//! `employees.csv`, `allocations.csv` and `budget_items.csv`. Blank numeric
//! cells in `projects.csv` fall back to the same defaults as a new project.

use crate::error::{ForecastError, Result};
use crate::model::{
    BudgetCategory, BudgetItem, Employee, EmployeeId, ImplementationMethod, Project, ProjectId,
    ProjectStatus, Role, TimeAllocation,
};
use crate::store::Snapshot;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;

pub const PROJECTS_FILE: &str = "projects.csv";
pub const EMPLOYEES_FILE: &str = "employees.csv";
pub const ALLOCATIONS_FILE: &str = "allocations.csv";
pub const BUDGET_ITEMS_FILE: &str = "budget_items.csv";

/// A `projects.csv` row as exported by the store, before defaults are applied
#[derive(Debug, Deserialize)]
struct ProjectRow {
    id: ProjectId,
    name: String,
    #[serde(default)]
    client: String,
    #[serde(default)]
    description: String,
    status: ProjectStatus,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    implementation_method: Option<ImplementationMethod>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    contract_value: Option<f64>,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    expected_start_date: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    expected_duration_months: Option<i32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    likelihood_pct: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    expected_margin_pct: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    reputation_score: Option<u8>,
    #[serde(default)]
    exports_oriented: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    director_involvement_pct: Option<f64>,
    #[serde(default)]
    notes: String,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project> {
        let defaults = Project::default();
        let exports_oriented = parse_flag(&self.exports_oriented).ok_or_else(|| {
            ForecastError::DataError(format!(
                "project {}: exports_oriented '{}' is not a boolean",
                self.id, self.exports_oriented
            ))
        })?;

        Ok(Project {
            id: self.id,
            name: self.name,
            client: self.client,
            description: self.description,
            status: self.status,
            implementation_method: self.implementation_method.unwrap_or_default(),
            contract_value: self.contract_value.unwrap_or(defaults.contract_value),
            start_date: self.start_date,
            end_date: self.end_date,
            expected_start_date: self.expected_start_date,
            expected_duration_months: self
                .expected_duration_months
                .unwrap_or(defaults.expected_duration_months),
            likelihood_pct: self.likelihood_pct.unwrap_or(defaults.likelihood_pct),
            expected_margin_pct: self.expected_margin_pct.unwrap_or(defaults.expected_margin_pct),
            reputation_score: self.reputation_score.unwrap_or(defaults.reputation_score),
            exports_oriented,
            director_involvement_pct: self
                .director_involvement_pct
                .unwrap_or(defaults.director_involvement_pct),
            notes: self.notes,
        })
    }
}

/// An `employees.csv` row; the store keeps `is_active` as 1/0
#[derive(Debug, Deserialize)]
struct EmployeeRow {
    id: EmployeeId,
    name: String,
    role: Role,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    monthly_salary: Option<f64>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    hire_date: String,
    #[serde(default)]
    is_active: String,
    #[serde(default)]
    notes: String,
}

impl EmployeeRow {
    fn into_employee(self) -> Result<Employee> {
        // A blank cell keeps the store default of an active employee
        let is_active = if self.is_active.trim().is_empty() {
            true
        } else {
            parse_flag(&self.is_active).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "employee {}: is_active '{}' is not a boolean",
                    self.id, self.is_active
                ))
            })?
        };

        Ok(Employee {
            id: self.id,
            name: self.name,
            role: self.role,
            monthly_salary: self.monthly_salary.unwrap_or(0.0),
            email: self.email,
            phone: self.phone,
            hire_date: self.hire_date,
            is_active,
            notes: self.notes,
        })
    }
}

/// A `budget_items.csv` row
#[derive(Debug, Deserialize)]
struct BudgetItemRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    id: Option<u32>,
    project_id: ProjectId,
    category: BudgetCategory,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<f64>,
    #[serde(default)]
    notes: String,
}

impl From<BudgetItemRow> for BudgetItem {
    fn from(row: BudgetItemRow) -> Self {
        BudgetItem {
            id: row.id.unwrap_or_default(),
            project_id: row.project_id,
            category: row.category,
            description: row.description,
            amount: row.amount.unwrap_or(0.0),
            notes: row.notes,
        }
    }
}

/// Interpret the boolean spellings found in store exports; blank means false
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Some(false),
        "1" | "true" | "yes" | "y" => Some(true),
        _ => None,
    }
}

/// Loader for store snapshots
#[derive(Debug)]
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load a snapshot from either a CSV directory or a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_csv_dir(path)
        } else if path.is_file() {
            Self::from_json(path)
        } else {
            Err(ForecastError::InvalidParameter(format!(
                "snapshot path {} is neither a directory nor a file",
                path.display()
            )))
        }
    }

    /// Load a snapshot from a directory of CSV exports
    pub fn from_csv_dir<P: AsRef<Path>>(dir: P) -> Result<Snapshot> {
        let dir = dir.as_ref();
        let projects_path = dir.join(PROJECTS_FILE);
        if !projects_path.is_file() {
            return Err(ForecastError::DataError(format!(
                "{} not found in {}",
                PROJECTS_FILE,
                dir.display()
            )));
        }

        let projects = read_csv::<ProjectRow>(&projects_path)?
            .into_iter()
            .map(ProjectRow::into_project)
            .collect::<Result<Vec<_>>>()?;

        let employees = read_optional_csv::<EmployeeRow>(&dir.join(EMPLOYEES_FILE))?
            .into_iter()
            .map(EmployeeRow::into_employee)
            .collect::<Result<Vec<_>>>()?;
        let budget_items = read_optional_csv::<BudgetItemRow>(&dir.join(BUDGET_ITEMS_FILE))?
            .into_iter()
            .map(BudgetItem::from)
            .collect();

        let snapshot = Snapshot {
            projects,
            employees,
            allocations: Vec::new(),
            budget_items,
        };
        let allocations = read_optional_csv::<TimeAllocation>(&dir.join(ALLOCATIONS_FILE))?;

        let snapshot = Self::finish(snapshot, allocations)?;
        info!(
            "Loaded snapshot from {}: {} projects, {} employees",
            dir.display(),
            snapshot.projects.len(),
            snapshot.employees.len()
        );
        Ok(snapshot)
    }

    /// Load a snapshot from a JSON file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a snapshot from JSON text
    pub fn from_json_str(text: &str) -> Result<Snapshot> {
        let mut snapshot: Snapshot = serde_json::from_str(text)?;
        let allocations = std::mem::take(&mut snapshot.allocations);
        Self::finish(snapshot, allocations)
    }

    /// Route allocations through the store's upsert rules and check ids are unique
    fn finish(mut snapshot: Snapshot, allocations: Vec<TimeAllocation>) -> Result<Snapshot> {
        for allocation in allocations {
            snapshot.set_allocation(allocation);
        }

        let mut ids: Vec<ProjectId> = snapshot.projects.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ForecastError::DataError(format!(
                "duplicate project id {}",
                pair[0]
            )));
        }

        debug!("Snapshot holds {} allocations", snapshot.allocations.len());
        Ok(snapshot)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    reader
        .deserialize::<T>()
        .map(|row| {
            row.map_err(|e| ForecastError::CsvError(format!("{}: {}", path.display(), e)))
        })
        .collect()
}

fn read_optional_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if path.is_file() {
        read_csv(path)
    } else {
        debug!("{} not present, using an empty collection", path.display());
        Ok(Vec::new())
    }
}
