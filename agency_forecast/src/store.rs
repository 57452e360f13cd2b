//! Read contract for the external project store, plus an in-memory snapshot
//!
//! The analytics never talk to a database. They consume a [`ProjectStore`],
//! and callers wanting a consistent view hand them a [`Snapshot`] taken in a
//! single read.

use crate::model::{
    BudgetItem, Employee, EmployeeId, Project, ProjectId, ProjectStatus, Role, TimeAllocation,
};
use serde::{Deserialize, Serialize};

/// One allocation row costed against the employee's salary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonnelCostLine {
    pub year: i32,
    pub month: u32,
    pub allocation_pct: f64,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub employee_role: Role,
    pub monthly_salary: f64,
    /// `monthly_salary * allocation_pct / 100`
    pub cost: f64,
}

/// Data the analytics read from the external store
pub trait ProjectStore {
    /// Projects, optionally restricted to one status.
    ///
    /// Unfiltered results are ordered by status then name, filtered results by name.
    fn projects(&self, status: Option<ProjectStatus>) -> Vec<Project>;

    fn project(&self, id: ProjectId) -> Option<Project>;

    /// Employees, optionally only the active ones
    fn employees(&self, active_only: bool) -> Vec<Employee>;

    /// Allocation rows for a project, optionally filtered to a year and/or month
    fn personnel_cost_lines(
        &self,
        project_id: ProjectId,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Vec<PersonnelCostLine>;

    fn allocations_for_month(&self, year: i32, month: u32) -> Vec<TimeAllocation>;

    /// Sum of non-personnel budget items for a project
    fn budget_total(&self, project_id: ProjectId) -> f64;

    /// Sum of allocation costs for a project
    fn personnel_cost(&self, project_id: ProjectId, year: Option<i32>, month: Option<u32>) -> f64 {
        self.personnel_cost_lines(project_id, year, month)
            .iter()
            .map(|line| line.cost)
            .sum()
    }
}

/// An immutable-by-default copy of the store contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub employees: Vec<Employee>,
    pub allocations: Vec<TimeAllocation>,
    pub budget_items: Vec<BudgetItem>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    pub fn add_budget_item(&mut self, item: BudgetItem) {
        self.budget_items.push(item);
    }

    /// Insert or replace the allocation for its (employee, project, year, month)
    /// key. A percentage of zero or less removes the allocation instead.
    pub fn set_allocation(&mut self, allocation: TimeAllocation) {
        let key = allocation.key();
        let existing = self.allocations.iter().position(|a| a.key() == key);

        match (existing, allocation.allocation_pct > 0.0) {
            (Some(idx), true) => self.allocations[idx] = allocation,
            (Some(idx), false) => {
                self.allocations.remove(idx);
            }
            (None, true) => self.allocations.push(allocation),
            (None, false) => {}
        }
    }

    /// Remove a project together with its allocations and budget items
    pub fn remove_project(&mut self, id: ProjectId) -> Option<Project> {
        let idx = self.projects.iter().position(|p| p.id == id)?;
        self.allocations.retain(|a| a.project_id != id);
        self.budget_items.retain(|b| b.project_id != id);
        Some(self.projects.remove(idx))
    }

    fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }
}

impl ProjectStore for Snapshot {
    fn projects(&self, status: Option<ProjectStatus>) -> Vec<Project> {
        let mut projects: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();

        projects.sort_by(|a, b| {
            a.status
                .as_str()
                .cmp(b.status.as_str())
                .then_with(|| a.name.cmp(&b.name))
        });
        projects
    }

    fn project(&self, id: ProjectId) -> Option<Project> {
        self.projects.iter().find(|p| p.id == id).cloned()
    }

    fn employees(&self, active_only: bool) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| !active_only || e.is_active)
            .cloned()
            .collect()
    }

    fn personnel_cost_lines(
        &self,
        project_id: ProjectId,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Vec<PersonnelCostLine> {
        let mut lines: Vec<PersonnelCostLine> = self
            .allocations
            .iter()
            .filter(|a| a.project_id == project_id && a.matches_period(year, month))
            .filter_map(|a| {
                // Allocations pointing at unknown employees are not costed
                let employee = self.employee(a.employee_id)?;
                Some(PersonnelCostLine {
                    year: a.year,
                    month: a.month,
                    allocation_pct: a.allocation_pct,
                    employee_id: employee.id,
                    employee_name: employee.name.clone(),
                    employee_role: employee.role,
                    monthly_salary: employee.monthly_salary,
                    cost: employee.monthly_salary * a.allocation_pct / 100.0,
                })
            })
            .collect();

        lines.sort_by(|a, b| {
            (a.year, a.month)
                .cmp(&(b.year, b.month))
                .then_with(|| a.employee_name.cmp(&b.employee_name))
        });
        lines
    }

    fn allocations_for_month(&self, year: i32, month: u32) -> Vec<TimeAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.year == year && a.month == month)
            .copied()
            .collect()
    }

    fn budget_total(&self, project_id: ProjectId) -> f64 {
        self.budget_items
            .iter()
            .filter(|b| b.project_id == project_id)
            .map(|b| b.amount)
            .sum()
    }
}
