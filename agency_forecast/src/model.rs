//! Domain records: projects, employees, time allocations and budget items

use agency_math::scoring::ScoreInputs;
use agency_math::{parse_iso_date, YearMonth};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProjectId = u32;
pub type EmployeeId = u32;

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Unsigned opportunity with a win probability
    Pipeline,
    /// Signed and in progress, treated as certain
    Active,
    Completed,
    Lost,
    #[serde(rename = "On Hold", alias = "OnHold")]
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pipeline => "Pipeline",
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Lost => "Lost",
            ProjectStatus::OnHold => "On Hold",
        }
    }

    /// Finished or abandoned projects have no forward-looking revenue
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Lost | ProjectStatus::Completed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// How fieldwork for a project is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImplementationMethod {
    #[serde(rename = "CAPI")]
    Capi,
    #[serde(rename = "CATI")]
    Cati,
    Desk,
    Online,
    #[default]
    Mixed,
}

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Director,
    Manager,
    Researcher,
    #[serde(rename = "Field Staff", alias = "FieldStaff")]
    FieldStaff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Director => "Director",
            Role::Manager => "Manager",
            Role::Researcher => "Researcher",
            Role::FieldStaff => "Field Staff",
        };
        f.pad(label)
    }
}

/// Non-personnel cost category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetCategory {
    Equipment,
    Tools,
    Suppliers,
    Travel,
    Subcontracting,
    Other,
}

/// Why a project has no usable forecast anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorIssue {
    /// Neither a start date nor an expected start date is set
    Missing,
    /// The date that should anchor the project does not parse
    Unparseable { field: &'static str, value: String },
}

impl fmt::Display for AnchorIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorIssue::Missing => write!(f, "no start date"),
            AnchorIssue::Unparseable { field, value } => {
                write!(f, "{} '{}' is not a YYYY-MM-DD date", field, value)
            }
        }
    }
}

/// A client engagement, signed or prospective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client: String,
    pub description: String,
    pub status: ProjectStatus,
    pub implementation_method: ImplementationMethod,
    pub contract_value: f64,
    /// Authoritative start once the project is active (ISO date, may be empty)
    pub start_date: String,
    pub end_date: String,
    /// Forecast anchor for projects that have not started
    pub expected_start_date: String,
    pub expected_duration_months: i32,
    /// Win probability, only meaningful for pipeline projects
    pub likelihood_pct: f64,
    pub expected_margin_pct: f64,
    pub reputation_score: u8,
    pub exports_oriented: bool,
    /// Share of a director's month the project consumes while running
    pub director_involvement_pct: f64,
    pub notes: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            client: String::new(),
            description: String::new(),
            status: ProjectStatus::Pipeline,
            implementation_method: ImplementationMethod::default(),
            contract_value: 0.0,
            start_date: String::new(),
            end_date: String::new(),
            expected_start_date: String::new(),
            expected_duration_months: 1,
            likelihood_pct: 50.0,
            expected_margin_pct: 0.0,
            reputation_score: 3,
            exports_oriented: false,
            director_involvement_pct: 0.0,
            notes: String::new(),
        }
    }
}

impl Project {
    /// Create a project with default attributes
    pub fn new(id: ProjectId, name: impl Into<String>, status: ProjectStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            ..Self::default()
        }
    }

    /// Duration in months, floored at 1
    pub fn duration_months(&self) -> u32 {
        self.expected_duration_months.max(1) as u32
    }

    /// Likelihood used for weighting: 100 for anything but pipeline projects
    pub fn effective_likelihood(&self) -> f64 {
        match self.status {
            ProjectStatus::Pipeline => self.likelihood_pct,
            _ => 100.0,
        }
    }

    /// The date from which revenue is spread.
    ///
    /// An active project with a start date is anchored there and a malformed
    /// start date does not fall back to the expected start.
    pub fn anchor_date(&self) -> std::result::Result<NaiveDate, AnchorIssue> {
        let (field, value) = if self.status == ProjectStatus::Active && !self.start_date.trim().is_empty() {
            ("start_date", &self.start_date)
        } else if !self.expected_start_date.trim().is_empty() {
            ("expected_start_date", &self.expected_start_date)
        } else {
            return Err(AnchorIssue::Missing);
        };

        parse_iso_date(value).ok_or_else(|| AnchorIssue::Unparseable {
            field,
            value: value.clone(),
        })
    }

    /// The month the forecast anchors this project in
    pub fn anchor_month(&self) -> std::result::Result<YearMonth, AnchorIssue> {
        self.anchor_date().map(YearMonth::from_date)
    }

    pub fn score_inputs(&self) -> ScoreInputs {
        ScoreInputs {
            likelihood_pct: self.likelihood_pct,
            expected_margin_pct: self.expected_margin_pct,
            reputation_score: f64::from(self.reputation_score),
            exports_oriented: self.exports_oriented,
            contract_value: self.contract_value,
        }
    }
}

/// A staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub monthly_salary: f64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hire_date: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_active() -> bool {
    true
}

impl Employee {
    pub fn new(id: EmployeeId, name: impl Into<String>, role: Role, monthly_salary: f64) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            monthly_salary,
            email: String::new(),
            phone: String::new(),
            hire_date: String::new(),
            is_active: true,
            notes: String::new(),
        }
    }
}

/// Share of one employee's month committed to one project
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeAllocation {
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub year: i32,
    pub month: u32,
    pub allocation_pct: f64,
}

impl TimeAllocation {
    /// The composite key identifying this allocation
    pub fn key(&self) -> (EmployeeId, ProjectId, i32, u32) {
        (self.employee_id, self.project_id, self.year, self.month)
    }

    /// Whether the allocation falls in the optional year and month filters
    pub fn matches_period(&self, year: Option<i32>, month: Option<u32>) -> bool {
        year.map_or(true, |y| self.year == y) && month.map_or(true, |m| self.month == m)
    }
}

/// A non-personnel cost line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    #[serde(default)]
    pub id: u32,
    pub project_id: ProjectId,
    pub category: BudgetCategory,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_floor() {
        let mut project = Project::new(1, "Zero", ProjectStatus::Active);
        project.expected_duration_months = 0;
        assert_eq!(project.duration_months(), 1);
        project.expected_duration_months = -4;
        assert_eq!(project.duration_months(), 1);
        project.expected_duration_months = 6;
        assert_eq!(project.duration_months(), 6);
    }

    #[test]
    fn test_effective_likelihood() {
        let mut project = Project::new(1, "Poll", ProjectStatus::Pipeline);
        project.likelihood_pct = 40.0;
        assert_eq!(project.effective_likelihood(), 40.0);

        project.status = ProjectStatus::OnHold;
        assert_eq!(project.effective_likelihood(), 100.0);
    }

    #[test]
    fn test_anchor_selection() {
        let mut project = Project::new(1, "Survey", ProjectStatus::Active);
        project.start_date = "2026-01-15".to_string();
        project.expected_start_date = "2026-03-01".to_string();
        assert_eq!(project.anchor_month().unwrap(), YearMonth::new(2026, 1).unwrap());

        // Pipeline projects ignore the start date
        project.status = ProjectStatus::Pipeline;
        assert_eq!(project.anchor_month().unwrap(), YearMonth::new(2026, 3).unwrap());

        // Active without a start date falls back to the expected start
        project.status = ProjectStatus::Active;
        project.start_date.clear();
        assert_eq!(project.anchor_month().unwrap(), YearMonth::new(2026, 3).unwrap());
    }

    #[test]
    fn test_anchor_issues() {
        let mut project = Project::new(1, "Survey", ProjectStatus::Active);
        assert_eq!(project.anchor_date(), Err(AnchorIssue::Missing));

        project.start_date = "next spring".to_string();
        project.expected_start_date = "2026-03-01".to_string();
        assert!(matches!(
            project.anchor_date(),
            Err(AnchorIssue::Unparseable { field: "start_date", .. })
        ));
    }

    #[test]
    fn test_status_serde_names() {
        let status: ProjectStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(status, ProjectStatus::OnHold);
        let status: ProjectStatus = serde_json::from_str("\"OnHold\"").unwrap();
        assert_eq!(status, ProjectStatus::OnHold);
        assert_eq!(serde_json::to_string(&ProjectStatus::OnHold).unwrap(), "\"On Hold\"");
        assert!(ProjectStatus::Lost.is_terminal());
        assert!(!ProjectStatus::OnHold.is_terminal());
    }

    #[test]
    fn test_display_respects_column_width() {
        assert_eq!(format!("{:<10}|", ProjectStatus::Active), "Active    |");
        assert_eq!(format!("{:>8}", ProjectStatus::Lost), "    Lost");
        assert_eq!(format!("{:<12}|", Role::FieldStaff), "Field Staff |");
        assert_eq!(ProjectStatus::OnHold.to_string(), "On Hold");
    }

    #[test]
    fn test_allocation_period_filter() {
        let allocation = TimeAllocation {
            employee_id: 1,
            project_id: 2,
            year: 2026,
            month: 2,
            allocation_pct: 40.0,
        };
        assert!(allocation.matches_period(None, None));
        assert!(allocation.matches_period(Some(2026), None));
        assert!(allocation.matches_period(Some(2026), Some(2)));
        assert!(!allocation.matches_period(Some(2026), Some(3)));
        assert!(!allocation.matches_period(Some(2025), Some(2)));
    }
}
