use agency_forecast::forecast::{accumulate, window, ForecastSummary};
use agency_forecast::margin::{all_project_margins, monthly_pnl, portfolio_margin, project_margin};
use agency_forecast::model::{BudgetCategory, BudgetItem, Employee, Project, ProjectStatus, Role, TimeAllocation};
use agency_forecast::pipeline::{director_pipeline_demand, pipeline_summary, rank_by_score, PipelineTotals};
use agency_forecast::utilization::{director_capacity, employee_utilization, UtilizationStatus};
use agency_forecast::{AnalyticsConfig, ProjectStore, Snapshot, SnapshotLoader};
use agency_math::YearMonth;
use approx::assert_relative_eq;
use pretty_assertions::assert_eq;

// A small agency: two directors, a researcher, three projects in flight and
// two in the pipeline
fn create_sample_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::new();

    snapshot.add_employee(Employee::new(1, "Maria Papadopoulou", Role::Director, 6000.0));
    snapshot.add_employee(Employee::new(2, "Nikos Georgiou", Role::Director, 5500.0));
    snapshot.add_employee(Employee::new(3, "Anna Petrova", Role::Researcher, 2200.0));

    snapshot.add_project(Project {
        client: "Ministry of Economy".to_string(),
        contract_value: 45_000.0,
        start_date: "2026-01-15".to_string(),
        expected_duration_months: 3,
        expected_margin_pct: 35.0,
        director_involvement_pct: 15.0,
        ..Project::new(1, "Consumer Confidence Survey Q1", ProjectStatus::Active)
    });
    snapshot.add_project(Project {
        client: "National Tourism Board".to_string(),
        contract_value: 85_000.0,
        start_date: "2026-01-01".to_string(),
        expected_duration_months: 6,
        expected_margin_pct: 28.0,
        exports_oriented: true,
        director_involvement_pct: 20.0,
        ..Project::new(2, "Tourism Satisfaction Study", ProjectStatus::Active)
    });
    snapshot.add_project(Project {
        client: "European Commission".to_string(),
        contract_value: 120_000.0,
        expected_start_date: "2026-04-01".to_string(),
        expected_duration_months: 4,
        likelihood_pct: 75.0,
        expected_margin_pct: 22.0,
        reputation_score: 5,
        exports_oriented: true,
        director_involvement_pct: 25.0,
        ..Project::new(3, "EU Barometer Wave 12", ProjectStatus::Pipeline)
    });
    snapshot.add_project(Project {
        client: "Media Group Alpha".to_string(),
        contract_value: 18_000.0,
        expected_start_date: "2026-03-01".to_string(),
        expected_duration_months: 1,
        likelihood_pct: 90.0,
        expected_margin_pct: 50.0,
        reputation_score: 4,
        director_involvement_pct: 15.0,
        ..Project::new(4, "Political Opinion Poll", ProjectStatus::Pipeline)
    });
    snapshot.add_project(Project {
        contract_value: 28_000.0,
        start_date: "2025-10-01".to_string(),
        expected_duration_months: 3,
        ..Project::new(5, "Customer Satisfaction - Telco", ProjectStatus::Completed)
    });
    snapshot.add_project(Project {
        contract_value: 60_000.0,
        expected_start_date: "2026-02-01".to_string(),
        ..Project::new(6, "Lost Tender", ProjectStatus::Lost)
    });

    let allocations = [(1, 1, 15.0), (1, 2, 20.0), (2, 2, 15.0), (3, 1, 60.0), (3, 2, 50.0)];
    for (employee_id, project_id, pct) in allocations {
        snapshot.set_allocation(TimeAllocation {
            employee_id,
            project_id,
            year: 2026,
            month: 2,
            allocation_pct: pct,
        });
    }

    snapshot.add_budget_item(BudgetItem {
        id: 1,
        project_id: 1,
        category: BudgetCategory::Suppliers,
        description: "Sample provider".to_string(),
        amount: 3500.0,
        notes: String::new(),
    });
    snapshot.add_budget_item(BudgetItem {
        id: 2,
        project_id: 2,
        category: BudgetCategory::Travel,
        description: "Fieldwork travel - islands".to_string(),
        amount: 8500.0,
        notes: String::new(),
    });

    snapshot
}

#[test]
fn test_full_forecast_workflow() {
    let snapshot = create_sample_snapshot();
    let projects = snapshot.projects(None);

    let accumulation = accumulate(&projects);
    assert!(accumulation.skipped.is_empty());

    let start = YearMonth::new(2026, 1).unwrap();
    let months = window(&accumulation.buckets, start, 12);
    assert_eq!(months.len(), 12);

    // January: consumer confidence (15000) + tourism (85000 / 6)
    assert_relative_eq!(months[0].revenue, 15_000.0 + 85_000.0 / 6.0);
    assert_eq!(months[0].project_count, 2);

    // March adds the poll weighted at 90%
    assert_relative_eq!(
        months[2].weighted_revenue,
        15_000.0 + 85_000.0 / 6.0 + 16_200.0,
        epsilon = 1e-6
    );
    assert_relative_eq!(months[2].director_involvement, 50.0);

    // July: only the barometer remains
    assert_relative_eq!(months[6].weighted_revenue, 22_500.0);
    assert_eq!(months[7].project_count, 0);

    let summary = ForecastSummary::from_buckets(&months);
    assert_relative_eq!(
        summary.total_weighted_revenue,
        45_000.0 + 85_000.0 + 16_200.0 + 90_000.0,
        epsilon = 1e-6
    );
    assert_eq!(summary.cumulative_weighted_revenue.len(), 12);
}

#[test]
fn test_margin_workflow() {
    let snapshot = create_sample_snapshot();

    let consumer = project_margin(&snapshot, 1).unwrap();
    // Maria 6000*15% + Anna 2200*60%
    assert_relative_eq!(consumer.personnel_cost, 900.0 + 1320.0);
    assert_relative_eq!(consumer.non_personnel_cost, 3500.0);
    assert_relative_eq!(consumer.margin, 45_000.0 - 5720.0);

    let rows = all_project_margins(&snapshot);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.status != ProjectStatus::Lost));

    let portfolio = portfolio_margin(&rows);
    assert_relative_eq!(portfolio.revenue, 45_000.0 + 85_000.0 + 120_000.0 + 18_000.0 + 28_000.0);

    let pnl = monthly_pnl(&snapshot, 2026, 2);
    let names: Vec<&str> = pnl.iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Consumer Confidence Survey Q1",
            "Tourism Satisfaction Study",
            "EU Barometer Wave 12",
            "Political Opinion Poll",
        ]
    );
    assert_eq!(pnl[1].employees, 3);
}

#[test]
fn test_pipeline_workflow() {
    let snapshot = create_sample_snapshot();
    let config = AnalyticsConfig::default();
    let projects = snapshot.projects(None);

    let mut entries = pipeline_summary(&projects, &config.score_weights);
    assert_eq!(entries[0].name, "Political Opinion Poll");

    let totals = PipelineTotals::from_entries(&entries);
    assert_relative_eq!(totals.weighted_value, 90_000.0 + 16_200.0);

    let demand = director_pipeline_demand(&entries);
    assert_relative_eq!(demand, 32.25);

    rank_by_score(&mut entries);
    assert_eq!(entries[0].name, "Political Opinion Poll");
    assert_relative_eq!(entries[0].score, 3.885, epsilon = 1e-9);
    assert_relative_eq!(entries[1].score, 3.7625, epsilon = 1e-9);

    let capacity = director_capacity(&snapshot, 2026, 2, demand);
    assert_eq!(capacity.len(), 2);
    assert_relative_eq!(capacity[0].projected_total, 35.0 + demand / 2.0);
}

#[test]
fn test_utilization_workflow() {
    let snapshot = create_sample_snapshot();
    let config = AnalyticsConfig::default();

    let rows = employee_utilization(&snapshot, 2026, 2, &config.utilization);
    let anna = rows.iter().find(|r| r.name == "Anna Petrova").unwrap();
    assert_eq!(anna.status, UtilizationStatus::OverAllocated);

    let nikos = rows.iter().find(|r| r.name == "Nikos Georgiou").unwrap();
    assert_eq!(nikos.status, UtilizationStatus::UnderUtilized);
    assert_relative_eq!(nikos.unallocated_salary, 4675.0);
}

#[test]
fn test_snapshot_json_round_trip() {
    let snapshot = create_sample_snapshot();
    let text = serde_json::to_string(&snapshot).unwrap();
    let reloaded = SnapshotLoader::from_json_str(&text).unwrap();
    assert_eq!(reloaded, snapshot);
}
