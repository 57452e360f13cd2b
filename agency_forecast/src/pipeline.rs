//! Pipeline analytics: likelihood-weighted values, composite score and KPIs

use crate::model::{ImplementationMethod, Project, ProjectId, ProjectStatus};
use agency_math::scoring::composite_score;
use agency_math::ScoreWeights;
use serde::Serialize;
use std::cmp::Ordering;

/// A pipeline project with its derived figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineEntry {
    pub project_id: ProjectId,
    pub name: String,
    pub client: String,
    pub implementation_method: ImplementationMethod,
    pub contract_value: f64,
    pub likelihood_pct: f64,
    /// `contract_value * likelihood_pct / 100`
    pub weighted_value: f64,
    pub expected_margin_pct: f64,
    /// `weighted_value * expected_margin_pct / 100`
    pub weighted_profit: f64,
    pub director_involvement_pct: f64,
    pub exports_oriented: bool,
    pub score: f64,
}

impl PipelineEntry {
    pub fn from_project(project: &Project, weights: &ScoreWeights) -> Self {
        let weighted_value = project.contract_value * project.likelihood_pct / 100.0;
        Self {
            project_id: project.id,
            name: project.name.clone(),
            client: project.client.clone(),
            implementation_method: project.implementation_method,
            contract_value: project.contract_value,
            likelihood_pct: project.likelihood_pct,
            weighted_value,
            expected_margin_pct: project.expected_margin_pct,
            weighted_profit: weighted_value * project.expected_margin_pct / 100.0,
            director_involvement_pct: project.director_involvement_pct,
            exports_oriented: project.exports_oriented,
            score: composite_score(&project.score_inputs(), weights),
        }
    }
}

/// Pipeline projects ordered by likelihood, then contract value, both descending
pub fn pipeline_summary(projects: &[Project], weights: &ScoreWeights) -> Vec<PipelineEntry> {
    let mut entries: Vec<PipelineEntry> = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Pipeline)
        .map(|p| PipelineEntry::from_project(p, weights))
        .collect();

    entries.sort_by(|a, b| {
        desc(a.likelihood_pct, b.likelihood_pct).then_with(|| desc(a.contract_value, b.contract_value))
    });
    entries
}

/// Re-order entries by composite score, best first
pub fn rank_by_score(entries: &mut [PipelineEntry]) {
    entries.sort_by(|a, b| desc(a.score, b.score));
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Headline pipeline KPIs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PipelineTotals {
    pub total_value: f64,
    pub weighted_value: f64,
    pub weighted_profit: f64,
    pub average_likelihood: f64,
    pub average_margin: f64,
}

impl PipelineTotals {
    pub fn from_entries(entries: &[PipelineEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let count = entries.len() as f64;
        Self {
            total_value: entries.iter().map(|e| e.contract_value).sum(),
            weighted_value: entries.iter().map(|e| e.weighted_value).sum(),
            weighted_profit: entries.iter().map(|e| e.weighted_profit).sum(),
            average_likelihood: entries.iter().map(|e| e.likelihood_pct).sum::<f64>() / count,
            average_margin: entries.iter().map(|e| e.expected_margin_pct).sum::<f64>() / count,
        }
    }
}

/// Weighted pipeline value split by export orientation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ExportsSplit {
    pub exports_value: f64,
    pub exports_count: usize,
    pub domestic_value: f64,
    pub domestic_count: usize,
}

impl ExportsSplit {
    pub fn from_entries(entries: &[PipelineEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut split, entry| {
            if entry.exports_oriented {
                split.exports_value += entry.weighted_value;
                split.exports_count += 1;
            } else {
                split.domestic_value += entry.weighted_value;
                split.domestic_count += 1;
            }
            split
        })
    }
}

/// Expected director load from the pipeline, weighted by likelihood
pub fn director_pipeline_demand(entries: &[PipelineEntry]) -> f64 {
    entries
        .iter()
        .map(|e| e.director_involvement_pct * e.likelihood_pct / 100.0)
        .sum()
}
