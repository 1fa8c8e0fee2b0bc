//! Population reports: ranked rows, Pareto membership, fitness summary.
//!
//! JSON goes through serde (infinite sentinel metrics serialize as `null`);
//! CSV is written by hand with a fixed header.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::eval::{Scored, REJECTED_FITNESS};
use crate::pareto::pareto_front;

/// One individual in a report.
#[derive(Clone, Debug, Serialize)]
pub struct ReportRow {
    /// Short content hash.
    pub model_id: String,
    pub hash: String,
    pub accuracy: f64,
    pub flops: f64,
    pub params: f64,
    pub latency: f64,
    pub fitness: f64,
    pub is_pareto: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Fitness statistics over the individuals that passed the hard bounds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FitnessSummary {
    pub population: usize,
    /// Individuals scored [`REJECTED_FITNESS`].
    pub rejected: usize,
    /// Individuals whose surrogate query failed.
    pub failed: usize,
    pub best: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl FitnessSummary {
    pub fn from_scored(scored: &[Scored]) -> Self {
        let admitted: Vec<f64> = scored
            .iter()
            .map(|s| s.fitness)
            .filter(|&f| f != REJECTED_FITNESS && f.is_finite())
            .collect();
        let best = admitted.iter().copied().fold(None, |acc: Option<f64>, f| {
            Some(acc.map_or(f, |best| best.max(f)))
        });
        let mean = (!admitted.is_empty()).then(|| admitted.iter().mean());
        let std_dev = match admitted.len() {
            0 => None,
            1 => Some(0.0),
            _ => Some(admitted.iter().std_dev()),
        };
        Self {
            population: scored.len(),
            rejected: scored
                .iter()
                .filter(|s| s.fitness == REJECTED_FITNESS)
                .count(),
            failed: scored.iter().filter(|s| s.evaluation.is_failure()).count(),
            best,
            mean,
            std_dev,
        }
    }
}

/// A scored population, best first.
#[derive(Clone, Debug, Serialize)]
pub struct PopulationReport {
    pub summary: FitnessSummary,
    pub rows: Vec<ReportRow>,
}

impl PopulationReport {
    pub fn new(scored: &[Scored]) -> Self {
        let metrics: Vec<_> = scored.iter().map(|s| s.evaluation.metrics).collect();
        let mut on_front = vec![false; scored.len()];
        for i in pareto_front(&metrics) {
            on_front[i] = true;
        }

        let mut rows: Vec<ReportRow> = scored
            .iter()
            .zip(on_front)
            .map(|(s, is_pareto)| ReportRow {
                model_id: s.hash.to_short(),
                hash: s.hash.to_hex(),
                accuracy: s.evaluation.metrics.accuracy,
                flops: s.evaluation.metrics.flops,
                params: s.evaluation.metrics.params,
                latency: s.evaluation.metrics.latency,
                fitness: s.fitness,
                is_pareto,
                failure: s.evaluation.failure.clone(),
            })
            .collect();
        // NaN sorts last
        let key = |f: f64| if f.is_nan() { f64::NEG_INFINITY } else { f };
        rows.sort_by(|a, b| key(b.fitness).total_cmp(&key(a.fitness)));

        Self {
            summary: FitnessSummary::from_scored(scored),
            rows,
        }
    }

    pub fn pareto_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.is_pareto)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("Model ID,Accuracy,FLOPs,Params,Latency,Fitness,Is Pareto\n");
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                row.model_id,
                row.accuracy,
                row.flops,
                row.params,
                row.latency,
                row.fitness,
                if row.is_pareto { "Yes" } else { "No" }
            ));
        }
        out
    }
}
