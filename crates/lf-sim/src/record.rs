//! Recorded cascade time series and summary statistics.

use crate::cascade::CascadeSample;
use lf_core::Real;
use serde::{Deserialize, Serialize};

/// Time series of one cascade run.
///
/// `levels[k][i]` and `outflows[k][i]` belong to tank `k` at `t_s[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeRecord {
    pub tank_names: Vec<String>,
    /// Time points (seconds)
    pub t_s: Vec<Real>,
    pub inflow: Vec<Real>,
    pub levels: Vec<Vec<Real>>,
    pub outflows: Vec<Vec<Real>>,
}

impl CascadeRecord {
    pub fn new(tank_names: Vec<String>) -> Self {
        let n = tank_names.len();
        Self {
            tank_names,
            t_s: Vec::new(),
            inflow: Vec::new(),
            levels: vec![Vec::new(); n],
            outflows: vec![Vec::new(); n],
        }
    }

    pub fn push(&mut self, t_s: Real, sample: &CascadeSample) {
        self.t_s.push(t_s);
        self.inflow.push(sample.inflow);
        for (series, level) in self.levels.iter_mut().zip(&sample.levels) {
            series.push(*level);
        }
        for (series, flow) in self.outflows.iter_mut().zip(&sample.outflows) {
            series.push(*flow);
        }
    }

    pub fn len(&self) -> usize {
        self.t_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t_s.is_empty()
    }

    pub fn tank_count(&self) -> usize {
        self.tank_names.len()
    }

    /// CSV with time in hours, the inflow, then level and outflow per tank.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("time_h,inflow");
        for name in &self.tank_names {
            csv.push_str(&format!(",{name}_level,{name}_outflow"));
        }
        csv.push('\n');

        for i in 0..self.len() {
            csv.push_str(&format!("{},{}", self.t_s[i] / 3600.0, self.inflow[i]));
            for (levels, outflows) in self.levels.iter().zip(&self.outflows) {
                csv.push_str(&format!(",{},{}", levels[i], outflows[i]));
            }
            csv.push('\n');
        }
        csv
    }

    /// Statistics for every series. `None` for an empty record.
    pub fn summary(&self) -> Option<CascadeSummary> {
        let inflow = SeriesStats::from_series(&self.inflow)?;
        let tanks = self
            .tank_names
            .iter()
            .zip(self.levels.iter().zip(&self.outflows))
            .map(|(name, (levels, outflows))| {
                Some(TankSummary {
                    name: name.clone(),
                    level: SeriesStats::from_series(levels)?,
                    outflow: SeriesStats::from_series(outflows)?,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(CascadeSummary { inflow, tanks })
    }
}

/// Min, max, mean and peak-to-peak swing of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: Real,
    pub max: Real,
    pub mean: Real,
    pub swing: Real,
}

impl SeriesStats {
    pub fn from_series(values: &[Real]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(Real::INFINITY, Real::min);
        let max = values.iter().copied().fold(Real::NEG_INFINITY, Real::max);
        let mean = values.iter().sum::<Real>() / values.len() as Real;
        Some(Self {
            min,
            max,
            mean,
            swing: max - min,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSummary {
    pub name: String,
    pub level: SeriesStats,
    pub outflow: SeriesStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub inflow: SeriesStats,
    pub tanks: Vec<TankSummary>,
}
