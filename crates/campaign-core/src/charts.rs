//! Simulated performance charts.
//!
//! The series are cosmetic projections drawn from a PRNG seeded by budget and
//! duration. They are not extracted from the model's text, so two views of
//! the same campaign always show the same curves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::campaign::{CampaignDuration, Goal};
use crate::error::{CampaignError, CampaignResult};
use crate::prompt::{PRIMARY_COLOR, SECONDARY_COLOR};

/// Number of simulated months.
pub const MONTHS: usize = 6;

const CONVERSIONS_COLOR: &str = "#7C3AED";
const CHART_HEIGHT: u32 = 350;

/// Inclusive month window, 1-based, within `1..=MONTHS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    start: usize,
    end: usize,
}

impl MonthRange {
    pub fn new(start: usize, end: usize) -> CampaignResult<Self> {
        if start == 0 || end > MONTHS || start > end {
            return Err(CampaignError::validation(format!(
                "Plage de mois invalide: {}..{} (1..{})",
                start, end, MONTHS
            )));
        }
        Ok(Self { start, end })
    }

    pub fn full() -> Self {
        Self { start: 1, end: MONTHS }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    fn slice<'a, T>(&self, values: &'a [T]) -> &'a [T] {
        &values[self.start - 1..self.end]
    }
}

impl Default for MonthRange {
    fn default() -> Self {
        Self::full()
    }
}

/// Raw simulated series, one value per month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedSeries {
    pub labels: Vec<String>,
    pub roi: Vec<f64>,
    pub cpa: Vec<f64>,
    pub conversions: Vec<u64>,
}

impl SimulatedSeries {
    /// Simulate six months for a campaign.
    pub fn simulate(budget: u32, duration: CampaignDuration) -> Self {
        let mut rng = StdRng::seed_from_u64(seed(budget, duration));
        let budget = f64::from(budget);
        let days = f64::from(duration.days());

        let roi_base = rng.gen_range(5.0..15.0) + budget / 10_000.0;
        let roi = (0..MONTHS)
            .map(|_| roi_base * (1.0 + rng.gen_range(-0.1..0.2)))
            .collect();

        let cpa_base = rng.gen_range(5.0..20.0) - days / 30.0;
        let cpa = (0..MONTHS)
            .map(|_| cpa_base * (1.0 + rng.gen_range(-0.15..0.15)))
            .collect();

        let conversions = (0..MONTHS)
            .map(|i| {
                let growth = 1.0 + i as f64 / 10.0;
                (budget / rng.gen_range(10.0..50.0) * growth) as u64
            })
            .collect();

        Self {
            labels: (1..=MONTHS).map(month_label).collect(),
            roi,
            cpa,
            conversions,
        }
    }

    /// Keep only the months inside `range`.
    pub fn restrict(&self, range: MonthRange) -> Self {
        Self {
            labels: range.slice(&self.labels).to_vec(),
            roi: range.slice(&self.roi).to_vec(),
            cpa: range.slice(&self.cpa).to_vec(),
            conversions: range.slice(&self.conversions).to_vec(),
        }
    }
}

fn seed(budget: u32, duration: CampaignDuration) -> u64 {
    (u64::from(budget) << 32) | u64::from(duration.days())
}

fn month_label(month: usize) -> String {
    format!("Mois {}", month)
}

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    LineWithLabels,
}

/// A chart ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub kind: ChartKind,
    pub title: String,
    pub series_name: String,
    pub x_title: String,
    pub y_title: String,
    pub color: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    /// Plotly `{data, layout}` figure.
    pub fn to_plotly(&self) -> serde_json::Value {
        let trace = match self.kind {
            ChartKind::Line => json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": self.series_name,
                "x": self.labels,
                "y": self.values,
                "line": { "color": self.color, "width": 3 },
                "marker": { "size": 8 },
            }),
            ChartKind::Bar => json!({
                "type": "bar",
                "name": self.series_name,
                "x": self.labels,
                "y": self.values,
                "marker": { "color": self.color },
            }),
            ChartKind::LineWithLabels => json!({
                "type": "scatter",
                "mode": "lines+markers+text",
                "name": self.series_name,
                "x": self.labels,
                "y": self.values,
                "text": self.values,
                "textposition": "top center",
                "line": { "color": self.color, "width": 3 },
                "marker": { "size": 10 },
            }),
        };

        json!({
            "data": [trace],
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_title } },
                "yaxis": { "title": { "text": self.y_title } },
                "height": CHART_HEIGHT,
                "template": "plotly_white",
                "margin": { "l": 40, "r": 20, "t": 50, "b": 40 },
            },
        })
    }
}

/// The three charts shown under an analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub roi: ChartSpec,
    pub cpa: ChartSpec,
    pub conversions: ChartSpec,
}

impl ChartSet {
    pub fn iter(&self) -> impl Iterator<Item = &ChartSpec> {
        [&self.roi, &self.cpa, &self.conversions].into_iter()
    }
}

/// Build the ROI, CPA and conversion charts, optionally limited to a month window.
pub fn generate_charts(
    budget: u32,
    duration: CampaignDuration,
    goal: Goal,
    months: Option<MonthRange>,
) -> ChartSet {
    let mut series = SimulatedSeries::simulate(budget, duration);
    if let Some(range) = months {
        series = series.restrict(range);
    }

    ChartSet {
        roi: ChartSpec {
            id: "chart-roi",
            kind: ChartKind::Line,
            title: "ROI Prédictif par Mois".to_string(),
            series_name: "ROI (%)".to_string(),
            x_title: "Mois".to_string(),
            y_title: "ROI (%)".to_string(),
            color: PRIMARY_COLOR,
            labels: series.labels.clone(),
            values: series.roi.clone(),
        },
        cpa: ChartSpec {
            id: "chart-cpa",
            kind: ChartKind::Bar,
            title: "Coût par Acquisition (CPA)".to_string(),
            series_name: "CPA (EUR)".to_string(),
            x_title: "Mois".to_string(),
            y_title: "CPA (EUR)".to_string(),
            color: SECONDARY_COLOR,
            labels: series.labels.clone(),
            values: series.cpa.clone(),
        },
        conversions: ChartSpec {
            id: "chart-conversions",
            kind: ChartKind::LineWithLabels,
            title: format!("Projection de Conversions ({})", goal.label()),
            series_name: "Conversions".to_string(),
            x_title: "Mois".to_string(),
            y_title: "Nombre".to_string(),
            color: CONVERSIONS_COLOR,
            labels: series.labels,
            values: series.conversions.iter().map(|&c| c as f64).collect(),
        },
    }
}
