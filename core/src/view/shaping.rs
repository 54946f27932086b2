use std::cmp::Ordering;

use crate::format::{format_percent, format_share, format_thousands};
use crate::model::{Coalition, ResultRecord, TurnoutSplit};

/// A single bar (or stack segment) handed to the chart delegate.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub series: String,
    pub value: Option<f64>,
}

impl Bar {
    fn new(series: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            series: series.into(),
            value,
        }
    }

    /// Drawn height; missing and negative values draw as zero.
    pub fn height(&self) -> f64 {
        self.value.unwrap_or(0.0).max(0.0)
    }

    pub fn caption(&self) -> String {
        format_share(self.value)
    }
}

/// Bars sharing an x-axis label: side by side when grouped, piled when stacked.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub label: String,
    pub bars: Vec<Bar>,
}

impl BarGroup {
    pub fn stacked_height(&self) -> f64 {
        self.bars.iter().map(Bar::height).sum()
    }

    pub fn tallest(&self) -> f64 {
        self.bars.iter().map(Bar::height).fold(0.0, f64::max)
    }
}

/// Left, right and other share side by side for every record.
pub fn coalition_groups(records: &[ResultRecord]) -> Vec<BarGroup> {
    records
        .iter()
        .map(|record| BarGroup {
            label: record.name.clone(),
            bars: Coalition::ALL
                .iter()
                .map(|&side| Bar::new(side.label(), record.share(side)))
                .collect(),
        })
        .collect()
}

/// Party sub-shares of one coalition, one stack per record.
pub fn party_stacks(records: &[ResultRecord], coalition: Coalition) -> Vec<BarGroup> {
    records
        .iter()
        .map(|record| BarGroup {
            label: record.name.clone(),
            bars: record
                .parties(coalition)
                .iter()
                .map(|party| Bar::new(party.party.clone(), party.share))
                .collect(),
        })
        .collect()
}

/// Records ordered by descending turnout, leaving `records` untouched.
///
/// The sort is stable and records without a turnout value go last.
pub fn turnout_ranking(records: &[ResultRecord]) -> Vec<&ResultRecord> {
    let mut ranked: Vec<&ResultRecord> = records.iter().collect();
    ranked.sort_by(|a, b| match (a.turnout, b.turnout) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked
}

pub fn turnout_bars(records: &[ResultRecord]) -> Vec<BarGroup> {
    turnout_ranking(records)
        .into_iter()
        .map(|record| BarGroup {
            label: record.name.clone(),
            bars: vec![Bar::new("Affluenza", record.turnout)],
        })
        .collect()
}

/// One wedge of a pie chart; angles are fractions of the full turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub caption: String,
    pub start: f64,
    pub sweep: f64,
}

pub fn turnout_slices(split: &TurnoutSplit) -> Vec<PieSlice> {
    let entries = split.entries();
    let total: f64 = entries.iter().map(|entry| entry.percent.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    entries
        .iter()
        .map(|entry| {
            let sweep = entry.percent.max(0.0) / total;
            let slice = PieSlice {
                label: entry.name.clone(),
                caption: format!(
                    "{} ({})",
                    format_thousands(entry.votes),
                    format_percent(entry.percent)
                ),
                start,
                sweep,
            };
            start += sweep;
            slice
        })
        .collect()
}
