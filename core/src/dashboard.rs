//! Session state behind the dashboard window.
//!
//! `Dashboard` owns every loaded document and the view selection. UI events
//! go through [`Dashboard::update`]; [`Dashboard::render`] is a pure function
//! of the state that describes which panels to draw. The drawing itself is
//! left to the presentation layer.

use crate::loader::outcome::{log_boundary, log_results};
use crate::loader::LoadOutcome;
use crate::model::{Coalition, CoalitionTotal, GeoBoundary, ResultRecord, ResultsTable};
use crate::prelude::{LoadResult, SourceKind};
use crate::telemetry::{LoadMetrics, LogManager};
use crate::view::{
    coalition_groups, party_stacks, turnout_bars, turnout_slices, BarGroup, PieSlice, Tab, View,
    ViewState,
};

/// Lifecycle of one independently loaded document.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Loading,
    Ready(T),
    Unavailable(String),
}

impl<T> Section<T> {
    fn from_result(result: LoadResult<T>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(err) => Section::Unavailable(err.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    MunicipalityBoundariesLoaded(LoadResult<GeoBoundary>),
    UrbanUnitBoundariesLoaded(LoadResult<GeoBoundary>),
    ResultsLoaded(LoadResult<ResultsTable>),
    SelectView(View),
    SelectTab(Tab),
}

/// What the presentation layer draws, top to bottom.
#[derive(Debug, Clone)]
pub struct Screen<'a> {
    pub view: View,
    pub tab: Tab,
    pub status: String,
    pub panels: Vec<Panel<'a>>,
}

#[derive(Debug, Clone)]
pub enum Panel<'a> {
    Placeholder {
        title: String,
        message: String,
    },
    Choropleth {
        title: String,
        boundary: &'a GeoBoundary,
        records: &'a [ResultRecord],
    },
    GroupedBars {
        title: String,
        groups: Vec<BarGroup>,
    },
    StackedBars {
        title: String,
        coalition: Coalition,
        groups: Vec<BarGroup>,
    },
    Totals {
        title: String,
        totals: &'a [CoalitionTotal],
    },
    Pie {
        title: String,
        slices: Vec<PieSlice>,
    },
}

impl Panel<'_> {
    pub fn title(&self) -> &str {
        match self {
            Panel::Placeholder { title, .. }
            | Panel::Choropleth { title, .. }
            | Panel::GroupedBars { title, .. }
            | Panel::StackedBars { title, .. }
            | Panel::Totals { title, .. }
            | Panel::Pie { title, .. } => title,
        }
    }
}

const LOADING: &str = "Caricamento...";

#[derive(Debug)]
pub struct Dashboard {
    municipality_boundaries: Section<GeoBoundary>,
    urban_unit_boundaries: Section<GeoBoundary>,
    results: Section<ResultsTable>,
    view: ViewState,
    metrics: LoadMetrics,
    logger: LogManager,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            municipality_boundaries: Section::Loading,
            urban_unit_boundaries: Section::Loading,
            results: Section::Loading,
            view: ViewState::default(),
            metrics: LoadMetrics::new(),
            logger: LogManager::with_target("dashboard"),
        }
    }

    pub fn update(&mut self, event: Event) {
        match event {
            Event::MunicipalityBoundariesLoaded(result) => {
                let kind = SourceKind::MunicipalityBoundaries;
                log_boundary(&self.logger, kind, &result);
                self.track(kind, result.is_ok());
                self.municipality_boundaries = Section::from_result(result);
            }
            Event::UrbanUnitBoundariesLoaded(result) => {
                let kind = SourceKind::UrbanUnitBoundaries;
                log_boundary(&self.logger, kind, &result);
                self.track(kind, result.is_ok());
                self.urban_unit_boundaries = Section::from_result(result);
            }
            Event::ResultsLoaded(result) => {
                log_results(&self.logger, &result);
                self.track(SourceKind::Results, result.is_ok());
                self.results = Section::from_result(result);
            }
            Event::SelectView(view) => self.view.set_view(view),
            Event::SelectTab(tab) => self.view.set_tab(tab),
        }
    }

    /// Feeds a completed [`LoadOutcome`] through the same events as separate loads.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let LoadOutcome {
            municipality_boundaries: municipalities,
            urban_unit_boundaries: urban_units,
            results,
        } = outcome;
        self.update(Event::MunicipalityBoundariesLoaded(municipalities));
        self.update(Event::UrbanUnitBoundariesLoaded(urban_units));
        self.update(Event::ResultsLoaded(results));
    }

    fn track(&self, kind: SourceKind, loaded: bool) {
        if loaded {
            self.metrics.record_loaded(kind);
        } else {
            self.metrics.record_failed(kind);
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn results(&self) -> Option<&ResultsTable> {
        self.results.ready()
    }

    pub fn section(&self, kind: SourceKind) -> SectionStatus {
        match kind {
            SourceKind::MunicipalityBoundaries => status_of(&self.municipality_boundaries),
            SourceKind::UrbanUnitBoundaries => status_of(&self.urban_unit_boundaries),
            SourceKind::Results => status_of(&self.results),
        }
    }

    /// Records behind the current view, empty until results arrive.
    pub fn active_dataset(&self) -> &[ResultRecord] {
        match self.results.ready() {
            Some(table) => self.view.active_dataset(table),
            None => &[],
        }
    }

    pub fn status(&self) -> String {
        let (loaded, failed) = self.metrics.snapshot();
        let pending = SourceKind::ALL.len().saturating_sub(loaded + failed);
        if pending > 0 {
            return format!("{LOADING} ({loaded}/{} fonti)", SourceKind::ALL.len());
        }
        if failed == 0 {
            return format!("{loaded} fonti caricate");
        }
        let missing: Vec<&str> = self
            .metrics
            .failed_sources()
            .into_iter()
            .map(SourceKind::label)
            .collect();
        format!(
            "{loaded} fonti caricate, non disponibili: {}",
            missing.join(", ")
        )
    }

    pub fn render(&self) -> Screen<'_> {
        let view = self.view.selected_view;
        let tab = self.view.selected_tab;
        let label = view.label();
        let mut panels = Vec::new();

        match tab {
            Tab::Map => {
                let title = format!("Grafico {label}");
                panels.extend(self.map_panel(view));
                panels.extend(self.grouped_panel(title, coalition_groups));
            }
            Tab::Coalitions => {
                let title = format!("Coalizioni per {label}");
                panels.extend(self.totals_panel());
                panels.extend(self.grouped_panel(title, coalition_groups));
            }
            Tab::LeftBreakdown => panels.extend(self.breakdown_panel(Coalition::Left, view)),
            Tab::RightBreakdown => panels.extend(self.breakdown_panel(Coalition::Right, view)),
            Tab::Turnout => {
                let title = format!("Affluenza per {label}");
                panels.extend(self.pie_panel());
                panels.extend(self.grouped_panel(title, turnout_bars));
            }
        }

        Screen {
            view,
            tab,
            status: self.status(),
            panels,
        }
    }

    fn map_panel(&self, view: View) -> Option<Panel<'_>> {
        let title = format!("Mappa {}", view.label());
        let section = match view {
            View::Municipality => &self.municipality_boundaries,
            View::UrbanUnit => &self.urban_unit_boundaries,
        };
        match section {
            Section::Loading => Some(Panel::Placeholder {
                title,
                message: LOADING.into(),
            }),
            // The map still draws before results arrive, unshaded.
            Section::Ready(boundary) => Some(Panel::Choropleth {
                title,
                boundary,
                records: self.active_dataset(),
            }),
            Section::Unavailable(_) => None,
        }
    }

    fn grouped_panel(
        &self,
        title: String,
        shape: fn(&[ResultRecord]) -> Vec<BarGroup>,
    ) -> Option<Panel<'_>> {
        self.results_panel(title, |_, title| {
            Some(Panel::GroupedBars {
                title,
                groups: shape(self.active_dataset()),
            })
        })
    }

    fn totals_panel(&self) -> Option<Panel<'_>> {
        self.results_panel("Totali coalizioni".into(), |table, title| {
            (!table.coalitions.is_empty()).then(|| Panel::Totals {
                title,
                totals: &table.coalitions,
            })
        })
    }

    fn pie_panel(&self) -> Option<Panel<'_>> {
        self.results_panel("Affluenza complessiva".into(), |table, title| {
            let slices = table.turnout.as_ref().map(turnout_slices)?;
            (!slices.is_empty()).then(|| Panel::Pie { title, slices })
        })
    }

    fn breakdown_panel(&self, coalition: Coalition, view: View) -> Option<Panel<'_>> {
        let title = format!("{} per {}", coalition.label(), view.label());
        self.results_panel(title, |_, title| {
            Some(Panel::StackedBars {
                title,
                coalition,
                groups: party_stacks(self.active_dataset(), coalition),
            })
        })
    }

    /// Placeholder while loading, nothing when the results failed.
    fn results_panel<'a>(
        &'a self,
        title: String,
        build: impl FnOnce(&'a ResultsTable, String) -> Option<Panel<'a>>,
    ) -> Option<Panel<'a>> {
        match &self.results {
            Section::Loading => Some(Panel::Placeholder {
                title,
                message: LOADING.into(),
            }),
            Section::Ready(table) => build(table, title),
            Section::Unavailable(_) => None,
        }
    }
}

/// Load state of a section without its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Loading,
    Ready,
    Unavailable(String),
}

fn status_of<T>(section: &Section<T>) -> SectionStatus {
    match section {
        Section::Loading => SectionStatus::Loading,
        Section::Ready(_) => SectionStatus::Ready,
        Section::Unavailable(reason) => SectionStatus::Unavailable(reason.clone()),
    }
}
