use serde::{Deserialize, Serialize};

use crate::model::{Level, ResultRecord, ResultsTable};

/// Which results collection drives the charts and the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Municipality,
    UrbanUnit,
}

impl View {
    pub const ALL: [View; 2] = [View::Municipality, View::UrbanUnit];

    pub fn label(self) -> &'static str {
        match self {
            View::Municipality => "Municipi",
            View::UrbanUnit => "Unità urbanistiche",
        }
    }

    pub fn level(self) -> Level {
        match self {
            View::Municipality => Level::Municipality,
            View::UrbanUnit => Level::UrbanUnit,
        }
    }
}

/// Result category shown in the tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Map,
    Coalitions,
    LeftBreakdown,
    RightBreakdown,
    Turnout,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Map,
        Tab::Coalitions,
        Tab::LeftBreakdown,
        Tab::RightBreakdown,
        Tab::Turnout,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Map => "Mappa",
            Tab::Coalitions => "Coalizioni",
            Tab::LeftBreakdown => "Centrosinistra",
            Tab::RightBreakdown => "Centrodestra",
            Tab::Turnout => "Affluenza",
        }
    }
}

/// UI selection owned by the dashboard for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub selected_view: View,
    pub selected_tab: Tab,
}

impl ViewState {
    pub fn set_view(&mut self, view: View) {
        self.selected_view = view;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.selected_tab = tab;
    }

    /// Records for the selected view. Recomputed on every call.
    pub fn active_dataset<'a>(&self, table: &'a ResultsTable) -> &'a [ResultRecord] {
        table.records(self.selected_view.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultsTable {
        ResultsTable {
            municipalities: vec![ResultRecord::new("I Centro Est", Level::Municipality)],
            urban_units: vec![
                ResultRecord::new("Molo", Level::UrbanUnit),
                ResultRecord::new("Prè", Level::UrbanUnit),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn active_dataset_follows_selected_view() {
        let table = table();
        let mut state = ViewState::default();
        assert_eq!(state.active_dataset(&table).len(), 1);
        state.set_view(View::UrbanUnit);
        assert_eq!(state.active_dataset(&table)[1].name, "Prè");
    }

    #[test]
    fn toggling_view_back_restores_municipality_dataset() {
        let table = table();
        let mut state = ViewState::default();
        let original = state.active_dataset(&table);

        state.set_view(View::UrbanUnit);
        state.set_view(View::Municipality);

        let restored = state.active_dataset(&table);
        assert!(std::ptr::eq(original, restored));
        assert_eq!(original, restored);
    }

    #[test]
    fn tab_change_keeps_view() {
        let mut state = ViewState::default();
        state.set_view(View::UrbanUnit);
        state.set_tab(Tab::Turnout);
        assert_eq!(state.selected_view, View::UrbanUnit);
        assert_eq!(state.selected_tab, Tab::Turnout);
    }
}
