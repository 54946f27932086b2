use clap::Parser;
use iced::{
    widget::{button, canvas::Canvas, column, row, scrollable, text, Column, Container, Row},
    Alignment, Element, Length, Task, Theme,
};
use source::{Source, DEFAULT_BASE_URL};
use std::sync::Arc;
use votecore::dashboard::{Dashboard, Event, Panel, Screen};
use votecore::view::{Tab, View};
use votecore::DataSource;

mod charts;
mod map;
mod source;

use charts::{legend, pie_captions, totals_table, BarChart, PieChart};
use map::ChoroplethMap;

const NO_DATA: &str = "Nessun dato disponibile per questa sezione";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Election results dashboard")]
struct Args {
    /// Publisher serving the boundary and results documents
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Use the embedded sample documents instead of a publisher
    #[arg(long, default_value_t = false)]
    offline: bool,
}

fn main() -> iced::Result {
    env_logger::init();
    let args = Args::parse();

    iced::application(move || App::boot(&args), App::update, App::view)
        .title(application_title)
        .theme(application_theme)
        .run()
}

fn application_title(_: &App) -> String {
    "Dashboard Elettorale".into()
}

fn application_theme(_: &App) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct App {
    dashboard: Dashboard,
    source: String,
}

impl App {
    fn boot(args: &Args) -> (Self, Task<Event>) {
        let source = Arc::new(Source::new(&args.base_url, args.offline));
        log::info!("loading documents from {}", source.describe());

        let municipalities = {
            let source = source.clone();
            Task::perform(
                async move { source.municipality_boundaries().await },
                Event::MunicipalityBoundariesLoaded,
            )
        };
        let urban_units = {
            let source = source.clone();
            Task::perform(
                async move { source.urban_unit_boundaries().await },
                Event::UrbanUnitBoundariesLoaded,
            )
        };
        let results = {
            let source = source.clone();
            Task::perform(async move { source.results().await }, Event::ResultsLoaded)
        };

        (
            App {
                dashboard: Dashboard::new(),
                source: source.describe(),
            },
            Task::batch([municipalities, urban_units, results]),
        )
    }

    fn update(state: &mut Self, event: Event) -> Task<Event> {
        state.dashboard.update(event);
        Task::none()
    }

    fn view(state: &Self) -> Element<'_, Event> {
        let screen = state.dashboard.render();

        let header = row![
            text("Dashboard Elettorale").size(28),
            text(format!("{} | {}", screen.status, state.source)).size(14),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let layout = column![
            header,
            view_toggle(&screen),
            tab_strip(&screen),
            scrollable(panels(screen)).height(Length::Fill),
        ]
        .spacing(14)
        .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn selector<'a>(label: &'a str, active: bool, event: Event) -> Element<'a, Event> {
    button(text(label).size(14))
        .style(if active {
            button::primary
        } else {
            button::secondary
        })
        .on_press(event)
        .padding(8)
        .into()
}

fn view_toggle<'a>(screen: &Screen<'_>) -> Element<'a, Event> {
    View::ALL
        .iter()
        .fold(Row::new().spacing(8), |row, &view| {
            let active = screen.view == view;
            row.push(selector(view.label(), active, Event::SelectView(view)))
        })
        .into()
}

fn tab_strip<'a>(screen: &Screen<'_>) -> Element<'a, Event> {
    Tab::ALL
        .iter()
        .fold(Row::new().spacing(4), |row, &tab| {
            let active = screen.tab == tab;
            row.push(selector(tab.label(), active, Event::SelectTab(tab)))
        })
        .into()
}

fn panels(screen: Screen<'_>) -> Element<'_, Event> {
    if screen.panels.is_empty() {
        return text(NO_DATA).size(16).into();
    }
    screen
        .panels
        .into_iter()
        .map(panel_view)
        .fold(Column::new().spacing(24), |col, panel| col.push(panel))
        .into()
}

fn panel_view(panel: Panel<'_>) -> Element<'_, Event> {
    let title = text(panel.title().to_string()).size(20);
    let body: Element<'_, Event> = match panel {
        Panel::Placeholder { message, .. } => text(message).size(14).into(),
        Panel::Choropleth {
            boundary, records, ..
        } => Canvas::new(ChoroplethMap::new(boundary, records))
            .width(Length::Fill)
            .height(Length::Fixed(420.0))
            .into(),
        Panel::GroupedBars { groups, .. } => bar_chart(BarChart::grouped(groups)),
        Panel::StackedBars {
            coalition, groups, ..
        } => bar_chart(BarChart::stacked(coalition, groups)),
        Panel::Totals { totals, .. } => totals_table(totals),
        Panel::Pie { slices, .. } => row![
            Canvas::new(PieChart::new(slices.clone()))
                .width(Length::Fixed(260.0))
                .height(Length::Fixed(260.0)),
            pie_captions(&slices),
        ]
        .spacing(24)
        .align_y(Alignment::Center)
        .into(),
    };
    column![title, body].spacing(8).into()
}

fn bar_chart<'a>(chart: BarChart) -> Element<'a, Event> {
    let key = legend(chart.series());
    column![
        Canvas::new(chart)
            .width(Length::Fill)
            .height(Length::Fixed(280.0)),
        key,
    ]
    .spacing(6)
    .into()
}
