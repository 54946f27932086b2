use iced::{
    mouse,
    widget::{
        canvas::{self, path::Arc, Frame, Geometry, Path, Stroke},
        row, text, Column, Row,
    },
    Color, Element, Length, Pixels, Point, Radians, Rectangle, Renderer, Size, Theme,
};
use std::f32::consts::PI;
use votecore::format::{format_percent, format_thousands};
use votecore::model::{Coalition, CoalitionTotal};
use votecore::view::shading::{coalition_color, party_color, OTHER};
use votecore::view::{BarGroup, PieSlice, Rgb};

const TURNOUT: Rgb = Rgb::new(0.18, 0.72, 0.89);
const AXIS_WIDTH: f32 = 36.0;
const LABEL_HEIGHT: f32 = 40.0;
const LABEL_CHARS: usize = 12;
const NAME_COLUMN: Length = Length::Fixed(180.0);
const VOTES_COLUMN: Length = Length::Fixed(120.0);

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Distinct series names in first-seen order.
pub fn series_names(groups: &[BarGroup]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for bar in groups.iter().flat_map(|group| &group.bars) {
        if !names.contains(&bar.series) {
            names.push(bar.series.clone());
        }
    }
    names
}

/// Top of the value axis: the largest bar rounded up to the next ten.
pub fn axis_max(groups: &[BarGroup], stacked: bool) -> f64 {
    let largest = groups
        .iter()
        .map(|group| {
            if stacked {
                group.stacked_height()
            } else {
                group.tallest()
            }
        })
        .fold(0.0, f64::max);
    ((largest / 10.0).ceil() * 10.0).max(10.0)
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(LABEL_CHARS - 1).collect();
        format!("{head}…")
    }
}

#[derive(Debug, Clone)]
pub struct BarChart {
    groups: Vec<BarGroup>,
    series: Vec<(String, Rgb)>,
    stacked: bool,
}

impl BarChart {
    /// Side-by-side bars; coalition series keep their coalition colour.
    pub fn grouped(groups: Vec<BarGroup>) -> Self {
        let series = series_names(&groups)
            .into_iter()
            .map(|name| {
                let rgb = Coalition::ALL
                    .iter()
                    .find(|coalition| coalition.label() == name)
                    .map(|&coalition| coalition_color(coalition))
                    .unwrap_or(TURNOUT);
                (name, rgb)
            })
            .collect();
        Self {
            groups,
            series,
            stacked: false,
        }
    }

    pub fn stacked(coalition: Coalition, groups: Vec<BarGroup>) -> Self {
        let series = series_names(&groups)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name, party_color(coalition, idx)))
            .collect();
        Self {
            groups,
            series,
            stacked: true,
        }
    }

    pub fn series(&self) -> &[(String, Rgb)] {
        &self.series
    }

    fn color_of(&self, series: &str) -> Color {
        self.series
            .iter()
            .find(|(name, _)| name == series)
            .map(|&(_, rgb)| to_color(rgb))
            .unwrap_or(to_color(OTHER))
    }
}

impl<Message> canvas::Program<Message> for BarChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let plot = Rectangle {
            x: AXIS_WIDTH,
            y: 8.0,
            width: (bounds.width - AXIS_WIDTH - 8.0).max(1.0),
            height: (bounds.height - LABEL_HEIGHT - 8.0).max(1.0),
        };
        let max = axis_max(&self.groups, self.stacked);
        let y_of = |value: f64| plot.y + plot.height - (value / max) as f32 * plot.height;

        for step in 0..=4 {
            let value = max * step as f64 / 4.0;
            let y = y_of(value);
            let grid = Path::line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y));
            frame.stroke(
                &grid,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(Color::from_rgb(0.22, 0.22, 0.26)),
            );
            frame.fill_text(canvas::Text {
                content: format!("{value:.0}"),
                position: Point::new(4.0, y - 6.0),
                color: Color::from_rgb(0.7, 0.7, 0.7),
                size: Pixels(10.0),
                ..canvas::Text::default()
            });
        }

        if self.groups.is_empty() {
            return vec![frame.into_geometry()];
        }

        let slot = plot.width / self.groups.len() as f32;
        for (idx, group) in self.groups.iter().enumerate() {
            let slot_x = plot.x + idx as f32 * slot;
            let inner = slot * 0.8;
            let left = slot_x + (slot - inner) / 2.0;

            if self.stacked {
                let mut base = 0.0;
                for bar in &group.bars {
                    let top = base + bar.height();
                    let (y_top, y_base) = (y_of(top), y_of(base));
                    frame.fill_rectangle(
                        Point::new(left, y_top),
                        Size::new(inner, y_base - y_top),
                        self.color_of(&bar.series),
                    );
                    base = top;
                }
            } else if !group.bars.is_empty() {
                let width = inner / group.bars.len() as f32;
                for (bar_idx, bar) in group.bars.iter().enumerate() {
                    let y_top = y_of(bar.height());
                    frame.fill_rectangle(
                        Point::new(left + bar_idx as f32 * width, y_top),
                        Size::new(width, plot.y + plot.height - y_top),
                        self.color_of(&bar.series),
                    );
                }
            }

            frame.fill_text(canvas::Text {
                content: short_label(&group.label),
                position: Point::new(slot_x, plot.y + plot.height + 6.0),
                color: Color::from_rgb(0.8, 0.8, 0.8),
                size: Pixels(10.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

pub fn slice_color(idx: usize) -> Rgb {
    match idx {
        0 => TURNOUT,
        _ => OTHER,
    }
}

#[derive(Debug, Clone)]
pub struct PieChart {
    slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn new(slices: Vec<PieSlice>) -> Self {
        Self { slices }
    }
}

impl<Message> canvas::Program<Message> for PieChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let radius = (bounds.width.min(bounds.height) / 2.0 - 12.0).max(1.0);

        for (idx, slice) in self.slices.iter().enumerate() {
            // Fractions of a turn, starting at twelve o'clock.
            let start = -PI / 2.0 + slice.start as f32 * 2.0 * PI;
            let end = start + slice.sweep as f32 * 2.0 * PI;
            let wedge = Path::new(|builder| {
                builder.move_to(center);
                builder.arc(Arc {
                    center,
                    radius,
                    start_angle: Radians(start),
                    end_angle: Radians(end),
                });
                builder.close();
            });
            frame.fill(&wedge, to_color(slice_color(idx)));
            frame.stroke(
                &wedge,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb(0.05, 0.05, 0.05)),
            );
        }

        vec![frame.into_geometry()]
    }
}

/// Colour swatches with their series names.
pub fn legend<'a, Message: 'a>(series: &[(String, Rgb)]) -> Element<'a, Message> {
    series
        .iter()
        .fold(Row::new().spacing(14), |row, (name, rgb)| {
            row.push(text(format!("■ {name}")).size(12).color(to_color(*rgb)))
        })
        .into()
}

pub fn pie_captions<'a, Message: 'a>(slices: &[PieSlice]) -> Element<'a, Message> {
    slices
        .iter()
        .enumerate()
        .fold(Column::new().spacing(4), |col, (idx, slice)| {
            col.push(
                row![
                    text(format!("■ {}", slice.label))
                        .size(14)
                        .color(to_color(slice_color(idx))),
                    text(slice.caption.clone()).size(14),
                ]
                .spacing(10),
            )
        })
        .into()
}

/// Vote and percentage table for the coalition totals.
pub fn totals_table<'a, Message: 'a>(totals: &[CoalitionTotal]) -> Element<'a, Message> {
    totals
        .iter()
        .fold(Column::new().spacing(6), |col, total| {
            let rgb = Coalition::ALL
                .iter()
                .find(|coalition| coalition.label() == total.name)
                .map(|&coalition| coalition_color(coalition))
                .unwrap_or(OTHER);
            let name = text(total.name.clone()).size(16).color(to_color(rgb));
            let votes = text(format_thousands(total.votes)).size(16);
            col.push(
                row![
                    name.width(NAME_COLUMN),
                    votes.width(VOTES_COLUMN),
                    text(format_percent(total.percent)).size(16),
                ]
                .spacing(12),
            )
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use votecore::model::{Level, PartyShare, ResultRecord};
    use votecore::view::{coalition_groups, party_stacks};

    fn records() -> Vec<ResultRecord> {
        let mut molo = ResultRecord::new("Molo", Level::UrbanUnit).with_shares(61.0, 33.0, 6.0);
        molo.left_parties = vec![PartyShare::new("PD", 40.0), PartyShare::new("AVS", 21.0)];
        let mut albaro = ResultRecord::new("Albaro", Level::UrbanUnit).with_shares(38.0, 57.0, 5.0);
        albaro.left_parties = vec![PartyShare::new("PD", 25.0), PartyShare::new("M5S", 13.0)];
        vec![molo, albaro]
    }

    #[test]
    fn series_are_listed_once_in_order() {
        let groups = party_stacks(&records(), Coalition::Left);
        assert_eq!(series_names(&groups), vec!["PD", "AVS", "M5S"]);
    }

    #[test]
    fn axis_rounds_up_to_next_ten() {
        let groups = coalition_groups(&records());
        assert_eq!(axis_max(&groups, false), 70.0);
        let stacks = party_stacks(&records(), Coalition::Left);
        assert_eq!(axis_max(&stacks, true), 70.0);
        assert_eq!(axis_max(&[], false), 10.0);
    }

    #[test]
    fn grouped_chart_uses_coalition_colours() {
        let chart = BarChart::grouped(coalition_groups(&records()));
        let series = chart.series();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].0, "Centrosinistra");
        assert_eq!(series[0].1, coalition_color(Coalition::Left));
        assert_eq!(series[1].1, coalition_color(Coalition::Right));
    }

    #[test]
    fn stacked_chart_shades_parties_of_one_coalition() {
        let chart = BarChart::stacked(Coalition::Left, party_stacks(&records(), Coalition::Left));
        let colours: Vec<Rgb> = chart.series().iter().map(|(_, rgb)| *rgb).collect();
        assert_eq!(colours[0], party_color(Coalition::Left, 0));
        assert_ne!(colours[1], colours[2]);
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(short_label("Molo"), "Molo");
        assert_eq!(short_label("III Bassa Val Bisagno"), "III Bassa V…");
    }
}
