use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Size, Theme,
};
use serde_json::Value;
use votecore::model::{GeoBoundary, ResultRecord};
use votecore::view::shading::{legend, NO_DATA};
use votecore::view::{shade_for_margin, Rgb};

use crate::charts::to_color;

/// Property keys tried, in order, to name a feature.
const NAME_KEYS: [&str; 3] = ["name", "Municipio", "UU"];
const PADDING: f32 = 12.0;
const LEGEND_HEIGHT: f32 = 28.0;

type Ring = Vec<(f64, f64)>;

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub rings: Vec<Ring>,
    pub fill: Rgb,
}

/// Name of a GeoJSON feature, whatever key the source file uses.
pub fn feature_name(feature: &Value) -> Option<String> {
    let properties = feature.get("properties")?;
    NAME_KEYS.iter().find_map(|key| match properties.get(key)? {
        Value::String(name) => Some(name.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn ring(value: &Value) -> Option<Ring> {
    value
        .as_array()?
        .iter()
        .map(|position| {
            let position = position.as_array()?;
            Some((position.first()?.as_f64()?, position.get(1)?.as_f64()?))
        })
        .collect()
}

fn polygon(value: &Value) -> Vec<Ring> {
    value
        .as_array()
        .map(|rings| rings.iter().filter_map(ring).collect())
        .unwrap_or_default()
}

/// Outer and inner rings of a Polygon or MultiPolygon geometry.
pub fn geometry_rings(geometry: &Value) -> Vec<Ring> {
    let coordinates = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("Polygon") => polygon(coordinates),
        Some("MultiPolygon") => coordinates
            .as_array()
            .map(|polygons| polygons.iter().flat_map(polygon).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn find_record<'a>(records: &'a [ResultRecord], name: &str) -> Option<&'a ResultRecord> {
    records
        .iter()
        .find(|record| record.name == name)
        .or_else(|| {
            records
                .iter()
                .find(|record| record.name.to_lowercase() == name.to_lowercase())
        })
}

/// Joins each feature with its record by name and picks its fill.
pub fn regions(boundary: &GeoBoundary, records: &[ResultRecord]) -> Vec<Region> {
    let Some(features) = boundary.as_value()["features"].as_array() else {
        return Vec::new();
    };
    features
        .iter()
        .filter_map(|feature| {
            let rings = geometry_rings(&feature["geometry"]);
            if rings.is_empty() {
                return None;
            }
            let name = feature_name(feature).unwrap_or_default();
            let fill = find_record(records, &name)
                .map(|record| shade_for_margin(record.margin()))
                .unwrap_or(NO_DATA);
            Some(Region { name, rings, fill })
        })
        .collect()
}

/// Equirectangular fit of a lon/lat bounding box into a canvas area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min_x: f64,
    max_y: f64,
    scale: f64,
    offset: (f32, f32),
}

impl Projection {
    pub fn fit(regions: &[Region], area: Size) -> Option<Self> {
        let mut points = regions
            .iter()
            .flat_map(|region| region.rings.iter().flatten());
        let &(x0, y0) = points.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let scale = (area.width as f64 / span_x).min(area.height as f64 / span_y);
        let offset = (
            ((area.width as f64 - span_x * scale) / 2.0) as f32,
            ((area.height as f64 - span_y * scale) / 2.0) as f32,
        );
        Some(Self {
            min_x,
            max_y,
            scale,
            offset,
        })
    }

    pub fn project(&self, (x, y): (f64, f64)) -> Point {
        Point::new(
            self.offset.0 + ((x - self.min_x) * self.scale) as f32,
            self.offset.1 + ((self.max_y - y) * self.scale) as f32,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ChoroplethMap {
    regions: Vec<Region>,
}

impl ChoroplethMap {
    pub fn new(boundary: &GeoBoundary, records: &[ResultRecord]) -> Self {
        Self {
            regions: regions(boundary, records),
        }
    }
}

impl<Message> canvas::Program<Message> for ChoroplethMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.07),
        );

        let area = Size::new(
            (bounds.width - 2.0 * PADDING).max(1.0),
            (bounds.height - 2.0 * PADDING - LEGEND_HEIGHT).max(1.0),
        );
        let Some(projection) = Projection::fit(&self.regions, area) else {
            return vec![frame.into_geometry()];
        };
        let shift = |point: Point| Point::new(point.x + PADDING, point.y + PADDING);

        let mut hovered = None;
        for region in &self.regions {
            let path = Path::new(|builder| {
                for ring in &region.rings {
                    for (idx, &position) in ring.iter().enumerate() {
                        let point = shift(projection.project(position));
                        if idx == 0 {
                            builder.move_to(point);
                        } else {
                            builder.line_to(point);
                        }
                    }
                    builder.close();
                }
            });
            frame.fill(&path, to_color(region.fill));
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(Color::from_rgb(0.1, 0.1, 0.12)),
            );

            if let Some(position) = cursor.position_in(bounds) {
                if region
                    .rings
                    .first()
                    .is_some_and(|outer| contains(outer, &projection, shift, position))
                {
                    hovered = Some(region.name.as_str());
                }
            }
        }

        draw_legend(&mut frame, bounds.size());

        if let Some(name) = hovered {
            frame.fill_text(canvas::Text {
                content: name.to_string(),
                position: Point::new(PADDING, PADDING),
                color: Color::WHITE,
                size: Pixels(14.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

fn contains(
    ring: &[(f64, f64)],
    projection: &Projection,
    shift: impl Fn(Point) -> Point,
    point: Point,
) -> bool {
    let points: Vec<Point> = ring
        .iter()
        .map(|&position| shift(projection.project(position)))
        .collect();
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn draw_legend(frame: &mut Frame, size: Size) {
    let stops = legend(9);
    let top = size.height - PADDING - LEGEND_HEIGHT / 2.0;
    let width = ((size.width - 2.0 * PADDING) / 2.0).max(40.0);
    let left = (size.width - width) / 2.0;
    let swatch = width / stops.len() as f32;

    for (idx, (_, rgb)) in stops.iter().enumerate() {
        frame.fill_rectangle(
            Point::new(left + idx as f32 * swatch, top),
            Size::new(swatch, 10.0),
            to_color(*rgb),
        );
    }

    let caption = |content: &str, x: f32| canvas::Text {
        content: content.to_string(),
        position: Point::new(x, top - 14.0),
        color: Color::from_rgb(0.8, 0.8, 0.8),
        size: Pixels(11.0),
        ..canvas::Text::default()
    };
    frame.fill_text(caption("Centrodestra", left));
    frame.fill_text(caption("Centrosinistra", left + width - 70.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votecore::model::Level;
    use votecore::view::shading::NEUTRAL;

    fn square(name_key: &str, name: &str, x: f64) -> Value {
        json!({
            "type": "Feature",
            "properties": {name_key: name},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
            }
        })
    }

    #[test]
    fn feature_name_falls_back_to_source_keys() {
        let named = |key: &str, name: &str| feature_name(&square(key, name, 0.0));
        assert_eq!(named("name", " Molo "), Some("Molo".into()));
        assert_eq!(named("UU", "Nervi"), Some("Nervi".into()));

        let numbered = json!({"properties": {"Municipio": 4}});
        assert_eq!(feature_name(&numbered), Some("4".into()));
        assert_eq!(feature_name(&json!({"properties": {}})), None);
    }

    #[test]
    fn multipolygon_yields_every_ring() {
        let geometry = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[2.0, 0.0], [3.0, 0.0], [3.0, 1.0], [2.0, 0.0]]]
            ]
        });
        assert_eq!(geometry_rings(&geometry).len(), 2);
        let point = json!({"type": "Point", "coordinates": [0.0, 0.0]});
        assert!(geometry_rings(&point).is_empty());
    }

    #[test]
    fn regions_join_records_by_name() {
        let boundary = GeoBoundary::from_value(json!({
            "type": "FeatureCollection",
            "features": [square("name", "Molo", 0.0), square("name", "Albaro", 1.0)]
        }))
        .unwrap();
        let records = vec![
            ResultRecord::new("molo", Level::UrbanUnit).with_shares(50.0, 50.0, 0.0),
        ];

        let regions = regions(&boundary, &records);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].fill, NEUTRAL);
        assert_eq!(regions[1].name, "Albaro");
        assert_eq!(regions[1].fill, NO_DATA);
    }

    #[test]
    fn projection_keeps_north_up_and_fits_area() {
        let region = Region {
            name: "box".into(),
            rings: vec![vec![(8.0, 44.0), (10.0, 44.0), (10.0, 45.0), (8.0, 45.0)]],
            fill: NO_DATA,
        };
        let projection = Projection::fit(&[region], Size::new(200.0, 200.0)).unwrap();

        let south_west = projection.project((8.0, 44.0));
        let north_east = projection.project((10.0, 45.0));
        assert_eq!(south_west, Point::new(0.0, 150.0));
        assert_eq!(north_east, Point::new(200.0, 50.0));
        assert!(Projection::fit(&[], Size::new(10.0, 10.0)).is_none());
    }
}
