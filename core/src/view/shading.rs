use crate::model::Coalition;

/// Linear RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb::new(
            self.r * (1.0 - t) + other.r * t,
            self.g * (1.0 - t) + other.g * t,
            self.b * (1.0 - t) + other.b * t,
        )
    }
}

pub const LEFT: Rgb = Rgb::new(0.84, 0.15, 0.16);
pub const RIGHT: Rgb = Rgb::new(0.12, 0.34, 0.72);
pub const OTHER: Rgb = Rgb::new(0.62, 0.62, 0.62);
pub const NEUTRAL: Rgb = Rgb::new(0.94, 0.94, 0.94);
pub const NO_DATA: Rgb = Rgb::new(0.45, 0.45, 0.48);

/// Margin (percentage points) at which the ramp saturates.
pub const SATURATION_MARGIN: f64 = 30.0;

/// Choropleth fill for a left-minus-right margin.
pub fn shade_for_margin(margin: Option<f64>) -> Rgb {
    let Some(margin) = margin.filter(|m| m.is_finite()) else {
        return NO_DATA;
    };
    let t = (margin.abs() / SATURATION_MARGIN) as f32;
    if margin >= 0.0 {
        NEUTRAL.mix(LEFT, t)
    } else {
        NEUTRAL.mix(RIGHT, t)
    }
}

/// Evenly spaced legend stops from full right to full left.
pub fn legend(steps: usize) -> Vec<(f64, Rgb)> {
    if steps < 2 {
        return vec![(0.0, NEUTRAL)];
    }
    (0..steps)
        .map(|idx| {
            let margin =
                -SATURATION_MARGIN + 2.0 * SATURATION_MARGIN * idx as f64 / (steps - 1) as f64;
            (margin, shade_for_margin(Some(margin)))
        })
        .collect()
}

pub fn coalition_color(coalition: Coalition) -> Rgb {
    match coalition {
        Coalition::Left => LEFT,
        Coalition::Right => RIGHT,
        Coalition::Other => OTHER,
    }
}

/// Colour for the `index`-th party of a coalition, lightening away from the base hue.
pub fn party_color(coalition: Coalition, index: usize) -> Rgb {
    let step = (index % 6) as f32 / 6.0;
    coalition_color(coalition).mix(NEUTRAL, step * 0.8)
}
