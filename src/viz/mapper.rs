//! Affine data-to-pixel mapping shared by the three plot builders.

/// Tolerance for tick loops so floating-point drift cannot drop the last tick.
pub const TICK_EPSILON: f64 = 1e-4;

/// Y-axis ticks sit on multiples of this step.
const Y_TICK_STEP: f64 = 0.5;

/// Pixel margins around the plotted rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub const fn uniform(pad: f64) -> Self {
        Margins {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }
}

/// Expand a data range by `frac` of its span on each side. A collapsed range
/// is widened by one unit each way instead.
pub fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = max - min;
    if span == 0.0 {
        (min - 1.0, max + 1.0)
    } else {
        (min - span * frac, max + span * frac)
    }
}

/// Maps a data rectangle onto a margined pixel rectangle. Pixel y grows
/// downward, so the y map is inverted: larger data y, smaller pixel y.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: f64,
    height: f64,
    margins: Margins,
}

impl CoordinateMapper {
    /// Collapsed input ranges are widened by one unit each way so the map
    /// never divides by zero.
    pub fn new(
        x_range: (f64, f64),
        y_range: (f64, f64),
        width: f64,
        height: f64,
        margins: Margins,
    ) -> Self {
        let (x_min, x_max) = widen_if_collapsed(x_range);
        let (y_min, y_max) = widen_if_collapsed(y_range);
        CoordinateMapper {
            x_min,
            x_max,
            y_min,
            y_max,
            width,
            height,
            margins,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    pub fn map_x(&self, x: f64) -> f64 {
        self.margins.left + (x - self.x_min) / (self.x_max - self.x_min) * self.plot_width()
    }

    pub fn map_y(&self, y: f64) -> f64 {
        self.margins.top + (self.y_max - y) / (self.y_max - self.y_min) * self.plot_height()
    }

    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.map_x(x), self.map_y(y))
    }

    /// Tick positions along x at a fixed step, aligned to multiples of it.
    pub fn x_ticks(&self, step: f64) -> Vec<f64> {
        aligned_ticks(self.x_min, self.x_max, step)
    }

    /// Tick positions along y, every 0.5 starting at the first multiple at or
    /// above the range minimum.
    pub fn y_ticks(&self) -> Vec<f64> {
        aligned_ticks(self.y_min, self.y_max, Y_TICK_STEP)
    }
}

fn widen_if_collapsed((min, max): (f64, f64)) -> (f64, f64) {
    if max == min {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

fn aligned_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut ticks = Vec::new();
    let mut val = (min / step).ceil() * step;
    while val <= max + TICK_EPSILON {
        ticks.push(val);
        val += step;
    }
    ticks
}
