use ratatui::style::Color;

/// Scene pixel width, a 2:1 plot surface.
pub const CANVAS_WIDTH: f64 = 800.0;
/// Scene pixel height.
pub const CANVAS_HEIGHT: f64 = 400.0;

/// Axis lines, tick marks, and annotation text.
pub const AXIS_COLOR: Color = Color::Gray;
/// True-target markers.
pub const TARGET_COLOR: Color = Color::Red;
/// Predicted-value markers.
pub const PREDICTION_COLOR: Color = Color::Green;
/// Training-loss series.
pub const TRAIN_LOSS_COLOR: Color = Color::Rgb(255, 165, 0);
/// Validation-loss series.
pub const VAL_LOSS_COLOR: Color = Color::Blue;

/// Horizontal attachment of a label to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// One paintable primitive, in scene pixel space with y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polyline {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    Segment {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        dashed: bool,
    },
    Marker {
        at: (f64, f64),
        radius: f64,
        color: Color,
    },
    Label {
        at: (f64, f64),
        text: String,
        color: Color,
        anchor: Anchor,
    },
}

/// A colored key row rendered beside a plot.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// A fully built plot: primitives plus legend rows, ready to paint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub legend: Vec<LegendEntry>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Color for series `index` out of `total`, spacing hues evenly around the
/// wheel like css `hsl(h, s%, l%)`.
pub fn series_color(index: usize, total: usize, saturation: f64, lightness: f64) -> Color {
    let hue = index as f64 * 360.0 / total.max(1) as f64;
    hsl(hue, saturation / 100.0, lightness / 100.0)
}

fn hsl(hue: f64, s: f64, l: f64) -> Color {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    Color::Rgb(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
