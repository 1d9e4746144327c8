//! Wave plot: the displayed slice of the generated pool, windows drawn as
//! hue-rotated polylines with each target marked and labeled.

use crate::viz::axes;
use crate::viz::mapper::{pad_range, CoordinateMapper, Margins};
use crate::viz::scene::{
    series_color, Anchor, LegendEntry, Scene, Shape, AXIS_COLOR, CANVAS_HEIGHT, CANVAS_WIDTH,
    TARGET_COLOR,
};
use crate::wave::Sequence;

// Wide right margin leaves room for the target labels
const MARGINS: Margins = Margins {
    top: 20.0,
    bottom: 40.0,
    left: 60.0,
    right: 100.0,
};

const X_TICK_STEP: f64 = 0.25;
const TARGET_RADIUS: f64 = 5.0;

/// Build the wave scene for `count` sequences starting at `start`, clipped to
/// the pool. An empty selection yields an empty scene.
pub fn build(sequences: &[Sequence], start: usize, count: usize) -> Scene {
    let mut scene = Scene::new();
    let end = start.saturating_add(count).min(sequences.len());
    if start >= end {
        return scene;
    }
    let visible = &sequences[start..end];

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for seq in visible {
        for p in seq.points() {
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return scene;
    }
    let (y_min, y_max) = pad_range(y_min, y_max, 0.1);

    let mapper = CoordinateMapper::new(
        (0.0, 1.0),
        (y_min, y_max),
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        MARGINS,
    );
    axes::push_axes(&mut scene, &mapper, X_TICK_STEP, false);

    for (offset, seq) in visible.iter().enumerate() {
        let index = start + offset;
        // Hue spacing is keyed to the requested count, not the clipped slice
        let color = series_color(offset, count, 100.0, 50.0);

        let points: Vec<(f64, f64)> = seq
            .window()
            .iter()
            .map(|p| mapper.map(p.x, p.y))
            .collect();
        scene.shapes.push(Shape::Polyline { points, color });

        if let Some(target) = seq.target() {
            let (tx, ty) = mapper.map(target.x, target.y);
            scene.shapes.push(Shape::Marker {
                at: (tx, ty),
                radius: TARGET_RADIUS,
                color: TARGET_COLOR,
            });
            scene.shapes.push(Shape::Label {
                at: (tx + 10.0, ty),
                text: format!("target{index}"),
                color: AXIS_COLOR,
                anchor: Anchor::Left,
            });
        }

        scene.legend.push(LegendEntry {
            label: format!("Wave {index}"),
            color,
        });
    }

    scene
}
