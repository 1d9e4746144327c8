//! Evaluation plot: the trailing stretch of each test wave, with true targets
//! and predictions marked at the same x and joined by a dashed error segment.

use crate::training::progress::EvalReport;
use crate::viz::axes;
use crate::viz::mapper::{pad_range, CoordinateMapper, Margins};
use crate::viz::scene::{
    series_color, Scene, Shape, AXIS_COLOR, CANVAS_HEIGHT, CANVAS_WIDTH, PREDICTION_COLOR,
    TARGET_COLOR,
};
use crate::wave::SEQUENCE_LEN;

/// How many trailing points of each test wave the zoom shows.
const TAIL_LEN: usize = 15;

const MARGINS: Margins = Margins {
    top: 20.0,
    bottom: 40.0,
    left: 60.0,
    right: 20.0,
};

const X_TICK_STEP: f64 = 0.05;
const MARKER_RADIUS: f64 = 6.0;

/// Build the zoomed evaluation scene. Empty reports yield an empty scene.
pub fn build(report: &EvalReport) -> Scene {
    let mut scene = Scene::new();
    if report.sequences.is_empty() {
        return scene;
    }

    let tail_start = SEQUENCE_LEN - TAIL_LEN;
    let x_lo = tail_start as f64 / (SEQUENCE_LEN - 1) as f64;
    let x_hi = 1.0;

    // The y-range only considers what the zoom can show: trailing points of
    // every test wave plus every prediction
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for seq in &report.sequences {
        for p in seq.points().iter().skip(tail_start) {
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
    }
    for &pred in &report.predictions {
        y_min = y_min.min(pred as f64);
        y_max = y_max.max(pred as f64);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return scene;
    }
    let (y_min, y_max) = pad_range(y_min, y_max, 0.1);

    // X pads on the upper side only, keeping the final markers off the edge
    let x_pad = (x_hi - x_lo) * 0.05;
    let mapper = CoordinateMapper::new(
        (x_lo, x_hi + x_pad),
        (y_min, y_max),
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        MARGINS,
    );
    axes::push_axes(&mut scene, &mapper, X_TICK_STEP, true);

    let total = report.sequences.len();
    for (i, seq) in report.sequences.iter().enumerate() {
        let color = series_color(i, total, 70.0, 70.0);
        let points: Vec<(f64, f64)> = seq
            .window()
            .iter()
            .skip(tail_start)
            .map(|p| mapper.map(p.x, p.y))
            .collect();
        scene.shapes.push(Shape::Polyline { points, color });

        let Some(target) = seq.target() else {
            continue;
        };
        let (tx, ty) = mapper.map(target.x, target.y);
        scene.shapes.push(Shape::Marker {
            at: (tx, ty),
            radius: MARKER_RADIUS,
            color: TARGET_COLOR,
        });

        if let Some(&pred) = report.predictions.get(i) {
            let py = mapper.map_y(pred as f64);
            scene.shapes.push(Shape::Marker {
                at: (tx, py),
                radius: MARKER_RADIUS,
                color: PREDICTION_COLOR,
            });
            scene.shapes.push(Shape::Segment {
                from: (tx, ty),
                to: (tx, py),
                color: AXIS_COLOR,
                dashed: true,
            });
        }
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{GenerationParams, SequenceGenerator};

    fn report(n: usize) -> EvalReport {
        let sequences = SequenceGenerator::from_seed(3).generate(&GenerationParams {
            count: n,
            ..Default::default()
        });
        let predictions = sequences
            .iter()
            .map(|s| s.target().map(|t| t.y as f32 * 0.9).unwrap_or(0.0))
            .collect();
        EvalReport {
            sequences,
            predictions,
        }
    }

    fn count_markers(scene: &Scene, color: ratatui::style::Color) -> usize {
        scene
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Marker { color: c, .. } if *c == color))
            .count()
    }

    #[test]
    fn test_empty_report_builds_empty_scene() {
        let scene = build(&EvalReport {
            sequences: vec![],
            predictions: vec![],
        });
        assert!(scene.is_empty());
    }

    #[test]
    fn test_marker_pair_per_test_wave() {
        let scene = build(&report(5));
        assert_eq!(count_markers(&scene, TARGET_COLOR), 5);
        assert_eq!(count_markers(&scene, PREDICTION_COLOR), 5);
        let dashed = scene
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Segment { dashed: true, .. }))
            .count();
        assert_eq!(dashed, 5);
    }

    #[test]
    fn test_prediction_shares_target_x() {
        let scene = build(&report(3));
        let xs: Vec<f64> = scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Marker { at, .. } => Some(at.0),
                _ => None,
            })
            .collect();
        // Markers come in target/prediction pairs at the same x
        assert_eq!(xs.len(), 6);
        for pair in xs.chunks(2) {
            assert!((pair[0] - pair[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_polylines_cover_the_trailing_window_only() {
        let scene = build(&report(2));
        let lines: Vec<usize> = scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Polyline { points, .. } => Some(points.len()),
                _ => None,
            })
            .collect();
        // 49-point window minus the 35 skipped leading points
        assert_eq!(lines, vec![14, 14]);
    }

    #[test]
    fn test_x_ticks_clipped_to_plot_interior() {
        let scene = build(&report(5));
        for shape in &scene.shapes {
            if let Shape::Label { at, text, .. } = shape {
                if text.contains('.') && at.1 > CANVAS_HEIGHT - MARGINS.bottom {
                    // X tick labels sit strictly between the plot edges
                    assert!(at.0 > MARGINS.left);
                    assert!(at.0 < CANVAS_WIDTH - MARGINS.right);
                }
            }
        }
    }
}
