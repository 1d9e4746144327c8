//! Loss plot: training and validation curves over the recorded epochs,
//! scaled to the worst loss seen so far.

use crate::training::history::LossHistory;
use crate::viz::mapper::{CoordinateMapper, Margins};
use crate::viz::scene::{
    Anchor, LegendEntry, Scene, Shape, AXIS_COLOR, CANVAS_HEIGHT, CANVAS_WIDTH, TRAIN_LOSS_COLOR,
    VAL_LOSS_COLOR,
};

const PADDING: f64 = 40.0;
const MARGINS: Margins = Margins::uniform(PADDING);

/// At most this many epoch labels along the x-axis.
const MAX_EPOCH_TICKS: usize = 5;

/// Build the loss scene from the recorded history. An empty history yields an
/// empty scene.
pub fn build(history: &LossHistory) -> Scene {
    let mut scene = Scene::new();
    let records = history.records();
    if records.is_empty() {
        return scene;
    }

    let len = records.len();
    // X is the record's position; a single record pins to the left edge
    let x_max = (len - 1).max(1) as f64;
    // An all-zero history collapses the y-range; the mapper widens it
    let max_loss = f64::from(history.max_loss());
    let mapper = CoordinateMapper::new(
        (0.0, x_max),
        (0.0, max_loss),
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        MARGINS,
    );

    let baseline = CANVAS_HEIGHT - PADDING;
    scene.shapes.push(Shape::Segment {
        from: (PADDING, PADDING),
        to: (PADDING, baseline),
        color: AXIS_COLOR,
        dashed: false,
    });
    scene.shapes.push(Shape::Segment {
        from: (PADDING, baseline),
        to: (CANVAS_WIDTH - PADDING, baseline),
        color: AXIS_COLOR,
        dashed: false,
    });

    let train: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| mapper.map(i as f64, f64::from(r.loss)))
        .collect();
    scene.shapes.push(Shape::Polyline {
        points: train,
        color: TRAIN_LOSS_COLOR,
    });

    let val: Vec<(f64, f64)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| mapper.map(i as f64, f64::from(r.val_loss)))
        .collect();
    scene.shapes.push(Shape::Polyline {
        points: val,
        color: VAL_LOSS_COLOR,
    });

    // The y-axis is annotated at its endpoints rather than ticked
    scene.shapes.push(Shape::Label {
        at: (PADDING - 5.0, PADDING),
        text: format!("{max_loss:.4}"),
        color: AXIS_COLOR,
        anchor: Anchor::Right,
    });
    scene.shapes.push(Shape::Label {
        at: (PADDING - 5.0, baseline),
        text: "0".to_string(),
        color: AXIS_COLOR,
        anchor: Anchor::Right,
    });
    scene.shapes.push(Shape::Label {
        at: (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - 10.0),
        text: "Epochs".to_string(),
        color: AXIS_COLOR,
        anchor: Anchor::Center,
    });

    // Evenly sampled epoch labels, at most five
    let ticks = len.min(MAX_EPOCH_TICKS);
    for i in 0..ticks {
        let index = if ticks == 1 {
            0
        } else {
            ((i as f64 / (ticks - 1) as f64) * (len - 1) as f64).round() as usize
        };
        let x = mapper.map_x(index as f64);
        scene.shapes.push(Shape::Segment {
            from: (x, baseline),
            to: (x, baseline + 5.0),
            color: AXIS_COLOR,
            dashed: false,
        });
        scene.shapes.push(Shape::Label {
            at: (x, baseline + 5.0),
            text: records[index].epoch.to_string(),
            color: AXIS_COLOR,
            anchor: Anchor::Center,
        });
    }

    scene.legend.push(LegendEntry {
        label: "Train".to_string(),
        color: TRAIN_LOSS_COLOR,
    });
    scene.legend.push(LegendEntry {
        label: "Val".to_string(),
        color: VAL_LOSS_COLOR,
    });

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::history::EpochRecord;

    fn history(losses: &[(f32, f32)]) -> LossHistory {
        let mut h = LossHistory::new();
        for (i, (loss, val_loss)) in losses.iter().enumerate() {
            h.push(EpochRecord {
                epoch: i + 1,
                loss: *loss,
                val_loss: *val_loss,
            });
        }
        h
    }

    fn epoch_labels(scene: &Scene) -> Vec<String> {
        // Center-anchored labels on the tick row; the right-anchored "0"
        // annotation shares the row but not the anchor
        scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Label {
                    at,
                    text,
                    anchor: Anchor::Center,
                    ..
                } if at.1 == CANVAS_HEIGHT - PADDING + 5.0 => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_history_builds_empty_scene() {
        assert!(build(&LossHistory::new()).is_empty());
    }

    #[test]
    fn test_two_series_cover_every_record() {
        let scene = build(&history(&[(0.9, 1.0), (0.5, 0.6), (0.3, 0.4)]));
        let lines: Vec<usize> = scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Polyline { points, .. } => Some(points.len()),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![3, 3]);
        assert_eq!(scene.legend.len(), 2);
        assert_eq!(scene.legend[0].label, "Train");
        assert_eq!(scene.legend[1].label, "Val");
    }

    #[test]
    fn test_y_scale_spans_worst_loss_of_either_series() {
        // Validation is the worst series here, so it sets the top annotation
        let scene = build(&history(&[(0.5, 2.0), (0.4, 1.0)]));
        let has_max = scene.shapes.iter().any(
            |s| matches!(s, Shape::Label { text, .. } if text == "2.0000"),
        );
        assert!(has_max);
    }

    #[test]
    fn test_short_history_labels_every_epoch() {
        let scene = build(&history(&[(0.9, 1.0), (0.5, 0.6), (0.3, 0.4)]));
        assert_eq!(epoch_labels(&scene), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_long_history_samples_five_epochs() {
        let losses: Vec<(f32, f32)> = (0..20).map(|i| (1.0 / (i + 1) as f32, 0.5)).collect();
        let scene = build(&history(&losses));
        assert_eq!(epoch_labels(&scene), vec!["1", "6", "11", "15", "20"]);
    }

    #[test]
    fn test_all_zero_losses_stay_finite() {
        let scene = build(&history(&[(0.0, 0.0), (0.0, 0.0)]));
        for shape in &scene.shapes {
            if let Shape::Polyline { points, .. } = shape {
                for (x, y) in points {
                    assert!(x.is_finite() && y.is_finite());
                }
            }
        }
    }
}
