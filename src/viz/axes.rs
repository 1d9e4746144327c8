//! Axis and tick primitives shared by the wave and evaluation builders.

use crate::viz::mapper::CoordinateMapper;
use crate::viz::scene::{Anchor, Scene, Shape, AXIS_COLOR};

/// Tick mark length in scene pixels.
const TICK_LEN: f64 = 5.0;

/// Push the L-shaped axis pair plus labeled ticks onto `scene`.
///
/// With `clip_x_ticks` set, x ticks falling on or outside the plot edges are
/// skipped; the zoomed evaluation view uses this to drop the tick its x
/// padding pushes onto the border.
pub(crate) fn push_axes(
    scene: &mut Scene,
    mapper: &CoordinateMapper,
    x_step: f64,
    clip_x_ticks: bool,
) {
    let margins = mapper.margins();
    let width = mapper.width();
    let height = mapper.height();
    let baseline = height - margins.bottom;

    scene.shapes.push(Shape::Segment {
        from: (margins.left, margins.top),
        to: (margins.left, baseline),
        color: AXIS_COLOR,
        dashed: false,
    });
    scene.shapes.push(Shape::Segment {
        from: (margins.left, baseline),
        to: (width - margins.right, baseline),
        color: AXIS_COLOR,
        dashed: false,
    });

    for val in mapper.y_ticks() {
        let y = mapper.map_y(val);
        scene.shapes.push(Shape::Segment {
            from: (margins.left - TICK_LEN, y),
            to: (margins.left, y),
            color: AXIS_COLOR,
            dashed: false,
        });
        scene.shapes.push(Shape::Label {
            at: (margins.left - 10.0, y),
            text: format!("{val:.1}"),
            color: AXIS_COLOR,
            anchor: Anchor::Right,
        });
    }

    for val in mapper.x_ticks(x_step) {
        let x = mapper.map_x(val);
        if clip_x_ticks && (x <= margins.left || x >= width - margins.right) {
            continue;
        }
        scene.shapes.push(Shape::Segment {
            from: (x, baseline),
            to: (x, baseline + TICK_LEN),
            color: AXIS_COLOR,
            dashed: false,
        });
        scene.shapes.push(Shape::Label {
            at: (x, baseline + 10.0),
            text: format!("{val:.2}"),
            color: AXIS_COLOR,
            anchor: Anchor::Center,
        });
    }
}
