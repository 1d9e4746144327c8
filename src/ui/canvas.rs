use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Line,
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine},
    widgets::{Block, Borders},
    Frame,
};

use crate::viz::scene::{Anchor, Scene, Shape, CANVAS_HEIGHT, CANVAS_WIDTH};

// Braille dots cover roughly 3 scene pixels, so shorter dashes fuse together
const DASH_LEN: f64 = 6.0;

const LEGEND_TOP: f64 = 14.0;
const LEGEND_STEP: f64 = 16.0;

/// Paint a scene onto a braille canvas filling `area`.
///
/// Scenes use screen-style coordinates (y grows downward); the canvas y-axis
/// grows upward, so every y is flipped on the way in.
pub fn render(frame: &mut Frame, scene: &Scene, title: &str, area: Rect) {
    let inner_width = area.width.saturating_sub(2).max(1);
    let px_per_cell = CANVAS_WIDTH / f64::from(inner_width);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, CANVAS_WIDTH])
        .y_bounds([0.0, CANVAS_HEIGHT])
        .paint(|ctx| paint(ctx, scene, px_per_cell));

    frame.render_widget(canvas, area);
}

fn paint(ctx: &mut Context, scene: &Scene, px_per_cell: f64) {
    for shape in &scene.shapes {
        match shape {
            Shape::Polyline { points, color } => {
                for pair in points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: flip(pair[0].1),
                        x2: pair[1].0,
                        y2: flip(pair[1].1),
                        color: *color,
                    });
                }
            }
            Shape::Segment {
                from,
                to,
                color,
                dashed,
            } => {
                if *dashed {
                    draw_dashed(ctx, *from, *to, *color);
                } else {
                    ctx.draw(&CanvasLine {
                        x1: from.0,
                        y1: flip(from.1),
                        x2: to.0,
                        y2: flip(to.1),
                        color: *color,
                    });
                }
            }
            Shape::Marker { at, radius, color } => {
                ctx.draw(&Circle {
                    x: at.0,
                    y: flip(at.1),
                    radius: *radius,
                    color: *color,
                });
            }
            Shape::Label {
                at,
                text,
                color,
                anchor,
            } => {
                let x = anchored_x(at.0, text.chars().count(), *anchor, px_per_cell);
                ctx.print(
                    x,
                    flip(at.1),
                    Line::styled(text.clone(), Style::default().fg(*color)),
                );
            }
        }
    }

    // Legend rows stack down from the top-right corner
    for (i, entry) in scene.legend.iter().enumerate() {
        let y = LEGEND_TOP + i as f64 * LEGEND_STEP;
        let x = anchored_x(
            CANVAS_WIDTH - 10.0,
            entry.label.chars().count(),
            Anchor::Right,
            px_per_cell,
        );
        ctx.print(
            x,
            flip(y),
            Line::styled(entry.label.clone(), Style::default().fg(entry.color)),
        );
    }
}

fn flip(y: f64) -> f64 {
    CANVAS_HEIGHT - y
}

/// Shift a label's print position so its text ends up anchored at `x`.
/// `ctx.print` always lays text out to the right of the given point.
fn anchored_x(x: f64, chars: usize, anchor: Anchor, px_per_cell: f64) -> f64 {
    let width = chars as f64 * px_per_cell;
    match anchor {
        Anchor::Left => x,
        Anchor::Center => x - width / 2.0,
        Anchor::Right => x - width,
    }
}

fn draw_dashed(ctx: &mut Context, from: (f64, f64), to: (f64, f64), color: ratatui::style::Color) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);

    let mut t = 0.0;
    while t < len {
        let end = (t + DASH_LEN).min(len);
        ctx.draw(&CanvasLine {
            x1: from.0 + ux * t,
            y1: flip(from.1 + uy * t),
            x2: from.0 + ux * end,
            y2: flip(from.1 + uy * end),
            color,
        });
        t += 2.0 * DASH_LEN;
    }
}
