//! Plot construction. Builders turn data into canvas-space [`Scene`]s; the ui
//! layer paints scenes onto a terminal canvas. Everything here is pure, so the
//! plots are testable without a terminal.

mod axes;
pub mod eval_view;
pub mod loss_view;
pub mod mapper;
pub mod scene;
pub mod sequence_view;

pub use mapper::{pad_range, CoordinateMapper, Margins};
pub use scene::{series_color, Anchor, LegendEntry, Scene, Shape, CANVAS_HEIGHT, CANVAS_WIDTH};
