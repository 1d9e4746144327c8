//! Terminal UI: the interactive application shell, the dashboard state fed by
//! training updates, and the canvas renderer that draws plot scenes.

mod app;
pub mod canvas;
pub mod dashboard;
mod view;

pub use app::App;
pub use dashboard::DashboardState;
