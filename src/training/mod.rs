//! Training pipeline: loss bookkeeping, progress updates for live TUI
//! consumption, and the orchestrator that drives a full run.

pub mod history;
pub mod orchestrator;
pub mod progress;

pub use history::{EpochRecord, LossHistory};
pub use orchestrator::{TrainConfig, TrainingOrchestrator};
pub use progress::{ConsoleSink, EvalReport, ProgressSink, RunPhase, TrainingUpdate};
