//! Synthetic wave domain: point and sequence types, plus the random generator
//! that produces the training, validation, and test pools.

mod generator;
mod sequence;

pub use generator::{synthesize, GenerationParams, SequenceGenerator};
pub use sequence::{Point, Sequence, WaveParams, SEQUENCE_LEN, WINDOW_LEN};
