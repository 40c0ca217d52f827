//! Walk-forward validation of one-step forecasters.

mod walk_forward;

pub use walk_forward::{walk_forward, walk_forward_validation, WalkForwardRun};
