mod input;
mod loop_runner;
mod metrics;

pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{
    run_loop, run_loop_with_metrics, InputSource, LoopConfig, LoopExit, NullInputSource,
    Simulation,
};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
