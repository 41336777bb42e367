//! Pipeline components: cancellation, transfer queue, discovery walk, copy loop, orchestration.

pub mod cancel;
pub mod context;
pub mod copy;
pub mod error_handler;
pub mod orchestrator;
pub mod queue;
pub mod walk;

pub use cancel::CancelToken;
pub use context::{PipelineHandles, SweepEnv, SweepPlan};
pub use copy::{OnCopied, Replicator, copy_file_no_overwrite};
pub use error_handler::log_sweep_summary;
pub use orchestrator::{collect_candidates, run_sweep, shutdown_pipeline_handles, spawn_pipeline};
pub use queue::{Poll, QueueConsumer, QueueProducer, transfer_queue};
pub use walk::{Discoverer, VolumeWalk};
