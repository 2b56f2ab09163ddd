pub mod orchestrator;

pub use orchestrator::{apply, replay, run};
