//! Cycle orchestration and the ops surface around it

pub mod cycle;
pub mod http;
pub mod scheduler;

pub use cycle::CycleRunner;
pub use http::{create_router, start_server, AppState};
pub use scheduler::CycleScheduler;
