// Library surface for headless/integration tests and reuse.
// The terminal driver in main.rs only talks to the engine through these.
pub mod app_dirs;
pub mod char_log;
pub mod clock;
pub mod config;
pub mod content;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod mode;
pub mod persistence;
pub mod reconciler;
pub mod result;
pub mod runtime;
pub mod session;
pub mod typing_policy;

pub use engine::{Engine, EngineView};
pub use result::TestResult;
