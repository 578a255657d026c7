// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod clock;
pub mod config;
pub mod console;
pub mod curve;
pub mod engine;
pub mod error;
pub mod interactivity;
pub mod mood;
pub mod period;
pub mod progress_config;
pub mod runtime;
pub mod session;
pub mod theme;
pub mod timers;
