// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod summary;
pub mod time_series;
pub mod ui;
pub mod util;

pub use app::{App, Effect};
pub use error::{Result, TrainerError};
