//! ImagoRef Application
//!
//! The application shell: settings bootstrap, image file ingestion and a
//! headless canvas driver.

mod app;
mod cli;
pub mod ingest;
mod shortcuts;

pub use app::{App, AppConfig, BoardSummary};
pub use cli::Cli;
pub use ingest::{IngestError, SUPPORTED_EXTENSIONS, load_image};
pub use shortcuts::print_all as print_shortcuts;
