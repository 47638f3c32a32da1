pub mod cli;
pub mod core;
pub mod error;
pub mod logger;
pub mod prefs;
pub mod render;
pub mod server;
pub mod types;

pub use core::{data::ContentSource, settings::Settings};
pub use error::{FolioError, Result};
pub use server::{configure, start_server, AppState};
