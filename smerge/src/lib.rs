pub mod api;
pub mod cli;
pub mod format;
pub mod history;
pub mod identity;
pub mod locator;
pub mod models;
pub mod replay;
pub mod services;
pub mod settings;
pub mod timestamp;
