pub mod js;
pub mod errors;
pub mod config;

pub use config::BrowserConfig;
pub use errors::to_document_error;
