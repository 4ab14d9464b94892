pub mod config_manager;
pub mod error;
pub mod history;
pub mod logging;
pub mod types;

pub use config_manager::*;
pub use error::*;
pub use history::*;
pub use logging::init_logging;
pub use types::*;
