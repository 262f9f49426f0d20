pub mod config;
pub mod extract;
pub mod layout;
pub mod load;
pub mod logging;
pub mod transform;

pub use config::{LoadOptions, Settings};
pub use layout::ProjectLayout;
