pub mod browse;
pub mod health;
pub mod recommendations;

pub use browse::browse_config;
pub use health::health_check;
pub use recommendations::{recommendations_config, search};
