pub mod advisor;
pub mod calculations;
pub mod fallback;
pub mod rules;
pub mod usage;

pub use advisor::{Advisor, ConnectionStatus};
pub use rules::DecisionEngine;
