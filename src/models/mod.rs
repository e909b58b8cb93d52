pub mod environmental;
pub mod history;
pub mod recommendation;
pub mod settings;
pub mod usage;
pub mod zone;

pub use environmental::*;
pub use history::*;
pub use recommendation::*;
pub use settings::*;
pub use usage::*;
pub use zone::*;
