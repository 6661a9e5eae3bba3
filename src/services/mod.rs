// Service exports
pub mod cache;
pub mod expansion;
pub mod suggestions;

pub use cache::CachedExpander;
pub use expansion::{DisabledExpander, Expander, ExpansionClient, ExpansionError};
pub use suggestions::parse_suggestions;
