mod discovery;
mod global;

pub use discovery::DiscoveryArgs;
pub use global::GlobalArgs;
pub use global::OutputFormat;
