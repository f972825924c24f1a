pub mod config;
pub mod error;
pub mod kernel;
pub mod outputs;
pub mod services;

// Re-export specific items if needed for convenient access
pub use kernel::classifier::classify;
pub use kernel::narrative::generate_narrative;
pub use kernel::reactor::Reactor;
pub use kernel::scheduler::NarrativePlayer;
