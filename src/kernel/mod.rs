pub mod cancel;
pub mod classifier;
pub mod driver;
pub mod event;
pub mod narrative;
pub mod profile;
pub mod reactor;
pub mod record;
pub mod scheduler;
pub mod state;
