pub mod client;

pub use client::{ControlClient, ControlOutcome, ControlRequest};
