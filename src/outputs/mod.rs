pub mod agent_log;
pub mod console;
pub mod feed;
pub mod speech;
