pub mod agent;
pub mod dedup;
pub mod display_log;
pub mod drip;
pub mod presence;
pub mod roster;
pub mod session;

pub use agent::Agent;
pub use display_log::DisplayLog;
pub use session::Session;
