//! NEXUS core: mode routing, intent classification and project requirement
//! analysis for the NEXUS assistant.

pub mod brain;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fs_manager;
pub mod handlers;
pub mod logging;
pub mod session;

pub use dispatcher::Dispatcher;
pub use error::AppError;
pub use session::SessionHandle;

#[cfg(test)]
mod tests;
