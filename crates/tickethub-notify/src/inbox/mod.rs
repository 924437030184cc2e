//! Reconciliation of the live and persisted notification feeds.

pub mod merge;
pub mod reconciler;
pub mod route;

pub use merge::merge;
pub use reconciler::Inbox;
pub use route::Route;
