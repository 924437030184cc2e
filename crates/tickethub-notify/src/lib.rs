//! # tickethub-notify
//!
//! Client-side notification synchronization engine for TicketHub.
//! Provides:
//!
//! - Push channel lifecycle with credentialed handshake, idempotent open,
//!   and reconnect-suppressing manual close
//! - Paginated, filterable persisted history with fire-and-forget
//!   mutations
//! - Reconciliation of the live and persisted feeds into one ordered,
//!   de-duplicated working set
//! - Ephemeral toast presentation with per-entry expiry timers
//!
//! The [`NotificationCenter`] facade wires these together for one
//! authenticated session.

pub mod center;
pub mod connection;
pub mod inbox;
pub mod session;
pub mod store;
pub mod toast;

pub use center::NotificationCenter;
pub use connection::ConnectionManager;
pub use inbox::{Inbox, Route};
pub use session::{Credential, SessionHandle};
pub use store::PersistedStore;
pub use toast::ToastPresenter;
