//! # tickethub-entity
//!
//! Domain entity models for the TicketHub client SDK.

pub mod notification;

pub use notification::{Notification, NotificationKind};
