//! Push channel connection management.

pub mod alerts;
pub mod manager;
pub mod protocol;
pub mod transport;

pub use alerts::{DesktopAlerts, NoAlerts};
pub use manager::ConnectionManager;
pub use protocol::{ClientFrame, PushPayload, ServerFrame};
pub use transport::{PushSession, PushTransport, WsTransport};
