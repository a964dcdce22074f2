//! Outbound ports - Interfaces that the application requires from external systems

mod localization_port;
mod messaging_port;

pub use localization_port::LocalizationPort;
pub use messaging_port::{MessagingError, MessagingPort};
