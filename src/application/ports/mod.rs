//! Ports - Boundaries between the application and its collaborators

pub mod inbound;
pub mod outbound;
