//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Config: Application configuration
//! - Localization: Translation table behind the localization port
//! - Messaging: In-process bots behind the messaging port

pub mod config;
pub mod localization;
pub mod messaging;
