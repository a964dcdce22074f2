//! Application layer - Use cases and orchestration
//!
//! Drives the domain rules through the night/day loop and talks to the
//! outside world only through the ports declared here.

pub mod dto;
pub mod ports;
pub mod services;
