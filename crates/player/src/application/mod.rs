//! Application layer: session use cases and presentation-facing view models.

pub mod dto;
pub mod services;
