//! Application layer: orchestration over the domain, behind driven ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{
    DeletionOutcome, GeneratedPath, GenerationOutcome, RegenerationReport, ScaffoldService,
    ServiceConfig,
};
