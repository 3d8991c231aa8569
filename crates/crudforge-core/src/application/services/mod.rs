//! Application services.

pub mod scaffold_service;

pub use scaffold_service::{
    DeletionOutcome, GeneratedPath, GenerationOutcome, RegenerationReport, ScaffoldService,
    ServiceConfig,
};
