//! Crudforge Core — database-driven CRUD scaffolding.
//!
//! Given a normalized description of a table's shape (columns, UI hints,
//! option sources), this crate deterministically emits the correlated source
//! artifacts for a Laravel-style admin application — ORM model, migration,
//! admin/API/web controllers, views, tests — and idempotently wires the
//! generated controllers into the host's route files.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          crudforge-cli (CLI)            │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     Application (ScaffoldService)       │
//! │  persist → generate per option → merge  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//! ┌─────────────────────────────────────────┐
//! │   Ports (Filesystem, ScaffoldStore,     │
//! │   MigrationRunner, RouteCache, Menu)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//! ┌─────────────────────────────────────────┐
//! │   crudforge-adapters (infrastructure)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │  Domain + Generators (pure logic):      │
//! │  Scaffold/Field, naming, relations,     │
//! │  per-artifact generators, route merge   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Generators never write; the orchestrator owns every filesystem effect,
//! which is what makes previews and backup-before-overwrite possible.

pub mod application;
pub mod domain;
pub mod error;
pub mod generators;
pub mod routes;

/// Public API — what external crates should use.
pub mod prelude {
    pub use crate::application::{
        DeletionOutcome, GeneratedPath, GenerationOutcome, RegenerationReport, ScaffoldService,
        ServiceConfig,
        ports::{
            Filesystem, MenuRegistry, MigrationRunner, RouteCacheInvalidator, ScaffoldFilter,
            ScaffoldId, ScaffoldRecord, ScaffoldStore, SortColumn,
        },
    };
    pub use crate::domain::{
        CreationOption, Field, FieldSpec, Fqcn, InputType, NamingConfig, NamingResolver,
        OptionsSource, Relation, RelationKind, Scaffold, ScaffoldPayload, SqlType,
    };
    pub use crate::error::{CrudforgeError, CrudforgeResult};
    pub use crate::generators::{GeneratedArtifact, WritePolicy};
    pub use crate::routes::{MergeOutcome, MergeStrategy, RouteEntry, RouteStyle, merge_route};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
