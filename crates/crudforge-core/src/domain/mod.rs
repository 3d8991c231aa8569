//! Domain layer: the scaffold data model and the pure derivations over it.
//!
//! Nothing in this module performs I/O. The application layer feeds payloads
//! in and hands the resolved models to the generators.

pub mod error;
pub mod field;
pub mod naming;
pub mod relations;
pub mod scaffold;

pub use error::{DomainError, ErrorCategory};
pub use field::{Field, FieldKey, FieldSpec, InputType, OptionsSource, SqlType};
pub use naming::{Fqcn, NamingConfig, NamingResolver, ucfirst};
pub use relations::{Relation, RelationKind, infer_relations};
pub use scaffold::{CreationOption, CreationOptions, Scaffold, ScaffoldPayload};
