//! Persistence and transaction core for the product catalog.
//!
//! Products and their options are stored in SQLite. Callers open one
//! `UnitOfWork` per request, hand it to the services, and get typed results.

pub mod config;
pub mod db;
pub mod diagnostics;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod repo;
pub mod service;
pub mod uow;

pub use config::{ConfigError, CoreConfig};
pub use diagnostics::{DiagnosticSink, FileDiagnosticSink, LogDiagnosticSink, MemoryDiagnosticSink};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::dto::{ProductEntity, ProductOptionEntity};
pub use model::product::{Product, ProductId, ProductOption, ProductOptionId};
pub use model::validation::{EntityViolations, EntryState, FieldViolation, ValidationFailure};
pub use repo::{FieldValue, Record, RepoError, RepoResult, Repository, SqliteRepository};
pub use service::product_option_service::ProductOptionService;
pub use service::product_service::ProductService;
pub use service::{ServiceError, ServiceResult};
pub use uow::{TransactionScope, UnitOfWork};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
