//! Catalog domain model.
//!
//! # Responsibility
//! - Define persistence records for products and their options.
//! - Define the externally-facing DTO shapes mirrored from those records.
//! - Describe per-field validation outcomes collected before commit.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never the nil value.
//! - DTOs carry every persisted field; nothing is dropped across the boundary.

pub mod dto;
pub mod product;
pub mod validation;
