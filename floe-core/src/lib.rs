// floe-core/src/lib.rs

// 1. Documentation is not enforced yet
#![allow(missing_docs)]
// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (collaborator traits)
// Catalog and table storage contracts. Implementations live in infrastructure.
pub mod ports;

// 2. Domain
// Policy comparison, manifest merge, contract checks, quality scoring, violations.
// Pure and synchronous: no I/O, no dependency on infra or app.
pub mod domain;

// 3. Infrastructure (Adapters)
// YAML loading, catalog/table adapters, report renderers.
pub mod infrastructure;

// 4. Application (Use Cases)
// Compile-time orchestration: resolve, validate, score, aggregate, register.
pub mod application;

// --- GLOBAL ERRORS ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::FloeError;
