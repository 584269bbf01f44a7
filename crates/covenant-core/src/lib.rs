//! Covenant Core - deterministic instruction contracts for AI coding agents
//!
//! Covenant compiles a `(project, command, user input)` request against a
//! static catalog of rules, rulesets, stack presets and commands into either
//! a rendered instruction contract or a structured "blocked" result.
//!
//! # Architecture
//!
//! 1. **Catalog** (`catalog`): id-indexed, validated definitions and the conflict graph
//! 2. **Projects** (`project`): per-project preset, ruleset and rule toggles
//! 3. **Context** (`context`): request lookup, the boundary that yields
//!    `missing_project`, `unknown_command` and `invalid_configuration`
//! 4. **Resolver** (`resolver`): the pure pipeline, candidates to rendered text
//! 5. **Service** (`service`): stamping and auditing around the resolver
//!
//! # Quick Start
//!
//! ```
//! use covenant_core::catalog::Catalog;
//! use covenant_core::project::{ProjectConfig, ProjectRegistry, ResolveRequest};
//! use covenant_core::{load_context, resolve, ResolveResult};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let projects = ProjectRegistry::from_projects(vec![
//!     ProjectConfig::new("web", "nextjs-app-router", "starter")
//!         .with_toggle("keep-changes-readable", true),
//! ])
//! .unwrap();
//!
//! let request = ResolveRequest::new("web", "create-component")
//!     .with_input("Button with variants");
//!
//! match load_context(&catalog, &projects, &request) {
//!     Ok(loaded) => match resolve(&request, &loaded.context()) {
//!         ResolveResult::Ok(contract) => println!("{}", contract.contract),
//!         ResolveResult::Blocked(blocked) => eprintln!("{blocked}"),
//!     },
//!     Err(blocked) => eprintln!("{blocked}"),
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **Purity**: the resolver does no I/O and reads no clock or randomness
//! 2. **Determinism**: identical input gives byte-identical output
//! 3. **Blocked is a value**: only infrastructure failures are errors

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod audit;
pub mod catalog;
pub mod context;
pub mod error;
pub mod project;
pub mod resolver;
pub mod result;
pub mod service;
pub mod types;

// Re-export commonly used types for convenience
pub use audit::{AuditEntry, AuditSink, AuditStatus, JsonlAuditLog, MemoryAuditLog};
pub use catalog::{
    load_catalog, Catalog, CatalogDocument, CommandDefinition, ConflictGraph, ConstraintMap,
    RuleDefinition, RulesetDefinition, StackPresetDefinition,
};
pub use context::{load_context, LoadedContext};
pub use error::{CatalogError, ConfigError, CovenantError, Result, ResultExt};
pub use project::{ProjectConfig, ProjectRegistry, ProjectStore, ResolveRequest, RuleToggles};
pub use resolver::{resolve, ResolutionContext};
pub use result::{
    AppliedRule, BlockReason, BlockedResolution, Conflict, ContractMetadata, ResolveResult,
    ResolvedContract, STOP_CONDITIONS,
};
pub use service::{CompiledOutcome, ContractService, StampedContract};
pub use types::{Fingerprint, Intent, RuleId, Severity, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
