//! Contract service - the consumer side of the resolver
//!
//! Wraps the pure pipeline with everything it deliberately leaves out:
//! loading the request's context, stamping an id and timestamp onto
//! compiled contracts, and auditing every attempt.

use crate::audit::{AuditEntry, AuditSink, MemoryAuditLog};
use crate::catalog::Catalog;
use crate::context::load_context;
use crate::project::{ProjectStore, ResolveRequest};
use crate::resolver::resolve;
use crate::result::{BlockedResolution, ResolveResult, ResolvedContract};
use crate::types::{now, Fingerprint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A contract with its identity filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedContract {
    pub contract: ResolvedContract,

    /// Digest of the unstamped content
    pub fingerprint: Fingerprint,
}

impl StampedContract {
    pub fn id(&self) -> Option<Uuid> {
        self.contract.id
    }

    pub fn text(&self) -> &str {
        &self.contract.contract
    }
}

/// Outcome of [`ContractService::compile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CompiledOutcome {
    #[serde(rename = "ok")]
    Contract(StampedContract),
    Blocked(BlockedResolution),
}

impl CompiledOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, CompiledOutcome::Blocked(_))
    }

    pub fn contract(&self) -> Option<&StampedContract> {
        match self {
            CompiledOutcome::Contract(stamped) => Some(stamped),
            CompiledOutcome::Blocked(_) => None,
        }
    }

    pub fn blocked(&self) -> Option<&BlockedResolution> {
        match self {
            CompiledOutcome::Contract(_) => None,
            CompiledOutcome::Blocked(blocked) => Some(blocked),
        }
    }
}

/// Compiles requests against a catalog and a project store
pub struct ContractService {
    catalog: Arc<Catalog>,
    projects: Arc<dyn ProjectStore>,
    audit: Arc<dyn AuditSink>,
}

impl ContractService {
    /// Service with an in-memory audit log
    pub fn new(catalog: Arc<Catalog>, projects: Arc<dyn ProjectStore>) -> Self {
        Self {
            catalog,
            projects,
            audit: Arc::new(MemoryAuditLog::new()),
        }
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve without stamping or auditing
    pub fn resolve(&self, request: &ResolveRequest) -> ResolveResult {
        match load_context(&self.catalog, self.projects.as_ref(), request) {
            Ok(loaded) => resolve(request, &loaded.context()),
            Err(blocked) => ResolveResult::Blocked(blocked),
        }
    }

    /// Resolve, stamp and audit
    pub fn compile(&self, request: &ResolveRequest) -> CompiledOutcome {
        let at = now();

        match self.resolve(request) {
            ResolveResult::Ok(contract) => {
                let fingerprint = contract.fingerprint();
                let contract = contract.stamp(Uuid::new_v4(), at);
                tracing::info!(
                    project = %contract.project_id,
                    command = %contract.command_id,
                    rules = contract.metadata.applied_rules.len(),
                    fingerprint = %fingerprint,
                    "contract compiled"
                );

                self.audit_entry(AuditEntry::compiled(&contract, fingerprint.clone(), at));
                CompiledOutcome::Contract(StampedContract {
                    contract,
                    fingerprint,
                })
            }
            ResolveResult::Blocked(blocked) => {
                tracing::info!(
                    project = %request.project_id,
                    command = %request.command_id,
                    reason = %blocked.reason,
                    "resolution blocked"
                );

                self.audit_entry(AuditEntry::blocked(
                    &request.project_id,
                    &request.command_id,
                    &blocked,
                    at,
                ));
                CompiledOutcome::Blocked(blocked)
            }
        }
    }

    fn audit_entry(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.record(&entry) {
            tracing::warn!(error = %e, entry = %entry.id, "failed to record audit entry");
        }
    }
}

impl fmt::Debug for ContractService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractService")
            .field("rules", &self.catalog.rule_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditStatus;
    use crate::error::{ConfigError, Result};
    use crate::project::{ProjectConfig, ProjectRegistry};

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _entry: &AuditEntry) -> Result<()> {
            Err(ConfigError::MissingSetting("audit_log".to_string()).into())
        }
    }

    fn service(audit: Arc<dyn AuditSink>) -> ContractService {
        let projects = ProjectRegistry::from_projects(vec![ProjectConfig::new(
            "web",
            "nextjs-app-router",
            "starter",
        )])
        .unwrap();
        ContractService::new(Arc::new(Catalog::builtin().unwrap()), Arc::new(projects))
            .with_audit_sink(audit)
    }

    #[test]
    fn test_compile_stamps_and_audits() {
        let log = Arc::new(MemoryAuditLog::new());
        let service = service(log.clone());

        let outcome = service.compile(&ResolveRequest::new("web", "create-component"));
        let stamped = outcome.contract().unwrap();

        assert!(stamped.contract.is_stamped());
        assert!(stamped.id().is_some());
        assert_eq!(stamped.fingerprint, stamped.contract.fingerprint());

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, AuditStatus::Ok);
        assert_eq!(entries[0].contract_id, stamped.id());
    }

    #[test]
    fn test_blocked_is_audited() {
        let log = Arc::new(MemoryAuditLog::new());
        let service = service(log.clone());

        let outcome = service.compile(&ResolveRequest::new("mobile", "create-component"));
        assert!(outcome.is_blocked());
        assert_eq!(log.entries()[0].status, AuditStatus::Blocked);
    }

    #[test]
    fn test_audit_failure_does_not_fail_compile() {
        let service = service(Arc::new(FailingSink));
        let outcome = service.compile(&ResolveRequest::new("web", "create-component"));
        assert!(outcome.contract().is_some());
    }

    #[test]
    fn test_resolve_leaves_contract_unstamped() {
        let service = service(Arc::new(MemoryAuditLog::new()));
        let result = service.resolve(&ResolveRequest::new("web", "create-component"));
        assert!(!result.contract().unwrap().is_stamped());
    }
}
