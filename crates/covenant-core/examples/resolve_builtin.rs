//! Resolve a request against the built-in catalog and print the contract
//!
//! ```bash
//! cargo run -p covenant-core --example resolve_builtin
//! ```

use covenant_core::{
    Catalog, CompiledOutcome, ContractService, MemoryAuditLog, ProjectConfig, ProjectRegistry,
    ResolveRequest,
};
use std::sync::Arc;

fn main() -> covenant_core::Result<()> {
    let catalog = Catalog::builtin()?;
    let projects = ProjectRegistry::from_projects(vec![
        ProjectConfig::new("web", "nextjs-app-router", "standard")
            .with_name("Marketing site")
            .with_toggle("keep-changes-readable", true)
            .with_toggle("add-tests-for-new-code", true),
    ])?;

    let audit = Arc::new(MemoryAuditLog::new());
    let service = ContractService::new(Arc::new(catalog), Arc::new(projects))
        .with_audit_sink(audit.clone());

    let request = ResolveRequest::new("web", "create-component")
        .with_input("Button with variants")
        .with_path_hint("src/components/button.tsx");

    match service.compile(&request) {
        CompiledOutcome::Contract(stamped) => {
            println!("{}", stamped.text());
            println!("fingerprint: {}", stamped.fingerprint);
        }
        CompiledOutcome::Blocked(blocked) => println!("blocked: {blocked}"),
    }

    println!("audit entries: {}", audit.len());
    Ok(())
}
