//! Context loading - the validation boundary in front of the resolver
//!
//! Looks up everything a request refers to and turns each miss into a
//! [`BlockedResolution`]. Checks run in a fixed order and the first failure
//! wins: project, then command, then the project's stack preset and ruleset.

use crate::catalog::{Catalog, CommandDefinition, RulesetDefinition, StackPresetDefinition};
use crate::project::{ProjectConfig, ProjectStore, ResolveRequest};
use crate::resolver::ResolutionContext;
use crate::result::BlockedResolution;

/// A request's looked-up context, owning the project snapshot
#[derive(Debug, Clone)]
pub struct LoadedContext<'a> {
    pub project: ProjectConfig,
    pub command: &'a CommandDefinition,
    pub ruleset: &'a RulesetDefinition,
    pub stack_preset: &'a StackPresetDefinition,
    pub catalog: &'a Catalog,
}

impl LoadedContext<'_> {
    /// Borrow as the resolver's input
    pub fn context(&self) -> ResolutionContext<'_> {
        ResolutionContext {
            project: &self.project,
            command: self.command,
            ruleset: self.ruleset,
            stack_preset: self.stack_preset,
            catalog: self.catalog,
        }
    }
}

/// Resolve a request's references against the catalog and project store
pub fn load_context<'a>(
    catalog: &'a Catalog,
    store: &dyn ProjectStore,
    request: &ResolveRequest,
) -> Result<LoadedContext<'a>, BlockedResolution> {
    let Some(project) = store.project(&request.project_id) else {
        tracing::debug!(project = %request.project_id, "project not found");
        return Err(BlockedResolution::missing_project(&request.project_id));
    };

    let Some(command) = catalog.command(&request.command_id) else {
        tracing::debug!(command = %request.command_id, "unknown command");
        return Err(BlockedResolution::unknown_command(&request.command_id));
    };

    let Some(stack_preset) = catalog.stack_preset(&project.stack_preset_id) else {
        tracing::warn!(
            project = %project.id,
            stack_preset = %project.stack_preset_id,
            "project references unknown stack preset"
        );
        return Err(BlockedResolution::invalid_configuration(format!(
            "Project {} uses unknown stack preset: {}",
            project.id, project.stack_preset_id
        )));
    };

    let Some(ruleset) = catalog.ruleset(&project.active_ruleset_id) else {
        tracing::warn!(
            project = %project.id,
            ruleset = %project.active_ruleset_id,
            "project references unknown ruleset"
        );
        return Err(BlockedResolution::invalid_configuration(format!(
            "Project {} uses unknown ruleset: {}",
            project.id, project.active_ruleset_id
        )));
    };

    Ok(LoadedContext {
        project,
        command,
        ruleset,
        stack_preset,
        catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectRegistry;
    use crate::result::BlockReason;

    fn registry() -> ProjectRegistry {
        ProjectRegistry::from_projects(vec![
            ProjectConfig::new("web", "nextjs-app-router", "starter"),
            ProjectConfig::new("bad-preset", "cobol-mainframe", "starter"),
            ProjectConfig::new("bad-ruleset", "nextjs-app-router", "anything-goes"),
        ])
        .unwrap()
    }

    fn reason(project: &str, command: &str) -> BlockReason {
        let catalog = Catalog::builtin().unwrap();
        let request = ResolveRequest::new(project, command);
        load_context(&catalog, &registry(), &request)
            .unwrap_err()
            .reason
    }

    #[test]
    fn test_loads_known_references() {
        let catalog = Catalog::builtin().unwrap();
        let request = ResolveRequest::new("web", "create-component");
        let loaded = load_context(&catalog, &registry(), &request).unwrap();

        assert_eq!(loaded.project.id, "web");
        assert_eq!(loaded.ruleset.id, "starter");
        assert_eq!(loaded.context().stack_preset.id, "nextjs-app-router");
    }

    #[test]
    fn test_block_reasons() {
        assert_eq!(reason("mobile", "create-component"), BlockReason::MissingProject);
        assert_eq!(reason("web", "deploy"), BlockReason::UnknownCommand);
        assert_eq!(
            reason("bad-preset", "create-component"),
            BlockReason::InvalidConfiguration
        );
        assert_eq!(
            reason("bad-ruleset", "create-component"),
            BlockReason::InvalidConfiguration
        );
    }

    #[test]
    fn test_missing_project_checked_first() {
        assert_eq!(reason("mobile", "deploy"), BlockReason::MissingProject);
        assert_eq!(reason("bad-preset", "deploy"), BlockReason::UnknownCommand);
    }

    #[test]
    fn test_messages_name_the_reference() {
        let catalog = Catalog::builtin().unwrap();
        let request = ResolveRequest::new("bad-ruleset", "create-component");
        let blocked = load_context(&catalog, &registry(), &request).unwrap_err();
        assert!(blocked.message.contains("anything-goes"));
        assert!(blocked.conflicts.is_none());
    }
}
