//! `covenant check`: cross-check projects against the catalog

use covenant_core::{Catalog, ProjectConfig};
use std::fmt;

/// Whether an issue blocks every resolution for the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Error,
    Warning,
}

/// A problem with one project's configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIssue {
    pub project_id: String,
    pub level: IssueLevel,
    pub message: String,
}

impl fmt::Display for ProjectIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.project_id, self.message)
    }
}

/// Every issue found across `projects`, in project order
///
/// Unknown stack presets and rulesets are errors: resolution would block
/// with `invalid_configuration`. Toggles naming rules outside the catalog
/// or outside the active ruleset have no effect and are warnings.
pub fn check_projects<'a>(
    catalog: &Catalog,
    projects: impl IntoIterator<Item = &'a ProjectConfig>,
) -> Vec<ProjectIssue> {
    let mut issues = Vec::new();

    for project in projects {
        let mut push = |level, message: String| {
            issues.push(ProjectIssue {
                project_id: project.id.clone(),
                level,
                message,
            })
        };

        if catalog.stack_preset(&project.stack_preset_id).is_none() {
            push(
                IssueLevel::Error,
                format!("unknown stack preset {}", project.stack_preset_id),
            );
        }

        let ruleset = catalog.ruleset(&project.active_ruleset_id);
        if ruleset.is_none() {
            push(
                IssueLevel::Error,
                format!("unknown ruleset {}", project.active_ruleset_id),
            );
        }

        for rule_id in project.rule_toggles.keys() {
            if catalog.rule(rule_id).is_none() {
                push(IssueLevel::Warning, format!("toggle for unknown rule {rule_id}"));
            } else if let Some(ruleset) = ruleset {
                if !ruleset.referenced_rules().any(|id| id == rule_id) {
                    push(
                        IssueLevel::Warning,
                        format!("toggle for {rule_id} outside ruleset {}", ruleset.id),
                    );
                }
            }
        }
    }

    issues
}
