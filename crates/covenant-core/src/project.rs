//! Projects and resolution requests
//!
//! A [`ProjectConfig`] is the resolver's view of a stored project: which
//! stack preset and ruleset it uses and how individual rules are toggled.
//! Projects come from a [`ProjectStore`]; [`ProjectRegistry`] is the
//! in-memory store used by the CLI and the tests.

use crate::catalog::CatalogFormat;
use crate::error::{ConfigError, Result, ResultExt};
use crate::types::RuleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Per-rule override map: `true` enables, `false` disables, absent keeps the default
pub type RuleToggles = BTreeMap<RuleId, bool>;

/// Project record as seen by the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub stack_preset_id: String,

    pub active_ruleset_id: String,

    #[serde(default)]
    pub rule_toggles: RuleToggles,
}

impl ProjectConfig {
    pub fn new(
        id: impl Into<String>,
        stack_preset_id: impl Into<String>,
        active_ruleset_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            stack_preset_id: stack_preset_id.into(),
            active_ruleset_id: active_ruleset_id.into(),
            rule_toggles: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_toggle(mut self, rule_id: impl Into<String>, enabled: bool) -> Self {
        self.rule_toggles.insert(rule_id.into(), enabled);
        self
    }
}

/// A request to compile a contract
///
/// Path and tool hints are carried for consumers; the resolver never reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub project_id: String,

    pub command_id: String,

    #[serde(default)]
    pub user_input: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_hints: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_hints: Vec<String>,
}

impl ResolveRequest {
    pub fn new(project_id: impl Into<String>, command_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            command_id: command_id.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, user_input: impl Into<String>) -> Self {
        self.user_input = user_input.into();
        self
    }

    pub fn with_path_hint(mut self, path: impl Into<String>) -> Self {
        self.path_hints.push(path.into());
        self
    }

    pub fn with_tool_hint(mut self, tool: impl Into<String>) -> Self {
        self.tool_hints.push(tool.into());
        self
    }
}

/// Source of project records
pub trait ProjectStore: Send + Sync {
    /// Look a project up by id
    fn project(&self, id: &str) -> Option<ProjectConfig>;
}

/// In-memory project store
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: HashMap<String, ProjectConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectsDocument {
    #[serde(default)]
    projects: Vec<ProjectConfig>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project, replacing any previous record with the same id
    pub fn insert(&mut self, project: ProjectConfig) -> Option<ProjectConfig> {
        self.projects.insert(project.id.clone(), project)
    }

    /// Build a registry, rejecting duplicate ids
    pub fn from_projects(projects: impl IntoIterator<Item = ProjectConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for project in projects {
            let id = project.id.clone();
            if registry.insert(project).is_some() {
                return Err(ConfigError::DuplicateProject(id).into());
            }
        }
        Ok(registry)
    }

    /// Load `[[projects]]` from a TOML or JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading projects {}", path.display()))?;
        let document: ProjectsDocument = match format {
            CatalogFormat::Toml => toml::from_str(&text)
                .with_context(|| format!("parsing projects {}", path.display()))?,
            CatalogFormat::Json => serde_json::from_str(&text)
                .with_context(|| format!("parsing projects {}", path.display()))?,
        };
        let registry = Self::from_projects(document.projects)?;
        tracing::info!(path = %path.display(), projects = registry.len(), "projects loaded");
        Ok(registry)
    }

    /// All projects, sorted by id
    pub fn projects(&self) -> Vec<&ProjectConfig> {
        let mut out: Vec<_> = self.projects.values().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectStore for ProjectRegistry {
    fn project(&self, id: &str) -> Option<ProjectConfig> {
        self.projects.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserializes_toggles() {
        let project: ProjectConfig = serde_json::from_str(
            r#"{
                "id": "web",
                "stackPresetId": "nextjs-app-router",
                "activeRulesetId": "starter",
                "ruleToggles": {"keep-changes-readable": true, "no-new-dependencies": false}
            }"#,
        )
        .unwrap();

        assert_eq!(project.rule_toggles.get("keep-changes-readable"), Some(&true));
        assert_eq!(project.rule_toggles.get("no-new-dependencies"), Some(&false));
        assert!(project.name.is_empty());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let result = ProjectRegistry::from_projects(vec![
            ProjectConfig::new("web", "nextjs-app-router", "starter"),
            ProjectConfig::new("web", "rust-service", "careful-refactor"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ProjectRegistry::from_projects(vec![
            ProjectConfig::new("web", "nextjs-app-router", "starter"),
            ProjectConfig::new("api", "rust-service", "careful-refactor"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.project("api").is_some());
        assert!(registry.project("mobile").is_none());
        let ids: Vec<_> = registry.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["api", "web"]);
    }

    #[test]
    fn test_load_projects_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.toml");
        std::fs::write(
            &path,
            r#"
[[projects]]
id = "web"
name = "Marketing site"
stackPresetId = "nextjs-app-router"
activeRulesetId = "starter"

[projects.ruleToggles]
keep-changes-readable = true
"#,
        )
        .unwrap();

        let registry = ProjectRegistry::load(&path).unwrap();
        let web = registry.project("web").unwrap();
        assert_eq!(web.name, "Marketing site");
        assert_eq!(web.rule_toggles.get("keep-changes-readable"), Some(&true));
    }

    #[test]
    fn test_request_builder() {
        let request = ResolveRequest::new("web", "create-component")
            .with_input("Button with variants")
            .with_path_hint("src/components")
            .with_tool_hint("edit");
        assert_eq!(request.user_input, "Button with variants");
        assert_eq!(request.path_hints, vec!["src/components"]);
        assert_eq!(request.tool_hints, vec!["edit"]);
    }
}
