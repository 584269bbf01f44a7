//! Covenant CLI
//!
//! ```bash
//! covenant [--config FILE] [--catalog FILE] [--projects FILE] [-v] resolve \
//!     --project web --command create-component --input "Button with variants"
//! ```
//!
//! Contracts and JSON go to stdout, logs to stderr. Exit code 2 means the
//! resolution was blocked, 1 means it failed.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use covenant_core::{
    load_catalog, AuditSink, Catalog, CompiledOutcome, ContractService, JsonlAuditLog,
    MemoryAuditLog, ProjectRegistry, ResolveRequest,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod check;
mod config;

use check::{check_projects, IssueLevel};
use config::CliConfig;

const EXIT_FAILED: u8 = 1;
const EXIT_BLOCKED: u8 = 2;

/// Covenant - deterministic instruction contracts for AI coding agents
#[derive(Parser)]
#[command(name = "covenant", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./covenant.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Catalog file, TOML or JSON (default: built-in catalog)
    #[arg(long, value_name = "FILE", global = true)]
    catalog: Option<PathBuf>,

    /// Projects file, TOML or JSON
    #[arg(long, value_name = "FILE", global = true)]
    projects: Option<PathBuf>,

    /// Append every resolution attempt to this JSON Lines file
    #[arg(long, value_name = "FILE", global = true)]
    audit_log: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a contract for a project and command
    Resolve {
        /// Project id
        #[arg(long)]
        project: String,

        /// Command id
        #[arg(long)]
        command: String,

        /// Free-text user request
        #[arg(long, default_value = "")]
        input: String,

        /// Path hint (repeatable)
        #[arg(long = "path", value_name = "PATH")]
        paths: Vec<String>,

        /// Tool hint (repeatable)
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<String>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List rules, rulesets, stack presets and commands
    Catalog {
        /// Print the catalog document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the catalog and every project against it
    Check,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    ExitCode::from(exit_status(run(cli), &mut io::stderr()))
}

/// Exit code for a finished command; errors are reported to `err`
fn exit_status(result: anyhow::Result<u8>, err: &mut impl Write) -> u8 {
    match result {
        Ok(code) => code,
        Err(error) => {
            let _ = writeln!(err, "{} {error:#}", "error:".red().bold());
            EXIT_FAILED
        }
    }
}

/// Layer command-line flags over the file and environment settings
fn apply_flags(mut config: CliConfig, cli: &Cli) -> CliConfig {
    if let Some(path) = &cli.catalog {
        config = config.with_catalog(path);
    }
    if let Some(path) = &cli.projects {
        config = config.with_projects(path);
    }
    if let Some(path) = &cli.audit_log {
        config = config.with_audit_log(path);
    }
    if cli.verbose {
        config = config.with_log_level("debug");
    }
    config
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = CliConfig::discover(cli.config.as_deref())?.with_process_env();
    let config = apply_flags(config, &cli);
    config.validate()?;

    init_tracing(&config, cli.verbose);
    tracing::debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Resolve {
            project,
            command,
            input,
            paths,
            tools,
            json,
        } => {
            let mut request = ResolveRequest::new(project, command).with_input(input);
            request.path_hints = paths;
            request.tool_hints = tools;
            run_resolve(&config, &request, json)
        }
        Commands::Catalog { json } => run_catalog(&config, json),
        Commands::Check => run_check(&config),
    }
}

fn init_tracing(config: &CliConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(&config.log_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn open_catalog(config: &CliConfig) -> anyhow::Result<Catalog> {
    let catalog = match &config.catalog {
        Some(path) => load_catalog(path)?,
        None => Catalog::builtin()?,
    };
    Ok(catalog)
}

fn open_projects(config: &CliConfig) -> anyhow::Result<ProjectRegistry> {
    let path = config.projects_path()?;
    Ok(ProjectRegistry::load(path)?)
}

fn run_resolve(config: &CliConfig, request: &ResolveRequest, json: bool) -> anyhow::Result<u8> {
    let catalog = open_catalog(config)?;
    let projects = open_projects(config)?;

    let audit: Arc<dyn AuditSink> = match &config.audit_log {
        Some(path) => Arc::new(JsonlAuditLog::new(path)?),
        None => Arc::new(MemoryAuditLog::new()),
    };
    let service =
        ContractService::new(Arc::new(catalog), Arc::new(projects)).with_audit_sink(audit);

    let outcome = service.compile(request);
    report_outcome(&outcome, json, &mut io::stdout(), &mut io::stderr())
}

/// Print an outcome and map it to an exit code
///
/// Contracts and `--json` output go to `out`, blocked reports to `err`.
fn report_outcome(
    outcome: &CompiledOutcome,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<u8> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?;
    }

    match outcome {
        CompiledOutcome::Contract(stamped) => {
            if !json {
                writeln!(out, "{}", stamped.text())?;
            }
            Ok(0)
        }
        CompiledOutcome::Blocked(blocked) => {
            if !json {
                writeln!(err, "{} {}", "BLOCKED".red().bold(), blocked)?;
                for conflict in blocked.conflicts.iter().flatten() {
                    writeln!(err, "  {} <-> {}: {}", conflict.a, conflict.b, conflict.reason)?;
                }
            }
            Ok(EXIT_BLOCKED)
        }
    }
}

fn run_catalog(config: &CliConfig, json: bool) -> anyhow::Result<u8> {
    let catalog = open_catalog(config)?;
    write_catalog(&catalog, json, &mut io::stdout())?;
    Ok(0)
}

fn write_catalog(catalog: &Catalog, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&catalog.to_document())?)?;
        return Ok(());
    }

    writeln!(out, "{}", "RULES".bold())?;
    for rule in catalog.rules() {
        let intents: Vec<_> = rule.applies_to.iter().map(|i| i.as_str()).collect();
        writeln!(
            out,
            "  {:<32} {:<5} [{}]",
            rule.id,
            rule.severity.as_str(),
            intents.join(", ")
        )?;
        for other in catalog.conflict_graph().neighbors(&rule.id) {
            writeln!(out, "      {} {}", "conflicts with".dimmed(), other)?;
        }
    }

    writeln!(out, "\n{}", "RULESETS".bold())?;
    for ruleset in catalog.rulesets() {
        writeln!(out, "  {:<32} {}", ruleset.id, ruleset.name)?;
        writeln!(out, "      mandatory: {}", ruleset.rule_ids.join(", "))?;
        if !ruleset.optional_rule_ids.is_empty() {
            writeln!(out, "      optional:  {}", ruleset.optional_rule_ids.join(", "))?;
        }
    }

    writeln!(out, "\n{}", "STACK PRESETS".bold())?;
    for preset in catalog.stack_presets() {
        writeln!(
            out,
            "  {:<32} {} (default ruleset: {})",
            preset.id, preset.name, preset.default_ruleset_id
        )?;
    }

    writeln!(out, "\n{}", "COMMANDS".bold())?;
    for command in catalog.commands() {
        writeln!(
            out,
            "  {:<32} {:<8} {}",
            command.id,
            command.intent.as_str(),
            command.name
        )?;
    }

    Ok(())
}

fn run_check(config: &CliConfig) -> anyhow::Result<u8> {
    let catalog = open_catalog(config).context("catalog is invalid")?;
    println!(
        "{} catalog: {} rules, {} conflicts",
        "ok".green().bold(),
        catalog.rule_count(),
        catalog.conflict_graph().conflict_count()
    );

    let projects = open_projects(config).context("projects are invalid")?;
    let issues = check_projects(&catalog, projects.projects());

    for issue in &issues {
        match issue.level {
            IssueLevel::Error => println!("{} {}", "error".red().bold(), issue),
            IssueLevel::Warning => println!("{} {}", "warning".yellow().bold(), issue),
        }
    }

    let errors = issues
        .iter()
        .filter(|i| i.level == IssueLevel::Error)
        .count();
    if errors > 0 {
        bail!("{errors} project configuration error(s)");
    }

    println!("{} {} project(s)", "ok".green().bold(), projects.len());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_core::{BlockedResolution, Conflict, ProjectConfig};

    fn compiled_outcome() -> CompiledOutcome {
        let projects = ProjectRegistry::from_projects(vec![ProjectConfig::new(
            "web",
            "nextjs-app-router",
            "standard",
        )])
        .unwrap();
        let service = ContractService::new(Arc::new(Catalog::builtin().unwrap()), Arc::new(projects));
        service.compile(&ResolveRequest::new("web", "create-component"))
    }

    fn blocked_outcome() -> CompiledOutcome {
        CompiledOutcome::Blocked(BlockedResolution::conflicting_rules(vec![
            Conflict::between_errors("no-network-calls", "use-remote-cache"),
        ]))
    }

    fn report(outcome: &CompiledOutcome, json: bool) -> (u8, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = report_outcome(outcome, json, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_compiled_prints_contract_and_exits_zero() {
        let outcome = compiled_outcome();
        let CompiledOutcome::Contract(stamped) = &outcome else {
            panic!("expected a compiled contract, got {outcome:?}");
        };

        let (code, out, err) = report(&outcome, false);
        assert_eq!(code, 0);
        assert!(out.contains(stamped.text()));
        assert!(out.contains("CODE GENERATION"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_blocked_lists_conflicts_and_exits_two() {
        let (code, out, err) = report(&blocked_outcome(), false);
        assert_eq!(code, EXIT_BLOCKED);
        assert!(out.is_empty());
        assert!(err.contains("BLOCKED"));
        assert!(err.contains("conflicting_rules"));
        assert!(err.contains("  no-network-calls <-> use-remote-cache: Rules no-network-calls"));
    }

    #[test]
    fn test_json_output_carries_status() {
        let (code, out, err) = report(&compiled_outcome(), true);
        assert_eq!(code, 0);
        assert!(err.is_empty());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "ok");
        assert!(value["fingerprint"].is_string());

        let (code, out, err) = report(&blocked_outcome(), true);
        assert_eq!(code, EXIT_BLOCKED);
        assert!(err.is_empty());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "blocked");
        assert_eq!(value["reason"], "conflicting_rules");
        assert_eq!(value["conflicts"][0]["a"], "no-network-calls");
    }

    #[test]
    fn test_errors_exit_one() {
        let mut err = Vec::new();
        let code = exit_status(Err(anyhow::anyhow!("projects file missing")), &mut err);
        assert_eq!(code, EXIT_FAILED);
        assert!(String::from_utf8(err).unwrap().contains("projects file missing"));

        assert_eq!(exit_status(Ok(EXIT_BLOCKED), &mut Vec::new()), EXIT_BLOCKED);
    }

    #[test]
    fn test_resolve_without_projects_is_an_error() {
        let request = ResolveRequest::new("web", "create-component");
        let err = run_resolve(&CliConfig::default(), &request, false).unwrap_err();
        assert!(err.to_string().contains("projects"));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "covenant",
            "--catalog",
            "team.toml",
            "-v",
            "resolve",
            "--project",
            "web",
            "--command",
            "create-component",
        ])
        .unwrap();
        let config = apply_flags(
            CliConfig::default()
                .with_catalog("file.toml")
                .with_projects("projects.toml"),
            &cli,
        );

        assert_eq!(config.catalog, Some(PathBuf::from("team.toml")));
        assert_eq!(config.projects, Some(PathBuf::from("projects.toml")));
        assert_eq!(config.log_level, "debug");
        assert!(config.audit_log.is_none());
    }

    #[test]
    fn test_catalog_listing() {
        let catalog = Catalog::builtin().unwrap();

        let mut out = Vec::new();
        write_catalog(&catalog, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for section in ["RULES", "RULESETS", "STACK PRESETS", "COMMANDS"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("create-component"));
        assert!(text.contains("Next.js (App Router)"));

        let mut out = Vec::new();
        write_catalog(&catalog, true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value["rules"].as_array().map(Vec::len),
            Some(catalog.rule_count())
        );
    }
}
