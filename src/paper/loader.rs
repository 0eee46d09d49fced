//! @acp:module "Paper Config Loader"
//! @acp:summary "Load and merge paper policy from defaults, project file and CLI"
//! @acp:domain paper
//! @acp:layer io

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::types::*;

/// CLI overrides for paper configuration
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub preset: Option<String>,
    pub no_choices: bool,
    pub no_fill: bool,
    pub title: Option<String>,
    pub subject: Option<String>,
}

/// Project file shape: every section optional, present sections win
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectPolicy {
    #[serde(default)]
    planning: Option<PlanningPolicy>,
    #[serde(default)]
    choice: Option<ChoicePolicy>,
    #[serde(default)]
    paper: Option<PaperMetadata>,
}

/// Policy file picked up from the working directory when present
pub const DEFAULT_POLICY_FILE: &str = ".qpgen.json";

/// Decide which policy file to load.
///
/// An explicit path must exist. Without one, `.qpgen.json` is used only if present.
pub fn resolve_policy_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            std::fs::metadata(path)
                .with_context(|| format!("Policy file not found: {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => {
            let default = Path::new(DEFAULT_POLICY_FILE);
            Ok(default.exists().then(|| default.to_path_buf()))
        }
    }
}

/// Load paper configuration with 3-layer merging:
/// 1. Built-in defaults (policy.defaults.json)
/// 2. Project customization (.qpgen.json or --policy)
/// 3. CLI overrides
pub fn load_paper_config(project_policy: Option<&Path>, cli: &CliOverrides) -> Result<PaperConfig> {
    let mut config = load_builtin_defaults()?;

    if let Some(path) = project_policy {
        let project = load_project_policy(path)?;
        config = merge_configs(config, project);
        tracing::debug!("Merged policy from {}", path.display());
    }

    Ok(apply_cli_overrides(config, cli))
}

fn load_builtin_defaults() -> Result<PaperConfig> {
    let json = include_str!("../../defaults/policy.defaults.json");
    serde_json::from_str(json).context("Failed to parse built-in policy.defaults.json")
}

fn load_project_policy(path: &Path) -> Result<ProjectPolicy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy from {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse policy from {:?}", path))
}

fn merge_configs(base: PaperConfig, project: ProjectPolicy) -> PaperConfig {
    let mut result = base;

    if let Some(planning) = project.planning {
        if planning.bands.is_empty() {
            tracing::warn!("Project policy has no planning bands; keeping defaults");
            result.planning.fill_to_target = planning.fill_to_target;
        } else {
            result.planning = planning;
        }
    }

    if let Some(choice) = project.choice {
        result.choice = choice;
    }

    // Metadata merges per field so a project can set only the subject
    if let Some(paper) = project.paper {
        let meta = &mut result.paper;
        meta.title = paper.title.or(meta.title.take());
        meta.subject = paper.subject.or(meta.subject.take());
        meta.duration = paper.duration.or(meta.duration.take());
        meta.instructions = paper.instructions.or(meta.instructions.take());
    }

    result
}

fn apply_cli_overrides(mut config: PaperConfig, cli: &CliOverrides) -> PaperConfig {
    if let Some(ref preset) = cli.preset {
        config.planning.bands = super::presets::get_preset_bands(preset);
    }
    if cli.no_choices {
        config.choice.enabled = false;
    }
    if cli.no_fill {
        config.planning.fill_to_target = false;
    }
    if let Some(ref title) = cli.title {
        config.paper.title = Some(title.clone());
    }
    if let Some(ref subject) = cli.subject {
        config.paper.subject = Some(subject.clone());
    }
    config
}
