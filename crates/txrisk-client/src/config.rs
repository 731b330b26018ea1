use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::risk::RuleSet;
use crate::{ClientError, ClientResult};

pub const CONFIG_ENV_VAR: &str = "TXRISK_CONFIG";
const DEFAULT_CONFIG_DIR: &str = ".txrisk";
const DEFAULT_CONFIG_FILE: &str = "rules.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    rules: RulesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesSection {
    amount_threshold: Option<f64>,
    country_allow_list: Option<Vec<String>>,
    time_prefix: Option<String>,
}

/// Rule settings supplied on the command line, plus where to look for a file.
#[derive(Debug, Clone, Default)]
pub struct RuleOverrides {
    pub config_path: Option<PathBuf>,
    pub amount_threshold: Option<f64>,
    pub country_allow_list: Vec<String>,
    pub time_prefix: Option<String>,
    #[doc(hidden)]
    pub home_override: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Default,
    File,
}

#[derive(Debug, Clone)]
pub struct ResolvedRules {
    pub rules: RuleSet,
    pub source: ConfigSource,
    pub config_path: Option<PathBuf>,
    pub overridden: Vec<&'static str>,
}

/// Layers the built-in defaults, an optional TOML file, and CLI overrides.
///
/// The file comes from `--config`, then `TXRISK_CONFIG`, then
/// `~/.txrisk/rules.toml`. Only the last one may be absent without error.
pub fn resolve_rules(overrides: &RuleOverrides) -> ClientResult<ResolvedRules> {
    let env_path = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let home_dir = match &overrides.home_override {
        Some(path) => Some(path.clone()),
        None => home::home_dir(),
    };
    resolve_rules_from(overrides, env_path, home_dir)
}

pub(crate) fn resolve_rules_from(
    overrides: &RuleOverrides,
    env_path: Option<PathBuf>,
    home_dir: Option<PathBuf>,
) -> ClientResult<ResolvedRules> {
    let (config_path, explicit) = match (&overrides.config_path, env_path) {
        (Some(path), _) => (Some(path.clone()), true),
        (None, Some(path)) => (Some(path), true),
        (None, None) => (
            home_dir
                .map(|home| home.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
                .filter(|path| path.is_file()),
            false,
        ),
    };

    let mut rules = RuleSet::default();
    let mut source = ConfigSource::Default;

    if let Some(path) = &config_path {
        if explicit && !path.is_file() {
            return Err(ClientError::invalid_config(
                Some(path),
                "the file does not exist",
            ));
        }
        let file = read_config_file(path)?;
        rules = apply_file(rules, file.rules, path)?;
        source = ConfigSource::File;
    }

    let mut overridden = Vec::new();
    if let Some(threshold) = overrides.amount_threshold {
        rules = rules.with_amount_threshold(threshold);
        overridden.push("amount_threshold");
    }
    if !overrides.country_allow_list.is_empty() {
        validate_allow_list(&overrides.country_allow_list, None)?;
        rules = rules.with_country_allow_list(&overrides.country_allow_list);
        overridden.push("country_allow_list");
    }
    if let Some(prefix) = &overrides.time_prefix {
        rules = rules.with_time_prefix(prefix);
        overridden.push("time_prefix");
    }
    validate_rules(&rules, None)?;

    tracing::debug!(
        source = ?source,
        config_path = ?config_path,
        amount_threshold = rules.amount_threshold,
        overridden = ?overridden,
        "resolved rule set"
    );

    Ok(ResolvedRules {
        rules,
        source,
        config_path: if source == ConfigSource::File {
            config_path
        } else {
            None
        },
        overridden,
    })
}

fn read_config_file(path: &Path) -> ClientResult<ConfigFile> {
    let body = fs::read_to_string(path)
        .map_err(|error| ClientError::invalid_config(Some(path), &error.to_string()))?;
    toml::from_str::<ConfigFile>(&body)
        .map_err(|error| ClientError::invalid_config(Some(path), error.message()))
}

fn apply_file(mut rules: RuleSet, section: RulesSection, path: &Path) -> ClientResult<RuleSet> {
    if let Some(threshold) = section.amount_threshold {
        rules = rules.with_amount_threshold(threshold);
    }
    if let Some(countries) = section.country_allow_list {
        validate_allow_list(&countries, Some(path))?;
        rules = rules.with_country_allow_list(countries);
    }
    if let Some(prefix) = section.time_prefix {
        rules = rules.with_time_prefix(&prefix);
    }
    validate_rules(&rules, Some(path))?;
    Ok(rules)
}

fn validate_rules(rules: &RuleSet, path: Option<&Path>) -> ClientResult<()> {
    if !rules.amount_threshold.is_finite() {
        return Err(ClientError::invalid_config(
            path,
            "amount_threshold must be a finite number",
        ));
    }
    if let Some(prefix) = &rules.time_prefix
        && prefix.trim().is_empty()
    {
        return Err(ClientError::invalid_config(
            path,
            "time_prefix must not be empty",
        ));
    }
    Ok(())
}

fn validate_allow_list<'a, I>(countries: I, path: Option<&Path>) -> ClientResult<()>
where
    I: IntoIterator<Item = &'a String>,
{
    if countries.into_iter().any(|country| country.trim().is_empty()) {
        return Err(ClientError::invalid_config(
            path,
            "country_allow_list entries must not be empty",
        ));
    }
    Ok(())
}
