//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOCAL_CONFIG_FILE};
use crate::error::{RestoreError, RestoreResult};
use crate::target::TargetFramework;
use crate::ui::{self, UiContext};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Keys accepted by `config set`
const CONFIG_KEYS: [&str; 9] = [
    "general.verbose",
    "general.log_format",
    "target.framework",
    "target.runtime",
    "repositories.global_packages",
    "repositories.fallback_folders",
    "repositories.feeds",
    "cache.dir",
    "cache.disabled",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> RestoreResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            if local {
                set_local_value(&key, &value).await?
            } else {
                set_value(manager, &key, &value).await?
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> RestoreResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> RestoreResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> RestoreResult<()> {
    let ctx = UiContext::detect();
    // Start from the file alone so local overrides are not copied into it
    let mut config = manager.load().await?;

    if let Err(e) = apply_value(&mut config, key, value) {
        if !CONFIG_KEYS.contains(&key) {
            ui::step_error_detail(&ctx, "Unknown config key", key);
            ui::remark(&ctx, &format!("Valid keys: {}", CONFIG_KEYS.join(", ")));
        }
        return Err(e);
    }

    manager.save(&config).await?;
    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a dotted `key` to `config`, validating `value`
fn apply_value(config: &mut Config, key: &str, value: &str) -> RestoreResult<()> {
    let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
    let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

    match key.split('.').collect::<Vec<_>>().as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,
        ["target", "framework"] => {
            TargetFramework::parse(value)?;
            config.target.framework = value.to_string();
        }
        ["target", "runtime"] => config.target.runtime = optional(value),
        ["repositories", "global_packages"] => {
            config.repositories.global_packages = optional_path(value)
        }
        ["repositories", "fallback_folders"] => {
            config.repositories.fallback_folders = split_list(value).map(PathBuf::from).collect()
        }
        ["repositories", "feeds"] => {
            config.repositories.feeds = split_list(value).map(PathBuf::from).collect()
        }
        ["cache", "dir"] => config.cache.dir = optional_path(value),
        ["cache", "disabled"] => config.cache.disabled = parse_bool(value)?,
        _ => return Err(RestoreError::User(format!("Unknown config key: {}", key))),
    }
    Ok(())
}

async fn set_local_value(key: &str, value: &str) -> RestoreResult<()> {
    let ctx = UiContext::detect();
    let cwd =
        std::env::current_dir().map_err(|e| RestoreError::io("getting current directory", e))?;
    let local_path = cwd.join(LOCAL_CONFIG_FILE);

    write_local_value(&local_path, key, value).await?;

    ui::step_ok(
        &ctx,
        &format!("Set {} = {} in {}", key, value, local_path.display()),
    );

    Ok(())
}

/// Set one key in the local config file at `path`, keeping every other key as written
async fn write_local_value(path: &Path, key: &str, value: &str) -> RestoreResult<()> {
    // Validate, then take the typed value from the schema
    let mut validated = Config::default();
    apply_value(&mut validated, key, value)?;
    let typed = schema_value(&validated, key)?;

    let exists = fs::try_exists(path)
        .await
        .map_err(|e| RestoreError::io(format!("checking {}", path.display()), e))?;
    let mut doc: toml::Value = if exists {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RestoreError::io(format!("reading {}", path.display()), e))?;
        content
            .parse()
            .map_err(|e: toml::de::Error| RestoreError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
    } else {
        toml::Value::Table(toml::map::Map::new())
    };

    set_toml_value(&mut doc, key, typed)?;

    let content = toml::to_string_pretty(&doc)?;
    fs::write(path, content)
        .await
        .map_err(|e| RestoreError::io(format!("writing {}", path.display()), e))
}

/// TOML form of `key` in `config`; `None` when an optional key is unset
fn schema_value(config: &Config, key: &str) -> RestoreResult<Option<toml::Value>> {
    let (section, leaf) = split_key(key)?;
    let tree = toml::Value::try_from(config)?;
    Ok(tree.get(section).and_then(|table| table.get(leaf)).cloned())
}

/// Set or, for `None`, remove `SECTION.KEY` in a TOML document
fn set_toml_value(doc: &mut toml::Value, key: &str, value: Option<toml::Value>) -> RestoreResult<()> {
    let (section, leaf) = split_key(key)?;
    let root = doc
        .as_table_mut()
        .ok_or_else(|| RestoreError::User("Local config is not a table".to_string()))?;
    let table = root
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .ok_or_else(|| RestoreError::User(format!("Expected table at key: {}", section)))?;

    match value {
        Some(value) => {
            table.insert(leaf.to_string(), value);
        }
        None => {
            table.remove(leaf);
        }
    }
    Ok(())
}

fn split_key(key: &str) -> RestoreResult<(&str, &str)> {
    key.split_once('.')
        .ok_or_else(|| RestoreError::User(format!("Expected SECTION.KEY, got: {}", key)))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(value: &str) -> RestoreResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(RestoreError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_log_format(value: &str) -> RestoreResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(RestoreError::User(format!(
            "Invalid log format: {}. Use text or json",
            value
        ))),
    }
}
