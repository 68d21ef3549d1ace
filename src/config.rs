use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::resources::Resources;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Menu file shown when `--menu` is not given.
    #[serde(default)]
    pub menu: Option<PathBuf>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Write changed resources back to this file when an interactive session
    /// ends. Defaults to on.
    #[serde(default)]
    pub save_on_exit: Option<bool>,

    /// Initial values for the settings the menu edits.
    #[serde(default)]
    pub resources: Resources,
}

impl Config {
    pub fn save_on_exit(&self) -> bool {
        self.save_on_exit.unwrap_or(true)
    }
}

/// Loads the config from the resolved path, if there is one.
pub fn load_optional() -> Result<Option<(PathBuf, Config)>> {
    let Some(path) = resolve_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let cfg = load_from(&path)?;
    Ok(Some((path, cfg)))
}

pub fn load_from(path: &Path) -> Result<Config> {
    let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let cfg: Config =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("TUIMENU_CONFIG") {
        if !p.trim().is_empty() {
            return Some(PathBuf::from(p));
        }
    }

    let local = PathBuf::from("tuimenu.json");
    if local.exists() {
        return Some(local);
    }

    if let Some(appdata) = env::var_os("APPDATA") {
        return Some(PathBuf::from(appdata).join("tuimenu").join("config.json"));
    }

    if let Some(home) = env::var_os("HOME") {
        return Some(PathBuf::from(home).join(".config").join("tuimenu").join("config.json"));
    }

    None
}

/// Replaces the `resources` object in the config at `path`, leaving every
/// other key as it was. Creates the file (and its directory) if missing.
pub fn patch_resources(path: &Path, resources: &Resources) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }

    let mut root = read_json_or_empty_object(path)?;
    let obj = root
        .as_object_mut()
        .ok_or_else(|| anyhow!("config root must be a JSON object"))?;

    obj.insert(
        "resources".to_string(),
        serde_json::to_value(resources).context("serialize resources")?,
    );

    let mut s = serde_json::to_string_pretty(&root).context("serialize config")?;
    s.push('\n');
    fs::write(path, s.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn read_json_or_empty_object(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }

    let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let v: Value =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert!(cfg.menu.is_none());
        assert!(cfg.save_on_exit());
        assert!(cfg.resources.is_empty());
    }

    #[test]
    fn load_from_reads_resources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "menu": "audio.json", "save_on_exit": false,
                 "resources": { "Sound": 1, "SoundDevice": "sb16" } }"#,
        )
        .unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.menu.as_deref(), Some(Path::new("audio.json")));
        assert!(!cfg.save_on_exit());
        assert_eq!(cfg.resources.get_int("Sound"), Some(1));
        assert_eq!(cfg.resources.get_str("SoundDevice"), Some("sb16"));
    }

    #[test]
    fn load_from_names_the_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn patch_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "log_file": "menu.log", "resources": { "Old": 1 } }"#).unwrap();

        let mut res = Resources::new();
        res.set_int("Sound", 0);
        patch_resources(&path, &res).unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.log_file.as_deref(), Some(Path::new("menu.log")));
        assert_eq!(cfg.resources, res);
    }

    #[test]
    fn patch_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut res = Resources::new();
        res.set_str("FSDevice8Dir", "/tmp");
        patch_resources(&path, &res).unwrap();
        assert_eq!(load_from(&path).unwrap().resources, res);
    }

    #[test]
    fn patch_rejects_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(patch_resources(&path, &Resources::new()).is_err());
    }
}
