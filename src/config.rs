use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::cleanup;
use crate::error::{Error, Result};
use crate::snapper::Snapper;

/// Contents of `~/.config/snapkeep/config.toml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub snapper_config: String,
    pub configs_dir: PathBuf,
    pub snapper_bin: PathBuf,
    pub log_level: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            snapper_config: "root".to_string(),
            configs_dir: PathBuf::from("/etc/snapper/configs"),
            snapper_bin: PathBuf::from("snapper"),
            log_level: "warn".to_string(),
        }
    }
}

pub struct Config {
    pub snapper_config: String,
    pub configs_dir: PathBuf,
    pub snapper_bin: PathBuf,
    pub log_level: String,
    pub json_output: bool,
}

/// Default settings file location (platform config dir)
pub fn settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "snapkeep")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// A missing file means defaults; a file that exists but does not parse is
/// an error rather than being silently ignored.
pub fn load_settings(path: &Path) -> Result<FileSettings> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileSettings::default()),
        Err(e) => {
            return Err(Error::Settings {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    toml::from_str(&text).map_err(|e| Error::Settings {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl Config {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let path = args.settings.clone().or_else(settings_path);
        let settings = match path {
            Some(p) => load_settings(&p)?,
            None => FileSettings::default(),
        };
        Ok(Config::from_settings(settings, args))
    }

    /// CLI flags win over the settings file.
    pub fn from_settings(settings: FileSettings, args: &GlobalArgs) -> Self {
        let log_level = if args.verbose {
            "debug".to_string()
        } else {
            settings.log_level
        };

        Config {
            snapper_config: args.config.clone().unwrap_or(settings.snapper_config),
            configs_dir: args.configs_dir.clone().unwrap_or(settings.configs_dir),
            snapper_bin: settings.snapper_bin,
            log_level,
            json_output: args.json,
        }
    }

    pub fn cleanup_config_path(&self) -> PathBuf {
        cleanup::config_path(&self.configs_dir, &self.snapper_config)
    }

    pub fn snapper(&self) -> Snapper {
        Snapper::new(&self.snapper_bin, &self.snapper_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GlobalArgs {
        GlobalArgs {
            config: None,
            configs_dir: None,
            settings: None,
            json: false,
            verbose: false,
        }
    }

    #[test]
    fn defaults_point_at_root_config() {
        let config = Config::from_settings(FileSettings::default(), &args());
        assert_eq!(config.cleanup_config_path(), PathBuf::from("/etc/snapper/configs/root"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn flags_override_file() {
        let settings: FileSettings = toml::from_str(
            "snapper_config = \"home\"\nconfigs_dir = \"/srv/configs\"\nlog_level = \"info\"\n",
        )
        .unwrap();
        assert_eq!(settings.snapper_bin, PathBuf::from("snapper"));

        let from_file = Config::from_settings(settings.clone(), &args());
        assert_eq!(from_file.cleanup_config_path(), PathBuf::from("/srv/configs/home"));
        assert_eq!(from_file.log_level, "info");

        let mut flags = args();
        flags.config = Some("var".into());
        flags.verbose = true;
        flags.json = true;
        let config = Config::from_settings(settings, &flags);
        assert_eq!(config.cleanup_config_path(), PathBuf::from("/srv/configs/var"));
        assert_eq!(config.log_level, "debug");
        assert!(config.json_output);
    }

    #[test]
    fn missing_settings_file_is_default() {
        let settings = load_settings(Path::new("/nonexistent/snapkeep/config.toml")).unwrap();
        assert_eq!(settings, FileSettings::default());
    }

    #[test]
    fn unknown_settings_field_is_rejected() {
        assert!(toml::from_str::<FileSettings>("page_size = 5\n").is_err());
    }
}
