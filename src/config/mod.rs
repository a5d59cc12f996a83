use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_institution")]
    pub institution: String,
    #[serde(default = "default_faculty")]
    pub faculty: String,
    #[serde(default = "default_signer_name")]
    pub signer_name: String,
    #[serde(default = "default_signer_title")]
    pub signer_title: String,
    #[serde(default = "default_instructor_prefix")]
    pub instructor_prefix: String,
    #[serde(default = "default_open_after_export")]
    pub open_after_export: bool,
}

fn default_institution() -> String {
    "ESCUELA SUPERIOR POLITÉCNICA DE CHIMBORAZO".to_string()
}
fn default_faculty() -> String {
    "FACULTY OF MECHANICS".to_string()
}
fn default_signer_name() -> String {
    "Ing. Félix Ruiz M.".to_string()
}
fn default_signer_title() -> String {
    "Laboratory Technician".to_string()
}
fn default_instructor_prefix() -> String {
    "Ing.".to_string()
}
fn default_open_after_export() -> bool {
    true
}

/// Keys every configuration file is expected to carry.
const KNOWN_KEYS: [&str; 7] = [
    "database",
    "institution",
    "faculty",
    "signer_name",
    "signer_title",
    "instructor_prefix",
    "open_after_export",
];

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            institution: default_institution(),
            faculty: default_faculty(),
            signer_name: default_signer_name(),
            signer_title: default_signer_title(),
            instructor_prefix: default_instructor_prefix(),
            open_after_export: default_open_after_export(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("labregister")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".labregister")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("labregister.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("labregister.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Keys missing from the configuration file on disk (defaults are used for them).
    pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))?;

        let Some(map) = yaml.as_mapping() else {
            return Ok(KNOWN_KEYS.to_vec());
        };

        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(serde_yaml::Value::String((*k).to_string())))
            .collect())
    }

    /// Initialize configuration and database files.
    /// Returns the resolved database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("labregister.sqlite"),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Self::with_database(db_path.clone());
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_files_fill_in_report_defaults() {
        let yaml = "database: /tmp/lab.sqlite\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.database, "/tmp/lab.sqlite");
        assert_eq!(cfg.instructor_prefix, "Ing.");
        assert!(cfg.open_after_export);
    }

    #[test]
    fn missing_fields_lists_absent_keys() {
        let path = env::temp_dir().join("labregister_cfg_missing.conf");
        fs::write(&path, "database: x.sqlite\nfaculty: F\n").unwrap();

        let missing = Config::missing_fields(&path).unwrap();
        assert!(missing.contains(&"institution"));
        assert!(!missing.contains(&"faculty"));
        assert!(!missing.contains(&"database"));

        fs::remove_file(&path).ok();
    }
}
