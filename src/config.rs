use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};

/// Runtime settings gathered from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log: LogConfig,
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub filter: String,
    pub file: PathBuf,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a home directory for jobtrack data")]
    NoProjectDirs,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let dirs = ProjectDirs::from("", "", "jobtrack");
        Self::from_env(dirs.as_ref().map(|d| (d.data_dir(), d.config_dir())))
    }

    /// `dirs` holds the (data, config) directories; they are only consulted
    /// for values the environment leaves unset.
    fn from_env(dirs: Option<(&Path, &Path)>) -> Result<Self, ConfigError> {
        let filter = env::var("JOBTRACK_LOG").unwrap_or_else(|_| "info".to_string());
        let file = match env::var_os("JOBTRACK_LOG_FILE") {
            Some(file) => PathBuf::from(file),
            None => {
                let (data_dir, _) = dirs.ok_or(ConfigError::NoProjectDirs)?;
                data_dir.join("jobtrack.log")
            }
        };
        let seed_path = env::var_os("JOBTRACK_SEED")
            .map(PathBuf::from)
            .or_else(|| {
                let (_, config_dir) = dirs?;
                let candidate = config_dir.join("seed.yml");
                candidate.exists().then_some(candidate)
            });
        Ok(AppConfig {
            log: LogConfig { filter, file },
            seed_path,
        })
    }

    /// A seed path from the command line wins over the environment.
    pub fn with_seed_override(mut self, seed: Option<PathBuf>) -> Self {
        if seed.is_some() {
            self.seed_path = seed;
        }
        self
    }
}
