//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILES: &[&str] = &["dockerizer.toml", ".dockerizer.toml"];
const ENV_PREFIX: &str = "DOCKERIZER_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `DOCKERIZER_AGENT__MAX_ATTEMPTS=3` and friends
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./dockerizer.toml` or `./.dockerizer.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/dockerizer/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dockerizer").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./dockerizer.toml or ./.dockerizer.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn isolate(jail: &mut Jail) {
        let home = jail.directory().to_path_buf();
        jail.set_env("HOME", home.display());
        jail.set_env("XDG_CONFIG_HOME", home.join(".config").display());
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.agent.max_attempts, 5);
        assert!(config.generator.command.is_none());
    }

    #[test]
    fn test_global_config_path() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("dockerizer/config.toml"));
        }
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                "dockerizer.toml",
                r#"
[agent]
max_attempts = 2

[generator]
command = "gen"
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.agent.max_attempts, 2);
            assert_eq!(config.agent.test_timeout_secs, 30);
            assert_eq!(config.generator.command(), Some("gen"));
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(".dockerizer.toml", "[agent]\nmax_attempts = 2\n")?;
            jail.create_file("ci.toml", "[agent]\nmax_attempts = 7\n")?;

            let config = ConfigLoader::load(Some(Path::new("ci.toml"))).map_err(|e| *e)?;
            assert_eq!(config.agent.max_attempts, 7);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("dockerizer.toml", "[agent]\nmax_attempts = 2\n")?;
            jail.set_env("DOCKERIZER_AGENT__MAX_ATTEMPTS", "9");
            jail.set_env("DOCKERIZER_INSPECTORS__REPETITION", "true");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.agent.max_attempts, 9);
            assert!(config.inspectors.repetition);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("dockerizer.toml", "[agent]\nmax_attempts = \"many\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
