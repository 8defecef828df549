//! Generated Docker configuration files.

use serde::{Deserialize, Serialize};

pub const DOCKERFILE: &str = "Dockerfile";
pub const DOCKER_COMPOSE: &str = "docker-compose.yml";
pub const DOCKERIGNORE: &str = ".dockerignore";
pub const ENV_EXAMPLE: &str = ".env.example";

/// Contents of the files one generation step produced.
///
/// Empty entries mean "not generated" and are never written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
    #[serde(default)]
    pub dockerfile: String,
    #[serde(default)]
    pub docker_compose: String,
    #[serde(default)]
    pub dockerignore: String,
    #[serde(default)]
    pub env_example: String,
}

impl FileSet {
    pub fn new(dockerfile: impl Into<String>) -> Self {
        Self {
            dockerfile: dockerfile.into(),
            ..Default::default()
        }
    }

    pub fn with_compose(mut self, content: impl Into<String>) -> Self {
        self.docker_compose = content.into();
        self
    }

    pub fn with_dockerignore(mut self, content: impl Into<String>) -> Self {
        self.dockerignore = content.into();
        self
    }

    pub fn with_env_example(mut self, content: impl Into<String>) -> Self {
        self.env_example = content.into();
        self
    }

    /// `(file name, content)` pairs in a fixed order, empty entries included.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (DOCKERFILE, self.dockerfile.as_str()),
            (DOCKER_COMPOSE, self.docker_compose.as_str()),
            (DOCKERIGNORE, self.dockerignore.as_str()),
            (ENV_EXAMPLE, self.env_example.as_str()),
        ]
    }

    /// Entries that should be written.
    pub fn non_empty(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries()
            .into_iter()
            .filter(|(_, content)| !content.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }

    pub fn file_names(&self) -> Vec<&'static str> {
        self.non_empty().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_skips_missing_files() {
        let files = FileSet::new("FROM alpine").with_dockerignore("target\n");
        assert_eq!(files.file_names(), vec!["Dockerfile", ".dockerignore"]);
        assert!(!files.is_empty());
        assert!(FileSet::default().is_empty());
    }

    #[test]
    fn test_deserializes_partial_response() {
        let files: FileSet =
            serde_json::from_str(r#"{"dockerfile":"FROM alpine","docker_compose":""}"#).unwrap();
        assert_eq!(files.dockerfile, "FROM alpine");
        assert!(files.env_example.is_empty());
    }
}
