//! Manifest-based [`StackPipeline`].
//!
//! Analysis reports which well-known manifests are present; generation scans
//! the directory and hands it to the configured [`ConfigGenerator`].

use crate::scanner::{ScanError, WorkspaceScanner};
use async_trait::async_trait;
use dockerizer_application::ports::config_generator::ConfigGenerator;
use dockerizer_application::ports::stack_pipeline::{PipelineError, StackPipeline};
use dockerizer_domain::{FileSet, ScanResult, StackHint, StackReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Manifest file → language, in priority order.
pub const MANIFEST_HINTS: &[(&str, &str)] = &[
    ("Cargo.toml", "rust"),
    ("go.mod", "go"),
    ("package.json", "nodejs"),
    ("pyproject.toml", "python"),
    ("requirements.txt", "python"),
    ("Pipfile", "python"),
    ("Gemfile", "ruby"),
    ("composer.json", "php"),
    ("pom.xml", "java"),
    ("build.gradle", "java"),
    ("build.gradle.kts", "java"),
    ("mix.exs", "elixir"),
];

/// Language hints for the key files of a scan.
pub fn stack_hints(scan: &ScanResult) -> Vec<StackHint> {
    let mut hints: Vec<StackHint> = MANIFEST_HINTS
        .iter()
        .filter(|(manifest, _)| scan.has_key_file(manifest))
        .map(|(manifest, language)| StackHint {
            manifest: manifest.to_string(),
            language: language.to_string(),
        })
        .collect();
    hints.extend(
        scan.key_files
            .iter()
            .filter(|f| f.ends_with(".csproj"))
            .map(|f| StackHint {
                manifest: f.clone(),
                language: "dotnet".to_string(),
            }),
    );
    hints
}

pub struct ManifestStackPipeline<G: ConfigGenerator> {
    scanner: WorkspaceScanner,
    generator: Arc<G>,
}

impl<G: ConfigGenerator> ManifestStackPipeline<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            scanner: WorkspaceScanner::new(),
            generator,
        }
    }

    pub fn with_scanner(mut self, scanner: WorkspaceScanner) -> Self {
        self.scanner = scanner;
        self
    }

    async fn scan(&self, path: &Path) -> Result<ScanResult, PipelineError> {
        let scanner = self.scanner.clone();
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || scanner.scan(&path))
            .await
            .map_err(|e| PipelineError::Scan(e.to_string()))?
            .map_err(|e: ScanError| PipelineError::Scan(e.to_string()))
    }
}

#[async_trait]
impl<G: ConfigGenerator + 'static> StackPipeline for ManifestStackPipeline<G> {
    async fn analyze(
        &self,
        path: &Path,
        _cancel: &CancellationToken,
    ) -> Result<StackReport, PipelineError> {
        let scan = self.scan(path).await?;
        Ok(StackReport {
            hints: stack_hints(&scan),
            root: scan.root,
            file_count: scan.files.len(),
            key_files: scan.key_files,
        })
    }

    async fn generate(
        &self,
        path: &Path,
        instructions: &str,
        cancel: &CancellationToken,
    ) -> Result<FileSet, PipelineError> {
        let scan = self.scan(path).await?;
        if stack_hints(&scan).is_empty() {
            return Err(PipelineError::NotDetected);
        }
        Ok(self.generator.generate(&scan, instructions, cancel).await?)
    }
}
