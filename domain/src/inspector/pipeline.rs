//! Ordered, short-circuiting inspector pipeline.

use super::{ContentInspector, Inspector, RepetitionInspector, SecurityInspector, SyntaxInspector};
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolError;
use std::sync::Arc;

/// First rejection produced by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorRejection {
    pub inspector: String,
    pub reason: String,
}

impl From<InspectorRejection> for ToolError {
    fn from(rejection: InspectorRejection) -> Self {
        ToolError::inspector_rejected(rejection.inspector, rejection.reason)
    }
}

#[derive(Clone, Default)]
pub struct InspectorPipeline {
    inspectors: Vec<Arc<dyn Inspector>>,
}

impl InspectorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Security and syntax always; repetition and content when enabled.
    pub fn standard(repetition_threshold: Option<usize>, content: bool) -> Self {
        let mut pipeline = Self::new()
            .with(SecurityInspector::new())
            .with(SyntaxInspector::new());
        if let Some(threshold) = repetition_threshold {
            pipeline = pipeline.with(RepetitionInspector::new(threshold));
        }
        if content {
            pipeline = pipeline.with(ContentInspector::new());
        }
        pipeline
    }

    pub fn with(mut self, inspector: impl Inspector + 'static) -> Self {
        self.inspectors.push(Arc::new(inspector));
        self
    }

    pub fn with_shared(mut self, inspector: Arc<dyn Inspector>) -> Self {
        self.inspectors.push(inspector);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.inspectors.iter().map(|i| i.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.inspectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inspectors.is_empty()
    }

    /// Run inspectors in order, stopping at the first rejection.
    pub fn inspect(&self, call: &ToolCall) -> Result<(), InspectorRejection> {
        for inspector in &self.inspectors {
            if let Err(reason) = inspector.inspect(call) {
                return Err(InspectorRejection {
                    inspector: inspector.name().to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for InspectorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectorPipeline")
            .field("inspectors", &self.names())
            .finish()
    }
}
