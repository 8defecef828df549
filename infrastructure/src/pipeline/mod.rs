//! Stack pipeline adapters.

mod manifest;

pub use manifest::{MANIFEST_HINTS, ManifestStackPipeline, stack_hints};
