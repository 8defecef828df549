//! Tool domain entities

use super::value_objects::ToolError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk - read-only operations (e.g., file_read, docker_logs)
    Low,
    /// High risk - operations that modify state (e.g., file_write, shell, docker_run)
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    pub fn is_side_effecting(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool that can be dispatched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "file_write")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Risk level of this tool
    pub risk_level: RiskLevel,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Specification of the tools registered with a dispatcher
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// All definitions, sorted by name for stable listings
    pub fn all(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A proposed call to a tool with its raw arguments.
///
/// Arguments arrive as an untyped JSON bag. Each tool decodes them into its
/// own argument struct with [`ToolCall::parse_args`] before doing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Decode the argument bag into a tool's typed argument struct.
    ///
    /// Missing fields, wrong value types and unknown keys (for structs that
    /// use `deny_unknown_fields`) all fail with `INVALID_ARGUMENT`.
    pub fn parse_args<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .arguments
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| {
            ToolError::invalid_argument(format!("Invalid arguments for {}: {}", self.tool_name, e))
        })
    }

    /// Deterministic `tool:arguments` signature (keys sorted).
    pub fn signature(&self) -> String {
        let sorted: BTreeMap<&String, &serde_json::Value> = self.arguments.iter().collect();
        let args = serde_json::to_string(&sorted).unwrap_or_default();
        format!("{}:{}", self.tool_name, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct PathArgs {
        path: String,
        #[serde(default)]
        overwrite: bool,
    }

    #[test]
    fn test_risk_level() {
        assert!(!RiskLevel::Low.is_side_effecting());
        assert!(RiskLevel::High.is_side_effecting());
        assert_eq!(RiskLevel::High.to_string(), "high");
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("file_read", "Read file contents", RiskLevel::Low)
            .with_parameter(
                ToolParameter::new("path", "File path to read", true).with_type("path"),
            );

        assert_eq!(tool.name, "file_read");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].param_type, "path");
    }

    #[test]
    fn test_tool_spec_sorted_listing() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("shell", "Run", RiskLevel::High))
            .register(ToolDefinition::new("file_read", "Read", RiskLevel::Low));

        let names: Vec<_> = spec.all().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["file_read", "shell"]);
        assert!(spec.get("unknown").is_none());
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_parse_args_typed() {
        let call = ToolCall::new("file_read").with_arg("path", "Dockerfile");
        let args: PathArgs = call.parse_args().unwrap();
        assert_eq!(args.path, "Dockerfile");
        assert!(!args.overwrite);
    }

    #[test]
    fn test_parse_args_rejects_wrong_type() {
        let call = ToolCall::new("file_read").with_arg("path", 42);
        let err = call.parse_args::<PathArgs>().unwrap_err();
        assert_eq!(err.code.as_str(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_parse_args_rejects_unknown_key() {
        let call = ToolCall::new("file_read")
            .with_arg("path", "a.txt")
            .with_arg("mode", "0777");
        assert!(call.parse_args::<PathArgs>().is_err());
    }

    #[test]
    fn test_signature_is_order_independent() {
        let a = ToolCall::new("docker_build")
            .with_arg("tag", "x:1")
            .with_arg("dockerfile", "Dockerfile");
        let b = ToolCall::new("docker_build")
            .with_arg("dockerfile", "Dockerfile")
            .with_arg("tag", "x:1");
        assert_eq!(a.signature(), b.signature());
        assert!(a.signature().starts_with("docker_build:"));
    }
}
