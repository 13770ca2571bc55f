//! Externally supplied configuration records.
//!
//! Records originate from the platform's JSON store and keep its wire field
//! names: camelCase for most fields, with the historical snake_case names for
//! the model override fields. Everything is optional at the serde layer so
//! that validation happens during the build and failures carry the offending
//! record's display name instead of a bare deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One agent node as stored by the platform.
///
/// `agent_type` decides which of the remaining fields are meaningful; fields
/// a given type does not use are ignored, not rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub name: Option<String>,
    pub agent_type: Option<String>,
    pub description: Option<String>,
    /// Prompt text; conversational agents only.
    pub instruction: Option<String>,
    pub selected_provider_id: Option<String>,
    #[serde(rename = "litellm_model_string", alias = "modelString")]
    pub model_string: Option<String>,
    #[serde(rename = "litellm_api_base", alias = "apiBase")]
    pub api_base: Option<String>,
    #[serde(rename = "litellm_api_key", alias = "apiKey")]
    pub api_key: Option<String>,
    pub model_settings: Option<ModelSettings>,
    pub tools: Vec<ToolReference>,
    /// Composite types only; order is meaningful.
    pub child_agents: Vec<AgentConfig>,
    /// Loop type only. Arrives as a JSON number or numeric string and is
    /// parsed leniently during the build.
    pub max_loops: Option<Value>,
    pub output_key: Option<String>,
}

impl AgentConfig {
    /// Display name for diagnostics, falling back to a positional label for
    /// unnamed records.
    pub fn display_name(&self, child_index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("agent_cfg_{child_index}"))
    }
}

/// Sampling knobs as stored: loosely typed JSON values, converted by the
/// provider resolver (invalid shapes are warned and dropped, never fatal).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelSettings {
    pub temperature: Option<Value>,
    pub max_output_tokens: Option<Value>,
    pub top_p: Option<Value>,
    pub top_k: Option<Value>,
    pub stop_sequences: Option<Value>,
}

/// Reference to one tool attached to a conversational agent.
///
/// Local module tools carry `module_path` + `class_name` (+ an optional
/// constructor `configuration` mapping); remote tools carry `mcpServerUrl` +
/// `mcpToolName`. The `type` tag is optional and inferred from field
/// presence when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolReference {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "module_path", alias = "modulePath")]
    pub module_path: Option<String>,
    #[serde(rename = "class_name", alias = "className")]
    pub class_name: Option<String>,
    /// Constructor keyword arguments for local module tools.
    pub configuration: Option<Map<String, Value>>,
    pub mcp_server_url: Option<String>,
    pub mcp_tool_name: Option<String>,
}

impl ToolReference {
    /// Identifier used in logs and tool errors; falls back through the
    /// class/tool names to a positional label.
    pub fn display_id(&self, index: usize) -> String {
        self.id
            .clone()
            .or_else(|| self.class_name.clone())
            .or_else(|| self.mcp_tool_name.clone())
            .unwrap_or_else(|| format!("index_{index}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_record_deserializes_with_wire_names() {
        let json = r#"{
            "name": "Research Pipeline",
            "agentType": "SequentialAgent",
            "description": "Two stage pipeline",
            "childAgents": [
                {
                    "name": "Researcher",
                    "agentType": "Agent",
                    "instruction": "Find sources.",
                    "selectedProviderId": "openai",
                    "litellm_model_string": "gpt-4o",
                    "modelSettings": { "temperature": 0.2, "maxOutputTokens": 2048 },
                    "tools": [
                        { "id": "fetch", "mcpServerUrl": "https://tools.example.com/mcp", "mcpToolName": "fetch_page" },
                        { "module_path": "tools.search", "class_name": "WebSearch", "configuration": { "depth": 3 } }
                    ],
                    "outputKey": "sources"
                },
                {
                    "name": "Writer",
                    "agentType": "LoopAgent",
                    "instruction": "Draft and refine.",
                    "maxLoops": "5"
                }
            ]
        }"#;
        let cfg: AgentConfig = serde_json::from_str(json).expect("parse ok");
        assert_eq!(cfg.agent_type.as_deref(), Some("SequentialAgent"));
        assert_eq!(cfg.child_agents.len(), 2);

        let researcher = &cfg.child_agents[0];
        assert_eq!(researcher.selected_provider_id.as_deref(), Some("openai"));
        assert_eq!(researcher.model_string.as_deref(), Some("gpt-4o"));
        assert_eq!(researcher.output_key.as_deref(), Some("sources"));
        assert_eq!(researcher.tools.len(), 2);
        assert_eq!(
            researcher.tools[0].mcp_tool_name.as_deref(),
            Some("fetch_page")
        );
        assert_eq!(researcher.tools[1].class_name.as_deref(), Some("WebSearch"));

        let writer = &cfg.child_agents[1];
        assert_eq!(writer.max_loops, Some(Value::String("5".to_string())));
    }

    #[test]
    fn camel_case_aliases_accepted_for_model_overrides() {
        let json = r#"{ "name": "A", "modelString": "gpt-4o", "apiKey": "sk-test" }"#;
        let cfg: AgentConfig = serde_json::from_str(json).expect("parse ok");
        assert_eq!(cfg.model_string.as_deref(), Some("gpt-4o"));
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn display_names_fall_back_to_positions() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.display_name(2), "agent_cfg_2");

        let tool = ToolReference {
            class_name: Some("WebSearch".to_string()),
            ..Default::default()
        };
        assert_eq!(tool.display_id(0), "WebSearch");
        assert_eq!(ToolReference::default().display_id(4), "index_4");
    }
}
