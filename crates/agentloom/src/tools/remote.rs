//! Remote tool servers: URL grouping, per-server name dedup, connection.

use std::collections::{BTreeSet, HashMap};

use super::types::{ToolHandle, ToolKind, ToolsetConnector, ToolsetSpec, TransportKind};
use crate::config::ToolReference;

/// Group remote references into one connection order per distinct server
/// URL, first-seen order, deduplicating tool names per URL.
pub fn group_remote(references: &[ToolReference]) -> Vec<ToolsetSpec> {
    let mut specs: Vec<ToolsetSpec> = Vec::new();
    let mut index_by_url: HashMap<String, usize> = HashMap::new();
    for (idx, reference) in references.iter().enumerate() {
        if ToolKind::classify(reference) != ToolKind::RemoteServer {
            continue;
        }
        let (Some(url), Some(tool)) = (
            reference.mcp_server_url.as_deref(),
            reference.mcp_tool_name.as_deref(),
        ) else {
            tracing::warn!(
                "skipping malformed remote tool reference '{}': missing server url or tool name",
                reference.display_id(idx)
            );
            continue;
        };
        let slot = *index_by_url.entry(url.to_string()).or_insert_with(|| {
            specs.push(ToolsetSpec {
                server_url: url.to_string(),
                transport: TransportKind::infer(url),
                tool_filter: BTreeSet::new(),
            });
            specs.len() - 1
        });
        specs[slot].tool_filter.insert(tool.to_string());
    }
    specs
}

/// Connect every grouped server. A failing server is warned and skipped so
/// partial availability never aborts the agent.
pub async fn connect_toolsets(
    connector: &dyn ToolsetConnector,
    specs: Vec<ToolsetSpec>,
    agent: &str,
) -> Vec<ToolHandle> {
    let mut handles = Vec::with_capacity(specs.len());
    for spec in specs {
        match connector.connect(&spec).await {
            Ok(toolset) => {
                tracing::info!(
                    "connected toolset {} ({:?}) for agent '{}' with {} tool(s)",
                    spec.server_url,
                    spec.transport,
                    agent,
                    spec.tool_filter.len()
                );
                handles.push(ToolHandle::Toolset(toolset));
            }
            Err(e) => {
                tracing::warn!(
                    "skipping toolset {} for agent '{}': {}",
                    spec.server_url,
                    agent,
                    e
                );
            }
        }
    }
    handles
}
