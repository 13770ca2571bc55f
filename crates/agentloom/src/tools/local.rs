//! Local module tools: registry lookup, construction, export adaptation.

use serde_json::Map;

use super::types::{ToolHandle, ToolRegistry};
use crate::config::ToolReference;
use crate::error::BuildError;

/// Instantiate one local module tool. Any lookup or construction failure is
/// fatal to the enclosing agent and carries the tool id.
pub fn instantiate_local(
    registry: &dyn ToolRegistry,
    reference: &ToolReference,
    index: usize,
    agent: &str,
) -> Result<ToolHandle, BuildError> {
    let tool_id = reference.display_id(index);
    let (Some(module_path), Some(class_name)) = (
        reference.module_path.as_deref(),
        reference.class_name.as_deref(),
    ) else {
        return Err(BuildError::ToolInstantiation {
            tool: tool_id,
            agent: agent.to_string(),
            source: anyhow::anyhow!("local tool reference is missing module_path or class_name"),
        });
    };

    let Some(factory) = registry.lookup(module_path, class_name) else {
        return Err(BuildError::ToolInstantiation {
            tool: tool_id,
            agent: agent.to_string(),
            source: anyhow::anyhow!(
                "no registered tool class '{}' in module '{}'",
                class_name,
                module_path
            ),
        });
    };

    let empty = Map::new();
    let configuration = reference.configuration.as_ref().unwrap_or(&empty);
    if configuration.is_empty() {
        tracing::info!("instantiating tool '{}' with no instance configuration", tool_id);
    } else {
        let keys: Vec<&String> = configuration.keys().collect();
        tracing::info!(
            "instantiating tool '{}' with configuration keys {:?}",
            tool_id,
            keys
        );
    }

    let instance = factory
        .construct(configuration)
        .map_err(|e| BuildError::ToolInstantiation {
            tool: tool_id.clone(),
            agent: agent.to_string(),
            source: e,
        })?;

    let exported = instance.as_exportable().map(|e| e.export_native());
    Ok(match exported {
        Some(native) => {
            tracing::info!("exported tool '{}' to the native tool shape", tool_id);
            ToolHandle::Native(native)
        }
        None => ToolHandle::Instance(instance),
    })
}
