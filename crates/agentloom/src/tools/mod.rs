//! Tool resolution: local factory instantiation and remote toolset
//! aggregation.

pub mod local;
pub mod remote;
pub mod types;

pub use local::*;
pub use remote::*;
pub use types::*;

use crate::config::ToolReference;
use crate::error::BuildError;

/// Resolve a record's tool references into attached handles: local module
/// tools in reference order, then one toolset per distinct remote server.
///
/// Local failures are fatal; unreachable remote servers and unrecognized
/// reference shapes are warned and skipped.
pub async fn resolve_tools(
    registry: &dyn ToolRegistry,
    connector: &dyn ToolsetConnector,
    references: &[ToolReference],
    agent: &str,
) -> Result<Vec<ToolHandle>, BuildError> {
    let mut handles: Vec<ToolHandle> = Vec::new();
    for (idx, reference) in references.iter().enumerate() {
        match ToolKind::classify(reference) {
            ToolKind::LocalModule => {
                let handle = instantiate_local(registry, reference, idx, agent)?;
                tracing::info!(
                    "instantiated tool '{}' for agent '{}'",
                    reference.display_id(idx),
                    agent
                );
                handles.push(handle);
            }
            // Remote references are grouped below.
            ToolKind::RemoteServer => {}
            ToolKind::Unknown => {
                tracing::warn!(
                    "skipping unrecognized tool reference '{}' for agent '{}'",
                    reference.display_id(idx),
                    agent
                );
            }
        }
    }
    let specs = group_remote(references);
    handles.extend(connect_toolsets(connector, specs, agent).await);
    Ok(handles)
}
