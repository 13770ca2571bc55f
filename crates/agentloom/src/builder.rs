//! Recursive agent-tree assembly from configuration records.
//!
//! Depth-first over the record's `agentType`: conversational leaves resolve
//! tools and provider, composites build children strictly in list order, and
//! any descendant failure propagates to the top-level call; a build never
//! returns a partial tree.

use std::sync::Arc;

use async_recursion::async_recursion;

use crate::config::AgentConfig;
use crate::error::BuildError;
use crate::naming::{NameScope, sanitize};
use crate::provider;
use crate::runtime::{
    BuiltAgent, ChatAgent, ChatAgentParams, LoopAgent, ModelClient, ParallelAgent, SequentialAgent,
};
use crate::tools::{ToolRegistry, ToolsetConnector, resolve_tools};

const DEFAULT_MAX_LOOPS: u32 = 3;

/// Closed set of agent shapes a record may name. Both the short tags and the
/// platform's historical `*Agent` tags are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgentKind {
    Chat,
    Sequential,
    Parallel,
    Loop,
}

impl AgentKind {
    fn parse(tag: &str) -> Option<AgentKind> {
        match tag {
            "Agent" | "LlmAgent" | "Conversational" => Some(AgentKind::Chat),
            "SequentialAgent" | "Sequential" => Some(AgentKind::Sequential),
            "ParallelAgent" | "Parallel" => Some(AgentKind::Parallel),
            "LoopAgent" | "Loop" => Some(AgentKind::Loop),
            _ => None,
        }
    }
}

/// Compiles configuration records into runnable agent trees.
///
/// One builder per logical build sequence: the tool registry and toolset
/// connector are capability seams, the [`NameScope`] guarantees collision-free
/// sibling names. Independent builders never share mutable state.
pub struct TreeBuilder {
    registry: Arc<dyn ToolRegistry>,
    connector: Arc<dyn ToolsetConnector>,
    names: NameScope,
}

impl TreeBuilder {
    pub fn new(registry: Arc<dyn ToolRegistry>, connector: Arc<dyn ToolsetConnector>) -> Self {
        Self {
            registry,
            connector,
            names: NameScope::new(),
        }
    }

    /// Replace the uniqueness source, e.g. with a deterministic scope.
    pub fn with_name_scope(mut self, names: NameScope) -> Self {
        self.names = names;
        self
    }

    /// Build the whole tree for one root record. All-or-nothing: any fatal
    /// failure in a descendant aborts the call with no partial result.
    pub async fn build(&mut self, config: &AgentConfig) -> Result<BuiltAgent, BuildError> {
        self.build_node(config, "root", 0).await
    }

    #[async_recursion]
    async fn build_node(
        &mut self,
        config: &AgentConfig,
        parent_ctx: &str,
        child_index: usize,
    ) -> Result<BuiltAgent, BuildError> {
        let original_name = config.display_name(child_index);
        let working = format!("{}_{}_{}", original_name, parent_ctx, self.names.suffix());
        let node_name = sanitize(&working, &format!("agent_{child_index}_"));

        let tag = config.agent_type.as_deref().unwrap_or("");
        let Some(kind) = AgentKind::parse(tag) else {
            tracing::error!(
                "invalid agentType '{}' for agent config '{}'",
                tag,
                original_name
            );
            return Err(BuildError::InvalidAgentType {
                kind: tag.to_string(),
                agent: original_name,
            });
        };
        tracing::info!(
            "building {:?} agent '{}' (original '{}', parent '{}', index {})",
            kind,
            node_name,
            original_name,
            parent_ctx,
            child_index
        );

        match kind {
            AgentKind::Chat => {
                let leaf = self.build_chat(config, &node_name, &original_name).await?;
                Ok(BuiltAgent::Chat(leaf))
            }
            AgentKind::Sequential | AgentKind::Parallel => {
                if config.child_agents.is_empty() {
                    return Err(BuildError::EmptyComposite {
                        agent: original_name,
                    });
                }
                let mut children = Vec::with_capacity(config.child_agents.len());
                for (idx, child_cfg) in config.child_agents.iter().enumerate() {
                    match self.build_node(child_cfg, &node_name, idx).await {
                        Ok(child) => children.push(child),
                        Err(e) => {
                            return Err(BuildError::Child {
                                agent: original_name,
                                index: idx,
                                child: child_cfg.display_name(idx),
                                source: Box::new(e),
                            });
                        }
                    }
                }
                let description = config.description.clone();
                let built = if kind == AgentKind::Sequential {
                    SequentialAgent::new(node_name, description, children)
                        .map(BuiltAgent::Sequential)
                } else {
                    ParallelAgent::new(node_name, description, children).map(BuiltAgent::Parallel)
                };
                built.map_err(|e| BuildError::AgentInit {
                    agent: original_name,
                    source: e,
                })
            }
            AgentKind::Loop => {
                // The loop node's own config describes the single body agent;
                // there is no separate child list.
                let body_name = sanitize(&format!("{node_name}_loop_body"), "looped_");
                let body = self.build_chat(config, &body_name, &original_name).await?;
                let max_iterations = parse_max_loops(config.max_loops.as_ref(), &original_name);
                LoopAgent::new(node_name, config.description.clone(), body, max_iterations)
                    .map(BuiltAgent::Loop)
                    .map_err(|e| BuildError::AgentInit {
                        agent: original_name,
                        source: e,
                    })
            }
        }
    }

    async fn build_chat(
        &mut self,
        config: &AgentConfig,
        node_name: &str,
        original_name: &str,
    ) -> Result<ChatAgent, BuildError> {
        let log_ctx = format!("(agent '{node_name}')");
        let tools = resolve_tools(
            self.registry.as_ref(),
            self.connector.as_ref(),
            &config.tools,
            node_name,
        )
        .await?;
        let spec = provider::resolve(config, &log_ctx)?;
        let params = ChatAgentParams {
            name: node_name.to_string(),
            description: config.description.clone(),
            model: ModelClient::new(spec),
            instruction: config.instruction.clone(),
            tools,
            output_key: config.output_key.clone(),
        };
        ChatAgent::new(params).map_err(|e| BuildError::AgentInit {
            agent: original_name.to_string(),
            source: e,
        })
    }
}

fn parse_max_loops(value: Option<&serde_json::Value>, agent: &str) -> u32 {
    let Some(value) = value else {
        return DEFAULT_MAX_LOOPS;
    };
    let parsed = value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u32>().ok()))
        .filter(|n| *n > 0);
    match parsed {
        Some(n) => n,
        None => {
            tracing::warn!(
                "invalid maxLoops {} for agent '{}'; defaulting to {}",
                value,
                agent,
                DEFAULT_MAX_LOOPS
            );
            DEFAULT_MAX_LOOPS
        }
    }
}
