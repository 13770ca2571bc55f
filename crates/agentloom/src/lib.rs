//! Compile declarative agent-configuration records into runnable agent
//! object graphs.
//!
//! The crate is an assembly layer: it maps provider/model selections onto
//! the model-invocation layer, instantiates local tools through a registry,
//! groups remote tool servers into filtered toolsets, and recursively
//! constructs the agent tree a record describes. Executing the returned tree
//! is the caller's concern.
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentloom::{AgentConfig, StaticToolRegistry, TreeBuilder};
//! # use agentloom::{Toolset, ToolsetConnector, ToolsetSpec};
//! # struct NoRemote;
//! # #[async_trait::async_trait]
//! # impl ToolsetConnector for NoRemote {
//! #     async fn connect(&self, _spec: &ToolsetSpec) -> anyhow::Result<Box<dyn Toolset>> {
//! #         anyhow::bail!("no remote servers in this deployment")
//! #     }
//! # }
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config: AgentConfig = serde_json::from_str(
//!     r#"{ "name": "Helper", "agentType": "Agent", "litellm_model_string": "gpt-4o" }"#,
//! )?;
//! let mut builder = TreeBuilder::new(Arc::new(StaticToolRegistry::new()), Arc::new(NoRemote));
//! let tree = builder.build(&config).await?;
//! println!("built agent {}", tree.name());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod naming;
pub mod provider;
pub mod runtime;
pub mod tools;

pub use builder::TreeBuilder;
pub use config::{AgentConfig, ModelSettings, ToolReference};
pub use error::{AgentInitError, BuildError};
pub use naming::{NameScope, sanitize};
pub use provider::{GenerationParams, ModelInvocationSpec, ProviderProfile};
pub use runtime::{
    BuiltAgent, ChatAgent, ChatAgentParams, LoopAgent, ModelClient, ParallelAgent, SequentialAgent,
};
pub use tools::{
    Exportable, LocalTool, NativeTool, StaticToolRegistry, ToolFactory, ToolHandle, ToolKind,
    ToolRegistry, Toolset, ToolsetConnector, ToolsetSpec, TransportKind,
};
