//! Typed failure taxonomy for tree builds.
//!
//! Every variant is fatal to the enclosing top-level build: composites never
//! return with missing children. Soft issues (missing secrets, invalid
//! sampling values, unreachable remote servers) are logged by the components
//! that encounter them and never surface here.

use thiserror::Error;

/// Fatal failures raised while compiling a configuration record into an
/// agent tree. Each variant carries the offending record's display name.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The record names a provider id absent from the static table.
    #[error("invalid provider id '{provider}' in agent config '{agent}'")]
    InvalidProvider { provider: String, agent: String },

    /// The record names an agent type outside the supported set.
    #[error("invalid agentType '{kind}' in agent config '{agent}'")]
    InvalidAgentType { kind: String, agent: String },

    /// A sequential or parallel record declares no child agents.
    #[error("composite agent '{agent}' requires at least one child agent")]
    EmptyComposite { agent: String },

    /// A local module tool could not be looked up or constructed.
    #[error("error instantiating tool '{tool}' for agent '{agent}': {source}")]
    ToolInstantiation {
        tool: String,
        agent: String,
        #[source]
        source: anyhow::Error,
    },

    /// A runtime constructor rejected the assembled keyword set.
    #[error("failed to construct agent '{agent}': {source}")]
    AgentInit {
        agent: String,
        #[source]
        source: AgentInitError,
    },

    /// A child build failed; wraps the cause with the failing index so the
    /// caller can attribute the error inside an ordered child list.
    #[error("error processing child agent {index} ('{child}') of '{agent}': {source}")]
    Child {
        agent: String,
        index: usize,
        child: String,
        #[source]
        source: Box<BuildError>,
    },
}

/// Validation failures from the runtime constructors.
#[derive(Debug, Error)]
pub enum AgentInitError {
    #[error("agent name '{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("{kind} agent '{name}' needs at least one sub-agent")]
    NoChildren { kind: &'static str, name: String },
}
