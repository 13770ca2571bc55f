//! Runtime object shapes the builder assembles: the model-invocation client
//! and the four agent variants.
//!
//! These are construction targets only. Running a tree (conversation turns,
//! model calls, tool invocation) belongs to the execution layer, which takes
//! exclusive ownership of the returned [`BuiltAgent`].

use std::collections::BTreeMap;

use crate::error::AgentInitError;
use crate::naming::is_valid_identifier;
use crate::provider::{GenerationParams, ModelInvocationSpec};
use crate::tools::ToolHandle;

/// Client-side handle for one model endpoint. No network activity happens
/// at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelClient {
    pub model: String,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub generation: GenerationParams,
    pub extra: BTreeMap<&'static str, String>,
}

impl ModelClient {
    pub fn new(spec: ModelInvocationSpec) -> Self {
        Self {
            model: spec.model,
            api_base: spec.api_base,
            api_key: spec.api_key,
            generation: spec.generation,
            extra: spec.extra,
        }
    }
}

/// Keyword set for a conversational agent.
#[derive(Debug)]
pub struct ChatAgentParams {
    pub name: String,
    pub description: Option<String>,
    pub model: ModelClient,
    pub instruction: Option<String>,
    pub tools: Vec<ToolHandle>,
    pub output_key: Option<String>,
}

/// Leaf agent: sends prompts to a model and may invoke tools.
#[derive(Debug)]
pub struct ChatAgent {
    pub name: String,
    pub description: Option<String>,
    pub model: ModelClient,
    pub instruction: Option<String>,
    pub tools: Vec<ToolHandle>,
    pub output_key: Option<String>,
}

impl ChatAgent {
    pub fn new(params: ChatAgentParams) -> Result<Self, AgentInitError> {
        if !is_valid_identifier(&params.name) {
            return Err(AgentInitError::InvalidName(params.name));
        }
        Ok(Self {
            name: params.name,
            description: params.description,
            model: params.model,
            instruction: params.instruction,
            tools: params.tools,
            output_key: params.output_key,
        })
    }
}

/// Composite that runs its children one after another.
#[derive(Debug)]
pub struct SequentialAgent {
    pub name: String,
    pub description: Option<String>,
    pub children: Vec<BuiltAgent>,
}

impl SequentialAgent {
    pub fn new(
        name: String,
        description: Option<String>,
        children: Vec<BuiltAgent>,
    ) -> Result<Self, AgentInitError> {
        if !is_valid_identifier(&name) {
            return Err(AgentInitError::InvalidName(name));
        }
        if children.is_empty() {
            return Err(AgentInitError::NoChildren {
                kind: "sequential",
                name,
            });
        }
        Ok(Self {
            name,
            description,
            children,
        })
    }
}

/// Composite whose children may run side by side; child order is a hint.
#[derive(Debug)]
pub struct ParallelAgent {
    pub name: String,
    pub description: Option<String>,
    pub children: Vec<BuiltAgent>,
}

impl ParallelAgent {
    pub fn new(
        name: String,
        description: Option<String>,
        children: Vec<BuiltAgent>,
    ) -> Result<Self, AgentInitError> {
        if !is_valid_identifier(&name) {
            return Err(AgentInitError::InvalidName(name));
        }
        if children.is_empty() {
            return Err(AgentInitError::NoChildren {
                kind: "parallel",
                name,
            });
        }
        Ok(Self {
            name,
            description,
            children,
        })
    }
}

/// Composite that repeats a single conversational body up to
/// `max_iterations` times.
#[derive(Debug)]
pub struct LoopAgent {
    pub name: String,
    pub description: Option<String>,
    pub body: ChatAgent,
    pub max_iterations: u32,
}

impl LoopAgent {
    pub fn new(
        name: String,
        description: Option<String>,
        body: ChatAgent,
        max_iterations: u32,
    ) -> Result<Self, AgentInitError> {
        if !is_valid_identifier(&name) {
            return Err(AgentInitError::InvalidName(name));
        }
        Ok(Self {
            name,
            description,
            body,
            max_iterations,
        })
    }
}

/// A fully built agent tree node, exclusively owned by the caller.
#[derive(Debug)]
pub enum BuiltAgent {
    Chat(ChatAgent),
    Sequential(SequentialAgent),
    Parallel(ParallelAgent),
    Loop(LoopAgent),
}

impl BuiltAgent {
    pub fn name(&self) -> &str {
        match self {
            BuiltAgent::Chat(a) => &a.name,
            BuiltAgent::Sequential(a) => &a.name,
            BuiltAgent::Parallel(a) => &a.name,
            BuiltAgent::Loop(a) => &a.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            BuiltAgent::Chat(a) => a.description.as_deref(),
            BuiltAgent::Sequential(a) => a.description.as_deref(),
            BuiltAgent::Parallel(a) => a.description.as_deref(),
            BuiltAgent::Loop(a) => a.description.as_deref(),
        }
    }

    /// Number of direct children; the loop body counts as one.
    pub fn child_count(&self) -> usize {
        match self {
            BuiltAgent::Chat(_) => 0,
            BuiltAgent::Sequential(a) => a.children.len(),
            BuiltAgent::Parallel(a) => a.children.len(),
            BuiltAgent::Loop(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelClient {
        ModelClient::new(ModelInvocationSpec {
            model: "openai/gpt-4o".to_string(),
            ..Default::default()
        })
    }

    fn chat(name: &str) -> ChatAgent {
        ChatAgent::new(ChatAgentParams {
            name: name.to_string(),
            description: None,
            model: model(),
            instruction: Some("do the thing".to_string()),
            tools: Vec::new(),
            output_key: None,
        })
        .expect("valid chat agent")
    }

    #[test]
    fn chat_agent_rejects_invalid_names() {
        let err = ChatAgent::new(ChatAgentParams {
            name: "9 lives".to_string(),
            description: None,
            model: model(),
            instruction: None,
            tools: Vec::new(),
            output_key: None,
        })
        .expect_err("must fail");
        assert!(matches!(err, AgentInitError::InvalidName(_)));
    }

    #[test]
    fn composites_require_children() {
        let err = SequentialAgent::new("pipeline".to_string(), None, Vec::new())
            .expect_err("must fail");
        assert!(matches!(err, AgentInitError::NoChildren { kind: "sequential", .. }));

        let seq = SequentialAgent::new(
            "pipeline".to_string(),
            None,
            vec![BuiltAgent::Chat(chat("step_one"))],
        )
        .expect("ok");
        assert_eq!(seq.children.len(), 1);
    }

    #[test]
    fn built_agent_exposes_name_and_children() {
        let tree = BuiltAgent::Parallel(
            ParallelAgent::new(
                "fanout".to_string(),
                Some("runs both".to_string()),
                vec![
                    BuiltAgent::Chat(chat("left")),
                    BuiltAgent::Chat(chat("right")),
                ],
            )
            .expect("ok"),
        );
        assert_eq!(tree.name(), "fanout");
        assert_eq!(tree.description(), Some("runs both"));
        assert_eq!(tree.child_count(), 2);

        let looped = BuiltAgent::Loop(
            LoopAgent::new("refine".to_string(), None, chat("refine_body"), 3).expect("ok"),
        );
        assert_eq!(looped.child_count(), 1);
    }
}
