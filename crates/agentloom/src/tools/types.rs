//! Tool reference classification, capability seams, and resolved handles.
//!
//! Dynamic class loading has no direct equivalent here, so local tools go
//! through a capability-injected registry: callers register constructible
//! factories under `(module_path, class_name)` and the resolver looks them
//! up by the names a record carries. Remote toolset construction is likewise
//! a seam: implementations own the wire transport.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::ToolReference;

/// Category of a tool reference, inferred when the record has no `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    LocalModule,
    RemoteServer,
    Unknown,
}

impl ToolKind {
    /// Classify a reference: an explicit tag wins; otherwise the presence of
    /// `module_path` + `class_name` implies a local module and
    /// `mcpServerUrl` + `mcpToolName` a remote server.
    pub fn classify(reference: &ToolReference) -> ToolKind {
        match reference.kind.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("localModule") || t.eq_ignore_ascii_case("local_module") => {
                ToolKind::LocalModule
            }
            Some(t)
                if t.eq_ignore_ascii_case("remoteServer")
                    || t.eq_ignore_ascii_case("remote_server")
                    || t.eq_ignore_ascii_case("mcp") =>
            {
                ToolKind::RemoteServer
            }
            _ => {
                if reference.module_path.is_some() && reference.class_name.is_some() {
                    ToolKind::LocalModule
                } else if reference.mcp_server_url.is_some() && reference.mcp_tool_name.is_some() {
                    ToolKind::RemoteServer
                } else {
                    ToolKind::Unknown
                }
            }
        }
    }
}

/// The runtime's native tool description, as carried by conversational
/// agents and produced by [`Exportable`] wrappers.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

/// Conversion capability to the runtime's native tool shape. Wrapper types
/// that can describe themselves natively implement this and surface it via
/// [`LocalTool::as_exportable`].
pub trait Exportable {
    fn export_native(&self) -> NativeTool;
}

/// A tool instance constructed from a registered factory.
pub trait LocalTool: Send + Sync {
    fn name(&self) -> &str;

    /// Capability hook; the resolver prefers the exported native shape over
    /// carrying the instance itself.
    fn as_exportable(&self) -> Option<&dyn Exportable> {
        None
    }
}

/// Constructs one tool class from its configuration mapping.
pub trait ToolFactory: Send + Sync {
    fn construct(&self, configuration: &Map<String, Value>) -> anyhow::Result<Box<dyn LocalTool>>;
}

/// Capability-injected plugin loader: resolves `(module_path, class_name)`
/// to a constructible factory.
pub trait ToolRegistry: Send + Sync {
    fn lookup(&self, module_path: &str, class_name: &str) -> Option<Arc<dyn ToolFactory>>;
}

/// Registry over an in-memory table: the shipped implementation, and the
/// seam tests swap fakes through.
#[derive(Default)]
pub struct StaticToolRegistry {
    factories: HashMap<(String, String), Arc<dyn ToolFactory>>,
}

impl StaticToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        module_path: impl Into<String>,
        class_name: impl Into<String>,
        factory: Arc<dyn ToolFactory>,
    ) {
        self.factories
            .insert((module_path.into(), class_name.into()), factory);
    }
}

impl ToolRegistry for StaticToolRegistry {
    fn lookup(&self, module_path: &str, class_name: &str) -> Option<Arc<dyn ToolFactory>> {
        self.factories
            .get(&(module_path.to_string(), class_name.to_string()))
            .cloned()
    }
}

/// Transport variant for one remote tool server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Streaming-event endpoint.
    Sse,
    /// Generic streaming-HTTP endpoint.
    StreamableHttp,
}

impl TransportKind {
    /// `…/sse` endpoints speak the streaming-event protocol; everything
    /// else is treated as streamable HTTP.
    pub fn infer(url: &str) -> TransportKind {
        if url.trim_end_matches('/').ends_with("/sse") {
            TransportKind::Sse
        } else {
            TransportKind::StreamableHttp
        }
    }
}

/// Connection order for one distinct server URL: transport variant plus the
/// deduplicated tool-name filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsetSpec {
    pub server_url: String,
    pub transport: TransportKind,
    pub tool_filter: BTreeSet<String>,
}

/// Connected, filtered handle to one remote server's tools.
///
/// Teardown is the executor's concern; this module never closes a toolset it
/// created.
pub trait Toolset: Send + Sync {
    fn server_url(&self) -> &str;
    fn tool_names(&self) -> Vec<String>;
}

/// Remote-toolset constructor seam. Implementations own the wire transport
/// for both variants of [`TransportKind`].
#[async_trait]
pub trait ToolsetConnector: Send + Sync {
    async fn connect(&self, spec: &ToolsetSpec) -> anyhow::Result<Box<dyn Toolset>>;
}

/// One resolved tool attached to a conversational agent.
pub enum ToolHandle {
    /// Runtime-native tool description (exported or built directly).
    Native(NativeTool),
    /// Tool instance carried as-is; the runtime adapts it at execution time.
    Instance(Box<dyn LocalTool>),
    /// Grouped remote toolset.
    Toolset(Box<dyn Toolset>),
}

impl ToolHandle {
    /// Short label for logs: the tool name, or the server URL for toolsets.
    pub fn label(&self) -> String {
        match self {
            ToolHandle::Native(t) => t.name.clone(),
            ToolHandle::Instance(t) => t.name().to_string(),
            ToolHandle::Toolset(t) => t.server_url().to_string(),
        }
    }
}

impl fmt::Debug for ToolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolHandle::Native(t) => f.debug_tuple("Native").field(&t.name).finish(),
            ToolHandle::Instance(t) => f.debug_tuple("Instance").field(&t.name()).finish(),
            ToolHandle::Toolset(t) => f.debug_tuple("Toolset").field(&t.server_url()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_prefers_explicit_tag() {
        let reference = ToolReference {
            kind: Some("mcp".to_string()),
            module_path: Some("tools.search".to_string()),
            class_name: Some("WebSearch".to_string()),
            ..Default::default()
        };
        assert_eq!(ToolKind::classify(&reference), ToolKind::RemoteServer);
    }

    #[test]
    fn classification_infers_from_field_presence() {
        let local = ToolReference {
            module_path: Some("tools.search".to_string()),
            class_name: Some("WebSearch".to_string()),
            ..Default::default()
        };
        assert_eq!(ToolKind::classify(&local), ToolKind::LocalModule);

        let remote = ToolReference {
            mcp_server_url: Some("https://tools.example.com/mcp".to_string()),
            mcp_tool_name: Some("fetch_page".to_string()),
            ..Default::default()
        };
        assert_eq!(ToolKind::classify(&remote), ToolKind::RemoteServer);

        assert_eq!(
            ToolKind::classify(&ToolReference::default()),
            ToolKind::Unknown
        );
    }

    #[test]
    fn transport_inference_by_url_suffix() {
        assert_eq!(
            TransportKind::infer("https://tools.example.com/sse"),
            TransportKind::Sse
        );
        assert_eq!(
            TransportKind::infer("https://tools.example.com/sse/"),
            TransportKind::Sse
        );
        assert_eq!(
            TransportKind::infer("https://tools.example.com/mcp"),
            TransportKind::StreamableHttp
        );
        assert_eq!(
            TransportKind::infer("https://sse.example.com/tools"),
            TransportKind::StreamableHttp
        );
    }
}
