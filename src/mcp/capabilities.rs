/// MCP capability advertisement.
///
/// During the `initialize` handshake the server declares what it serves.
/// dusk-mcp offers `tools` (the eight-tool orchestration catalog) and
/// `resources` (screenshot/log artifacts); `prompts` and `sampling` are
/// placeholders for future protocol expansions.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: bool,
    pub resources: bool,
    /// `prompts` — not supported.
    pub prompts: bool,
    /// `sampling` — not supported (LLM sampling delegation).
    pub sampling: bool,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: true,
            resources: true,
            prompts: false,
            sampling: false,
        }
    }
}

impl ServerCapabilities {
    /// Convert to the JSON object expected in an MCP `initialize` response.
    pub fn to_mcp_value(&self) -> Value {
        let mut cap = serde_json::Map::new();

        if self.tools {
            cap.insert("tools".into(), serde_json::json!({ "listChanged": false }));
        }
        if self.resources {
            cap.insert(
                "resources".into(),
                serde_json::json!({ "subscribe": false, "listChanged": false }),
            );
        }
        if self.prompts {
            cap.insert("prompts".into(), serde_json::json!({}));
        }
        if self.sampling {
            cap.insert("sampling".into(), serde_json::json!({}));
        }

        Value::Object(cap)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_advertises_tools_and_resources() {
        let caps = ServerCapabilities::default();
        assert!(caps.tools);
        assert!(caps.resources);
        assert!(!caps.prompts);
        assert!(!caps.sampling);
    }

    #[test]
    fn to_mcp_value_omits_unsupported() {
        let v = ServerCapabilities::default().to_mcp_value();
        assert!(v.get("tools").is_some());
        assert!(v.get("resources").is_some());
        assert!(v.get("prompts").is_none());
        assert!(v.get("sampling").is_none());
    }
}
