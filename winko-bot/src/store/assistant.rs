use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assistant {
    pub id: String,
}

#[async_trait]
pub trait AssistantStore: Send + Sync {
    /// The assistant every conversation runs against; `None` when none is configured.
    async fn active_assistant(&self) -> Result<Option<Assistant>>;
}

/// Returns the single assistant id from configuration (`ASSISTANT_ID`).
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAssistantStore {
    assistant_id: Option<String>,
}

impl ConfiguredAssistantStore {
    pub fn new(assistant_id: Option<String>) -> Self {
        Self { assistant_id }
    }
}

#[async_trait]
impl AssistantStore for ConfiguredAssistantStore {
    async fn active_assistant(&self) -> Result<Option<Assistant>> {
        Ok(self.assistant_id.clone().map(|id| Assistant { id }))
    }
}
