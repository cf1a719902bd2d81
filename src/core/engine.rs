use std::time::Instant;

use crate::core::registry::ToolRegistry;
use crate::domain::model::{ToolInput, ToolOutput};
use crate::domain::ports::Tool;
use crate::utils::error::{Result, ToolError};

/// 失敗時留給畫面顯示的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub suggestion: String,
}

impl From<&ToolError> for Notice {
    fn from(err: &ToolError) -> Self {
        Self {
            message: err.user_friendly_message(),
            suggestion: err.recovery_suggestion(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Computing,
    Ready(ToolOutput),
    Failed(Notice),
}

/// 單一工具實例：idle → computing → ready | failed
pub struct ToolSession<'a> {
    tool: &'a dyn Tool,
    state: SessionState,
}

impl<'a> ToolSession<'a> {
    pub fn new(tool: &'a dyn Tool) -> Self {
        Self {
            tool,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 送出表單；`&mut self` 保證同一實例不會重疊執行
    pub fn submit(&mut self, input: &ToolInput) -> Result<ToolOutput> {
        let id = self.tool.descriptor().id;
        self.state = SessionState::Computing;
        tracing::debug!("⚙️ {} computing", id);

        let started = Instant::now();
        match self.tool.run(input) {
            Ok(output) => {
                tracing::debug!("✅ {} finished in {:?}", id, started.elapsed());
                self.state = SessionState::Ready(output.clone());
                Ok(output)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ {} rejected input: {} (Category: {:?})",
                    id,
                    e,
                    e.category()
                );
                self.state = SessionState::Failed(Notice::from(&e));
                Err(e)
            }
        }
    }

    /// 回到初始狀態，例如使用者清空表單
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }
}

pub struct ToolEngine {
    registry: ToolRegistry,
}

impl ToolEngine {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn builtin() -> Self {
        Self::new(ToolRegistry::builtin())
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn open(&self, id: &str) -> Result<ToolSession<'_>> {
        let tool = self.registry.get(id)?;
        Ok(ToolSession::new(tool))
    }

    pub fn run(&self, id: &str, input: &ToolInput) -> Result<ToolOutput> {
        tracing::info!("🔧 Running tool: {}", id);
        let mut session = self.open(id)?;
        session.submit(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions() {
        let engine = ToolEngine::builtin();
        let mut session = engine.open("number-to-roman").unwrap();
        assert_eq!(session.state(), &SessionState::Idle);

        let output = session
            .submit(&ToolInput::new().with("number", "1994"))
            .unwrap();
        assert_eq!(output.as_text(), Some("MCMXCIV"));
        assert!(matches!(session.state(), SessionState::Ready(_)));

        assert!(session.submit(&ToolInput::new().with("number", "0")).is_err());
        match session.state() {
            SessionState::Failed(notice) => assert!(notice.message.contains("out of range")),
            other => panic!("unexpected state: {:?}", other),
        }

        session.reset();
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_unknown_tool() {
        let engine = ToolEngine::builtin();
        assert!(matches!(
            engine.run("no-such-tool", &ToolInput::new()),
            Err(ToolError::UnknownToolError { .. })
        ));
    }
}
