use std::collections::BTreeMap;

use crate::domain::model::{Category, ToolDescriptor};
use crate::domain::ports::Tool;
use crate::utils::error::{Result, ToolError};

/// 工具查找表，以 id 排序
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有內建工具
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::app::tools::register_all(&mut registry);
        tracing::debug!("Registered {} tools", registry.len());
        registry
    }

    /// id 重複時後註冊者覆蓋前者
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let id = tool.descriptor().id;
        if self.tools.insert(id.clone(), Box::new(tool)).is_some() {
            tracing::warn!("Tool '{}' registered twice, keeping the latest", id);
        }
    }

    pub fn get(&self, id: &str) -> Result<&dyn Tool> {
        let key = id.trim().to_ascii_lowercase();
        self.tools
            .get(&key)
            .map(|tool| tool.as_ref())
            .ok_or_else(|| ToolError::UnknownToolError { id: id.to_string() })
    }

    pub fn list(&self, category: Option<Category>) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| tool.descriptor())
            .filter(|d| category.map_or(true, |c| d.category == c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FieldSpec, ToolInput, ToolOutput};

    struct Echo;

    impl Tool for Echo {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                id: "echo".to_string(),
                name: "Echo".to_string(),
                category: Category::Text,
                description: "Returns the input text".to_string(),
            }
        }

        fn fields(&self) -> Vec<FieldSpec> {
            vec![FieldSpec::text("text", "Text")]
        }

        fn run(&self, input: &ToolInput) -> Result<ToolOutput> {
            Ok(ToolOutput::Text(input.get("text").unwrap_or_default().to_string()))
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo);
        assert!(registry.get("ECHO").is_ok());
        assert!(matches!(
            registry.get("missing"),
            Err(ToolError::UnknownToolError { .. })
        ));
    }

    #[test]
    fn test_list_filters_by_category() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo);
        assert_eq!(registry.list(Some(Category::Text)).len(), 1);
        assert!(registry.list(Some(Category::Unit)).is_empty());
    }
}
