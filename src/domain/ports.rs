use crate::domain::model::{FieldSpec, ToolDescriptor, ToolInput, ToolOutput};
use crate::utils::error::Result;

/// 單一用途的小工具：收集表單、計算、回傳結果
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;
    fn fields(&self) -> Vec<FieldSpec>;
    fn run(&self, input: &ToolInput) -> Result<ToolOutput>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn precision(&self) -> usize;
    fn default_image_format(&self) -> &str;
}
