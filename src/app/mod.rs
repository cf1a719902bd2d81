pub mod batch;
pub mod tools;

use crate::config::toml_config::AUTO_IMAGE_FORMAT;
use crate::domain::ports::{ConfigProvider, Tool};
use crate::domain::model::ToolInput;

/// 工具有 format 欄位且使用者沒填時，套用設定檔的預設圖片格式
pub fn apply_defaults(tool: &dyn Tool, input: &mut ToolInput, config: &impl ConfigProvider) {
    let format = config.default_image_format();
    if format.eq_ignore_ascii_case(AUTO_IMAGE_FORMAT) || input.get("format").is_some() {
        return;
    }
    if tool.fields().iter().any(|f| f.name == "format") {
        tracing::debug!("Applying default image format '{}'", format);
        input.set("format", format);
    }
}
