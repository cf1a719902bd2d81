//! 內建工具。每個子模組負責一個類別並提供 `register`。

pub mod converters;
pub mod dates;
pub mod finance;
pub mod form;
pub mod images;
pub mod numerals;
pub mod text;

use crate::core::registry::ToolRegistry;

pub fn register_all(registry: &mut ToolRegistry) {
    converters::register(registry);
    numerals::register(registry);
    finance::register(registry);
    dates::register(registry);
    text::register(registry);
    images::register(registry);
}
