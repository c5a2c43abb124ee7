//! Validated simulation inputs.

pub mod templates;

pub use templates::{parse_template_row, TemplatePool, ROW_WIDTH};
