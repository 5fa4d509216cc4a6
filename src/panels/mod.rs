pub mod style_panel;
pub mod tools_panel;

pub use style_panel::style_panel;
pub use tools_panel::tools_panel;
