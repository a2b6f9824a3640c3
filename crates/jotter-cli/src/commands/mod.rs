pub mod add;
pub mod common;
pub mod delete;
pub mod edit;
pub mod list;
pub mod theme;

pub use add::run_add;
pub use delete::run_delete;
pub use edit::run_edit;
pub use list::run_list;
pub use theme::run_theme;
