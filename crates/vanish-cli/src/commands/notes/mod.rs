//! Note command handlers.

mod add;
mod edit;
mod list;
mod read;
mod rm;

pub use add::handle_add;
pub use edit::handle_edit;
pub use list::handle_list;
pub use read::handle_read;
pub use rm::handle_rm;
