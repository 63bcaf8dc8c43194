//! Command handlers for the Vanish CLI.

mod init;
mod misc;
mod notes;
mod status;

pub use init::handle_init;
pub use misc::{handle_completions, handle_purge};
pub use notes::{handle_add, handle_edit, handle_list, handle_read, handle_rm};
pub use status::handle_status;
