//! User commands

mod add;

pub use add::AddUser;
