//! Team commands

mod create;
mod get;
mod member;

pub use create::CreateTeam;
pub use get::GetTeam;
pub use member::{AddMember, RemoveMember};
