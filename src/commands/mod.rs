//! CLI command implementations

pub mod init;
pub mod list;
pub mod new;
pub mod normalize;
pub mod render;
pub mod search;
