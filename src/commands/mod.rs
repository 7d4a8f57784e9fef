//! CLI subcommands

pub mod delete;
pub mod init;
pub mod list;
pub mod new;
pub mod search;
pub mod show;
