//! Subcommands of the `genetac` binary

pub mod evaluate;
pub mod inspect;
pub mod play;
pub mod train;
