//! Command-line interface for training, playing against and inspecting bots

pub mod commands;
pub mod output;
