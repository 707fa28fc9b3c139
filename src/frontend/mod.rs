//! Front ends: thin adapters that normalise user input, pick an output path
//! and report errors, all around one [`Synthesizer`](crate::Synthesizer).

pub mod chat;
pub mod cli;
pub mod prompt;
