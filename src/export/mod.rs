//! Output of extracted records.
//!
//! Records are written one per line, either in their tab-separated text form
//! or as JSON objects (JSON Lines) for piping into `jq` or a script.

mod pipe;
mod records;

pub use pipe::IgnoreBrokenPipe;
pub use records::write_records;
