//! Usage records, JSONL persistence helpers and data-directory paths

mod io;
mod paths;
mod types;

pub use io::{append_jsonl_batch, atomic_write, read_jsonl};
pub use paths::{Paths, HOME_ENV};
pub use types::UsageEvent;
