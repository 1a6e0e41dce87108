//! Domain Services
//!
//! Per-run resolution state: the ledger of requests per module name and the
//! work queue that feeds resolver workers. No I/O happens here.

mod ledger;
mod work_queue;

pub use ledger::{ChannelConflict, LedgerEntry, Resolution};
pub use work_queue::{PoppedTask, ResolveTask, WorkQueue};
