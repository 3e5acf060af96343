//! Subcommand handlers.
//!
//! - `produce`: publish messages from arguments or stdin, then flush
//! - `consume`: run one or more consumers of a group
//! - `flush`: wait for previously produced messages to be flushed

pub mod consume;
pub mod flush;
pub mod produce;

pub use consume::ConsumeArgs;
pub use flush::FlushArgs;
pub use produce::ProduceArgs;
