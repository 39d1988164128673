//! FUSE dispatch for the channel namespace.

mod filesystem;

pub use filesystem::PushdownFS;
