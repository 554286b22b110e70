//! Block Addressing
//!
//! Everything that gives blocks a stable identity inside a mutable tree:
//!
//! - `assigner` - Post-mutation reconciliation pass that assigns ids
//! - `locator` - Lookup and bounded-context extraction by id

pub mod assigner;
pub mod locator;

pub use assigner::{
    BlockIdAssigner, BlockIdGenerator, UuidBlockIdGenerator, DEFAULT_ADDRESSABLE_KINDS,
};
pub use locator::{addressable_blocks, block_context, find_by_id};
