mod base_arena;
mod chain_arena;

pub use base_arena::Arena;
pub use chain_arena::{ChainArena, Link};
