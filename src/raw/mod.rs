mod arena;
mod handle;
pub(crate) mod node;
mod raw_osrb_tree;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use raw_osrb_tree::RawOSRBTree;
