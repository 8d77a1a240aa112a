pub mod interp;

pub use interp::{find_index, interpolate, InterpPos};
