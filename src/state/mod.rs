pub mod touch;

pub use touch::{Pointer, TouchState};
