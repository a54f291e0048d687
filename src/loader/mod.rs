//! Scene file loading. Deliberately out of the core's scope per the
//! specification, kept as a thin boundary module: parse failures and
//! semantic errors both abort scene construction wholesale.

mod json;

pub use json::{load_scene, LoadedScene};
