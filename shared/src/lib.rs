// Models and helpers shared by the engine library and the `pebbles` binary.
// Nothing in here touches the filesystem; the engine owns all I/O.

pub mod dates;
pub mod models;
pub mod utils;
