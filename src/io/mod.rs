//! Instance loading.

mod solomon;

pub use solomon::{load_solomon, parse_solomon, SolomonInstance};
