pub mod container;

pub use container::{build_container_bytes, write_container, GeneratorConfig};
