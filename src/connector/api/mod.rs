pub mod container;
pub mod controller;
pub mod router;
mod spinner;

pub use container::{Container, ContainerConfig};
pub use router::Router;
