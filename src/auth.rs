//! Auth-domain scope lists and token models.

pub mod scope;
pub mod token;

pub use scope::*;
pub use token::{issued::*, secret::*};
