//! Typed vehicle state models

mod charging;
mod lid;
mod lights;
mod lock;

pub use charging::*;
pub use lid::*;
pub use lights::*;
pub use lock::*;
