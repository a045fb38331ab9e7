//! Scene rendering.

pub mod assets;
pub mod backend;
/// vello_cpu frame renderer.
pub mod cpu;
pub mod pipeline;
pub mod text;
