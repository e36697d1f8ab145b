mod cleanup;
mod render;

pub use cleanup::cmd_cleanup;
pub use render::cmd_render;
