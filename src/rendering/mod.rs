pub mod encode;
pub mod filters;
pub mod instructions;

pub use encode::{encode_png, write_png};
pub use filters::{apply_filters, resize, to_rgb_pixels};
pub use instructions::{render_instructions, short_name, write_instructions};
