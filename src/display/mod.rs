// Display module - frame buffer, master palette, and the window shell

mod framebuffer;
pub mod palette;
mod window;

pub use framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use window::{run_display, WindowConfig};
