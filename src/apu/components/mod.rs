// Shared channel components
//
// The pulse, triangle, and noise channels are built from the same small
// units: a programmable timer, a length counter, an envelope, and (pulse
// only) a sweep. The triangle adds its linear counter. The frame counter
// sequences them all.

mod envelope;
mod frame_counter;
mod length_counter;
mod linear_counter;
mod sweep;
mod timer;

pub use envelope::Envelope;
pub use frame_counter::{FrameCounter, FrameEvent, FrameMode};
pub use length_counter::LengthCounter;
pub use linear_counter::LinearCounter;
pub use sweep::Sweep;
pub use timer::Timer;
