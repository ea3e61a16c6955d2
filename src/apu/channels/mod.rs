// The five APU voices

mod dmc;
mod noise;
mod pulse;
mod triangle;

pub use dmc::Dmc;
pub use noise::NoiseChannel;
pub use pulse::PulseChannel;
pub use triangle::TriangleChannel;
