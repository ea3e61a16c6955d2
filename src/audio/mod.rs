// Audio module - mixing and host output
//
// The APU owns a `Mixer`, a `HighPassFilter`, and the producer half of
// the sample ring; the host side (cpal, behind the "audio" feature) holds
// the consumer half and drains it from the audio callback, or the
// embedding application can pull samples itself through
// `Emulator::drain_audio`.

pub mod mixer;
pub mod ring;

#[cfg(feature = "audio")]
pub mod output;

pub use mixer::{HighPassFilter, Mixer};
pub use ring::{sample_ring, SampleConsumer, SampleProducer};

#[cfg(feature = "audio")]
pub use output::{AudioConfig, AudioOutput};
