// Audio output - host playback through cpal
//
// Opens the default output device and drains the APU's sample ring from
// the stream callback. Underflow produces silence; the high-pass filter
// upstream keeps the signal centered on zero, so silence doesn't pop.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};

use super::ring::SampleConsumer;

/// Audio output configuration
#[derive(Clone)]
pub struct AudioConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Output channels (samples are mono and duplicated as needed)
    pub channels: u16,
}

impl AudioConfig {
    /// Default configuration: 44.1 kHz mono
    pub fn new() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 1,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Host audio stream
pub struct AudioOutput {
    config: AudioConfig,
    _device: Device,
    stream: Stream,
}

impl AudioOutput {
    /// Open the default output device and start draining the ring
    ///
    /// # Errors
    ///
    /// Returns a message when no device is available or the stream cannot
    /// be built.
    pub fn new(config: AudioConfig, consumer: SampleConsumer) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No output device available")?;

        println!("Audio device: {}", device.name().unwrap_or_default());

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let channels = config.channels as usize;
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = consumer.pop().unwrap_or(0.0);
                        for slot in frame.iter_mut() {
                            *slot = sample;
                        }
                    }
                },
                move |err| {
                    eprintln!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        println!(
            "Audio output initialized: {} Hz, {} channel(s)",
            config.sample_rate, config.channels
        );

        Ok(Self {
            config,
            _device: device,
            stream,
        })
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Pause playback
    pub fn pause(&self) -> Result<(), String> {
        self.stream
            .pause()
            .map_err(|e| format!("Failed to pause audio: {}", e))
    }

    /// Resume playback
    pub fn resume(&self) -> Result<(), String> {
        self.stream
            .play()
            .map_err(|e| format!("Failed to resume audio: {}", e))
    }
}
