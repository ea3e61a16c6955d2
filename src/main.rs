// rusticom - main entry point
//
// Loads the ROM named on the command line and runs it in the window
// shell, with audio when the "audio" feature is enabled.

use rusticom::emulator::Emulator;
use rusticom::WindowConfig;
use std::env;
use std::process;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("rusticom v{}", env!("CARGO_PKG_VERSION"));

    let rom_path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: rusticom <rom.nes>");
            process::exit(1);
        }
    };

    let mut emulator = Emulator::new();
    if let Err(err) = emulator.load_rom(&rom_path) {
        eprintln!("Failed to load ROM '{}': {}", rom_path, err);
        process::exit(1);
    }

    let config = emulator.config().clone();
    emulator.set_volume(config.audio.volume);
    emulator.set_sample_rate(config.audio.sample_rate);

    // Hand the sample ring to the host audio stream
    #[cfg(feature = "audio")]
    let _audio_output = if config.audio.enabled {
        match emulator.take_audio() {
            Some(consumer) => {
                let audio_config =
                    rusticom::AudioConfig::new().with_sample_rate(config.audio.sample_rate);
                match rusticom::AudioOutput::new(audio_config, consumer) {
                    Ok(output) => Some(output),
                    Err(err) => {
                        eprintln!("Audio disabled: {}", err);
                        None
                    }
                }
            }
            None => None,
        }
    } else {
        None
    };

    let window_config = WindowConfig::new()
        .with_scale(config.video.scale)
        .with_fps(config.video.fps)
        .with_vsync(config.video.vsync);

    rusticom::run_display(window_config, emulator)?;

    println!("Goodbye.");
    Ok(())
}
