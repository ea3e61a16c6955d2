// Window shell - winit event loop plus a pixels surface
//
// Runs the emulator one frame per redraw at the configured pace, feeds
// keyboard state into the controller ports, and blits the finished frame.

use super::framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::emulator::Emulator;
use crate::input::{KeyboardHandler, Player};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Integer scale factor (1x-8x)
    pub scale: u32,
    /// Target frame rate (60 for NTSC)
    pub target_fps: u32,
    /// Wait for vertical sync
    pub vsync: bool,
}

impl WindowConfig {
    /// Defaults: 3x scale, 60 FPS, vsync on
    pub fn new() -> Self {
        Self {
            scale: 3,
            target_fps: 60,
            vsync: true,
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn window_width(&self) -> u32 {
        SCREEN_WIDTH as u32 * self.scale
    }

    pub fn window_height(&self) -> u32 {
        SCREEN_HEIGHT as u32 * self.scale
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The running window application
struct DisplayWindow {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    emulator: Emulator,
    frame_buffer: FrameBuffer,
    keyboard: KeyboardHandler,
    last_frame_time: Instant,
}

impl DisplayWindow {
    fn new(config: WindowConfig, emulator: Emulator) -> Self {
        Self {
            window: None,
            pixels: None,
            config,
            emulator,
            frame_buffer: FrameBuffer::new(),
            keyboard: KeyboardHandler::new(),
            last_frame_time: Instant::now(),
        }
    }

    /// Run one emulated frame and render it
    fn advance_frame(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.emulator
            .set_controller1(self.keyboard.controller_state(Player::One));
        self.emulator
            .set_controller2(self.keyboard.controller_state(Player::Two));

        self.emulator.run_frame()?;
        self.frame_buffer.copy_from(self.emulator.frame());

        if let Some(pixels) = &mut self.pixels {
            self.frame_buffer.to_rgba(pixels.frame_mut());
            pixels.render()?;
        }
        Ok(())
    }

    fn frame_due(&mut self) -> bool {
        if self.last_frame_time.elapsed() >= self.config.frame_duration() {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl ApplicationHandler for DisplayWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("rusticom")
            .with_inner_size(LogicalSize::new(
                self.config.window_width(),
                self.config.window_height(),
            ))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("Failed to create window"),
        );
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface)
            .expect("Failed to create pixel buffer");

        self.window = Some(window);
        self.pixels = Some(pixels);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.keyboard.handle_key_press(physical_key),
                ElementState::Released => self.keyboard.handle_key_release(physical_key),
            },
            WindowEvent::RedrawRequested => {
                if self.frame_due() {
                    if let Err(err) = self.advance_frame() {
                        eprintln!("Emulation stopped: {}", err);
                        event_loop.exit();
                        return;
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Create the window and run the emulator inside it
pub fn run_display(
    config: WindowConfig,
    emulator: Emulator,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(if config.vsync {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    });

    println!(
        "Display: {}x{} ({}x scale), {} FPS target",
        config.window_width(),
        config.window_height(),
        config.scale,
        config.target_fps
    );

    let mut display = DisplayWindow::new(config, emulator);
    event_loop.run_app(&mut display)?;
    Ok(())
}
