//! Wavefield demo - mounts the wave backdrop in a full window.

use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavefield::cli::Args;
use wavefield::color::NoBackdrop;
use wavefield::scene::WaveScene;

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    scene: WaveScene,
    /// Total frames to capture when recording; the app exits once reached.
    recording_frames: Option<usize>,
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Wavefield")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.scene.setup(Arc::clone(&window));
        if self.scene.rendering_unavailable() {
            // Degraded mode: keep the window up, render nothing.
            log::warn!("running without rendering; the backdrop stays empty");
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.scene.teardown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.scene.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.scene.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.scene.pointer_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => {
                self.scene.tick();
                if let Some(total) = self.recording_frames {
                    if self.scene.frames_rendered() >= total {
                        println!("Recording complete: {total} frames");
                        self.scene.teardown();
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = args.to_config();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let recording_config = args.create_recording_config();
    let recording_frames = recording_config.as_ref().map(|r| r.total_frames());

    println!("Wavefield - procedural wave backdrop");
    println!("Press ESC to quit\n");

    let mut app = App {
        window: None,
        scene: WaveScene::new(config, Box::new(NoBackdrop), recording_config),
        recording_frames,
    };

    let event_loop = EventLoop::new().expect("event loop");
    let _ = event_loop.run_app(&mut app);
}
