use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::{Camera, InputState};
use crate::caster::RayCaster;
use crate::config::Config;
use crate::map::GridMap;
use crate::projector::{ColorStrategy, FixedColor, Projector, RandomPulse, Rgb};

mod camera;
mod caster;
mod config;
mod map;
mod projector;
mod render;

const CEILING: Rgb = Rgb::new(0, 0, 255);
const FLOOR: Rgb = Rgb::new(200, 200, 150);
const WALL: Rgb = Rgb::new(139, 69, 19);

/// Keeps the spawn point off an exact tile boundary.
const SPAWN_NUDGE: f32 = 1e-5;

/// Solid border all around; rays never escape the authored rows.
const TEXT_MAP: [&str; 9] = [
    "XXXXXXXXXXXX",
    "X..........X",
    "X....X..XX..X",
    "X..X.......X",
    "X..X..XX...X",
    "X.X....X...X",
    "X.X..X..XX.X",
    "X....X.....X",
    "XXXXXXXXXXXXX",
];

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    config: Config,
    map: GridMap,
    camera: Camera,
    caster: RayCaster,
    projector: Projector,
    colors: Box<dyn ColorStrategy>,

    // fixed-size internal framebuffer, blitted to the surface each frame
    fb: Vec<u32>,

    keys_down: HashSet<KeyCode>,
    started: Instant,
    frame_counter: u32,
    last_fps_log: Instant,
}

impl App {
    fn new(config: Config, colors: Box<dyn ColorStrategy>) -> Self {
        let map = GridMap::parse(&TEXT_MAP, config.tile_size);
        let camera = Camera::new(
            glam::Vec2::new(
                config.screen_width as f32 / 2. + SPAWN_NUDGE,
                config.screen_height as f32 / 2. + SPAWN_NUDGE,
            ),
            0.,
            config.speed,
            config.angle_step,
        );

        let projector = Projector::new(&config);
        log::info!("projection coefficient {:.1}", projector.proj_coeff());

        Self {
            window: None,
            surface: None,
            caster: RayCaster::new(&config),
            projector,
            colors,
            fb: vec![0; config.screen_width * config.screen_height],
            map,
            camera,
            config,
            keys_down: HashSet::new(),
            started: Instant::now(),
            frame_counter: 0,
            last_fps_log: Instant::now(),
        }
    }

    /// Flatten the pressed-key set into the per-frame snapshot the core
    /// consumes.
    fn input_snapshot(&self) -> InputState {
        InputState {
            forward: self.keys_down.contains(&KeyCode::KeyW),
            back: self.keys_down.contains(&KeyCode::KeyS),
            strafe_left: self.keys_down.contains(&KeyCode::KeyA),
            strafe_right: self.keys_down.contains(&KeyCode::KeyD),
            turn_left: self.keys_down.contains(&KeyCode::ArrowLeft),
            turn_right: self.keys_down.contains(&KeyCode::ArrowRight),
            quit: self.keys_down.contains(&KeyCode::Escape),
        }
    }

    /// Advance the camera and recompute the internal framebuffer.
    fn update_and_compose(&mut self, input: &InputState) {
        self.camera.advance(input);

        let hits = self.caster.cast_frame(&self.map, &self.camera);
        let elapsed = self.started.elapsed().as_secs_f32();
        let commands = self.projector.project_frame(&hits, &*self.colors, elapsed);

        render::render_frame(&mut self.fb, &self.config, &commands, CEILING, FLOOR);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        log::info!("creating window");
        let attributes = Window::default_attributes()
            .with_title("gridcast")
            .with_inner_size(LogicalSize::new(
                self.config.screen_width as f64,
                self.config.screen_height as f64,
            ))
            .with_resizable(false);
        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        log::info!("creating surface");
        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        self.surface = Some(surface);
        self.window = Some(window);
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                // quit is checked once per frame, never mid-computation
                let input = self.input_snapshot();
                if input.quit {
                    log::info!("quit requested, stopping");
                    event_loop.exit();
                    return;
                }

                self.update_and_compose(&input);

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // minimized, skip drawing
                }

                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .expect("surface resize");

                let mut buf = surface.buffer_mut().expect("buffer_mut");
                blit_nearest(
                    &mut buf,
                    dw,
                    dh,
                    &self.fb,
                    self.config.screen_width,
                    self.config.screen_height,
                );
                buf.present().expect("present");

                self.frame_counter += 1;
                let now = Instant::now();
                let since_log = now.duration_since(self.last_fps_log).as_secs_f32();
                if since_log >= 1.0 {
                    log::debug!("fps: {:.1}", self.frame_counter as f32 / since_log);
                    self.frame_counter = 0;
                    self.last_fps_log = now;
                }

                self.window.as_ref().unwrap().request_redraw();
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Nearest-neighbor copy of the internal framebuffer onto the surface. The
/// window is non-resizable, so this is normally a straight row copy; scaling
/// only happens when the compositor hands us a different size anyway.
fn blit_nearest(dst: &mut [u32], dw: usize, dh: usize, src: &[u32], sw: usize, sh: usize) {
    if dw == sw && dh == sh {
        dst[..sw * sh].copy_from_slice(src);
        return;
    }

    for y in 0..dh {
        let src_row = (y * sh / dh) * sw;
        let dst_row = y * dw;
        for x in 0..dw {
            dst[dst_row + x] = src[src_row + x * sw / dw];
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRIDCAST_LOG");

    let config = Config::default();
    config.validate()?;
    log::info!(
        "{}x{} screen, {} rays over {:.3} rad fov",
        config.screen_width,
        config.screen_height,
        config.ray_count,
        config.fov
    );

    log::info!("initializing event loop");
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // animated wall colors on request, flat brown otherwise
    let colors: Box<dyn ColorStrategy> = if std::env::var_os("GRIDCAST_PULSE").is_some() {
        log::info!("using animated wall colors");
        Box::new(RandomPulse::default())
    } else {
        Box::new(FixedColor(WALL))
    };

    let mut app = App::new(config, colors);
    event_loop.run_app(&mut app)?;

    Ok(())
}
