use assets::Engine;
use image::DynamicImage;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

pub const HAPPY_PATH: &str = "happy.png";

const SPRITE_POS: (f32, f32) = (50.0, 50.0);
const CLEAR_OK: [u8; 3] = [0, 0, 0];
const CLEAR_MISSING: [u8; 3] = [255, 0, 0];

/// Sprite à dessiner, en pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
}

/// Contenu d'une image, transmis au renderer.
/// Fond noir + sprite si `happy.png` est chargé, fond rouge sinon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub clear: [u8; 3],
    pub sprite: Option<SpriteDraw>,
}

pub struct App {
    engine: Engine,
    window: Option<Window>,
    happy: Option<DynamicImage>,
    redraw: bool,
}

impl App {
    pub fn new(engine: Engine) -> Self {
        let happy = match engine.loader.load_image(HAPPY_PATH) {
            Ok(img) => {
                log::info!(
                    "Loaded {HAPPY_PATH} from {}",
                    engine.loader.which(HAPPY_PATH).unwrap_or("?")
                );
                Some(img)
            }
            Err(e) => {
                log::error!("loading {HAPPY_PATH} failed: {e:#}");
                None
            }
        };

        App {
            engine,
            window: None,
            happy,
            redraw: true,
        }
    }

    pub fn frame(&self) -> Frame {
        match &self.happy {
            Some(img) => Frame {
                clear: CLEAR_OK,
                sprite: Some(SpriteDraw {
                    x: SPRITE_POS.0,
                    y: SPRITE_POS.1,
                    width: img.width(),
                    height: img.height(),
                }),
            },
            None => Frame {
                clear: CLEAR_MISSING,
                sprite: None,
            },
        }
    }

    fn is_quit_key(key: PhysicalKey) -> bool {
        matches!(key, PhysicalKey::Code(KeyCode::Escape | KeyCode::KeyQ))
    }

    fn draw(&mut self) {
        if !self.redraw {
            return;
        }
        let frame = self.frame();
        match frame.sprite {
            Some(s) => log::debug!(
                "clear {:?}, sprite {}x{} at ({}, {})",
                frame.clear,
                s.width,
                s.height,
                s.x,
                s.y
            ),
            None => log::debug!("clear {:?}", frame.clear),
        }
        self.redraw = false;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(Engine::NAME)
            .with_inner_size(LogicalSize::new(640.0, 480.0));

        let failed = self.engine.outcomes().iter().filter(|o| o.is_failed()).count();
        log::info!(
            "{} asset source(s) mounted, {} failed",
            self.engine.mounted_count(),
            failed
        );

        match event_loop.create_window(attributes) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("create_window failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.draw(),
            WindowEvent::Resized(_) | WindowEvent::Occluded(false) => {
                self.redraw = true;
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && Self::is_quit_key(event.physical_key) {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use assets::VfsConfig;

    use super::*;
    use crate::builtin;

    #[test]
    fn missing_sprite_draws_red() {
        let app = App::new(Engine::default());
        assert_eq!(
            app.frame(),
            Frame {
                clear: CLEAR_MISSING,
                sprite: None
            }
        );
    }

    #[test]
    fn builtin_sprite_is_drawn() {
        let config = VfsConfig::empty().with_builtin(builtin::source());
        let app = App::new(Engine::init(&config).unwrap());

        let frame = app.frame();
        assert_eq!(frame.clear, CLEAR_OK);
        assert_eq!(
            frame.sprite,
            Some(SpriteDraw {
                x: 50.0,
                y: 50.0,
                width: 32,
                height: 32
            })
        );
        assert_eq!(app.engine.mounted_count(), 1);
    }

    #[test]
    fn loose_file_overrides_builtin_sprite() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 255, 255]));
        img.save(dir.path().join(HAPPY_PATH)).unwrap();

        let config = VfsConfig::empty()
            .with_builtin(builtin::source())
            .with_loose_dir(Some(dir.path().to_path_buf()));
        let app = App::new(Engine::init(&config).unwrap());

        let sprite = app.frame().sprite.unwrap();
        assert_eq!((sprite.width, sprite.height), (4, 4));
    }

    #[test]
    fn quit_keys() {
        assert!(App::is_quit_key(PhysicalKey::Code(KeyCode::Escape)));
        assert!(App::is_quit_key(PhysicalKey::Code(KeyCode::KeyQ)));
        assert!(!App::is_quit_key(PhysicalKey::Code(KeyCode::Space)));
    }
}
