//! Drawing windows on the desktop, using winit for the event loop and
//! softbuffer to put pixels on screen.

use std::{
    collections::HashMap,
    num::NonZeroU32,
    process::ExitCode,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use canvas::{
    Control, Frame, Key, MouseButton, MousePress, PostError, Poster, RenderLoop, Request,
    Surface, WindowConfig,
};
use math::{Bitmap, Color, Rectangle, Vec2D};
use settings::{Demo, Settings};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{self, NamedKey},
    window::{Window, WindowId},
};

use super::ChromeError;
use crate::demos;

/// Identifies a drawing window independently of the platform window
type ViewKey = usize;

#[derive(Debug)]
enum UserEvent {
    Request(ViewKey, Request),
}

/// Delivers requests from a worker thread to the event loop
struct ProxyPoster {
    proxy: Mutex<EventLoopProxy<UserEvent>>,
    key: ViewKey,
}

impl Poster for ProxyPoster {
    fn post(&self, request: Request) -> Result<(), PostError> {
        self.proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send_event(UserEvent::Request(self.key, request))
            .map_err(|_| PostError::Disconnected)
    }
}

/// The on-screen pixels of one window.
///
/// softbuffer does not guarantee that the buffer keeps its contents between
/// frames, so a copy of everything presented so far is kept around.
struct ScreenSurface {
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    mirror: Bitmap<Color>,
}

impl ScreenSurface {
    fn flush(&mut self, region: Rectangle) -> Result<(), softbuffer::SoftBufferError> {
        let mut buffer = self.surface.buffer_mut()?;
        for (target, source) in buffer.iter_mut().zip(self.mirror.data()) {
            *target = source.0;
        }

        match damage_for(region) {
            Some(damage) => buffer.present_with_damage(&[damage]),
            None => buffer.present(),
        }
    }
}

impl Surface for ScreenSurface {
    fn present(&mut self, frame: &Frame) {
        self.mirror.blit(&frame.pixels, frame.region.top_left());

        if let Err(error) = self.flush(frame.region) {
            log::warn!("Failed to present frame: {error}");
        }
    }
}

fn damage_for(region: Rectangle) -> Option<softbuffer::Rect> {
    Some(softbuffer::Rect {
        x: u32::try_from(region.top_left().x).ok()?,
        y: u32::try_from(region.top_left().y).ok()?,
        width: NonZeroU32::new(u32::try_from(region.width()).ok()?)?,
        height: NonZeroU32::new(u32::try_from(region.height()).ok()?)?,
    })
}

/// A platform window together with the drawing window it shows
struct View {
    window: Arc<Window>,
    render_loop: RenderLoop,
    surface: ScreenSurface,

    /// Last known cursor position, in canvas coordinates
    cursor: Vec2D,

    interval: Duration,
    next_tick: Instant,
}

impl View {
    fn handle_window_event(&mut self, event: WindowEvent) -> Control {
        match event {
            WindowEvent::CloseRequested => {
                self.render_loop.on_close();
                Control::Closed
            },
            WindowEvent::RedrawRequested => {
                let config = self.render_loop.config();
                let everything = Rectangle::of_size(config.width(), config.height());
                self.render_loop.on_paint(&mut self.surface, everything);
                Control::Continue
            },
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let key = match event.logical_key {
                    keyboard::Key::Named(NamedKey::Escape) => Key::Escape,
                    _ => Key::Other,
                };
                self.render_loop.on_key(key)
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2D::new(position.x.round() as i32, position.y.round() as i32);
                Control::Continue
            },
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Back => MouseButton::Other(3),
                    winit::event::MouseButton::Forward => MouseButton::Other(4),
                    winit::event::MouseButton::Other(other) => MouseButton::Other(other),
                };

                self.render_loop.on_mouse_press(MousePress {
                    x: self.cursor.x,
                    y: self.cursor.y,
                    button,
                });
                Control::Continue
            },
            _ => Control::Continue,
        }
    }
}

struct Easel {
    proxy: EventLoopProxy<UserEvent>,

    /// Windows that will be opened once the event loop is running
    pending: Vec<(Demo, WindowConfig)>,

    views: HashMap<ViewKey, View>,
    view_keys: HashMap<WindowId, ViewKey>,
    next_key: ViewKey,

    /// Whether any window failed to open
    failed: bool,
}

impl Easel {
    fn open(
        &mut self,
        event_loop: &ActiveEventLoop,
        demo: Demo,
        config: WindowConfig,
    ) -> Result<(), ChromeError> {
        let width = NonZeroU32::new(config.width() as u32).ok_or(ChromeError::EmptyCanvas)?;
        let height = NonZeroU32::new(config.height() as u32).ok_or(ChromeError::EmptyCanvas)?;

        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(width.get(), height.get()))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let context = softbuffer::Context::new(window.clone())?;
        let mut surface = softbuffer::Surface::new(&context, window.clone())?;
        surface.resize(width, height)?;

        let key = self.next_key;
        self.next_key += 1;

        let poster = ProxyPoster {
            proxy: Mutex::new(self.proxy.clone()),
            key,
        };

        let mirror = Bitmap::new(config.width(), config.height());
        let mut render_loop =
            RenderLoop::new(config, poster, move |window| demos::run(demo, window));
        let interval = render_loop.on_show();

        log::info!("Opened {:?} in window {:?}", demo.name(), window.id());
        self.view_keys.insert(window.id(), key);
        self.views.insert(
            key,
            View {
                window,
                render_loop,
                surface: ScreenSurface { surface, mirror },
                cursor: Vec2D::default(),
                interval,
                next_tick: Instant::now() + interval,
            },
        );

        Ok(())
    }

    fn remove(&mut self, event_loop: &ActiveEventLoop, key: ViewKey) {
        if let Some(view) = self.views.remove(&key) {
            self.view_keys.remove(&view.window.id());
        }

        if self.views.is_empty() {
            log::info!("Last window closed");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<UserEvent> for Easel {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        for (demo, config) in std::mem::take(&mut self.pending) {
            if let Err(error) = self.open(event_loop, demo, config) {
                log::error!("Failed to open {:?}: {error}", demo.name());
                self.failed = true;
            }
        }

        if self.views.is_empty() {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(&key) = self.view_keys.get(&window_id) else {
            return;
        };
        let Some(view) = self.views.get_mut(&key) else {
            return;
        };

        if view.handle_window_event(event) == Control::Closed {
            self.remove(event_loop, key);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        let UserEvent::Request(key, request) = event;
        let Some(view) = self.views.get_mut(&key) else {
            log::trace!("Dropping {request:?} for a window that is already gone");
            return;
        };

        if view.render_loop.on_request(&mut view.surface, request) == Control::Closed {
            self.remove(event_loop, key);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let mut next_wake: Option<Instant> = None;

        for view in self.views.values_mut() {
            if view.next_tick <= now {
                view.render_loop.on_tick(&mut view.surface);
                view.next_tick = now + view.interval;
            }

            next_wake = Some(next_wake.map_or(view.next_tick, |wake| wake.min(view.next_tick)));
        }

        match next_wake {
            Some(wake) => event_loop.set_control_flow(ControlFlow::WaitUntil(wake)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

pub fn run(settings: &Settings) -> ExitCode {
    let event_loop = match EventLoop::<UserEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(error) => {
            log::error!("{}", ChromeError::from(error));
            return ExitCode::FAILURE;
        },
    };

    let pending = settings
        .demos
        .iter()
        .map(|&demo| (demo, settings.window_config(demo)))
        .collect();

    let mut easel = Easel {
        proxy: event_loop.create_proxy(),
        pending,
        views: HashMap::new(),
        view_keys: HashMap::new(),
        next_key: 0,
        failed: false,
    };

    if let Err(error) = event_loop.run_app(&mut easel) {
        log::error!("{}", ChromeError::from(error));
        return ExitCode::FAILURE;
    }

    if easel.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
