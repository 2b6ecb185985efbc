//! Winit-based Viewer Shell
//!
//! Opens a window, drives a [`Session`] once per redraw and keeps every load
//! off the event loop:
//!
//! - [`Viewer`]: builder that owns the configuration and starts the loop
//! - `ViewerRunner`: the `ApplicationHandler` (not exposed publicly)
//!
//! Loads run as tasks on a tokio runtime and report back through a `flume`
//! channel that is drained at the start of every frame. At most one load is
//! in flight: starting a switch aborts the previous load task.
//!
//! # Example
//!
//! ```rust,ignore
//! use stage::app::winit::Viewer;
//! use stage::config::StageConfig;
//!
//! fn main() -> stage::errors::Result<()> {
//!     Viewer::new(StageConfig::default()).run()
//! }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::assets::catalog::CatalogStep;
use crate::assets::io::AssetReaderVariant;
use crate::assets::pipeline::{LoadedAvatar, load_avatar, load_environment};
use crate::config::StageConfig;
use crate::errors::{Result, StageError};
use crate::scene::ReflectionTexture;
use crate::session::{LoadTicket, Session};
use crate::utils::time::Timer;

pub mod input_adapter;

use self::input_adapter::{ViewerCommand, command_for};

/// Viewer builder.
pub struct Viewer {
    config: StageConfig,
}

impl Viewer {
    #[must_use]
    pub fn new(config: StageConfig) -> Self {
        Self { config }
    }

    /// Runs the viewer until the window closes.
    ///
    /// The event loop takes ownership of the current thread.
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("stage-loader")
            .build()?;
        let reader = AssetReaderVariant::from_source(&self.config.resource_root)?;
        let session = Session::new(self.config)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = ViewerRunner::new(session, reader, runtime);
        event_loop.run_app(&mut runner).map_err(StageError::from)
    }
}

/// Results posted by load tasks.
enum LoadMessage {
    Environment(Result<Option<ReflectionTexture>>),
    Avatar(LoadTicket, Result<LoadedAvatar>),
}

/// The single in-flight load task.
#[derive(Default)]
struct LoadSlot {
    task: Option<JoinHandle<()>>,
}

impl LoadSlot {
    /// Aborts the in-flight load, if any, and tracks `task` instead.
    ///
    /// Returns the aborted task.
    fn replace(&mut self, task: JoinHandle<()>) -> Option<JoinHandle<()>> {
        let previous = self.task.replace(task);
        if let Some(previous) = &previous
            && !previous.is_finished()
        {
            log::debug!("Aborting superseded load");
            previous.abort();
        }
        previous
    }
}

struct ViewerRunner {
    session: Session,
    reader: AssetReaderVariant,
    runtime: tokio::runtime::Runtime,
    load: LoadSlot,
    /// Set until the environment result has been applied.
    environment_pending: bool,

    tx: flume::Sender<LoadMessage>,
    rx: flume::Receiver<LoadMessage>,

    window: Option<Arc<Window>>,
    timer: Timer,
    title: String,
}

impl ViewerRunner {
    fn new(session: Session, reader: AssetReaderVariant, runtime: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            session,
            reader,
            runtime,
            load: LoadSlot::default(),
            environment_pending: false,
            tx,
            rx,
            window: None,
            timer: Timer::new(),
            title: String::new(),
        }
    }

    /// Starts a model switch, aborting any load still in flight.
    ///
    /// The first switch also fetches the environment so that it is in place
    /// before the model is installed; an aborted switch hands that duty on.
    fn spawn_load(&mut self, step: CatalogStep, with_environment: bool) {
        let ticket = self.session.begin_switch(step);
        let reader = self.reader.clone();
        let plan = self.session.plan().clone();
        self.environment_pending |= with_environment;
        let environment = self
            .environment_pending
            .then(|| self.session.config().environment.clone());
        let tx = self.tx.clone();

        let task = self.runtime.spawn(async move {
            if let Some(environment) = environment {
                let result = load_environment(&reader, &environment).await;
                if tx.send(LoadMessage::Environment(result)).is_err() {
                    return;
                }
            }
            let result = load_avatar(&reader, &plan, &ticket.model_file).await;
            if tx.send(LoadMessage::Avatar(ticket, result)).is_err() {
                log::debug!("Viewer closed before the load finished");
            }
        });
        self.load.replace(task);
    }

    fn drain_loads(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                LoadMessage::Environment(result) => {
                    self.environment_pending = false;
                    self.session.apply_environment(result);
                }
                LoadMessage::Avatar(ticket, result) => {
                    self.session.finish_load(&ticket, result);
                }
            }
        }
    }

    fn handle_command(&mut self, command: ViewerCommand, event_loop: &ActiveEventLoop) {
        match command {
            ViewerCommand::RandomClip => {
                // Rejections are logged by the session.
                let _ = self.session.request_random_clip(self.timer.elapsed);
            }
            ViewerCommand::NextModel => self.spawn_load(CatalogStep::Next, false),
            ViewerCommand::PreviousModel => self.spawn_load(CatalogStep::Previous, false),
            ViewerCommand::Exit => event_loop.exit(),
        }
    }

    fn update_frame(&mut self) {
        self.drain_loads();
        self.timer.tick();
        self.session.frame(self.timer.dt_seconds());

        let title = self
            .session
            .ui()
            .window_title(&self.session.config().window.title);
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler for ViewerRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_config = &self.session.config().window;
        let window_attributes = Window::default_attributes()
            .with_title(&window_config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(window_config.width),
                f64::from(window_config.height),
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.session
            .resize(size.width, size.height, window.scale_factor() as f32);
        self.window = Some(window);

        self.timer = Timer::new();
        self.spawn_load(CatalogStep::Current, true);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                let scale_factor = self
                    .window
                    .as_ref()
                    .map_or(1.0, |w| w.scale_factor() as f32);
                self.session
                    .resize(physical_size.width, physical_size.height, scale_factor);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = command_for(&event) {
                    self.handle_command(command, event_loop);
                }
            }
            WindowEvent::RedrawRequested => {
                self.update_frame();
                if let Some(w) = &self.window {
                    w.request_redraw();
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
