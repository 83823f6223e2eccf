/// Terminal front-end for the planar transform pipeline
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::Point2;
use planar_core::{
    Controller, InputEvent, Painter, TransformContext, TransformError, ViewportParams,
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod error;
pub mod renderer;
pub mod scene;

pub use config::AppConfig;
pub use error::AppError;
pub use renderer::LineRenderer;

/// Blade speed of the demo scene, radians per frame
const SPIN_PER_FRAME: f32 = 0.03;

/// Main application struct for the interactive terminal view
pub struct TerminalApp {
    config: AppConfig,
    controller: Controller,
    viewport: ViewportParams,
    renderer: LineRenderer,
    pointer: Point2<f32>,
    pending: Vec<InputEvent>,
    spin: f32,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    last_error: Option<TransformError>,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let (columns, rows) = terminal::size()?;
        Ok(Self::with_size(config, columns, rows))
    }

    /// Build for a terminal of `columns x rows` cells without querying it.
    pub fn with_size(config: AppConfig, columns: u16, rows: u16) -> Self {
        let viewport = config.viewport();
        let controller =
            Controller::new(config.controller_settings()).with_state(config.initial_state());
        let status_rows = rows.saturating_sub(1) as usize;

        Self {
            controller,
            viewport,
            // bottom row is the status line
            renderer: LineRenderer::new(columns as usize, status_rows, viewport),
            pointer: Point2::new(viewport.width / 2.0, viewport.height / 2.0),
            pending: Vec::new(),
            spin: 0.0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            last_error: None,
            config,
        }
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        tracing::info!(
            width = self.viewport.width,
            height = self.viewport.height,
            "terminal session started"
        );

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        tracing::info!("terminal session ended");

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = self.frame_budget();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Time allotted to one frame; an fps of 0 is treated as 1.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(1000 / self.config.frame.fps.max(1) as u64)
    }

    /// Queue controller events and track the pointer; applied in `update`.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char(c) => {
                    if let Some(event) = self.config.keys.event_for(c) {
                        self.pending.push(event);
                    }
                }
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                column,
                row,
                ..
            }) => {
                self.pointer = self.renderer.to_surface(column, row);
            }
            Event::Resize(columns, rows) => {
                tracing::debug!(columns, rows, "terminal resized");
                self.renderer.resize(columns as usize, rows.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn update(&mut self) {
        self.controller.apply_all(self.pending.drain(..));
        self.spin += SPIN_PER_FRAME;
    }

    /// Rebuild this frame's matrices and draw into the cell buffer.
    fn paint(&mut self) -> Result<(), TransformError> {
        let context: TransformContext = self.controller.frame(self.pointer, &self.viewport)?;
        self.renderer.clear();

        if self.config.frame.trace_vertices {
            context.dump(&nalgebra::Matrix4::identity());
        }

        let mut painter = Painter::new(&context, &mut self.renderer)
            .with_debug(self.config.frame.trace_vertices);
        if self.controller.state().test_mode {
            scene::draw_test_pattern(&mut painter);
        } else {
            scene::draw_scene(&mut painter, self.spin);
        }
        painter.finish();
        Ok(())
    }

    fn render(&mut self) -> Result<(), AppError> {
        match self.paint() {
            Ok(()) => self.last_error = None,
            Err(e) => {
                if self.last_error.as_ref() != Some(&e) {
                    tracing::warn!("skipping frame: {}", e);
                }
                self.last_error = Some(e);
            }
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw status line
        let state = self.controller.state();
        let keys = &self.config.keys;
        let status = match &self.last_error {
            Some(e) => format!("{} | press {} to reset", e, keys.reset),
            None => format!(
                "{} | zoom {:.3} | rot {:.1}° | FPS: {:.1} | {}/{} zoom {}/{} rotate \
                 {} mode {} test {} reset q quit",
                state.mode,
                state.zoom,
                state.rotation.to_degrees(),
                self.fps,
                keys.zoom_in,
                keys.zoom_out,
                keys.rotate_left,
                keys.rotate_right,
                keys.cycle_mode,
                keys.toggle_test,
                keys.reset,
            ),
        };
        let status_color = if self.last_error.is_some() {
            Color::Red
        } else {
            Color::Yellow
        };
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.rows() as u16),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(status_color),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton};
    use planar_core::ProjectionMode;

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn app() -> TerminalApp {
        TerminalApp::with_size(AppConfig::default(), 80, 41)
    }

    #[test]
    fn test_keys_apply_on_update() {
        let mut app = app();
        app.handle_event(key('o'));
        app.handle_event(key('='));
        assert_eq!(app.controller().state().mode, ProjectionMode::CenterSquare);

        app.update();
        assert_eq!(app.controller().state().mode, ProjectionMode::BottomLeftSquare);
        assert!(app.controller().state().zoom < 1.0);
        assert!(app.pending.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_event(key('x'));
        assert!(app.is_running());
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(!app.is_running());
    }

    #[test]
    fn test_mouse_moves_pointer() {
        let mut app = app();
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));
        assert!((app.pointer.x - 4.0).abs() < 1e-3);
        assert!((app.pointer.y - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let mut config = AppConfig::default();
        config.frame.fps = 0;
        let stalled = TerminalApp::with_size(config, 80, 41);
        assert_eq!(stalled.frame_budget(), Duration::from_millis(1000));
        assert_eq!(app().frame_budget(), Duration::from_millis(33));
    }

    #[test]
    fn test_resize_reserves_status_row() {
        let mut app = app();
        app.handle_event(Event::Resize(100, 30));
        assert_eq!(app.renderer.columns(), 100);
        assert_eq!(app.renderer.rows(), 29);
    }

    #[test]
    fn test_paint_draws_pattern() {
        let mut app = app();
        app.paint().unwrap();
        // the 1000-wide grid crosses the centre cell
        assert_ne!(app.renderer.cell(40, 20), Some(' '));
    }
}
