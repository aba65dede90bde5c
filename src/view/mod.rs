//! Terminal preview (impure shell).
//!
//! The terminal stands in for the rendering tree: a resize re-measures every
//! item, the resulting size notifications flush a new layout, and the frame is
//! drawn before the flush returns.

mod tree;
mod widget;

pub use tree::{ItemBox, TerminalTree};
pub use widget::{CellPlacement, MasonryWidget};

use crate::config::{CellMetrics, ResolvedConfig};
use crate::integration;
use crate::layout::{Masonry, MasonryFrame, ObservedSet};
use crate::scene::Scene;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    masonry: Masonry<ObservedSet>,
    tree: TerminalTree,
    cell: CellMetrics,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Set up raw mode and the alternate screen, then build the app.
    pub fn new(scene: Scene, config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, scene, config)
    }

    /// Run the event loop. Returns when the user quits (q, Esc or Ctrl+C).
    pub fn run(&mut self) -> Result<(), TuiError> {
        const POLL_INTERVAL: Duration = Duration::from_millis(250);

        self.relayout()?;

        loop {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if self.handle_key(key)? {
                        return Ok(());
                    }
                }
                Event::Resize(width, height) => self.handle_resize(width, height)?,
                _ => {}
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app over an existing terminal (any backend).
    pub fn with_terminal(
        terminal: Terminal<B>,
        scene: Scene,
        config: &ResolvedConfig,
    ) -> Result<Self, TuiError> {
        let masonry = integration::masonry_for(&scene, config);
        let columns = terminal.size()?.width;
        let tree = TerminalTree::new(
            scene,
            f64::from(columns) * config.cell.width_px,
            config.breakpoints,
        );
        Ok(Self {
            terminal,
            masonry,
            tree,
            cell: config.cell,
        })
    }

    /// The underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Frame of the last commit.
    pub fn frame(&self) -> MasonryFrame {
        self.masonry.frame()
    }

    /// The simulated rendering tree.
    pub fn tree(&self) -> &TerminalTree {
        &self.tree
    }

    /// Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool, TuiError> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(true),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Ok(true),
            KeyCode::Char('l') => {
                let loaded = self.tree.load_images();
                if loaded > 0 {
                    info!(loaded, "images loaded");
                    self.relayout()?;
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Re-measure at the new viewport width and repaint.
    pub fn handle_resize(&mut self, width: u16, height: u16) -> Result<(), TuiError> {
        debug!(width, height, "terminal resized");
        self.tree
            .set_viewport_width(f64::from(width) * self.cell.width_px);
        self.relayout()
    }

    /// Drive measurement to rest, painting every commit, then paint the final frame.
    pub fn relayout(&mut self) -> Result<(), TuiError> {
        let cell = self.cell;
        let terminal = &mut self.terminal;
        let settled = integration::drive(&mut self.masonry, &mut self.tree, |tree, frame| {
            terminal
                .draw(|f| f.render_widget(MasonryWidget::new(tree, frame, cell), f.area()))
                .map(|_| ())
        })?;
        if let Some(reason) = &settled.deferred {
            debug!(%reason, "showing previous layout");
        }
        self.draw()
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let frame = self.masonry.frame();
        let tree = &self.tree;
        let cell = self.cell;
        self.terminal
            .draw(|f| f.render_widget(MasonryWidget::new(tree, &frame, cell), f.area()))?;
        Ok(())
    }
}

/// Run the preview for `scene`, restoring the terminal afterwards.
///
/// Logging must be initialized by the caller.
pub fn run_with_scene(scene: Scene, config: &ResolvedConfig) -> Result<(), TuiError> {
    let mut app = TuiApp::new(scene, config)?;
    let result = app.run();
    restore_terminal()?;
    result
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
