//! Terminal surface
//!
//! Terminal setup and teardown, plus the widgets that paint the picker.
//! The wheel bitmap is drawn with upper-half-block cells, so one cell shows
//! two vertically stacked pixels and the wheel is as many pixels wide as it
//! is cells wide.

use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Rect, Size},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
    Frame, Terminal,
};

use crate::{
    colors::{palette, Rgb, Rgba, Theme},
    error::{ChromaError, ChromaResult},
    event::Point,
    preview::GradientPreview,
    state::Slot,
    sync::Picker,
    wheel::Bitmap,
};

/// Width of the side panel in cells
pub const PANEL_WIDTH: u16 = 36;

const HALF_BLOCK: &str = "▀";

/// Terminal user interface manager
pub struct Tui {
    /// Terminal instance for rendering
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance
    pub fn new() -> ChromaResult<Self> {
        if !Self::is_real_terminal() {
            return Err(ChromaError::terminal(
                "terminal check",
                (0, 0),
                "Not a real terminal or terminal capabilities not available".to_string(),
            )
            .into());
        }

        let terminal = Self::setup_terminal()?;
        Ok(Self { terminal })
    }

    /// Check if we're in a real terminal
    fn is_real_terminal() -> bool {
        if !atty::is(atty::Stream::Stdout) {
            return false;
        }

        match std::env::var("TERM") {
            Ok(term) if term == "dumb" => false,
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// Alternate screen, mouse capture and raw mode
    fn setup_terminal() -> ChromaResult<Terminal<CrosstermBackend<Stdout>>> {
        let mut stdout = io::stdout();

        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
            ChromaError::terminal(
                "terminal setup",
                (0, 0),
                format!("Failed to setup terminal: {}", e),
            )
        })?;

        terminal::enable_raw_mode().map_err(|e| {
            ChromaError::terminal(
                "terminal setup",
                (0, 0),
                format!("Failed to enable raw mode: {}", e),
            )
        })?;

        Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
            ChromaError::terminal(
                "terminal setup",
                (0, 0),
                format!("Failed to create terminal: {}", e),
            )
            .into()
        })
    }

    /// Restores terminal to original state
    fn restore_terminal(&mut self) -> ChromaResult<()> {
        terminal::disable_raw_mode().map_err(|e| {
            ChromaError::terminal(
                "terminal cleanup",
                (0, 0),
                format!("Failed to disable raw mode: {}", e),
            )
        })?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| {
            ChromaError::terminal(
                "terminal cleanup",
                (0, 0),
                format!("Failed to restore terminal: {}", e),
            )
        })?;

        Ok(self.terminal.show_cursor().map_err(|e| {
            ChromaError::terminal(
                "terminal cleanup",
                (0, 0),
                format!("Failed to show cursor: {}", e),
            )
        })?)
    }

    /// Draws one frame
    pub fn draw<F>(&mut self, render_fn: F) -> ChromaResult<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(render_fn).map(|_| ()).map_err(|e| {
            ChromaError::terminal(
                "rendering",
                (0, 0),
                format!("Failed to render frame: {}", e),
            )
            .into()
        })
    }

    /// Returns the terminal size
    pub fn size(&self) -> ChromaResult<Size> {
        Ok(self.terminal.size().map_err(|e| {
            ChromaError::terminal(
                "terminal size",
                (0, 0),
                format!("Failed to get terminal size: {}", e),
            )
        })?)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.restore_terminal() {
            tracing::error!("failed to restore terminal: {}", e);
            eprintln!("Failed to restore terminal: {}", e);
        }
    }
}

/// Where the wheel sits on screen and how large it is in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelGeometry {
    /// Cells covered by the wheel
    pub cells: Rect,
    /// Wheel diameter in pixels (one pixel per column, two per row)
    pub diameter: u32,
}

impl WheelGeometry {
    /// Largest wheel that fits in `area`
    pub fn fit(area: Rect) -> Self {
        let diameter = u32::from(area.width).min(u32::from(area.height) * 2);
        let rows = diameter.div_ceil(2);
        Self {
            cells: Rect::new(area.x, area.y, diameter as u16, rows as u16),
            diameter,
        }
    }

    /// Wheel-local pixel position of a cell, unclamped so drags can leave the wheel
    pub fn to_local(&self, column: u16, row: u16) -> Point {
        Point::new(
            f64::from(column) - f64::from(self.cells.x) + 0.5,
            (f64::from(row) - f64::from(self.cells.y)) * 2.0 + 1.0,
        )
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.cells.x
            && column < self.cells.x + self.cells.width
            && row >= self.cells.y
            && row < self.cells.y + self.cells.height
    }
}

/// Split the screen into the wheel and the side panel
pub fn split(area: Rect) -> (WheelGeometry, Rect) {
    let panel_width = PANEL_WIDTH.min(area.width);
    let wheel_area = Rect::new(area.x, area.y, area.width - panel_width, area.height);
    let panel = Rect::new(area.x + wheel_area.width, area.y, panel_width, area.height);
    (WheelGeometry::fit(wheel_area), panel)
}

/// Paints a wheel bitmap with half-block cells
#[derive(Debug)]
pub struct WheelView<'a> {
    bitmap: &'a Bitmap,
    background: Rgba,
}

impl<'a> WheelView<'a> {
    pub fn new(bitmap: &'a Bitmap, background: Rgba) -> Self {
        Self { bitmap, background }
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        match self.bitmap.get(x, y) {
            Some(px) if !px.is_transparent() => px,
            _ => self.background,
        }
    }
}

impl Widget for WheelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.bitmap.height().div_ceil(2).min(u32::from(area.height));
        let columns = self.bitmap.width().min(u32::from(area.width));

        for row in 0..rows {
            for column in 0..columns {
                let top = self.pixel(column, row * 2);
                let bottom = self.pixel(column, row * 2 + 1);
                let position = (area.x + column as u16, area.y + row as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_symbol(HALF_BLOCK)
                        .set_fg(top.to_ratatui())
                        .set_bg(bottom.to_ratatui());
                }
            }
        }
    }
}

/// Paints the gradient preview as a horizontal strip
#[derive(Debug)]
pub struct GradientStrip<'a> {
    gradient: &'a GradientPreview,
}

impl<'a> GradientStrip<'a> {
    pub fn new(gradient: &'a GradientPreview) -> Self {
        Self { gradient }
    }
}

impl Widget for GradientStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let span = f64::from(area.width.saturating_sub(1).max(1));
        for column in 0..area.width {
            let color = self.gradient.sample(f64::from(column) / span);
            for row in 0..area.height {
                if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
                    cell.set_symbol(" ").set_bg(color.to_ratatui());
                }
            }
        }
    }
}

/// Draw the whole picker: wheel on the left, readouts and previews on the right
pub fn draw_picker(frame: &mut Frame<'_>, picker: &mut Picker, entry: Option<&str>) {
    let area = frame.area();
    let (geometry, panel) = split(area);
    let theme = picker.theme();
    picker.resize(geometry.diameter);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background().to_ratatui())),
        area,
    );

    if let Some(bitmap) = picker.render_wheel() {
        frame.render_widget(WheelView::new(bitmap, theme.background()), geometry.cells);
    }

    let block = Block::bordered()
        .title(" chromasync ")
        .style(
            Style::default()
                .fg(theme.foreground().to_ratatui())
                .bg(theme.background().to_ratatui()),
        );
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let lines = panel_lines(picker, entry, theme);
    let text_height = (lines.len() as u16).min(inner.height);
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x, inner.y, inner.width, text_height),
    );

    if inner.height > text_height + 1 {
        let strip = Rect::new(
            inner.x,
            inner.y + text_height,
            inner.width,
            2.min(inner.height - text_height),
        );
        frame.render_widget(GradientStrip::new(&picker.surfaces().gradient), strip);
    }
}

fn panel_lines(picker: &Picker, entry: Option<&str>, theme: Theme) -> Vec<Line<'static>> {
    let surfaces = picker.surfaces();
    let muted = Style::default().fg(palette::MUTED.to_ratatui());
    let accent = Style::default()
        .fg(palette::ACCENT.to_ratatui())
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for slot in Slot::ALL {
        let color = picker.get(slot);
        let marker = if slot == picker.active_slot() { "▶ " } else { "  " };
        let name = match slot {
            Slot::Primary => "primary  ",
            Slot::Secondary => "secondary",
        };
        lines.push(Line::from(vec![
            Span::styled(marker, accent),
            Span::raw(format!("{} ", name)),
            Span::styled("    ", Style::default().bg(Rgba::from(color).to_ratatui())),
            Span::raw(format!(" {}", color.to_hex())),
        ]));
    }
    lines.push(Line::default());

    lines.push(Line::from(vec![
        Span::styled("hex ", muted),
        Span::raw(surfaces.readout.hex.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("rgb ", muted),
        Span::raw(surfaces.readout.rgb.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("hsl ", muted),
        Span::raw(surfaces.readout.hsl.clone()),
    ]));
    lines.push(Line::default());

    lines.push(Line::from(vec![
        Span::styled("hue        ", muted),
        Span::raw(format!("{:>4}", surfaces.sliders.hue)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("saturation ", muted),
        Span::raw(format!("{:>4}", surfaces.sliders.saturation)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("brightness ", muted),
        Span::raw(format!("{:>4}", surfaces.sliders.brightness)),
    ]));
    lines.push(Line::default());

    let mut recent = vec![Span::styled("recent ", muted)];
    for (i, hex) in surfaces.recent.iter().enumerate() {
        let swatch = Rgb::from_hex(hex).map(Rgba::from).unwrap_or(theme.background());
        recent.push(Span::styled(
            format!("{}", i + 1),
            Style::default()
                .fg(theme.foreground().to_ratatui())
                .bg(swatch.to_ratatui()),
        ));
        recent.push(Span::raw(" "));
    }
    lines.push(Line::from(recent));

    lines.push(Line::from(match entry {
        Some(text) => Span::styled(format!("hex> {}", text), accent),
        None => Span::styled("arrows tab # h/s/b g d o t q", muted),
    }));
    lines.push(Line::from(Span::styled(
        format!("{:?} gradient, opacity {:.1}", surfaces.gradient.kind, surfaces.gradient.opacity),
        muted,
    )));

    lines
}
