//! `tartan edit` - the terminal editor.
//!
//! One terminal row per row thread and two terminal columns per column
//! thread, so the cloth looks roughly square. The row selector strip runs
//! down the left of the cloth and the column selector strip along its top.
//! Mouse positions are translated into loom window coordinates, so all
//! hit testing and editing goes through [`Loom`].

use std::collections::BTreeSet;
use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};
use tartan::{
    Axis, Colour, Design, DesignStore, Loom, LoomLayout, Mode, Nudge, Palette, Raster,
    warp::MAX_THREADS_PER_CLICK,
};

use crate::config::Config;

/// Terminal columns per column thread.
const CELL_WIDTH: u16 = 2;

/// Width of the row selector strip in terminal columns.
const SELECTOR_WIDTH: u16 = 2;

/// Key summary shown under the status line.
const HELP: &str = "click paint  alt delete  ctrl insert  ←↑↓→ shift  1-8 swatch  e colour  n name  [] threads  rR cC repeat  d dup  i cloth  g guides  s save  a save as  o open  x reset  q quit";

/// Window layout the editor reports to the loom: no top bar, so terminal
/// rows map straight onto the loom.
const LAYOUT: LoomLayout = LoomLayout {
    top_bar: 0.0,
    border: 30.0,
};

pub fn cmd_edit(store: &DesignStore, config: &Config, name: Option<&str>) -> Result<()> {
    let design = match name {
        Some(name) if store.exists(name) => store
            .load(name)
            .with_context(|| format!("Failed to load design '{}'", name))?,
        _ => config.new_design(),
    };

    let mut app = App::new(store.clone(), config, design, name.map(str::to_string))?;
    run_tui(&mut app)
}

fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, app);

    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.sync_raster();
        terminal.draw(|frame| ui(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// What a text prompt edits when it is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    /// Hex colour of the selected swatch
    Colour,
    /// Name of the selected swatch, empty to clear
    Name,
    SaveAs,
    Open,
}

impl PromptKind {
    fn label(self, swatch: usize) -> String {
        match self {
            PromptKind::Colour => format!("Swatch {} colour (#rrggbb)", swatch + 1),
            PromptKind::Name => format!("Swatch {} name", swatch + 1),
            PromptKind::SaveAs => "Save as".to_string(),
            PromptKind::Open => "Open design".to_string(),
        }
    }
}

/// Single-line text entry shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

/// Application state for the editor
struct App {
    store: DesignStore,
    /// Design name, `None` for an unsaved scratch design
    name: Option<String>,
    loom: Loom,
    palette: Palette,
    raster: Raster,
    /// Settings used by `x` to reset
    defaults: Design,
    /// Cloth area from the last draw, for mouse mapping
    cloth_area: Rect,
    /// Edits since the last save
    modified: bool,
    status: String,
    /// Open text prompt, which takes every key until closed
    prompt: Option<Prompt>,
    should_quit: bool,
}

impl App {
    fn new(store: DesignStore, config: &Config, design: Design, name: Option<String>) -> Result<Self> {
        let mut loom = Loom::new(config.loom_context(), LAYOUT);
        loom.apply_design(&design)?;

        let raster = Raster::new(
            loom.rows().max(),
            loom.columns().max(),
            loom.context().thread_size,
        );

        let status = match &name {
            Some(name) => format!("Editing {}", name),
            None => "Scratch design (press `a` to save as)".to_string(),
        };

        Ok(Self {
            store,
            name,
            loom,
            palette: design.palette(),
            raster,
            defaults: config.new_design(),
            cloth_area: Rect::default(),
            modified: false,
            status,
            prompt: None,
            should_quit: false,
        })
    }

    /// Apply thread changes since the last frame.
    fn sync_raster(&mut self) {
        let paints = self.loom.drain_paints(&self.palette);
        self.raster.apply_all(&paints);
    }

    /// Replace the whole design, rebuilding the raster.
    fn load(&mut self, design: &Design) -> Result<()> {
        self.loom.apply_design(design)?;
        self.palette = design.palette();
        self.raster = Raster::new(
            self.loom.rows().max(),
            self.loom.columns().max(),
            self.loom.context().thread_size,
        );
        Ok(())
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Map a terminal cell to loom window coordinates.
    fn to_window(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.cloth_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let size = self.loom.context().thread_size;
        let border = LAYOUT.border;
        let dx = column - area.x;
        let dy = row - area.y;

        let x = if dx < SELECTOR_WIDTH {
            border / 2.0
        } else {
            border + ((dx - SELECTOR_WIDTH) / CELL_WIDTH) as f64 * size + size / 2.0
        };
        let y = if dy < 1 {
            border / 2.0
        } else {
            border + (dy - 1) as f64 * size + size / 2.0
        };
        Some((x, y))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let alt = mouse.modifiers.contains(KeyModifiers::ALT);
        let ctrl = mouse.modifiers.contains(KeyModifiers::CONTROL);
        self.loom.modes_mut().sync_modifiers(alt, ctrl);

        let Some((x, y)) = self.to_window(mouse.column, mouse.row) else {
            self.loom.leave();
            return;
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.loom.click(x, y) {
                    self.modified = true;
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.loom.hover_at(x, y);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        let selected = self.loom.context().selected;
        let count = self.loom.context().thread_count;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.edit(|loom| loom.nudge(Nudge::Up)),
            KeyCode::Down => self.edit(|loom| loom.nudge(Nudge::Down)),
            KeyCode::Left => self.edit(|loom| loom.nudge(Nudge::Left)),
            KeyCode::Right => self.edit(|loom| loom.nudge(Nudge::Right)),
            KeyCode::Char(c @ '1'..='8') => {
                let index = c as usize - '1' as usize;
                self.loom.set_selected(index);
                self.status = format!("Swatch {} selected", index + 1);
            }
            KeyCode::Char('[') => self.loom.set_thread_count(count.saturating_sub(1)),
            KeyCode::Char(']') => self.loom.set_thread_count((count + 1).min(MAX_THREADS_PER_CLICK)),
            KeyCode::Char('r') => self.resize(Axis::Row, -1),
            KeyCode::Char('R') => self.resize(Axis::Row, 1),
            KeyCode::Char('c') => self.resize(Axis::Column, -1),
            KeyCode::Char('C') => self.resize(Axis::Column, 1),
            KeyCode::Char('d') => {
                let duplicate = !self.loom.context().duplicate;
                match self.loom.set_duplicate(duplicate) {
                    Ok(()) => {
                        self.modified |= duplicate;
                        self.status = format!("Duplicate {}", if duplicate { "on" } else { "off" });
                    }
                    Err(e) => self.status = e.to_string(),
                }
            }
            KeyCode::Char('g') => {
                let show = !self.loom.context().show_guide;
                self.loom.set_show_guide(show);
            }
            KeyCode::Char('i') => {
                let enabled = !self.loom.context().paint_interior;
                self.loom.set_paint_interior(enabled);
                self.status = format!("Cloth painting {}", if enabled { "on" } else { "off" });
            }
            KeyCode::Char('e') => {
                let input = self.palette.swatch(selected).map(|s| s.colour.to_hex());
                self.open_prompt(PromptKind::Colour, input.unwrap_or_default());
            }
            KeyCode::Char('n') => {
                let input = self.palette.swatch(selected).and_then(|s| s.name.clone());
                self.open_prompt(PromptKind::Name, input.unwrap_or_default());
            }
            KeyCode::Char('a') => self.open_prompt(PromptKind::SaveAs, String::new()),
            KeyCode::Char('o') => self.open_prompt(PromptKind::Open, String::new()),
            KeyCode::Char('s') => {
                self.save();
            }
            KeyCode::Char('x') => {
                let defaults = self.defaults.clone();
                match self.load(&defaults) {
                    Ok(()) => {
                        self.loom.set_selected(selected);
                        self.modified = true;
                        self.status = "Reset to defaults".to_string();
                    }
                    Err(e) => self.status = e.to_string(),
                }
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, input: String) {
        self.prompt = Some(Prompt { kind, input });
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Char(c) => prompt.input.push(c),
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Esc => {
                self.prompt = None;
                self.status = "Cancelled".to_string();
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    let input = prompt.input.trim();
                    match prompt.kind {
                        PromptKind::Colour => self.recolour(input),
                        PromptKind::Name => self.rename(input),
                        PromptKind::SaveAs => self.save_as(input),
                        PromptKind::Open => self.open(input),
                    }
                }
            }
            _ => {}
        }
    }

    /// Change the selected swatch's colour and repaint every thread using it.
    fn recolour(&mut self, hex: &str) {
        let index = self.loom.context().selected;
        let colour = match Colour::from_hex(hex) {
            Ok(colour) => colour,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };

        if self.palette.set_colour(index, colour) {
            let threads = self.loom.sync_colour();
            self.modified = true;
            self.status = format!("Swatch {} is {} ({} threads)", index + 1, colour, threads);
        }
    }

    fn rename(&mut self, name: &str) {
        let index = self.loom.context().selected;
        let name = (!name.is_empty()).then_some(name);
        if self.palette.set_name(index, name) {
            self.modified = true;
            self.status = format!("Swatch {} renamed", index + 1);
        }
    }

    fn save_as(&mut self, name: &str) {
        let previous = self.name.replace(name.to_string());
        if !self.save() {
            self.name = previous;
        }
    }

    fn open(&mut self, name: &str) {
        let design = match self.store.load(name) {
            Ok(design) => design,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };

        match self.load(&design) {
            Ok(()) => {
                self.name = Some(name.to_string());
                self.modified = false;
                self.status = format!("Editing {}", name);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn edit(&mut self, f: impl FnOnce(&mut Loom)) {
        f(&mut self.loom);
        self.modified = true;
    }

    fn resize(&mut self, axis: Axis, delta: isize) {
        let current = self.loom.warp(axis).active();
        let target = current.saturating_add_signed(delta);
        self.edit(|loom| loom.set_count(axis, target));
    }

    /// Write the design under its current name. Returns whether it was saved.
    fn save(&mut self) -> bool {
        let Some(name) = self.name.clone() else {
            self.status = "No design name; press `a` to save as".to_string();
            return false;
        };

        let design = self.loom.design(&self.palette);
        match self.store.save(&name, &design) {
            Ok(dir) => {
                self.modified = false;
                self.status = format!("Saved {}", dir.display());
                true
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "save failed");
                self.status = format!("Save failed: {}", e);
                false
            }
        }
    }
}

// ============================================================================
// Drawing
// ============================================================================

fn colour(c: Colour) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// The cloth with its selector strips.
struct ClothView<'a> {
    raster: &'a Raster,
    /// Repeat lengths (rows, columns), guides stop at the repeat
    repeat: (usize, usize),
    guide_rows: BTreeSet<usize>,
    guide_columns: BTreeSet<usize>,
    guide_colour: Color,
}

impl Widget for ClothView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let raster = self.raster;
        let blank = "  ";

        // Column selector strip
        for column in 0..raster.columns() {
            let x = area.x + SELECTOR_WIDTH + column as u16 * CELL_WIDTH;
            if x + CELL_WIDTH > area.right() {
                break;
            }
            if let Some(stitch) = raster.column_stitch(column) {
                buf.set_string(x, area.y, blank, Style::default().bg(colour(stitch.colour)));
            }
        }

        for row in 0..raster.rows() {
            let y = area.y + 1 + row as u16;
            if y >= area.bottom() {
                break;
            }

            if let Some(stitch) = raster.row_stitch(row) {
                buf.set_string(area.x, y, blank, Style::default().bg(colour(stitch.colour)));
            }

            for column in 0..raster.columns() {
                let x = area.x + SELECTOR_WIDTH + column as u16 * CELL_WIDTH;
                if x + CELL_WIDTH > area.right() {
                    break;
                }
                let Some(cell) = raster.cell(row, column) else {
                    continue;
                };

                let in_repeat = row < self.repeat.0 && column < self.repeat.1;
                let on_row_guide = in_repeat && self.guide_rows.contains(&row);
                let on_column_guide = in_repeat && self.guide_columns.contains(&column);

                let (symbol, fg) = if cell.highlighted {
                    ("▒▒", colour(cell.stroke))
                } else {
                    match (on_column_guide, on_row_guide) {
                        (true, true) => ("┼─", self.guide_colour),
                        (true, false) => ("│ ", self.guide_colour),
                        (false, true) => ("──", self.guide_colour),
                        (false, false) => (blank, Color::Reset),
                    }
                };

                buf.set_string(x, y, symbol, Style::default().fg(fg).bg(colour(cell.colour)));
            }
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(frame.area());

    let top_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(26)])
        .split(main_layout[0]);

    // Cloth
    let title = format!(
        " {}{} ",
        app.name.as_deref().unwrap_or("scratch"),
        if app.modified { " *" } else { "" }
    );
    let cloth_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let cloth_area = cloth_block.inner(top_layout[0]);
    frame.render_widget(cloth_block, top_layout[0]);
    app.cloth_area = cloth_area;

    let ctx = app.loom.context();
    let size = ctx.thread_size;
    let mut guide_rows = BTreeSet::new();
    let mut guide_columns = BTreeSet::new();
    for line in app.loom.guide_lines() {
        if line.x1 == line.x2 {
            guide_columns.insert((line.x1 / size).floor() as usize);
        } else {
            guide_rows.insert((line.y1 / size).floor() as usize);
        }
    }

    let cloth = ClothView {
        raster: &app.raster,
        repeat: (app.loom.rows().active(), app.loom.columns().active()),
        guide_rows,
        guide_columns,
        guide_colour: colour(ctx.guide_colour),
    };
    frame.render_widget(cloth, cloth_area);

    // Sidebar: palette and settings
    let sidebar_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(9)])
        .split(top_layout[1]);

    let items: Vec<ListItem> = app
        .palette
        .iter()
        .enumerate()
        .map(|(index, swatch)| {
            let marker = if index == ctx.selected { "►" } else { " " };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{}{} ", marker, index + 1)),
                Span::styled("   ", Style::default().bg(colour(swatch.colour))),
                Span::raw(format!(" {}", swatch.name.as_deref().unwrap_or(""))),
            ]))
        })
        .collect();

    let palette = List::new(items).block(
        Block::default()
            .title(" Palette ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(palette, sidebar_layout[0]);

    let mode = match app.loom.mode() {
        Mode::Paint => "paint",
        Mode::Delete => "delete",
        Mode::Insert => "insert",
    };
    let on_off = |b: bool| if b { "on" } else { "off" };
    let hover = match app.loom.hovered() {
        Some((axis, pos)) => format!("{} {}", axis.name(), pos + 1),
        None => "-".to_string(),
    };
    let settings_text = format!(
        "Rows: {}\nColumns: {}\nThreads/click: {}\nMode: {}\nDuplicate: {}\nGuides: {}\nHover: {}",
        app.loom.rows().active(),
        app.loom.columns().active(),
        ctx.thread_count,
        mode,
        on_off(ctx.duplicate),
        on_off(ctx.show_guide),
        hover,
    );
    let settings = Paragraph::new(settings_text)
        .block(
            Block::default()
                .title(" Loom ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .style(Style::default().fg(Color::White));
    frame.render_widget(settings, sidebar_layout[1]);

    // Status (or the open prompt) and help
    let status = match &app.prompt {
        Some(prompt) => format!("{}: {}█", prompt.kind.label(ctx.selected), prompt.input),
        None => app.status.clone(),
    };
    let help = Paragraph::new(vec![
        Line::from(Span::styled(
            status,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            HELP,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help, main_layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn app(dir: &std::path::Path, name: Option<&str>) -> App {
        let config = Config::default();
        let store = DesignStore::new(dir);
        let mut app = App::new(store, &config, config.new_design(), name.map(str::to_string)).unwrap();
        app.cloth_area = Rect::new(1, 1, 120, 60);
        app
    }

    fn key(c: char) -> KeyEvent {
        code(KeyCode::Char(c))
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    /// Replace the prompt text and confirm it.
    fn enter(app: &mut App, text: &str) {
        while app.prompt.as_ref().is_some_and(|p| !p.input.is_empty()) {
            app.handle_key(code(KeyCode::Backspace));
        }
        for c in text.chars() {
            app.handle_key(key(c));
        }
        app.handle_key(code(KeyCode::Enter));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }
    }

    #[test]
    fn terminal_cells_map_to_threads() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), None);
        let target = |c, r| {
            let (x, y) = app.to_window(c, r).unwrap();
            app.loom.target_at(x, y)
        };

        assert_eq!(target(1, 1), tartan::Target::None);
        assert_eq!(target(2, 4), tartan::Target::Row(2));
        assert_eq!(target(3 + 2 * 5, 1), tartan::Target::Column(5));
        assert_eq!(
            target(3 + 2 * 5 + 1, 3),
            tartan::Target::Interior { row: 1, column: 5 }
        );
        assert!(app.to_window(0, 0).is_none());
    }

    #[test]
    fn click_paints_selected_swatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('4'));
        app.handle_mouse(mouse(
            MouseEventKind::Down(MouseButton::Left),
            1,
            2,
            KeyModifiers::NONE,
        ));
        assert_eq!(app.loom.rows().colour_index(0), 3);
        // Duplicate is on by default.
        assert_eq!(app.loom.columns().colour_index(0), 3);
        assert!(app.modified);

        app.sync_raster();
        assert_eq!(app.raster.cell(0, 0).unwrap().colour, Colour::RED);
    }

    #[test]
    fn alt_click_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        let before = app.loom.rows().active();
        app.handle_mouse(mouse(
            MouseEventKind::Down(MouseButton::Left),
            1,
            5,
            KeyModifiers::ALT,
        ));
        assert_eq!(app.loom.rows().active(), before - 1);
        assert_eq!(app.loom.mode(), Mode::Delete);
    }

    #[test]
    fn repeat_keys_resize_both_axes_when_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        let before = app.loom.rows().active();
        app.handle_key(key('R'));
        assert_eq!(app.loom.rows().active(), before + 1);
        assert_eq!(app.loom.columns().active(), before + 1);

        app.handle_key(key('d'));
        app.handle_key(key('c'));
        assert_eq!(app.loom.columns().active(), before);
        assert_eq!(app.loom.rows().active(), before + 1);
    }

    #[test]
    fn thread_count_keys_clamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('['));
        assert_eq!(app.loom.context().thread_count, 1);
        for _ in 0..20 {
            app.handle_key(key(']'));
        }
        assert_eq!(app.loom.context().thread_count, MAX_THREADS_PER_CLICK);
    }

    #[test]
    fn save_writes_named_design() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), Some("plaid"));
        app.handle_key(key('3'));
        app.loom.paint_run(Axis::Column, 7);
        app.handle_key(key('s'));
        assert!(!app.modified);

        let saved = app.store.load("plaid").unwrap();
        assert_eq!(saved.columns[7], 2);
        assert_eq!(saved.selected, 2);
    }

    #[test]
    fn scratch_design_cannot_be_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('s'));
        assert!(app.status.starts_with("No design name"));
        assert!(app.store.list().unwrap().is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('R'));
        app.loom.paint_run(Axis::Row, 0);
        app.handle_key(key('x'));
        assert_eq!(app.loom.rows().active(), 114);
        assert!(app.loom.rows().list().iter().all(|&c| c == 0));
    }

    #[test]
    fn recolouring_swatch_repaints_threads() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('4'));
        app.handle_mouse(mouse(
            MouseEventKind::Down(MouseButton::Left),
            1,
            2,
            KeyModifiers::NONE,
        ));
        app.sync_raster();
        assert_eq!(app.raster.cell(0, 0).unwrap().colour, Colour::RED);
        app.modified = false;

        app.handle_key(key('e'));
        assert_eq!(app.prompt.as_ref().unwrap().input, "#ff0000");
        enter(&mut app, "#00ff00");
        assert!(app.prompt.is_none());
        assert!(app.modified);

        let green = Colour::rgb(0, 0xff, 0);
        assert_eq!(app.palette.swatch(3).unwrap().colour, green);
        app.sync_raster();
        assert_eq!(app.raster.cell(0, 0).unwrap().colour, green);
        assert_eq!(app.raster.row_stitch(0).unwrap().colour, green);
        assert_eq!(app.raster.cell(1, 1).unwrap().colour, Colour::WHITE);
    }

    #[test]
    fn bad_colour_leaves_swatch_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        let before = app.palette.clone();
        app.handle_key(key('e'));
        enter(&mut app, "tartan");
        assert!(app.prompt.is_none());
        assert_eq!(app.palette, before);
        assert!(!app.modified);
    }

    #[test]
    fn rename_swatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), Some("plaid"));
        app.handle_key(key('2'));
        app.handle_key(key('n'));
        enter(&mut app, "Hunting green");
        assert_eq!(app.palette.swatch(1).unwrap().name.as_deref(), Some("Hunting green"));

        app.handle_key(key('s'));
        let saved = app.store.load("plaid").unwrap();
        assert_eq!(saved.swatches[1].name.as_deref(), Some("Hunting green"));

        app.handle_key(key('n'));
        enter(&mut app, "");
        assert_eq!(app.palette.swatch(1).unwrap().name, None);
    }

    #[test]
    fn prompt_takes_keys_until_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('n'));
        app.handle_key(key('q'));
        assert!(!app.should_quit);

        app.handle_key(code(KeyCode::Esc));
        assert!(app.prompt.is_none());
        assert!(!app.should_quit);
        app.handle_key(key('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn save_as_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('6'));
        app.loom.paint_run(Axis::Row, 4);
        app.handle_key(key('a'));
        enter(&mut app, "../escape");
        assert_eq!(app.name, None);

        app.handle_key(key('a'));
        enter(&mut app, "dress");
        assert_eq!(app.name.as_deref(), Some("dress"));
        assert!(app.store.exists("dress"));

        let mut other = self::app(dir.path(), None);
        other.handle_key(key('o'));
        enter(&mut other, "dress");
        assert_eq!(other.name.as_deref(), Some("dress"));
        assert_eq!(other.loom.rows().colour_index(4), 5);
        assert!(!other.modified);
    }

    #[test]
    fn help_lists_editing_keys() {
        for entry in ["i cloth", "e colour", "n name", "a save as", "o open", "d dup"] {
            assert!(HELP.contains(entry), "help is missing {:?}", entry);
        }
    }

    #[test]
    fn quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path(), None);
        app.handle_key(key('q'));
        assert!(app.should_quit);
    }
}
