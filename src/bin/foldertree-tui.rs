use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use foldertree::expansion::VisibleRow;
use foldertree::tree::DirTree;
use foldertree::viewer::Viewer;
use indextree::NodeId;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect as UiRect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::{self, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

struct App {
    viewer: Viewer,
    path_input: String,
    input_mode: bool,
    list_state: ListState,
    tree_area: Option<UiRect>,
    last_click: Option<(NodeId, Instant)>,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            viewer: Viewer::default(),
            path_input: String::from("."),
            input_mode: true,
            list_state: ListState::default(),
            tree_area: None,
            last_click: None,
            should_quit: false,
        }
    }
}

impl App {
    fn load(&mut self) {
        let path = if self.path_input.trim().is_empty() {
            ".".to_string()
        } else {
            self.path_input.trim().to_string()
        };

        self.path_input = path.clone();
        match self.viewer.load_root(Path::new(&path)) {
            Ok(_) => {
                self.list_state = ListState::default();
                self.last_click = None;
                if let Some(root) = self.viewer.tree().map(DirTree::get_root) {
                    self.viewer.select(root);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %path, "Could not load folder");
            }
        }
    }

    fn rows(&self) -> Vec<VisibleRow> {
        self.viewer
            .tree()
            .map(DirTree::visible_rows)
            .unwrap_or_default()
    }

    fn selected_index(&self, rows: &[VisibleRow]) -> Option<usize> {
        let selected = self.viewer.selected()?;
        rows.iter().position(|row| row.id == selected)
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let current = self.selected_index(&rows).unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(rows.len() - 1);
        self.viewer.select(rows[next].id);
    }

    /// Open the selected folder, or step into its first child if already open.
    fn expand_selected(&mut self) {
        let Some(id) = self.viewer.selected() else {
            return;
        };
        let Some(entry) = self.viewer.selected_entry() else {
            return;
        };
        if !entry.kind.is_folder() {
            return;
        }
        if entry.open {
            self.move_selection(1);
        } else {
            self.viewer.set_open(id, true);
        }
    }

    /// Close the selected folder, or move up to the parent.
    fn collapse_selected(&mut self) {
        let Some(id) = self.viewer.selected() else {
            return;
        };
        let Some(entry) = self.viewer.selected_entry() else {
            return;
        };
        if entry.kind.is_folder() && entry.open {
            self.viewer.set_open(id, false);
            return;
        }
        if let Some(parent) = self.viewer.tree().and_then(|tree| tree.parent(id)) {
            self.viewer.select(parent);
        }
    }

    fn reveal_selected(&mut self) {
        if let Some(id) = self.viewer.selected() {
            self.viewer.activate(id);
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            self.should_quit = true;
            return;
        }

        if self.input_mode {
            match key.code {
                KeyCode::Enter => {
                    self.input_mode = false;
                    self.load();
                }
                KeyCode::Esc => {
                    self.input_mode = false;
                }
                KeyCode::Backspace => {
                    self.path_input.pop();
                }
                KeyCode::Char(ch) => {
                    self.path_input.push(ch);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.input_mode = true,
            KeyCode::Char('r') => self.load(),
            KeyCode::Char('e') => self.viewer.expand_all(),
            KeyCode::Char('c') => self.viewer.collapse_all(),
            KeyCode::Char('o') => self.reveal_selected(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Right | KeyCode::Char('l') => self.expand_selected(),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_selected(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.viewer.selected() {
                    self.viewer.toggle(id);
                }
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(id) = self.row_at(event.column, event.row) else {
                    return;
                };

                let now = Instant::now();
                let is_double = self.last_click.is_some_and(|(last_id, at)| {
                    last_id == id && now.duration_since(at) <= DOUBLE_CLICK_WINDOW
                });

                if is_double {
                    self.last_click = None;
                    self.viewer.activate(id);
                } else {
                    self.last_click = Some((id, now));
                    self.viewer.select(id);
                }
            }
            MouseEventKind::ScrollDown => self.move_selection(3),
            MouseEventKind::ScrollUp => self.move_selection(-3),
            _ => {}
        }
    }

    fn row_at(&self, x: u16, y: u16) -> Option<NodeId> {
        let area = self.tree_area?;
        if !point_in_rect(area, x, y) {
            return None;
        }
        let index = self.list_state.offset() + usize::from(y - area.y);
        self.rows().get(index).map(|row| row.id)
    }
}

fn point_in_rect(rect: UiRect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

fn row_line(tree: &DirTree, row: VisibleRow) -> Line<'static> {
    let Some(entry) = tree.entry(row.id) else {
        return Line::default();
    };

    let arrow = match (entry.kind.is_folder(), entry.open) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    let name_style = if entry.kind.is_folder() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw("  ".repeat(row.depth)),
        Span::styled(arrow, Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{} ", entry.kind.icon())),
        Span::styled(entry.name.clone(), name_style),
    ])
}

fn draw_ui(frame: &mut Frame, app: &mut App) {
    let rows_layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .split(frame.area());

    let input_title = if app.input_mode {
        " Folder (typing) "
    } else {
        " Folder "
    };
    let path_style = if app.input_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    frame.render_widget(
        Paragraph::new(app.path_input.as_str())
            .style(path_style)
            .block(Block::default().title(input_title).borders(Borders::ALL)),
        rows_layout[0],
    );

    let tree_block = Block::default()
        .title(" Folder Tree Viewer ")
        .borders(Borders::ALL);
    let tree_inner = tree_block.inner(rows_layout[1]);
    app.tree_area = Some(tree_inner);

    match app.viewer.tree() {
        Some(tree) => {
            let rows = tree.visible_rows();
            let items: Vec<ListItem> = rows
                .iter()
                .map(|row| ListItem::new(row_line(tree, *row)))
                .collect();
            let list = List::new(items).block(tree_block).highlight_style(
                Style::default()
                    .bg(Color::Rgb(0xcc, 0xe5, 0xff))
                    .fg(Color::Black),
            );

            let selected = app
                .viewer
                .selected()
                .and_then(|id| rows.iter().position(|row| row.id == id));
            app.list_state.select(selected);
            frame.render_stateful_widget(list, rows_layout[1], &mut app.list_state);
        }
        None => {
            frame.render_widget(
                Paragraph::new("No folder loaded. Type a path and press Enter.")
                    .style(Style::default().fg(Color::Gray))
                    .block(tree_block),
                rows_layout[1],
            );
        }
    }

    frame.render_widget(
        Paragraph::new(app.viewer.status())
            .block(Block::default().title(" Status ").borders(Borders::ALL)),
        rows_layout[2],
    );

    let help = Line::from(concat!(
        "Enter: load/toggle  /: edit path  ←/→: collapse/expand  ",
        "e/c: expand/collapse all  o or double-click: reveal  q: quit",
    ));
    frame.render_widget(
        Paragraph::new(help).block(Block::default().title(" Controls ").borders(Borders::ALL)),
        rows_layout[3],
    );
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> io::Result<()> {
    let mut app = App::default();

    loop {
        terminal.draw(|frame| {
            draw_ui(frame, &mut app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
    }

    Ok(())
}

fn main() -> io::Result<()> {
    // Log output would draw over the alternate screen, so it is opt-in here
    if std::env::var_os(foldertree::LOG_ENV).is_some() {
        foldertree::init_logging();
    }

    enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app_result = run_app(&mut terminal);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app_result
}
