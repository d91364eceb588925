pub mod action;
pub mod input;
pub mod state;
pub mod update;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ldbv_core::{Focus, KvStore, NavEvent, Session};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::debug;

use crate::ui::help;
use crate::ui::layout::{LayoutKind, compute_pane_layout};
use crate::ui::render::{compose_status, list_title, search_title, truncate_middle};
use crate::ui::theme::{ThemeTokens, build_theme};
use action::Action;
use input::{map_global_key, map_nav_key};
use state::UiState;
pub use state::ThemeChoice;

pub struct App<S: KvStore> {
    session: Session<S>,
    db_path: PathBuf,
    interactive_input: bool,
    ui: UiState,
    #[cfg(test)]
    test_next_key: Option<KeyEvent>,
    #[cfg(test)]
    test_next_key_result: Option<io::Result<Option<KeyEvent>>>,
    #[cfg(test)]
    test_draw_error: Option<io::Error>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputEvent {
    Key(KeyEvent),
    ScrollUp,
    ScrollDown,
}

impl<S: KvStore> App<S> {
    pub fn new(session: Session<S>, db_path: PathBuf) -> Self {
        Self {
            session,
            db_path,
            interactive_input: io::stdin().is_terminal(),
            ui: UiState::default(),
            #[cfg(test)]
            test_next_key: None,
            #[cfg(test)]
            test_next_key_result: None,
            #[cfg(test)]
            test_draw_error: None,
        }
    }

    pub fn set_prefs(&mut self, theme: ThemeChoice, no_color: bool) {
        update::apply_action(&mut self.ui, Action::ApplyPrefs { theme, no_color });
    }

    /// Hands the session back so the caller can close it.
    pub fn into_session(self) -> Session<S> {
        self.session
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        if self.interactive_input {
            stdout.execute(EnableMouseCapture)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        toggle_raw_mode(self.interactive_input, enable_raw_mode)?;

        let loop_result = self.run_loop(&mut terminal);

        toggle_raw_mode(self.interactive_input, disable_raw_mode)?;
        if self.interactive_input {
            terminal.backend_mut().execute(DisableMouseCapture)?;
        }
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        loop_result
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut running = true;

        while running {
            #[cfg(test)]
            if let Some(err) = self.test_draw_error.take() {
                return Err(err.into());
            }
            terminal.draw(|frame| self.draw(frame))?;

            if !self.interactive_input {
                running = false;
            }

            if self.interactive_input
                && let Some(input_event) = self.next_input_event()?
            {
                match input_event {
                    InputEvent::Key(key) => self.handle_key(key, &mut running)?,
                    InputEvent::ScrollUp => self.scroll(NavEvent::Up)?,
                    InputEvent::ScrollDown => self.scroll(NavEvent::Down)?,
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, running: &mut bool) -> Result<()> {
        let focus = self.session.focus();

        if self.ui.help_open {
            match map_global_key(key, focus) {
                Some(Action::Quit) => *running = false,
                Some(Action::ToggleHelp) => update::apply_action(&mut self.ui, Action::ToggleHelp),
                _ if key.code == KeyCode::Esc => {
                    update::apply_action(&mut self.ui, Action::ToggleHelp);
                }
                _ => {}
            }
            return Ok(());
        }

        if let Some(action) = map_global_key(key, focus) {
            if action == Action::Quit {
                *running = false;
            } else {
                update::apply_action(&mut self.ui, action);
            }
            return Ok(());
        }

        if let Some(event) = map_nav_key(key, focus) {
            debug!(?event, ?focus, "key");
            self.session.handle(event)?;
        }
        Ok(())
    }

    fn scroll(&mut self, event: NavEvent) -> Result<()> {
        if self.ui.help_open || self.session.focus() == Focus::Search {
            return Ok(());
        }
        self.session.handle(event)?;
        Ok(())
    }

    fn next_input_event(&mut self) -> Result<Option<InputEvent>> {
        #[cfg(test)]
        {
            if let Some(result) = self.test_next_key_result.take() {
                return result
                    .map(|event| event.map(InputEvent::Key))
                    .map_err(Into::into);
            }
            if let Some(key) = self.test_next_key.take() {
                return Ok(Some(InputEvent::Key(key)));
            }
        }
        next_terminal_input(event::poll, event::read)
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let theme = build_theme(self.ui.theme, self.ui.no_color);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let info = self.info_line(vertical[0].width as usize);
        frame.render_widget(Paragraph::new(info).style(theme.top_bar), vertical[0]);

        let focus = self.session.focus();
        let panes = compute_pane_layout(vertical[1], focus, self.ui.split_ratio);

        self.draw_search(frame, panes.search, &theme);
        if has_area(panes.list) {
            self.draw_list(frame, panes.list, &theme);
        }
        if has_area(panes.value) {
            self.draw_value(frame, panes.value, &theme);
        }

        let mut status = status_line(&self.session);
        if panes.kind == LayoutKind::Compact {
            status = format!("compact terminal | {status}");
        }
        let hint = status_hint(focus, self.ui.help_open);
        let status_text = compose_status(&status, hint, vertical[2].width as usize);
        let status_style = if self.session.search_error().is_some() {
            theme.status_error
        } else {
            theme.status_ok
        };
        frame.render_widget(Paragraph::new(status_text).style(status_style), vertical[2]);

        if self.ui.help_open {
            let popup = centered_popup(60, help::help_lines().len() as u16 + 2, area);
            frame.render_widget(Clear, popup);
            let help_widget = Paragraph::new(help::help_text()).style(theme.help).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help ")
                    .border_style(theme.pane_focus),
            );
            frame.render_widget(help_widget, popup);
        }
    }

    fn draw_search(&self, frame: &mut Frame<'_>, area: Rect, theme: &ThemeTokens) {
        let focused = self.session.focus() == Focus::Search;
        let text = self.session.search_text();
        let content = if text.is_empty() && !focused {
            Line::from(Span::styled("Ctrl+S", theme.placeholder))
        } else {
            Line::from(text)
        };

        let error = self.session.search_error();
        let title_style = if error.is_some() {
            theme.status_error
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(search_title(error), title_style))
            .border_style(pane_border_style(theme, focused));
        frame.render_widget(Paragraph::new(content).style(theme.plain).block(block), area);

        if focused && !self.ui.help_open {
            let inner = cursor_rect(area);
            if inner.width > 0 && inner.height > 0 {
                let typed = text.chars().count() as u16;
                let x = inner
                    .x
                    .saturating_add(typed)
                    .min(inner.x + inner.width.saturating_sub(1));
                frame.set_cursor_position((x, inner.y));
            }
        }
    }

    fn draw_list(&self, frame: &mut Frame<'_>, area: Rect, theme: &ThemeTokens) {
        let rows = self.session.rows();
        let items = rows
            .iter()
            .map(|row| ListItem::new(row.label.as_str()))
            .collect::<Vec<_>>();
        let list = List::new(items)
            .style(theme.plain)
            .highlight_style(theme.highlight)
            .highlight_symbol("> ")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(list_title(self.session.page_number()))
                    .border_style(pane_border_style(
                        theme,
                        self.session.focus() == Focus::List,
                    )),
            );
        let selected = (!rows.is_empty()).then_some(self.session.selected());
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_value(&self, frame: &mut Frame<'_>, area: Rect, theme: &ThemeTokens) {
        let value = Paragraph::new(self.session.value_text())
            .style(theme.plain)
            .wrap(Wrap { trim: false })
            .scroll((self.session.value_scroll(), 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Value ")
                    .border_style(pane_border_style(
                        theme,
                        self.session.focus() == Focus::Value,
                    )),
            );
        frame.render_widget(value, area);
    }

    fn info_line(&self, width: usize) -> String {
        let options = self.session.options();
        let path = self.db_path.display().to_string();
        let line = format!(
            "{} | RO | key={} val={} max={}",
            truncate_middle(&path, width.saturating_sub(40).max(12)),
            options.key_format,
            options.value_format,
            options.page_size
        );
        if line.chars().count() > width {
            truncate_middle(&line, width).into_owned()
        } else {
            line
        }
    }
}

fn status_line<S: KvStore>(session: &Session<S>) -> String {
    let mode = match session.focus() {
        Focus::List => "keys",
        Focus::Value => "value",
        Focus::Search => "search",
    };
    let rows = session.rows().len();
    if rows == 0 {
        return format!("{mode} | {} | no keys", session.range_label());
    }
    format!(
        "{mode} | {} | row {}/{rows}",
        session.range_label(),
        session.selected() + 1
    )
}

fn status_hint(focus: Focus, help_open: bool) -> &'static str {
    if help_open {
        return "Esc close help";
    }
    match focus {
        Focus::List => "Enter value | Ctrl+S search | ? help",
        Focus::Value => "Esc back | Up/Down scroll",
        Focus::Search => "Enter apply | Esc cancel",
    }
}

fn pane_border_style(theme: &ThemeTokens, focused: bool) -> Style {
    if focused {
        theme.pane_focus
    } else {
        theme.pane_border
    }
}

fn has_area(rect: Rect) -> bool {
    rect.width > 0 && rect.height > 0
}

fn centered_popup(width_percent: u16, height: u16, area: Rect) -> Rect {
    let popup_width = area.width.saturating_mul(width_percent) / 100;
    let popup_height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width.max(10).min(area.width),
        height: popup_height.max(3).min(area.height),
    }
}

fn cursor_rect(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn toggle_raw_mode<F>(interactive: bool, mut f: F) -> Result<()>
where
    F: FnMut() -> io::Result<()>,
{
    if interactive {
        f()?;
    }
    Ok(())
}

fn next_terminal_input<P, R>(mut poll: P, mut read: R) -> Result<Option<InputEvent>>
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<Event>,
{
    if !poll(Duration::from_millis(30))? {
        return Ok(None);
    }
    let event = read()?;
    match event {
        Event::Key(key) if key.kind == event::KeyEventKind::Press => Ok(Some(InputEvent::Key(key))),
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::ScrollUp => {
            Ok(Some(InputEvent::ScrollUp))
        }
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::ScrollDown => {
            Ok(Some(InputEvent::ScrollDown))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseEvent,
        MouseEventKind,
    };
    use ldbv_core::{Focus, KeyFormat, MemStore, Session, StartupConfig, ValueFormat};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::app::state::DEFAULT_SPLIT_RATIO;

    use super::{
        App, InputEvent, ThemeChoice, centered_popup, cursor_rect, next_terminal_input,
        status_hint, toggle_raw_mode,
    };

    fn app(keys: usize, page_size: usize) -> App<MemStore> {
        let store: MemStore = (0..keys)
            .map(|i| (i.to_string(), format!("value-{i}")))
            .collect();
        let config = StartupConfig {
            key_format: KeyFormat::Text,
            value_format: ValueFormat::Text,
            page_size,
            ..StartupConfig::new("/tmp/db")
        };
        let session = Session::new(store, &config).expect("session");
        let mut app = App::new(session, PathBuf::from("/tmp/db"));
        app.interactive_input = false;
        app
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn press(app: &mut App<MemStore>, code: KeyCode) -> bool {
        let mut running = true;
        app.handle_key(key(code, KeyModifiers::NONE), &mut running)
            .expect("key");
        running
    }

    fn screen(app: &App<MemStore>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(|frame| app.draw(frame)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draw_shows_page_title_rows_and_value() {
        let app = app(30, 5);
        let text = screen(&app, 100, 20);
        assert!(text.contains(" Keys - page: 1 "));
        assert!(text.contains("> 0"));
        assert!(text.contains("11"));
        assert!(text.contains("value-0"));
        assert!(text.contains("Ctrl+S"));
        assert!(text.contains("/tmp/db | RO | key=text val=text max=5"));
    }

    #[test]
    fn arrow_keys_page_through_the_list() {
        let mut app = app(30, 3);
        for _ in 0..3 {
            assert!(press(&mut app, KeyCode::Down));
        }
        assert_eq!(app.session.page_number(), 2);
        assert_eq!(app.session.selected(), 0);
        assert!(screen(&app, 100, 20).contains(" Keys - page: 2 "));

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.session.page_number(), 1);
    }

    #[test]
    fn search_box_takes_typed_characters() {
        let mut app = app(30, 3);
        let mut running = true;
        app.handle_key(
            key(KeyCode::Char('s'), KeyModifiers::CONTROL),
            &mut running,
        )
        .expect("focus");
        assert_eq!(app.session.focus(), Focus::Search);

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('2'));
        assert!(press(&mut app, KeyCode::Enter));

        let labels: Vec<_> = app.session.rows().iter().map(|r| r.label.clone()).collect();
        assert_eq!(labels, ["2", "20", "21"]);
        assert_eq!(app.session.focus(), Focus::List);
        assert!(screen(&app, 100, 20).contains("prefix 2"));
    }

    #[test]
    fn bad_directive_is_drawn_in_search_title() {
        let mut app = app(10, 3);
        let mut running = true;
        app.handle_key(
            key(KeyCode::Char('s'), KeyModifiers::CONTROL),
            &mut running,
        )
        .expect("focus");
        for c in "$max=0".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.focus(), Focus::Search);
        assert!(screen(&app, 120, 20).contains(" Search: max must be a positive integer"));
    }

    #[test]
    fn q_quits_from_list_but_not_from_value() {
        let mut app = app(5, 3);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.focus(), Focus::Value);
        assert!(press(&mut app, KeyCode::Char('q')));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.focus(), Focus::List);
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let mut app = app(10, 3);
        press(&mut app, KeyCode::F(1));
        assert!(app.ui.help_open);
        assert!(screen(&app, 100, 24).contains(" Help "));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.selected(), 0);

        press(&mut app, KeyCode::Esc);
        assert!(!app.ui.help_open);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.selected(), 1);
    }

    #[test]
    fn brackets_resize_the_split() {
        let mut app = app(10, 3);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.ui.split_ratio, DEFAULT_SPLIT_RATIO + 5);
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.ui.split_ratio, DEFAULT_SPLIT_RATIO - 5);
    }

    #[test]
    fn prefs_apply_theme() {
        let mut app = app(1, 3);
        app.set_prefs(ThemeChoice::HighContrast, true);
        assert_eq!(app.ui.theme, ThemeChoice::HighContrast);
        assert!(app.ui.no_color);
    }

    #[test]
    fn wheel_scroll_moves_selection_outside_search() {
        let mut app = app(10, 5);
        app.scroll(ldbv_core::NavEvent::Down).expect("scroll");
        assert_eq!(app.session.selected(), 1);

        app.session
            .handle(ldbv_core::NavEvent::FocusSearch)
            .expect("focus");
        app.scroll(ldbv_core::NavEvent::Down).expect("scroll");
        assert_eq!(app.session.selected(), 1);
    }

    #[test]
    fn compact_and_empty_views_draw() {
        let app = app(0, 3);
        let text = screen(&app, 60, 8);
        assert!(text.contains("compact terminal"));
        assert!(text.contains("no keys"));
        assert!(text.contains(" Keys - page: 0 "));
    }

    #[test]
    fn status_hints_follow_focus() {
        assert!(status_hint(Focus::Search, false).contains("Esc cancel"));
        assert_eq!(status_hint(Focus::List, true), "Esc close help");
    }

    #[test]
    fn run_loop_exits_when_not_interactive() {
        let mut app = app(3, 3);
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        app.run_loop(&mut terminal).expect("run_loop");
    }

    #[test]
    fn run_loop_interactive_consumes_queued_key() {
        let mut app = app(3, 3);
        app.interactive_input = true;
        app.test_next_key = Some(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        app.run_loop(&mut terminal).expect("run loop");
    }

    #[test]
    fn run_loop_propagates_draw_error() {
        let mut app = app(3, 3);
        app.test_draw_error = Some(io::Error::other("draw failed"));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        let err = app.run_loop(&mut terminal).expect_err("draw error");
        assert!(err.to_string().contains("draw failed"));
    }

    #[test]
    fn run_loop_propagates_next_key_error() {
        let mut app = app(3, 3);
        app.interactive_input = true;
        app.test_next_key_result = Some(Err(io::Error::other("poll failed")));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        let err = app.run_loop(&mut terminal).expect_err("next key error");
        assert!(err.to_string().contains("poll failed"));
    }

    #[test]
    fn into_session_closes_cleanly() {
        let app = app(3, 3);
        app.into_session().close().expect("close");
    }

    #[test]
    fn toggle_raw_mode_only_runs_when_interactive() {
        let mut calls = 0;
        toggle_raw_mode(false, || {
            calls += 1;
            Ok(())
        })
        .expect("skip");
        toggle_raw_mode(true, || {
            calls += 1;
            Ok(())
        })
        .expect("run");
        assert_eq!(calls, 1);
        assert!(toggle_raw_mode(true, || Err(io::Error::other("raw"))).is_err());
    }

    #[test]
    fn next_terminal_input_branches() {
        let none = next_terminal_input(|_| Ok(false), || Ok(Event::Resize(80, 24))).expect("none");
        assert_eq!(none, None);

        let resize =
            next_terminal_input(|_| Ok(true), || Ok(Event::Resize(80, 24))).expect("resize");
        assert_eq!(resize, None);

        let release = next_terminal_input(
            |_| Ok(true),
            || {
                Ok(Event::Key(KeyEvent {
                    code: KeyCode::Char('x'),
                    modifiers: KeyModifiers::NONE,
                    kind: KeyEventKind::Release,
                    state: KeyEventState::NONE,
                }))
            },
        )
        .expect("release");
        assert_eq!(release, None);

        let pressed = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        let got = next_terminal_input(|_| Ok(true), || Ok(Event::Key(pressed))).expect("key");
        assert_eq!(got, Some(InputEvent::Key(pressed)));

        let wheel = next_terminal_input(
            |_| Ok(true),
            || {
                Ok(Event::Mouse(MouseEvent {
                    kind: MouseEventKind::ScrollDown,
                    column: 0,
                    row: 0,
                    modifiers: KeyModifiers::NONE,
                }))
            },
        )
        .expect("wheel");
        assert_eq!(wheel, Some(InputEvent::ScrollDown));

        assert!(next_terminal_input(|_| Err(io::Error::other("poll")), || Ok(Event::FocusGained)).is_err());
    }

    #[test]
    fn popup_and_cursor_rects_stay_inside_area() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 5,
        };
        let popup = centered_popup(60, 13, area);
        assert!(popup.width <= area.width);
        assert_eq!(popup.height, 5);

        let inner = cursor_rect(Rect {
            x: 2,
            y: 3,
            width: 10,
            height: 3,
        });
        assert_eq!((inner.x, inner.y, inner.width, inner.height), (3, 4, 8, 1));
    }
}
