use crate::config::Config;
use crate::form::{Field, TaskForm};
use crate::task::Task;
use crate::task_list::TaskList;
use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use unicode_width::UnicodeWidthStr;

const CARD_HEIGHT: u16 = 3;
const DATE_PLACEHOLDER: &str = "yyyy-mm-dd";

/// The to-do list screen: the add form above, task cards below.
#[derive(Debug)]
pub struct App {
    pub form: TaskForm,
    pub tasks: TaskList,
    config: Config,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            form: TaskForm::new(),
            tasks: TaskList::new(),
            config,
            should_quit: false,
        }
    }

    /// Adds the form contents as a task and clears the form.
    ///
    /// Rejected input leaves both the list and the form as they were.
    pub fn submit(&mut self) -> bool {
        match self.tasks.submit(&self.form) {
            Ok(task) => {
                tracing::info!(name = %task.name, due_date = %task.due_date, "task added");
                self.form.clear();
                true
            }
            Err(err) => {
                tracing::debug!(%err, "submission ignored");
                false
            }
        }
    }

    /// Ticks the selected card's checkbox, which deletes the task.
    pub fn toggle_selected(&mut self) -> Option<Task> {
        let task = self.tasks.remove_selected()?;
        tracing::info!(name = %task.name, due_date = %task.due_date, "task removed");
        Some(task)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let focus = self.form.focus;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::BackTab => self.form.focus_prev(),
            KeyCode::Enter if focus != Field::Cards => {
                self.submit();
            }
            KeyCode::Char(' ') if focus == Field::AddButton => {
                self.submit();
            }
            KeyCode::Char(' ') if focus == Field::Cards => {
                self.toggle_selected();
            }
            KeyCode::Delete if focus == Field::Cards => {
                self.toggle_selected();
            }
            KeyCode::Char(c) if focus.is_text_input() && is_plain(key.modifiers) => {
                self.form.push_char(c)
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Up if focus == Field::Cards => self.tasks.move_selection(-1),
            KeyCode::Down if focus == Field::Cards => self.tasks.move_selection(1),
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame, today: NaiveDate) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3), Constraint::Min(0)])
            .split(frame.area());

        self.draw_form(frame, chunks[0]);
        self.draw_cards(frame, chunks[1], today);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Min(10),
                Constraint::Length(14),
                Constraint::Length(9),
            ])
            .split(area);

        let name = Paragraph::new(self.form.name.as_str())
            .block(self.focus_block("Add New Item", Field::Name));
        frame.render_widget(name, chunks[0]);

        let due_date = if self.form.due_date.is_empty() {
            Paragraph::new(Span::styled(
                DATE_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.form.due_date.as_str())
        };
        frame.render_widget(
            due_date.block(self.focus_block("Due Date", Field::DueDate)),
            chunks[1],
        );

        let button_style = if self.form.focus == Field::AddButton {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let button = Paragraph::new(Span::styled("Add", button_style))
            .alignment(Alignment::Center)
            .block(self.focus_block("", Field::AddButton));
        frame.render_widget(button, chunks[2]);

        let cursor_field = match self.form.focus {
            Field::Name => Some((chunks[0], &self.form.name)),
            Field::DueDate => Some((chunks[1], &self.form.due_date)),
            Field::AddButton | Field::Cards => None,
        };
        if let Some((area, value)) = cursor_field {
            let offset = (value.width() as u16).min(area.width.saturating_sub(3));
            frame.set_cursor_position((area.x + 1 + offset, area.y + 1));
        }
    }

    fn draw_cards(&self, frame: &mut Frame, area: Rect, today: NaiveDate) {
        let block = self.focus_block("Tasks", Field::Cards);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let visible = (inner.height / CARD_HEIGHT) as usize;
        if visible == 0 {
            return;
        }
        let first = self
            .tasks
            .selected_task
            .saturating_sub(visible - 1)
            .min(self.tasks.len().saturating_sub(visible));

        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); visible])
            .split(inner);

        for (slot, (index, task)) in slots
            .iter()
            .zip(self.tasks.tasks.iter().enumerate().skip(first))
        {
            let selected = self.form.focus == Field::Cards && index == self.tasks.selected_task;
            self.draw_card(frame, *slot, task, selected, today);
        }
    }

    fn draw_card(
        &self,
        frame: &mut Frame,
        area: Rect,
        task: &Task,
        selected: bool,
        today: NaiveDate,
    ) {
        let checkbox_style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let card = Paragraph::new(Line::from(vec![
            Span::styled("[ ]", checkbox_style),
            Span::raw(format!(
                " Due: {}",
                task.due_date.format(&self.config.date_format)
            )),
        ]))
        .block(
            Block::default()
                .title(task.name.as_str())
                .borders(Borders::ALL)
                .border_style(if selected {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                })
                .style(card_style(&self.config, task, today)),
        );
        frame.render_widget(card, area);
    }

    fn focus_block<'a>(&self, title: &'a str, field: Field) -> Block<'a> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if self.form.focus == field {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            })
    }
}

/// Keys typed with no modifier other than Shift insert text.
fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

/// Card background: the past-due colour for tasks due before `today`.
pub fn card_style(config: &Config, task: &Task, today: NaiveDate) -> Style {
    let bg = if task.is_past_due(today) {
        config.past_due_color
    } else {
        config.default_color
    };
    Style::default().bg(bg)
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        let today = Local::now().date_naive();
        terminal.draw(|f| app.draw(f, today))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer};
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 1)
    }

    #[fixture]
    fn app() -> App {
        App::new(Config::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Types into both fields and presses the Add button.
    fn add(app: &mut App, name: &str, due_date: &str) {
        app.form.focus = Field::Name;
        type_text(app, name);
        app.handle_key(key(KeyCode::Tab));
        type_text(app, due_date);
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char(' ')));
        // a rejected submission keeps the old text; start the next one clean
        app.form.clear();
    }

    fn render(app: &App) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| app.draw(f, today())).unwrap();
        terminal.backend().buffer().clone()
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    /// Position of a card title, searched below the form.
    fn find_card(buf: &Buffer, name: &str) -> Option<(u16, u16)> {
        rows(buf)
            .iter()
            .enumerate()
            .skip(3)
            .find_map(|(y, row)| {
                row.find(name)
                    .map(|byte| (row[..byte].chars().count() as u16, y as u16))
            })
    }

    #[rstest]
    fn added_task_is_rendered_as_a_card(mut app: App) {
        add(&mut app, "History Test", "2024-06-30");

        assert_eq!(app.tasks.len(), 1);
        assert!(app.form.name.is_empty());
        assert!(app.form.due_date.is_empty());
        let buf = render(&app);
        assert!(find_card(&buf, "History Test").is_some());
        assert!(rows(&buf).iter().any(|row| row.contains("[ ] Due: 2024-06-30")));
    }

    #[rstest]
    fn duplicate_task_is_shown_once(mut app: App) {
        add(&mut app, "HistoryTest", "05/30/2023");
        add(&mut app, "HistoryTest", "05/30/2023");

        assert_eq!(app.tasks.len(), 1);
        let count = rows(&render(&app))
            .iter()
            .skip(3)
            .filter(|row| row.contains("HistoryTest"))
            .count();
        assert_eq!(count, 1);
    }

    #[rstest]
    fn task_without_name_is_not_added(mut app: App) {
        app.form.focus = Field::DueDate;
        type_text(&mut app, "2024-06-30");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.tasks.is_empty());
        assert_eq!(app.form.due_date, "2024-06-30");
        assert!(!rows(&render(&app)).iter().any(|row| row.contains("[ ]")));
    }

    #[rstest]
    fn task_without_due_date_is_not_added(mut app: App) {
        type_text(&mut app, "Math Test");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.tasks.is_empty());
        assert!(find_card(&render(&app), "Math Test").is_none());
    }

    #[rstest]
    fn checkbox_deletes_the_task(mut app: App) {
        add(&mut app, "History Test", "2024-06-30");
        assert!(find_card(&render(&app), "History Test").is_some());

        app.form.focus = Field::Cards;
        app.handle_key(key(KeyCode::Char(' ')));

        assert!(app.tasks.find_by_name("History Test").is_none());
        assert!(find_card(&render(&app), "History Test").is_none());
    }

    #[rstest]
    fn delete_key_removes_the_selected_card(mut app: App) {
        add(&mut app, "A", "2024-06-30");
        add(&mut app, "B", "2024-06-30");
        app.form.focus = Field::Cards;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Delete));

        let names: Vec<_> = app.tasks.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A"]);
    }

    #[rstest]
    fn delete_key_edits_nothing_outside_the_card_list(mut app: App) {
        add(&mut app, "History Test", "2024-06-30");
        for focus in [Field::Name, Field::DueDate, Field::AddButton] {
            app.form.focus = focus;
            app.handle_key(key(KeyCode::Delete));
        }
        assert!(app.tasks.find_by_name("History Test").is_some());
    }

    #[rstest]
    #[case(KeyModifiers::CONTROL, 'a')]
    #[case(KeyModifiers::ALT, 'x')]
    #[case(KeyModifiers::CONTROL | KeyModifiers::SHIFT, 'A')]
    fn shortcuts_are_not_typed(mut app: App, #[case] modifiers: KeyModifiers, #[case] c: char) {
        type_text(&mut app, "M");
        app.handle_key(KeyEvent::new(KeyCode::Char(c), modifiers));
        assert_eq!(app.form.name, "M");
    }

    #[rstest]
    fn shifted_letters_are_typed(mut app: App) {
        app.handle_key(KeyEvent::new(KeyCode::Char('M'), KeyModifiers::SHIFT));
        type_text(&mut app, "ath");
        assert_eq!(app.form.name, "Math");
    }

    #[rstest]
    fn cursor_follows_display_width(mut app: App) {
        type_text(&mut app, "日本");
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| app.draw(f, today())).unwrap();
        terminal.backend_mut().assert_cursor_position((1 + 4, 1));
    }

    #[rstest]
    fn past_due_card_has_a_different_background(mut app: App) {
        add(&mut app, "History Test", "2023-06-30");
        add(&mut app, "Math Test", "2024-06-30");
        add(&mut app, "Art Test", "2024-06-01");
        let buf = render(&app);

        let (x, y) = find_card(&buf, "History Test").unwrap();
        assert_eq!(buf[(x, y)].bg, Color::Red);
        assert_ne!(buf[(x, y)].bg, Color::White);

        let (x, y) = find_card(&buf, "Math Test").unwrap();
        assert_eq!(buf[(x, y)].bg, Color::Reset);

        let (x, y) = find_card(&buf, "Art Test").unwrap();
        assert_eq!(buf[(x, y)].bg, Color::Reset);
    }

    #[rstest]
    fn configured_colours_are_used() {
        let config = Config {
            past_due_color: Color::Magenta,
            default_color: Color::White,
            ..Config::default()
        };
        let past = Task {
            name: "x".to_string(),
            due_date: date(2024, 5, 31),
        };
        let future = Task {
            due_date: date(2024, 6, 2),
            ..past.clone()
        };

        assert_eq!(card_style(&config, &past, today()).bg, Some(Color::Magenta));
        assert_eq!(card_style(&config, &future, today()).bg, Some(Color::White));
    }

    #[rstest]
    fn empty_date_shows_placeholder(app: App) {
        assert!(rows(&render(&app))[1].contains(DATE_PLACEHOLDER));
    }

    #[rstest]
    fn selected_card_stays_visible(mut app: App) {
        for i in 0..10 {
            add(&mut app, &format!("Task {i}"), "2024-06-30");
        }
        app.form.focus = Field::Cards;
        for _ in 0..9 {
            app.handle_key(key(KeyCode::Down));
        }
        assert!(find_card(&render(&app), "Task 9").is_some());
    }

    #[rstest]
    #[case(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))]
    #[case(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))]
    fn quits_on_escape_and_ctrl_c(mut app: App, #[case] event: KeyEvent) {
        app.handle_key(event);
        assert!(app.should_quit());
    }

    #[rstest]
    fn typing_q_does_not_quit(mut app: App) {
        type_text(&mut app, "quiz");
        assert!(!app.should_quit());
        assert_eq!(app.form.name, "quiz");
    }
}
