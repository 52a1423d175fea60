use crate::help::Help;
use crate::theme::{BASE_STYLE, HINT_STYLE};
use crate::widget::Picker;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use datepick::state::Field;
use datepick::{Clock, DatePicker, DisabledDates, Event, Outcome, RenderSink, ViewModel};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::Widget,
    Terminal,
};
use std::io::{self, Write};
use time::Date;

/// Keyboard router and screen for a [`DatePicker`]
#[derive(Clone, Debug)]
pub(crate) struct App<D, C> {
    picker: DatePicker<D, C>,
    screen: Screen,
    /// Index into the grid of the cell the keyboard is on
    cursor: usize,
    state: AppState,
}

impl<D: DisabledDates, C: Clock> App<D, C> {
    pub(crate) fn new(picker: DatePicker<D, C>) -> App<D, C> {
        let screen = Screen(picker.view().clone());
        App {
            picker,
            screen,
            cursor: 0,
            state: AppState::Picking,
        }
    }

    /// Runs until the user quits, then returns the committed value
    pub(crate) fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
    ) -> io::Result<Option<Date>> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(self.picker.value())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        Ok(())
    }

    // Returns `false` if the key does nothing in the current state
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Quitting => false,
            AppState::Picking if key == KeyCode::Char('?') => {
                self.state = AppState::Helping;
                true
            }
            AppState::Picking if self.picker.opened() => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Char('[') | KeyCode::PageUp => self.send(Event::Previous),
                KeyCode::Char(']') | KeyCode::PageDown => self.send(Event::Next),
                KeyCode::Char(' ') | KeyCode::Enter => self.pick(),
                KeyCode::Char('s') => self.send(Event::Commit),
                KeyCode::Esc | KeyCode::Tab => self.send(Event::Discard),
                _ => false,
            },
            AppState::Picking => match key {
                KeyCode::Char(' ') | KeyCode::Enter => self.send(Event::OpenRequested),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn send(&mut self, event: Event) -> bool {
        let outcome = self.picker.handle_and_render(event, &mut self.screen);
        if let Outcome::Applied(changes) = outcome {
            if changes.contains(Field::Opened) || changes.contains(Field::MonthContext) {
                self.reset_cursor();
            }
        }
        outcome.is_applied()
    }

    /// Stages the day under the cursor.  Disabled days are refused here; the
    /// picker itself would accept them.
    fn pick(&mut self) -> bool {
        match self.screen.0.grid.get(self.cursor).copied() {
            Some(cell) if !cell.is_disabled => self.send(Event::DayPicked(cell.date)),
            _ => false,
        }
    }

    fn move_cursor(&mut self, delta: isize) -> bool {
        match self.cursor.checked_add_signed(delta) {
            Some(i) if i < self.screen.0.grid.len() => {
                self.cursor = i;
                true
            }
            _ => false,
        }
    }

    /// Puts the cursor on the selected day if it's in the displayed month,
    /// otherwise on the month's first day
    fn reset_cursor(&mut self) {
        let view = &self.screen.0;
        let in_month = |i: &usize| {
            view.grid
                .get(*i)
                .is_some_and(|c| !c.is_outside_current_month)
        };
        self.cursor = view
            .selected_index()
            .filter(in_month)
            .or_else(|| (0..view.grid.len()).find(in_month))
            .unwrap_or(0);
    }

    fn hint(&self) -> &'static str {
        match self.state {
            AppState::Picking if self.picker.opened() => {
                "ENTER: stage  s: commit  ESC: discard  ?: help"
            }
            _ => "ENTER: open  q: quit  ?: help",
        }
    }
}

impl<D: DisabledDates, C: Clock> Widget for &App<D, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [main_area, hint_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let view = &self.screen.0;
        let cursor = view.opened.then_some(self.cursor);
        let [picker_area] = Layout::vertical([Picker::height(view)])
            .flex(Flex::Start)
            .areas(main_area);
        Picker::new(view, cursor).render(picker_area, buf);
        Line::styled(self.hint(), HINT_STYLE)
            .centered()
            .render(hint_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

/// The most recent view the picker handed out
#[derive(Clone, Debug, Eq, PartialEq)]
struct Screen(ViewModel);

impl RenderSink for Screen {
    fn render(&mut self, view: &ViewModel) {
        self.0.clone_from(view);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    Quitting,
}
