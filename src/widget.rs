use crate::theme::{
    BASE_STYLE, DISABLED_STYLE, HEADER_STYLE, LAUNCHER_STYLE, OVERFLOW_STYLE, SELECTED_STYLE,
    WEEKDAY_STYLE,
};
use datepick::{DayCell, ViewModel};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Span, Text},
    widgets::{Block, Paragraph, Widget},
};

/// Number of columns per day of week
const DAY_WIDTH: u16 = 4;

/// Width of the grid in columns, not counting the border
const MAIN_WIDTH: u16 = DAY_WIDTH * 7;

const TOTAL_WIDTH: u16 = MAIN_WIDTH + 2;

/// Number of lines taken up by the launcher and its border
const LAUNCHER_LINES: u16 = 3;

/// Number of lines taken up by the weekday labels and their rule
const HEADER_LINES: u16 = 2;

const ACS_HLINE: char = '─';

/// Draws a picker's view model: the launcher, and the month grid below it
/// while open.  `cursor` is the index of the grid cell the keyboard is on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Picker<'a> {
    view: &'a ViewModel,
    cursor: Option<usize>,
}

impl<'a> Picker<'a> {
    pub(crate) fn new(view: &'a ViewModel, cursor: Option<usize>) -> Self {
        Picker { view, cursor }
    }

    /// Height of the widget for the given view
    pub(crate) fn height(view: &ViewModel) -> u16 {
        if view.opened {
            let weeks = u16::try_from(view.weeks().len()).unwrap_or(u16::MAX);
            LAUNCHER_LINES
                .saturating_add(HEADER_LINES)
                .saturating_add(weeks)
                .saturating_add(2)
        } else {
            LAUNCHER_LINES
        }
    }
}

impl Widget for Picker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([TOTAL_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let [launcher_area, body_area] = Layout::vertical([
            Constraint::Length(LAUNCHER_LINES),
            Constraint::Length(Picker::height(self.view).saturating_sub(LAUNCHER_LINES)),
        ])
        .flex(Flex::Start)
        .areas(area);
        Paragraph::new(Span::styled(
            self.view.launcher_text.as_str(),
            LAUNCHER_STYLE,
        ))
        .block(Block::bordered().title(" Date "))
        .style(BASE_STYLE)
        .render(launcher_area, buf);
        if !self.view.opened {
            return;
        }
        let block = Block::bordered()
            .title(Span::styled(
                format!(" < {} > ", self.view.header_text),
                HEADER_STYLE,
            ))
            .title_alignment(Alignment::Center)
            .style(BASE_STYLE);
        let inner = block.inner(body_area);
        block.render(body_area, buf);
        let mut canvas = BufferCanvas::new(inner, buf);
        canvas.draw_weekdays(&self.view.weekday_labels);
        for (i, week) in std::iter::zip(0u16.., self.view.weeks()) {
            for (j, cell) in std::iter::zip(0u16.., week) {
                let index = usize::from(i) * 7 + usize::from(j);
                canvas.draw_day(i, j, show(cell, self.cursor == Some(index)));
            }
        }
    }
}

fn show(cell: &DayCell, at_cursor: bool) -> Span<'static> {
    let s = if at_cursor {
        format!("[{:2}]", cell.day_of_month)
    } else {
        format!(" {:2} ", cell.day_of_month)
    };
    let style = if cell.is_selected {
        SELECTED_STYLE
    } else if cell.is_disabled {
        DISABLED_STYLE
    } else if cell.is_outside_current_month {
        OVERFLOW_STYLE
    } else {
        BASE_STYLE
    };
    Span::styled(s, style)
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_weekdays(&mut self, labels: &[&str]) {
        for (i, label) in std::iter::zip(0u16.., labels) {
            self.mvprint(0, DAY_WIDTH * i, format!(" {label} "), Some(WEEKDAY_STYLE));
        }
        self.hline(1, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, column: u16, s: Span<'_>) {
        self.mvprint(
            week_no + HEADER_LINES,
            DAY_WIDTH * column,
            s.content,
            Some(s.style),
        );
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // grid's area, though we need to be sure that the Rect passed to
            // the Paragraph is entirely within the frame lest a panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
