//! Drawing the catalog screen.

use std::io;
use std::io::Write;
use std::ops::Range;

use catalog_lib::api::ProductSource;
use catalog_lib::view::COLUMNS;
use catalog_lib::view::Column;
use catalog_lib::view::Notice;
use crossterm::cursor;
use crossterm::queue;
use crossterm::style::Attribute;
use crossterm::style::Color;
use crossterm::style::Print;
use crossterm::style::ResetColor;
use crossterm::style::SetAttribute;
use crossterm::style::SetForegroundColor;
use crossterm::terminal;
use crossterm::terminal::ClearType;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::app::App;

/// Title line, error banner, column header.
pub const BODY_TOP: u16 = 3;
/// Notice line and help line.
const FOOTER_ROWS: u16 = 2;

const HELP: &str = "↑/↓ move  Enter edit title  r reload  m load more  q quit";
const HELP_EDITING: &str = "Enter save  Esc cancel  ↑/↓ save and move";

/// Number of table rows that fit in a terminal of `height` rows.
pub fn body_height(height: u16) -> usize {
    height.saturating_sub(BODY_TOP + FOOTER_ROWS).max(1) as usize
}

/// Horizontal placement of the table columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    widths: [usize; 5],
}

impl ColumnLayout {
    const FIXED: [usize; 4] = [16, 16, 11, 6];
    const MIN_TITLE: usize = 10;

    pub fn new(width: u16) -> Self {
        let fixed: usize = Self::FIXED.iter().sum::<usize>() + COLUMNS.len() - 1;
        let title = (width as usize).saturating_sub(fixed).max(Self::MIN_TITLE);
        let [brand, category, price, rating] = Self::FIXED;
        Self {
            widths: [title, brand, category, price, rating],
        }
    }

    pub fn width(&self, column: Column) -> usize {
        self.widths[Self::index(column)]
    }

    /// Screen columns occupied by `column`.
    pub fn span(&self, column: Column) -> Range<usize> {
        let index = Self::index(column);
        let start: usize = self.widths[..index].iter().map(|w| w + 1).sum();
        start..start + self.widths[index]
    }

    /// Column under screen column `x`, if any.
    pub fn column_at(&self, x: u16) -> Option<Column> {
        COLUMNS
            .into_iter()
            .find(|column| self.span(*column).contains(&(x as usize)))
    }

    fn index(column: Column) -> usize {
        COLUMNS.iter().position(|c| *c == column).unwrap_or(0)
    }
}

/// Truncates or pads `text` to exactly `width` display columns.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn row_line(layout: &ColumnLayout, cell: impl Fn(Column) -> String) -> String {
    COLUMNS
        .into_iter()
        .map(|column| fit(&cell(column), layout.width(column)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draws a full frame.
pub fn draw<S: ProductSource + 'static>(
    out: &mut impl Write,
    app: &App<S>,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let layout = ColumnLayout::new(width);
    let status = app.status();
    let full = width as usize;

    queue!(
        out,
        terminal::BeginSynchronizedUpdate,
        cursor::Hide,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        Print("Products Catalog"),
        SetAttribute(Attribute::Reset),
        Print(fit(&format!("  {} • Scroll for more", status.header()), full.saturating_sub(16))),
    )?;

    if let Some(message) = status.error() {
        queue!(
            out,
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::Red),
            SetAttribute(Attribute::Bold),
            Print("Error: "),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(Color::Red),
            Print(fit(message, full.saturating_sub(7))),
            ResetColor,
        )?;
    }

    queue!(
        out,
        cursor::MoveTo(0, 2),
        SetAttribute(Attribute::Reverse),
        Print(fit(&row_line(&layout, |c| c.label().to_string()), full)),
        SetAttribute(Attribute::Reset),
    )?;

    let rows = app.visible_rows(body_height(height));
    let mut edit_cursor = None;
    for (offset, (index, row)) in rows.iter().enumerate() {
        let y = BODY_TOP + offset as u16;
        let selected = *index == app.selected();
        let editing = selected && app.editor().editing_id() == Some(row.id);

        let line = row_line(&layout, |column| match column {
            Column::Title if editing => app.editor().buffer().unwrap_or_default().to_string(),
            other => row.cell(other).to_string(),
        });

        queue!(out, cursor::MoveTo(0, y))?;
        if selected {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, Print(fit(&line, full)), SetAttribute(Attribute::Reset))?;

        if editing {
            edit_cursor = Some((title_cursor_x(app, &layout), y));
        }
    }

    let footer = height.saturating_sub(FOOTER_ROWS);
    let notice = status
        .notices
        .iter()
        .find(|n| !matches!(n, Notice::Error(_)))
        .map(Notice::text)
        .or_else(|| app.manual_load().then(|| "Press m to load more".to_string()));
    if let Some(notice) = notice {
        queue!(
            out,
            cursor::MoveTo(0, footer),
            SetAttribute(Attribute::Dim),
            Print(fit(&notice, full)),
            SetAttribute(Attribute::Reset),
        )?;
    }

    let help = if app.editor().is_editing() { HELP_EDITING } else { HELP };
    queue!(
        out,
        cursor::MoveTo(0, footer + 1),
        SetForegroundColor(Color::DarkGrey),
        Print(fit(help, full)),
        ResetColor,
    )?;

    if let Some((x, y)) = edit_cursor {
        queue!(out, cursor::MoveTo(x, y), cursor::Show)?;
    }

    queue!(out, terminal::EndSynchronizedUpdate)?;
    out.flush()
}

fn title_cursor_x<S: ProductSource + 'static>(app: &App<S>, layout: &ColumnLayout) -> u16 {
    let editor = app.editor();
    let buffer = editor.buffer().unwrap_or_default();
    let cursor = editor.cursor().unwrap_or_default();
    let prefix: usize = buffer.chars().take(cursor).map(|c| c.width().unwrap_or(0)).sum();
    let span = layout.span(Column::Title);
    (span.start + prefix.min(span.len().saturating_sub(1))) as u16
}
