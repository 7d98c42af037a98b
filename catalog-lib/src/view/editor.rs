//! Inline title editor.

use crate::model::ProductId;

/// What ending an edit session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Apply `title` to product `id`.
    Commit { id: ProductId, title: String },
    /// The text was empty or unchanged; nothing to apply.
    Unchanged,
    /// Escape pressed; nothing to apply.
    Cancelled,
    /// No session was open.
    Idle,
}

#[derive(Debug, Clone)]
struct EditSession {
    id: ProductId,
    buffer: String,
    /// Cursor position in chars.
    cursor: usize,
}

/// Edit session for one title cell at a time.
///
/// Committing (Enter or blur) yields an edit only when the trimmed text is
/// non-empty and differs from the product's title at commit time; the
/// trimmed text is what gets stored. Cancelling always reverts.
#[derive(Debug, Clone, Default)]
pub struct TitleEditor {
    session: Option<EditSession>,
}

impl TitleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session on product `id`, seeded with its current title.
    ///
    /// An open session on another product is discarded.
    pub fn begin(&mut self, id: ProductId, current: &str) {
        self.session = Some(EditSession {
            id,
            buffer: current.to_string(),
            cursor: current.chars().count(),
        });
    }

    /// Returns `true` while a session is open.
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Product being edited.
    pub fn editing_id(&self) -> Option<ProductId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Current input text.
    pub fn buffer(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.buffer.as_str())
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.cursor)
    }

    pub fn insert(&mut self, ch: char) {
        if let Some(session) = &mut self.session {
            let at = byte_index(&session.buffer, session.cursor);
            session.buffer.insert(at, ch);
            session.cursor += 1;
        }
    }

    /// Deletes the char before the cursor.
    pub fn backspace(&mut self) {
        if let Some(session) = &mut self.session {
            if session.cursor == 0 {
                return;
            }
            session.cursor -= 1;
            let at = byte_index(&session.buffer, session.cursor);
            session.buffer.remove(at);
        }
    }

    /// Deletes the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(session) = &mut self.session {
            if session.cursor < session.buffer.chars().count() {
                let at = byte_index(&session.buffer, session.cursor);
                session.buffer.remove(at);
            }
        }
    }

    pub fn move_left(&mut self) {
        if let Some(session) = &mut self.session {
            session.cursor = session.cursor.saturating_sub(1);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(session) = &mut self.session {
            session.cursor = (session.cursor + 1).min(session.buffer.chars().count());
        }
    }

    pub fn move_home(&mut self) {
        if let Some(session) = &mut self.session {
            session.cursor = 0;
        }
    }

    pub fn move_end(&mut self) {
        if let Some(session) = &mut self.session {
            session.cursor = session.buffer.chars().count();
        }
    }

    /// Ends the session, keeping the text if it differs from `current`,
    /// the title the product has now.
    pub fn commit(&mut self, current: &str) -> EditOutcome {
        let Some(session) = self.session.take() else {
            return EditOutcome::Idle;
        };
        let trimmed = session.buffer.trim();
        if trimmed.is_empty() || trimmed == current {
            EditOutcome::Unchanged
        } else {
            EditOutcome::Commit {
                id: session.id,
                title: trimmed.to_string(),
            }
        }
    }

    /// Ends the session, discarding the text.
    pub fn cancel(&mut self) -> EditOutcome {
        match self.session.take() {
            Some(_) => EditOutcome::Cancelled,
            None => EditOutcome::Idle,
        }
    }
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map_or(s.len(), |(i, _)| i)
}
