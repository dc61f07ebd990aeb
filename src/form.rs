use crate::model::{NewTaskInput, Priority, Status, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    DueDate,
    Details,
    Priority,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::Title => FormField::DueDate,
            FormField::DueDate => FormField::Details,
            FormField::Details => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::Title => FormField::Priority,
            FormField::DueDate => FormField::Title,
            FormField::Details => FormField::DueDate,
            FormField::Priority => FormField::Details,
        }
    }
}

/// Identity of the task an edit dialog was opened on. The status rides
/// along so committing an edit preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub id: i64,
    pub status: Status,
}

/// Draft buffer behind the add/edit dialogs.
///
/// The draft is independent of the store: seeding copies the task by value,
/// cancel throws the draft away, and only an explicit valid submit produces
/// a payload. Submitting with an empty title or due date yields None and
/// the dialog stays open.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub due_date: String,
    pub details: String,
    pub priority: Priority,
    pub focus: FormField,
    pub cursor: usize,
    editing: Option<EditTarget>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the draft from an existing task for the edit flow.
    pub fn seed(task: &Task) -> Self {
        let mut form = Self {
            title: task.title.clone(),
            due_date: task.due_date.clone(),
            details: task.details.clone(),
            priority: task.priority,
            focus: FormField::Title,
            cursor: 0,
            editing: Some(EditTarget {
                id: task.id,
                status: task.status,
            }),
        };
        form.cursor = form.active_text().chars().count();
        form
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.due_date.is_empty()
    }

    /// Creation payload for the add flow; None when invalid.
    pub fn as_input(&self) -> Option<NewTaskInput> {
        if !self.is_valid() {
            return None;
        }
        Some(NewTaskInput {
            title: self.title.clone(),
            due_date: self.due_date.clone(),
            details: self.details.clone(),
            priority: self.priority,
        })
    }

    /// Replacement task for the edit flow, keeping the target's id and
    /// status; None when invalid or when the draft was never seeded.
    pub fn as_update(&self) -> Option<Task> {
        let target = self.editing?;
        if !self.is_valid() {
            return None;
        }
        Some(Task {
            id: target.id,
            title: self.title.clone(),
            status: target.status,
            due_date: self.due_date.clone(),
            details: self.details.clone(),
            priority: self.priority,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // --- FIELD FOCUS ---
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.cursor = self.active_text().chars().count();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
        self.cursor = self.active_text().chars().count();
    }

    pub fn cycle_priority(&mut self) {
        self.priority = self.priority.cycle();
    }

    /// The text buffer currently under the cursor. Priority is not a text
    /// field; it edits via cycle_priority.
    pub fn active_text(&self) -> &str {
        match self.focus {
            FormField::Title => &self.title,
            FormField::DueDate => &self.due_date,
            FormField::Details => &self.details,
            FormField::Priority => "",
        }
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Details => Some(&mut self.details),
            FormField::Priority => None,
        }
    }

    // --- CURSOR EDITING ---
    pub fn enter_char(&mut self, new_char: char) {
        let cursor = self.cursor;
        if let Some(buf) = self.active_text_mut() {
            let byte_idx = byte_index(buf, cursor);
            buf.insert(byte_idx, new_char);
            self.move_cursor_right();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        if let Some(buf) = self.active_text_mut() {
            let before = buf.chars().take(cursor - 1);
            let after = buf.chars().skip(cursor);
            *buf = before.chain(after).collect();
            self.move_cursor_left();
        }
    }

    pub fn move_cursor_left(&mut self) {
        let moved = self.cursor.saturating_sub(1);
        self.cursor = self.clamp_cursor(moved);
    }

    pub fn move_cursor_right(&mut self) {
        let moved = self.cursor.saturating_add(1);
        self.cursor = self.clamp_cursor(moved);
    }

    fn clamp_cursor(&self, new_cursor: usize) -> usize {
        new_cursor.clamp(0, self.active_text().chars().count())
    }
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .map(|(i, _)| i)
        .nth(char_idx)
        .unwrap_or(s.len())
}
