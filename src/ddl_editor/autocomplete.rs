use eframe::egui;

use super::draft::DraftState;
use super::hints::TableHints;

/// Popup state for hint completion inside the DDL editor.
#[derive(Debug, Default)]
pub struct CompletionState {
    pub open: bool,
    pub items: Vec<String>,
    pub selected: usize,
    /// Byte index of the primary cursor as of the last frame.
    pub cursor_idx: usize,
}

impl CompletionState {
    fn close(&mut self) {
        self.open = false;
        self.items.clear();
    }
}

/// Word characters for completion purposes. `.` is included so that
/// `table.col` hints are matched and replaced as a single token.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Byte index of the start of the word ending at `cursor_idx`.
fn word_start(text: &str, cursor_idx: usize) -> usize {
    let mut start = cursor_idx;
    while start > 0 {
        let slice = &text[..start];
        if let Some(c) = slice.chars().next_back() {
            if !is_word_char(c) {
                break;
            }
            start -= c.len_utf8();
        } else {
            break;
        }
    }
    start
}

/// Consumes events (Arrows, Tab, Enter) BEFORE TextEdit sees them,
/// preventing cursor movement or newline insertion during popup navigation.
pub fn process_input(
    ui: &mut egui::Ui,
    text_edit_id: egui::Id,
    state: &mut CompletionState,
    draft: &mut DraftState,
) {
    if !state.open || state.items.is_empty() {
        return;
    }

    let mut complete = false;
    let mut consume = false;

    if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
        state.selected = (state.selected + 1) % state.items.len();
        consume = true;
    } else if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
        if state.selected == 0 {
            state.selected = state.items.len() - 1;
        } else {
            state.selected -= 1;
        }
        consume = true;
    } else if ui.input(|i| i.key_pressed(egui::Key::Tab) || i.key_pressed(egui::Key::Enter)) {
        complete = true;
        consume = true;
    } else if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.close();
        consume = true;
    }

    if consume {
        // Consume ALL relevant keys so TextEdit doesn't also see them.
        ui.input_mut(|i| {
            i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowDown);
            i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowUp);
            i.consume_key(egui::Modifiers::NONE, egui::Key::Tab);
            i.consume_key(egui::Modifiers::NONE, egui::Key::Enter);
            i.consume_key(egui::Modifiers::NONE, egui::Key::Escape);
        });
    }

    if complete {
        let cursor_idx = state.cursor_idx;
        if cursor_idx <= draft.value().len() && state.selected < state.items.len() {
            let start = word_start(draft.value(), cursor_idx);
            let suggestion = state.items[state.selected].clone();

            // Replace the partial word wholesale; hints match case-insensitively
            // so suffix insertion alone would produce mixed-case tokens.
            draft
                .buffer_mut()
                .replace_range(start..cursor_idx, &suggestion);
            draft.notify_edit();

            let new_cursor_idx = start + suggestion.len();
            if let Some(mut te_state) = egui::TextEdit::load_state(ui.ctx(), text_edit_id) {
                let chars_before = draft.value()[..new_cursor_idx].chars().count();
                let ccursor = egui::text::CCursor::new(chars_before);
                te_state
                    .cursor
                    .set_char_range(Some(egui::text::CCursorRange::one(ccursor)));
                egui::TextEdit::store_state(ui.ctx(), text_edit_id, te_state);
            }
            state.cursor_idx = new_cursor_idx;
        }
        state.close();
    }
}

/// Updates the popup (typing or Ctrl+Space opens it) and renders it.
/// Call this AFTER TextEdit.
pub fn handle_state_and_render(
    ui: &mut egui::Ui,
    response: &egui::Response,
    state: &mut CompletionState,
    draft: &mut DraftState,
    hints: &TableHints,
) {
    if !response.has_focus() {
        return;
    }

    // Track the cursor byte index for next frame's input handling.
    if let Some(te_state) = egui::TextEdit::load_state(ui.ctx(), response.id) {
        if let Some(range) = te_state.cursor.char_range() {
            state.cursor_idx = draft
                .value()
                .char_indices()
                .nth(range.primary.index)
                .map(|(i, _)| i)
                .unwrap_or(draft.value().len());
        }
    }

    let cursor_idx = state.cursor_idx;
    if cursor_idx > draft.value().len() {
        return;
    }

    let start = word_start(draft.value(), cursor_idx);
    let current_word = draft.value()[start..cursor_idx].to_string();

    let requested = ui.input_mut(|i| i.consume_key(egui::Modifiers::CTRL, egui::Key::Space));

    if response.changed() || requested {
        if !current_word.is_empty() || requested {
            state.items = hints.completions(&current_word);
            state.open = !state.items.is_empty();
            state.selected = 0;
        } else {
            state.open = false;
        }
    }

    if state.open && !state.items.is_empty() {
        let popup_pos = if let Some(ptr) = ui.input(|i| i.pointer.hover_pos()) {
            ptr + egui::vec2(0.0, 20.0)
        } else {
            response.rect.min + egui::vec2(50.0, 50.0)
        };

        let mut clicked: Option<usize> = None;
        egui::Area::new(egui::Id::new("ddl_completion_popup"))
            .fixed_pos(popup_pos)
            .order(egui::Order::Foreground)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style())
                    .shadow(egui::epaint::Shadow::small_dark())
                    .show(ui, |ui| {
                        for (i, item) in state.items.iter().enumerate() {
                            let selected = i == state.selected;
                            if ui.selectable_label(selected, item).clicked() {
                                clicked = Some(i);
                            }
                        }
                    });
            });

        if let Some(i) = clicked {
            let suggestion = state.items[i].clone();
            draft
                .buffer_mut()
                .replace_range(start..cursor_idx, &suggestion);
            draft.notify_edit();
            state.cursor_idx = start + suggestion.len();
            state.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_start_stops_at_non_word_chars() {
        assert_eq!(word_start("SELECT na", 9), 7);
        assert_eq!(word_start("FROM users.na", 13), 5);
        assert_eq!(word_start("", 0), 0);
        assert_eq!(word_start("abc", 3), 0);
    }

    #[test]
    fn completing_replaces_the_partial_word() {
        let mut draft = DraftState::new("SELECT na FROM users");
        let start = word_start(draft.value(), 9);
        draft.buffer_mut().replace_range(start..9, "name");
        draft.notify_edit();
        assert_eq!(draft.value(), "SELECT name FROM users");
        assert!(draft.is_dirty());
        assert!(draft.needs_validation());
    }
}
