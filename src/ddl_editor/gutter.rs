use eframe::egui;

use crate::ddl::Diagnostic;

/// Render the left gutter (line numbers plus error markers) into the rect
/// reserved before the TextEdit, and handle gutter clicks that move the
/// TextEdit cursor.
pub(crate) fn render_gutter(
    ui: &mut egui::Ui,
    output: &egui::text_edit::TextEditOutput,
    text_edit_id: egui::Id,
    source: &str,
    diagnostics: &[Diagnostic],
    gutter_response: &egui::Response,
) {
    let gutter_rect = gutter_response.rect;

    // Match the font size used by the highlighter.
    let font_id = egui::FontId::monospace(14.0);

    let mut active_line_idx: usize = 0;
    if let Some(te_state) = egui::TextEdit::load_state(ui.ctx(), text_edit_id) {
        if let Some(range) = te_state.cursor.char_range() {
            let char_idx = range.primary.index;
            active_line_idx = source
                .chars()
                .take(char_idx)
                .filter(|&c| c == '\n')
                .count();
        }
    }

    let mut full_gutter_rect = gutter_rect;
    full_gutter_rect.set_bottom(ui.clip_rect().bottom().max(output.response.rect.bottom()));

    let gutter_painter = ui.painter().with_clip_rect(full_gutter_rect);
    gutter_painter.rect_filled(full_gutter_rect, 0.0, egui::Color32::from_rgb(24, 24, 24));

    let gutter_text_color = egui::Color32::from_gray(100);

    // 1-based line numbers that carry an error marker.
    let error_lines: std::collections::HashSet<usize> =
        diagnostics.iter().map(|d| d.line).collect();

    // Use the galley to position line numbers accurately across wrapped rows.
    let galley = &output.galley;
    let galley_pos = output.galley_pos;

    let mut current_logical_line = 0;
    for row in &galley.rows {
        let row_center_y = row.rect.center().y;
        let cursor = galley.cursor_from_pos(egui::vec2(0.0, row_center_y));
        let row_start_idx = cursor.ccursor.index;

        // A row starts a logical line if it starts at index 0 or the
        // character immediately before it is a newline.
        let is_start_of_logical_line = row_start_idx == 0 || {
            let prev_idx = row_start_idx - 1;
            source.chars().nth(prev_idx) == Some('\n')
        };
        if !is_start_of_logical_line {
            continue;
        }

        let line_index = current_logical_line;
        current_logical_line += 1;

        let y = galley_pos.y + row.rect.top();
        if y + row.rect.height() < ui.clip_rect().top() {
            continue;
        }
        if y > ui.clip_rect().bottom() {
            break;
        }

        if error_lines.contains(&(line_index + 1)) {
            let dot_center =
                egui::pos2(full_gutter_rect.left() + 14.0, y + row.rect.height() * 0.5);
            gutter_painter.circle_filled(dot_center, 5.0, egui::Color32::from_rgb(200, 80, 80));
        }

        let num = format!("{}", line_index + 1);
        gutter_painter.text(
            egui::pos2(full_gutter_rect.right() - 8.0, y),
            egui::Align2::RIGHT_TOP,
            num,
            font_id.clone(),
            if line_index == active_line_idx {
                egui::Color32::from_rgb(220, 220, 220)
            } else {
                gutter_text_color
            },
        );
    }

    // Clicking the gutter moves the cursor to the clicked position's line.
    if gutter_response.clicked() {
        if let Some(pos) = ui.ctx().pointer_interact_pos() {
            let galley_y = pos.y - galley_pos.y;
            let cursor = galley.cursor_from_pos(egui::vec2(0.0, galley_y));
            let ccursor = egui::text::CCursor::new(cursor.ccursor.index);

            if let Some(mut te_state) = egui::TextEdit::load_state(ui.ctx(), text_edit_id) {
                te_state
                    .cursor
                    .set_char_range(Some(egui::text::CCursorRange::one(ccursor)));
                egui::TextEdit::store_state(ui.ctx(), text_edit_id, te_state);
            }
        }
    }
}
