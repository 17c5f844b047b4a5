pub mod autocomplete;
pub mod draft;
mod gutter;
pub mod highlighter;
pub mod hints;

use eframe::egui;

use crate::ddl::Diagnostic;
use crate::widgets::{self, Alert};
use autocomplete::CompletionState;
pub use draft::DraftState;
pub use hints::TableHints;

/// The DDL editor panel: a highlighted multiline editor with a gutter,
/// hint completion, validation feedback, and the Validate/Save/Cancel row.
///
/// The panel owns only its edit-session state. Whether the parent is busy,
/// whether the last validation passed, and what feedback to show all come
/// in through [`DdlEditorProps`] each frame; actions go out through
/// [`DdlEditorCallbacks`].
pub struct DdlEditorPanel {
    pub draft: DraftState,
    completion: CompletionState,
}

/// Per-frame inputs supplied by the parent screen.
pub struct DdlEditorProps<'a> {
    /// Whether the most recent validation of this draft passed.
    pub is_valid: bool,
    /// True while the parent runs a validate or save in the background.
    pub is_working: bool,
    pub validation_results: &'a [Alert],
    pub diagnostics: &'a [Diagnostic],
    pub hints: &'a TableHints,
}

/// Outgoing actions. `on_validate` and `on_save` receive the current draft
/// text, never the seed the panel was opened with.
pub struct DdlEditorCallbacks<'a> {
    pub on_validate: &'a mut dyn FnMut(&str),
    pub on_save: &'a mut dyn FnMut(&str),
    pub on_cancel: &'a mut dyn FnMut(),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Validate,
    Save,
    Cancel,
}

/// Apply a button action to the draft, re-checking the gates so a stale
/// click cannot bypass them.
pub fn dispatch(
    action: PanelAction,
    draft: &mut DraftState,
    is_valid: bool,
    is_working: bool,
    callbacks: &mut DdlEditorCallbacks<'_>,
) {
    match action {
        PanelAction::Validate => {
            if draft.can_validate(is_working) {
                (callbacks.on_validate)(draft.value());
                draft.mark_validated();
            }
        }
        PanelAction::Save => {
            // The draft keeps its flags after a save; the parent decides
            // what happens next (usually closing the editor).
            if draft.can_save(is_valid, is_working) {
                (callbacks.on_save)(draft.value());
            }
        }
        PanelAction::Cancel => (callbacks.on_cancel)(),
    }
}

impl DdlEditorPanel {
    /// Open an edit session seeded with the given DDL.
    pub fn new(ddl: impl Into<String>) -> Self {
        Self {
            draft: DraftState::new(ddl),
            completion: CompletionState::default(),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        props: &DdlEditorProps<'_>,
        callbacks: &mut DdlEditorCallbacks<'_>,
    ) {
        let mut action: Option<PanelAction> = None;

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            // Footer first so the editor gets the remaining height.
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!props.is_working, egui::Button::new("Cancel"))
                    .clicked()
                {
                    action = Some(PanelAction::Cancel);
                }
                let save_ok = self.draft.can_save(props.is_valid, props.is_working);
                if ui.add_enabled(save_ok, egui::Button::new("Save")).clicked() {
                    action = Some(PanelAction::Save);
                }
            });
            ui.separator();

            ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                widgets::show_alerts(ui, props.validation_results);

                ui.horizontal(|ui| {
                    if widgets::busy_button(
                        ui,
                        "Validate",
                        self.draft.can_validate(props.is_working),
                        props.is_working,
                    )
                    .clicked()
                    {
                        action = Some(PanelAction::Validate);
                    }
                    if self.draft.needs_validation() {
                        ui.label(
                            egui::RichText::new("Edited since last validation")
                                .italics()
                                .weak(),
                        );
                    }
                });
                ui.separator();

                self.show_editor(ui, props.hints, props.diagnostics);
            });
        });

        if let Some(action) = action {
            dispatch(
                action,
                &mut self.draft,
                props.is_valid,
                props.is_working,
                callbacks,
            );
        }
    }

    fn show_editor(&mut self, ui: &mut egui::Ui, hints: &TableHints, diagnostics: &[Diagnostic]) {
        let mut layouter = |ui: &egui::Ui, string: &str, wrap_width: f32| {
            let mut layout_job = egui::text::LayoutJob::default();
            highlighter::highlight_sql(&mut layout_job, string, hints);
            layout_job.wrap.max_width = wrap_width;
            ui.fonts(|f| f.layout_job(layout_job))
        };

        let available_rect = ui.available_rect_before_wrap();
        ui.painter()
            .rect_filled(available_rect, 0.0, egui::Color32::from_rgb(10, 10, 10));

        egui::ScrollArea::vertical()
            .id_source("ddl_editor_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.set_min_height(ui.available_height());

                let text_edit_id = ui.make_persistent_id("ddl_text_edit");

                // 1. Process input BEFORE TextEdit (consume navigation keys).
                autocomplete::process_input(
                    ui,
                    text_edit_id,
                    &mut self.completion,
                    &mut self.draft,
                );

                let gutter_width = 48.0f32;

                ui.horizontal(|ui| {
                    // Reserve gutter space; drawn after the TextEdit so the
                    // galley is available for row positioning.
                    let gutter_response = ui.allocate_rect(
                        egui::Rect::from_min_size(
                            ui.cursor().min,
                            egui::vec2(gutter_width, ui.available_height()),
                        ),
                        egui::Sense::click(),
                    );

                    let rows = self.draft.value().lines().count().max(6);
                    let text_edit = egui::TextEdit::multiline(self.draft.buffer_mut())
                        .id(text_edit_id)
                        .font(egui::TextStyle::Monospace)
                        .code_editor()
                        .desired_rows(rows)
                        .frame(false)
                        .desired_width(f32::INFINITY)
                        .lock_focus(true)
                        .layouter(&mut layouter);

                    let output = text_edit.show(ui);

                    if output.response.changed() {
                        self.draft.notify_edit();
                    }

                    // 2. Update popup state and render it AFTER TextEdit.
                    autocomplete::handle_state_and_render(
                        ui,
                        &output.response,
                        &mut self.completion,
                        &mut self.draft,
                        hints,
                    );

                    gutter::render_gutter(
                        ui,
                        &output,
                        text_edit_id,
                        self.draft.value(),
                        diagnostics,
                        &gutter_response,
                    );
                });
            });
    }
}
