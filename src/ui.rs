use eframe::egui;

use crate::app_state::{AppState, ImportStep, Route};
use crate::ddl_editor::{DdlEditorCallbacks, DdlEditorProps};
use crate::widgets::{self, Alert};
use crate::wizard::{ButtonLink, WizardShell, BACK_LABEL, CANCEL_LABEL};

pub struct VirtViewApp {
    state: AppState,
}

pub fn create_app() -> VirtViewApp {
    VirtViewApp {
        state: AppState::default(),
    }
}

impl eframe::App for VirtViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;
        state.tick();

        if state.is_working {
            // Keep polling worker channels while something runs.
            ctx.request_repaint();
        }

        let route = state.route;
        egui::CentralPanel::default().show(ctx, |ui| match route {
            Route::Import(step) => show_import_wizard(ui, state, step),
            Route::ViewList => show_view_list(ui, state),
            Route::EditView(idx) => show_edit_view(ui, state, idx),
        });
    }
}

// ─── Wizard ───────────────────────────────────────────────────────────────────

fn show_import_wizard(ui: &mut egui::Ui, state: &mut AppState, step: ImportStep) {
    let next_disabled = match step {
        ImportStep::SelectSource => state.selected_connection.is_none(),
        ImportStep::SelectViews => state.selected_tables.is_empty(),
        ImportStep::Review => state.views.is_empty(),
    };

    let mut next_req = false;
    let mut create_req = false;
    let mut edit_req: Option<usize> = None;

    let nav = {
        let mut on_next = || next_req = true;
        let mut on_create = || create_req = true;

        let back = if step == ImportStep::SelectSource {
            None
        } else {
            Some(ButtonLink::to(BACK_LABEL, Route::Import(step.back())))
        };

        let shell = WizardShell {
            title: step.title(),
            is_last_step: step.is_last(),
            is_next_loading: state.is_working,
            is_next_disabled: next_disabled,
            back,
            cancel: ButtonLink::to(CANCEL_LABEL, Route::ViewList),
            on_next: Some(&mut on_next),
            on_create_views: Some(&mut on_create),
            next_href: None,
        };

        shell.show(ui, |ui| match step {
            ImportStep::SelectSource => show_select_source(ui, state),
            ImportStep::SelectViews => show_select_views(ui, state),
            ImportStep::Review => show_review(ui, state, &mut edit_req),
        })
    };

    if next_req {
        let next = step.next();
        if next == ImportStep::Review {
            state.derive_views_from_selection();
        }
        state.route = Route::Import(next);
    }
    if create_req {
        state.request_create_views();
    }
    if let Some(idx) = edit_req {
        state.begin_edit(idx);
    }
    if let Some(target) = nav {
        state.route = target;
    }
}

fn show_select_source(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Choose the connection to import tables from.");
    ui.add_space(8.0);
    for (i, name) in state.connections.clone().into_iter().enumerate() {
        let selected = state.selected_connection == Some(i);
        if ui.radio(selected, &name).clicked() {
            state.selected_connection = Some(i);
        }
    }
}

fn show_select_views(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Pick the tables to derive views from.");
    ui.add_space(8.0);

    let tables: Vec<String> = state.hints.tables().map(|t| t.to_string()).collect();
    for table in &tables {
        let mut checked = state.selected_tables.contains(table);
        if ui.checkbox(&mut checked, table).changed() {
            if checked {
                state.selected_tables.push(table.clone());
            } else {
                state.selected_tables.retain(|t| t != table);
            }
        }
    }
}

fn show_review(ui: &mut egui::Ui, state: &mut AppState, edit_req: &mut Option<usize>) {
    if let Some(err) = state.create_error.clone() {
        widgets::show_alerts(ui, &[Alert::error(err)]);
    }

    ui.label("Review the generated DDL. Done creates all views.");
    ui.add_space(8.0);

    for (idx, view) in state.views.iter().enumerate() {
        ui.push_id(idx, |ui| {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.strong(&view.name);
                    ui.weak(format!("from {}", view.table));
                    if ui
                        .add_enabled(!state.is_working, egui::Button::new("Edit"))
                        .clicked()
                    {
                        *edit_req = Some(idx);
                    }
                });
                ui.add_space(4.0);
                ui.monospace(&view.ddl);
            });
        });
        ui.add_space(6.0);
    }
}

// ─── View list ────────────────────────────────────────────────────────────────

fn show_view_list(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Virtual views");
    ui.separator();

    let mut edit_req: Option<usize> = None;

    if state.views.is_empty() || !state.created {
        ui.label("No views created yet.");
    } else {
        for (idx, view) in state.views.iter().enumerate() {
            ui.push_id(idx, |ui| {
                ui.horizontal(|ui| {
                    ui.strong(&view.name);
                    ui.weak(format!("from {}", view.table));
                    if ui.button("Edit").clicked() {
                        edit_req = Some(idx);
                    }
                });
            });
        }
    }

    ui.add_space(12.0);
    if ui.button("Import views").clicked() {
        state.selected_connection = None;
        state.create_error = None;
        state.route = Route::Import(ImportStep::SelectSource);
    }

    if let Some(idx) = edit_req {
        state.begin_edit(idx);
    }
}

// ─── Edit view ────────────────────────────────────────────────────────────────

fn show_edit_view(ui: &mut egui::Ui, state: &mut AppState, idx: usize) {
    let mut editor = match state.editor.take() {
        Some(editor) => editor,
        None => {
            state.route = state.editor_return;
            return;
        }
    };

    let name = state
        .views
        .get(idx)
        .map(|v| v.name.clone())
        .unwrap_or_default();
    ui.heading(format!("Edit view: {}", name));
    ui.separator();

    let mut validate_req: Option<String> = None;
    let mut save_req: Option<String> = None;
    let mut cancel_req = false;
    {
        let props = DdlEditorProps {
            is_valid: state.is_valid,
            is_working: state.is_working,
            validation_results: &state.validation_results,
            diagnostics: &state.diagnostics,
            hints: &state.hints,
        };
        let mut on_validate = |ddl: &str| validate_req = Some(ddl.to_string());
        let mut on_save = |ddl: &str| save_req = Some(ddl.to_string());
        let mut on_cancel = || cancel_req = true;
        let mut callbacks = DdlEditorCallbacks {
            on_validate: &mut on_validate,
            on_save: &mut on_save,
            on_cancel: &mut on_cancel,
        };
        editor.show(ui, &props, &mut callbacks);
    }
    state.editor = Some(editor);

    if let Some(ddl) = validate_req {
        state.request_validation(ddl);
    }
    if let Some(ddl) = save_req {
        state.save_view(idx, &ddl);
        state.close_editor();
    }
    if cancel_req {
        state.close_editor();
    }
}
