use std::sync::mpsc::{Receiver, TryRecvError};

use serde::{Deserialize, Serialize};

use crate::ddl::{self, Diagnostic};
use crate::ddl_editor::hints::DEFAULT_HINTS;
use crate::ddl_editor::{DdlEditorPanel, TableHints};
use crate::widgets::Alert;

/// Steps of the views-import wizard, in order.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ImportStep {
    SelectSource,
    SelectViews,
    Review,
}

impl ImportStep {
    pub fn is_last(self) -> bool {
        self == ImportStep::Review
    }

    pub fn next(self) -> ImportStep {
        match self {
            ImportStep::SelectSource => ImportStep::SelectViews,
            ImportStep::SelectViews | ImportStep::Review => ImportStep::Review,
        }
    }

    pub fn back(self) -> ImportStep {
        match self {
            ImportStep::SelectSource | ImportStep::SelectViews => ImportStep::SelectSource,
            ImportStep::Review => ImportStep::SelectViews,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ImportStep::SelectSource => "Import views: select source",
            ImportStep::SelectViews => "Import views: select tables",
            ImportStep::Review => "Import views: review DDL",
        }
    }
}

/// Top-level screens.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Route {
    Import(ImportStep),
    ViewList,
    EditView(usize),
}

/// One virtual view being drafted or already created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewDef {
    pub name: String,
    pub table: String,
    pub ddl: String,
}

pub struct AppState {
    pub route: Route,

    // Wizard inputs
    pub connections: Vec<String>,
    pub selected_connection: Option<usize>,
    pub hints: TableHints,
    pub selected_tables: Vec<String>,

    // Drafted and created views
    pub views: Vec<ViewDef>,
    pub created: bool,

    // Edit-view session; present only while Route::EditView is active.
    pub editor: Option<DdlEditorPanel>,
    pub editor_return: Route,
    pub validation_results: Vec<Alert>,
    pub diagnostics: Vec<Diagnostic>,
    pub is_valid: bool,
    pub is_working: bool,

    // Background work, polled every frame.
    pub validation_rx: Option<Receiver<Vec<Diagnostic>>>,
    pub create_rx: Option<Receiver<Result<usize, String>>>,
    pub create_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Import(ImportStep::SelectSource),
            connections: vec![
                "local_postgres".to_string(),
                "analytics_replica".to_string(),
            ],
            selected_connection: None,
            hints: DEFAULT_HINTS.clone(),
            selected_tables: Vec::new(),
            views: Vec::new(),
            created: false,
            editor: None,
            editor_return: Route::Import(ImportStep::Review),
            validation_results: Vec::new(),
            diagnostics: Vec::new(),
            is_valid: false,
            is_working: false,
            validation_rx: None,
            create_rx: None,
            create_error: None,
        }
    }
}

impl AppState {
    /// Poll background workers. Called once per frame before rendering.
    /// A worker that dies without replying hangs up its channel; that
    /// must release `is_working` too, or the UI stays wedged.
    pub fn tick(&mut self) {
        if let Some(rx) = self.validation_rx.take() {
            match rx.try_recv() {
                Ok(diags) => {
                    tracing::debug!(count = diags.len(), "validation finished");
                    self.is_valid = diags.is_empty();
                    self.validation_results = alerts_from_diagnostics(&diags);
                    self.diagnostics = diags;
                    self.is_working = false;
                }
                Err(TryRecvError::Empty) => self.validation_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("validation worker hung up without a result");
                    self.is_working = false;
                }
            }
        }

        if let Some(rx) = self.create_rx.take() {
            match rx.try_recv() {
                Ok(Ok(count)) => {
                    tracing::info!(count, "views created");
                    self.is_working = false;
                    self.created = true;
                    self.create_error = None;
                    self.route = Route::ViewList;
                }
                Ok(Err(msg)) => {
                    tracing::warn!(error = %msg, "view creation failed");
                    self.is_working = false;
                    self.create_error = Some(msg);
                }
                Err(TryRecvError::Empty) => self.create_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("view creation worker hung up without a result");
                    self.is_working = false;
                    self.create_error = Some("view creation did not finish".to_string());
                }
            }
        }
    }

    /// Validate a draft on a worker thread; results arrive via `tick`.
    pub fn request_validation(&mut self, ddl: String) {
        if self.is_working {
            return;
        }
        tracing::debug!(len = ddl.len(), "validation requested");
        let (tx, rx) = std::sync::mpsc::channel();
        self.validation_rx = Some(rx);
        self.is_working = true;
        std::thread::spawn(move || {
            let diags = ddl::validate(&ddl);
            let _ = tx.send(diags);
        });
    }

    /// Create all drafted views on a worker thread; on success the app
    /// navigates to the view list.
    pub fn request_create_views(&mut self) {
        if self.is_working || self.views.is_empty() {
            return;
        }
        tracing::info!(count = self.views.len(), "creating views");
        let (tx, rx) = std::sync::mpsc::channel();
        self.create_rx = Some(rx);
        self.is_working = true;
        let views = self.views.clone();
        std::thread::spawn(move || {
            let result = create_views(&views);
            let _ = tx.send(result);
        });
    }

    /// Replace the drafted views with one default view per selected table.
    /// Called when entering the review step; existing drafts for tables
    /// still selected are kept.
    pub fn derive_views_from_selection(&mut self) {
        let mut next: Vec<ViewDef> = Vec::new();
        for table in &self.selected_tables {
            if let Some(existing) = self.views.iter().find(|v| &v.table == table) {
                next.push(existing.clone());
                continue;
            }
            let columns: Vec<String> = self
                .hints
                .columns(table)
                .map(|c| c.to_vec())
                .unwrap_or_default();
            next.push(ViewDef {
                name: ddl::generator::default_view_name(table),
                table: table.clone(),
                ddl: ddl::generator::view_ddl(
                    &ddl::generator::default_view_name(table),
                    table,
                    &columns,
                ),
            });
        }
        self.views = next;
    }

    /// Open the editor for a drafted view, remembering where to return.
    pub fn begin_edit(&mut self, idx: usize) {
        if idx >= self.views.len() {
            return;
        }
        self.editor = Some(DdlEditorPanel::new(self.views[idx].ddl.clone()));
        self.editor_return = self.route;
        self.validation_results.clear();
        self.diagnostics.clear();
        self.is_valid = false;
        self.route = Route::EditView(idx);
    }

    /// Store the edited DDL back into the view. The editor stays open;
    /// closing is a separate navigation concern.
    pub fn save_view(&mut self, idx: usize, ddl: &str) {
        if let Some(view) = self.views.get_mut(idx) {
            view.ddl = ddl.to_string();
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
        self.validation_results.clear();
        self.diagnostics.clear();
        self.route = self.editor_return;
    }
}

/// Pretend-create the views. Each DDL is validated once more so a stale
/// draft cannot slip through.
fn create_views(views: &[ViewDef]) -> Result<usize, String> {
    for view in views {
        let diags = ddl::validate(&view.ddl);
        if let Some(first) = diags.first() {
            return Err(format!("{}: {}", view.name, first.message));
        }
    }
    Ok(views.len())
}

/// Map validator output to the alert stack shown above the editor:
/// one error line per diagnostic in order, or a single success line.
pub fn alerts_from_diagnostics(diags: &[Diagnostic]) -> Vec<Alert> {
    if diags.is_empty() {
        return vec![Alert::success("Validation passed")];
    }
    diags
        .iter()
        .map(|d| Alert::error(format!("line {}:{}: {}", d.line, d.column, d.message)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Severity;

    #[test]
    fn step_order_and_last_flag() {
        let s = ImportStep::SelectSource;
        assert!(!s.is_last());
        let s = s.next();
        assert_eq!(s, ImportStep::SelectViews);
        let s = s.next();
        assert_eq!(s, ImportStep::Review);
        assert!(s.is_last());
        assert_eq!(s.next(), ImportStep::Review);
        assert_eq!(s.back(), ImportStep::SelectViews);
        assert_eq!(ImportStep::SelectSource.back(), ImportStep::SelectSource);
    }

    #[test]
    fn empty_diagnostics_become_a_success_alert() {
        let alerts = alerts_from_diagnostics(&[]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Success);
    }

    #[test]
    fn diagnostics_become_error_alerts_in_order() {
        let diags = vec![
            Diagnostic {
                message: "first".to_string(),
                line: 1,
                column: 2,
            },
            Diagnostic {
                message: "second".to_string(),
                line: 3,
                column: 1,
            },
        ];
        let alerts = alerts_from_diagnostics(&diags);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, Severity::Error);
        assert_eq!(alerts[0].text, "line 1:2: first");
        assert_eq!(alerts[1].text, "line 3:1: second");
    }

    #[test]
    fn deriving_views_keeps_existing_drafts() {
        let mut state = AppState::default();
        state.selected_tables = vec!["users".to_string()];
        state.derive_views_from_selection();
        assert_eq!(state.views.len(), 1);
        assert_eq!(state.views[0].name, "users_view");
        assert!(state.views[0].ddl.contains("FROM users;"));

        state.views[0].ddl = "CREATE VIEW users_view AS SELECT name FROM users;".to_string();
        state.selected_tables.push("countries".to_string());
        state.derive_views_from_selection();
        assert_eq!(state.views.len(), 2);
        assert_eq!(
            state.views[0].ddl,
            "CREATE VIEW users_view AS SELECT name FROM users;"
        );
        assert_eq!(state.views[1].table, "countries");
    }

    #[test]
    fn edit_session_round_trip() {
        let mut state = AppState::default();
        state.selected_tables = vec!["users".to_string()];
        state.derive_views_from_selection();
        state.route = Route::Import(ImportStep::Review);

        state.begin_edit(0);
        assert_eq!(state.route, Route::EditView(0));
        assert!(state.editor.is_some());

        state.save_view(0, "CREATE VIEW v AS SELECT score FROM users;");
        assert_eq!(
            state.views[0].ddl,
            "CREATE VIEW v AS SELECT score FROM users;"
        );

        state.close_editor();
        assert_eq!(state.route, Route::Import(ImportStep::Review));
        assert!(state.editor.is_none());
    }

    #[test]
    fn tick_applies_validation_results() {
        let mut state = AppState::default();
        let (tx, rx) = std::sync::mpsc::channel();
        state.validation_rx = Some(rx);
        state.is_working = true;

        tx.send(Vec::new()).unwrap();
        state.tick();
        assert!(state.is_valid);
        assert!(!state.is_working);
        assert!(state.validation_rx.is_none());
        assert_eq!(state.validation_results.len(), 1);
    }

    #[test]
    fn pending_worker_keeps_its_slot_until_a_result_arrives() {
        let mut state = AppState::default();
        let (tx, rx) = std::sync::mpsc::channel();
        state.validation_rx = Some(rx);
        state.is_working = true;

        state.tick();
        assert!(state.is_working);
        assert!(state.validation_rx.is_some());

        tx.send(Vec::new()).unwrap();
        state.tick();
        assert!(!state.is_working);
    }

    #[test]
    fn dead_validation_worker_releases_the_busy_flag() {
        let mut state = AppState::default();
        let (tx, rx) = std::sync::mpsc::channel::<Vec<Diagnostic>>();
        state.validation_rx = Some(rx);
        state.is_working = true;

        drop(tx);
        state.tick();
        assert!(!state.is_working);
        assert!(state.validation_rx.is_none());
    }

    #[test]
    fn dead_creation_worker_releases_the_busy_flag_and_reports() {
        let mut state = AppState::default();
        state.route = Route::Import(ImportStep::Review);
        let (tx, rx) = std::sync::mpsc::channel::<Result<usize, String>>();
        state.create_rx = Some(rx);
        state.is_working = true;

        drop(tx);
        state.tick();
        assert!(!state.is_working);
        assert!(state.create_rx.is_none());
        assert_eq!(state.route, Route::Import(ImportStep::Review));
        assert_eq!(
            state.create_error.as_deref(),
            Some("view creation did not finish")
        );
    }

    #[test]
    fn failed_creation_surfaces_an_error_and_stays_put() {
        let mut state = AppState::default();
        state.route = Route::Import(ImportStep::Review);
        let (tx, rx) = std::sync::mpsc::channel();
        state.create_rx = Some(rx);
        state.is_working = true;

        tx.send(Err("users_view: DDL is empty".to_string())).unwrap();
        state.tick();
        assert!(!state.is_working);
        assert_eq!(state.route, Route::Import(ImportStep::Review));
        assert_eq!(
            state.create_error.as_deref(),
            Some("users_view: DDL is empty")
        );
    }
}
