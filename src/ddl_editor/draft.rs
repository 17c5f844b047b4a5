/// Edit-session state for the DDL editor panel.
///
/// Keeps the locally edited buffer together with the two flags that gate the
/// Save action: whether the buffer was ever modified (`dirty`), and whether it
/// was modified since the last validation request (`needs_validation`).
/// The type is deliberately UI-free so the transitions can be unit tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftState {
    initial: String,
    value: String,
    dirty: bool,
    needs_validation: bool,
}

impl DraftState {
    /// Seed the draft from the externally supplied DDL. The seed is kept
    /// around unchanged so the editor widget can be initialized from it.
    pub fn new(ddl: impl Into<String>) -> Self {
        let ddl = ddl.into();
        Self {
            value: ddl.clone(),
            initial: ddl,
            dirty: false,
            needs_validation: false,
        }
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Mutable access for the `TextEdit` widget. Callers must invoke
    /// [`DraftState::notify_edit`] when the widget reports a change.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn needs_validation(&self) -> bool {
        self.needs_validation
    }

    /// Record that the buffer content changed. Does not validate anything;
    /// it only marks the draft dirty and its validation results stale.
    pub fn notify_edit(&mut self) {
        self.dirty = true;
        self.needs_validation = true;
    }

    /// Replace the buffer content and record the edit in one step.
    pub fn apply_edit(&mut self, text: impl Into<String>) {
        self.value = text.into();
        self.notify_edit();
    }

    /// Record that validation was requested for the current buffer content.
    /// `dirty` is left untouched.
    pub fn mark_validated(&mut self) {
        self.needs_validation = false;
    }

    /// Validation may be requested at any time the parent is idle, even for
    /// an unchanged draft (re-validating identical content is allowed).
    pub fn can_validate(&self, is_working: bool) -> bool {
        !is_working
    }

    pub fn can_save(&self, is_valid: bool, is_working: bool) -> bool {
        save_enabled(is_working, is_valid, self.dirty, self.needs_validation)
    }
}

/// The Save gate: the draft must have been edited, validated since the last
/// edit, reported valid by the parent, and the parent must be idle.
pub fn save_enabled(is_working: bool, is_valid: bool, dirty: bool, needs_validation: bool) -> bool {
    !is_working && is_valid && dirty && !needs_validation
}
