use eframe::egui;

use crate::widgets;

pub const NEXT_LABEL: &str = "Next »";
pub const DONE_LABEL: &str = "Done";
pub const BACK_LABEL: &str = "« Back";
pub const CANCEL_LABEL: &str = "Cancel";

/// Label of the primary footer button: "Done" on the last step.
pub fn next_label(is_last_step: bool) -> &'static str {
    if is_last_step {
        DONE_LABEL
    } else {
        NEXT_LABEL
    }
}

/// The primary button is clickable only when it is neither loading nor
/// explicitly disabled by the current step.
pub fn next_enabled(is_loading: bool, is_disabled: bool) -> bool {
    !is_loading && !is_disabled
}

/// A footer action that is either a programmatic callback or a navigation
/// target. When both are set the callback wins and no navigation happens.
pub struct ButtonLink<'a, R: Clone> {
    pub label: &'a str,
    pub enabled: bool,
    pub on_click: Option<&'a mut dyn FnMut()>,
    pub href: Option<R>,
}

impl<'a, R: Clone> ButtonLink<'a, R> {
    pub fn to(label: &'a str, href: R) -> Self {
        Self {
            label,
            enabled: true,
            on_click: None,
            href: Some(href),
        }
    }

    pub fn action(label: &'a str, on_click: &'a mut dyn FnMut()) -> Self {
        Self {
            label,
            enabled: true,
            on_click: Some(on_click),
            href: None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.on_click.is_some() || self.href.is_some()
    }

    /// Run the link. Returns the navigation target only when no callback
    /// is attached.
    pub fn activate(&mut self) -> Option<R> {
        if let Some(cb) = self.on_click.as_mut() {
            cb();
            None
        } else {
            self.href.clone()
        }
    }
}

/// Stateless chrome around one wizard step: a header, the step's own
/// content in an independently scrolling region, and the Back / Next /
/// Cancel footer. Which step is current, and what Next does, is entirely
/// the caller's business.
///
/// Loading gates only the primary button; Back and Cancel follow their
/// own link state. Every footer slot is a [`ButtonLink`] in spirit: a
/// callback when one is attached, a navigation target otherwise.
pub struct WizardShell<'a, R: Clone> {
    pub title: &'a str,
    pub is_last_step: bool,
    pub is_next_loading: bool,
    pub is_next_disabled: bool,
    pub back: Option<ButtonLink<'a, R>>,
    pub cancel: ButtonLink<'a, R>,
    pub on_next: Option<&'a mut dyn FnMut()>,
    pub on_create_views: Option<&'a mut dyn FnMut()>,
    pub next_href: Option<R>,
}

impl<'a, R: Clone> WizardShell<'a, R> {
    /// Run the primary action: the creation callback on the last step,
    /// the step-advance callback otherwise, falling back to `next_href`
    /// when no callback is attached for the chosen branch.
    pub fn activate_next(&mut self) -> Option<R> {
        let handler = if self.is_last_step {
            self.on_create_views.as_mut()
        } else {
            self.on_next.as_mut()
        };
        if let Some(cb) = handler {
            cb();
            None
        } else {
            self.next_href.clone()
        }
    }

    /// Render the shell around `content`. Returns a navigation request when
    /// a footer link without a callback was clicked.
    pub fn show(
        mut self,
        ui: &mut egui::Ui,
        content: impl FnOnce(&mut egui::Ui),
    ) -> Option<R> {
        let mut nav: Option<R> = None;

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            // Footer sits at the bottom regardless of content height.
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if let Some(mut back) = self.back.take() {
                    if ui
                        .add_enabled(back.enabled, egui::Button::new(back.label))
                        .clicked()
                    {
                        nav = back.activate();
                    }
                }

                let label = next_label(self.is_last_step);
                let enabled = next_enabled(self.is_next_loading, self.is_next_disabled);
                if widgets::busy_button(ui, label, enabled, self.is_next_loading).clicked() {
                    nav = self.activate_next();
                }

                if ui
                    .add_enabled(self.cancel.enabled, egui::Button::new(self.cancel.label))
                    .clicked()
                {
                    nav = self.cancel.activate();
                }
            });
            ui.separator();

            ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                ui.heading(self.title);
                ui.separator();

                // The step content scrolls on its own between header and footer.
                egui::ScrollArea::vertical()
                    .id_source("wizard_step_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        content(ui);
                    });
            });
        });

        nav
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_step_switches_the_primary_label() {
        assert_eq!(next_label(false), "Next »");
        assert_eq!(next_label(true), "Done");
    }

    #[test]
    fn primary_button_gate() {
        assert!(next_enabled(false, false));
        assert!(!next_enabled(true, false));
        assert!(!next_enabled(false, true));
        assert!(!next_enabled(true, true));
    }

    #[test]
    fn callback_takes_precedence_over_navigation() {
        let mut clicks = 0usize;
        let mut cb = || clicks += 1;
        let mut link: ButtonLink<'_, u32> = ButtonLink::action("Back", &mut cb);
        link.href = Some(7);
        assert!(link.is_actionable());
        assert_eq!(link.activate(), None);
        drop(link);
        assert_eq!(clicks, 1);
    }

    fn shell<'a>(
        is_last_step: bool,
        on_next: Option<&'a mut dyn FnMut()>,
        on_create_views: Option<&'a mut dyn FnMut()>,
        next_href: Option<u32>,
    ) -> WizardShell<'a, u32> {
        WizardShell {
            title: "step",
            is_last_step,
            is_next_loading: false,
            is_next_disabled: false,
            back: None,
            cancel: ButtonLink::to("Cancel", 0),
            on_next,
            on_create_views,
            next_href,
        }
    }

    #[test]
    fn last_step_routes_next_to_the_creation_callback() {
        let mut nexts = 0usize;
        let mut creates = 0usize;
        {
            let mut on_next = || nexts += 1;
            let mut on_create = || creates += 1;
            let mut s = shell(true, Some(&mut on_next), Some(&mut on_create), None);
            assert_eq!(s.activate_next(), None);
        }
        assert_eq!((nexts, creates), (0, 1));

        let mut nexts = 0usize;
        let mut creates = 0usize;
        {
            let mut on_next = || nexts += 1;
            let mut on_create = || creates += 1;
            let mut s = shell(false, Some(&mut on_next), Some(&mut on_create), None);
            assert_eq!(s.activate_next(), None);
        }
        assert_eq!((nexts, creates), (1, 0));
    }

    #[test]
    fn next_callback_takes_precedence_over_its_href() {
        let mut nexts = 0usize;
        {
            let mut on_next = || nexts += 1;
            let mut s = shell(false, Some(&mut on_next), None, Some(9));
            assert_eq!(s.activate_next(), None);
        }
        assert_eq!(nexts, 1);
    }

    #[test]
    fn next_falls_back_to_its_href_without_a_callback() {
        let mut s = shell(false, None, None, Some(9));
        assert_eq!(s.activate_next(), Some(9));

        // The last step picks the creation callback slot; absent that,
        // the href still wins over a step-advance callback it must not run.
        let mut nexts = 0usize;
        {
            let mut on_next = || nexts += 1;
            let mut s = shell(true, Some(&mut on_next), None, Some(4));
            assert_eq!(s.activate_next(), Some(4));
        }
        assert_eq!(nexts, 0);
    }

    #[test]
    fn loading_gates_only_the_primary_button() {
        assert!(!next_enabled(true, false));
        // Back and Cancel enables come solely from their link; the link
        // type has no loading input to disable them with.
        let link: ButtonLink<'_, u32> = ButtonLink::to("Back", 1);
        assert!(link.enabled);
    }

    #[test]
    fn navigation_link_returns_its_target() {
        let mut link: ButtonLink<'_, u32> = ButtonLink::to("Cancel", 3);
        assert!(link.is_actionable());
        assert_eq!(link.activate(), Some(3));

        let bare: ButtonLink<'_, u32> = ButtonLink {
            label: "Back",
            enabled: true,
            on_click: None,
            href: None,
        };
        assert!(!bare.is_actionable());
    }
}
