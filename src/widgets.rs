use eframe::egui;

/// Severity of a feedback message shown above the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
}

/// One feedback line, typically produced from validation results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub text: String,
    pub severity: Severity,
}

impl Alert {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }
}

/// Stack of alert banners, rendered in the order given.
pub fn show_alerts(ui: &mut egui::Ui, alerts: &[Alert]) {
    for (i, alert) in alerts.iter().enumerate() {
        ui.push_id(i, |ui| {
            let (fill, stroke) = match alert.severity {
                Severity::Error => (
                    egui::Color32::from_rgb(60, 20, 20),
                    egui::Color32::from_rgb(200, 50, 50),
                ),
                Severity::Success => (
                    egui::Color32::from_rgb(20, 45, 25),
                    egui::Color32::from_rgb(50, 150, 50),
                ),
            };
            egui::Frame::none()
                .fill(fill)
                .stroke(egui::Stroke::new(1.0, stroke))
                .rounding(4.0)
                .inner_margin(egui::Margin::symmetric(8.0, 6.0))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.colored_label(egui::Color32::from_gray(230), &alert.text);
                });
        });
        ui.add_space(4.0);
    }
}

/// Button that shows a spinner next to its label while `busy` and is
/// clickable only when `enabled`.
pub fn busy_button(ui: &mut egui::Ui, label: &str, enabled: bool, busy: bool) -> egui::Response {
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let response = ui.button(label);
            if busy {
                ui.spinner();
            }
            response
        })
        .inner
    })
    .inner
}
