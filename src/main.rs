mod app_state;
mod ddl;
mod ddl_editor;
mod ui;
mod widgets;
mod wizard;

use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };
    let _ = eframe::run_native(
        "VirtView UI",
        native_options,
        Box::new(|_cc| Box::new(ui::create_app())),
    );
    Ok(())
}
