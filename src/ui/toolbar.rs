use crate::app::TimelineApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular;

/// Render the top menu bar with the catalog title on the right.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Catalog...").clicked() {
                app.open_catalog();
                ui.close_menu();
            }
            if ui
                .add_enabled(app.catalog_path.is_some(), egui::Button::new("  Reload"))
                .clicked()
            {
                app.reload_catalog();
                ui.close_menu();
            }
            if ui.button("  Built-in Story").clicked() {
                app.load_builtin();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Scroll to Today        T").clicked() {
                app.scroll_to_today();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Jump to Section").small().weak());
            let titles: Vec<String> = app.catalog.sections.iter().map(|s| s.title.clone()).collect();
            for (index, title) in titles.iter().enumerate() {
                let current = app.feedback.active_section() == index;
                if ui.radio(current, title.as_str()).clicked() {
                    app.jump_to_section(index);
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(format!("{} Today", regular::CALENDAR_BLANK))
                .on_hover_text("Scroll to today")
                .clicked()
            {
                app.scroll_to_today();
            }
            ui.separator();
            if !app.catalog.subtitle.is_empty() {
                ui.label(
                    RichText::new(&app.catalog.subtitle)
                        .size(11.0)
                        .color(theme::TEXT_SECONDARY),
                );
            }
            ui.label(RichText::new(&app.catalog.title).strong().color(theme::ACCENT));
        });
    });
}
