use std::path::PathBuf;
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::io::{self, LoadedCatalog};
use crate::layout::LayoutModel;
use crate::model::{date, Catalog, CatalogWarning};
use crate::scroll::{default_cue, Direction, ScrollController, ViewportFeedback};
use crate::ui;
use crate::ui::event_card::EventCard;

/// Main application state.
pub struct TimelineApp {
    pub config: TimelineConfig,
    pub catalog: Catalog,
    pub catalog_path: Option<PathBuf>,
    pub warnings: Vec<CatalogWarning>,
    pub layout: LayoutModel,
    pub controller: ScrollController,
    pub feedback: ViewportFeedback,

    /// Event closest to today, outlined on the strip.
    pub highlight: Option<Uuid>,
    pub card: Option<EventCard>,

    // Dialog state
    pub show_about: bool,
    pub show_warnings: bool,

    // Status message
    pub status_message: String,
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        egui_extras::install_image_loaders(&cc.egui_ctx);
        ui::theme::apply_theme(&cc.egui_ctx);

        let config = TimelineConfig::load();
        let mut app = Self {
            controller: ScrollController::new(&config, default_cue()),
            feedback: ViewportFeedback::new(config.parallax_max, config.background_fade_secs),
            config,
            catalog: Catalog::new("Timeline", Vec::new()),
            catalog_path: None,
            warnings: Vec::new(),
            layout: LayoutModel::default(),
            highlight: None,
            card: None,
            show_about: false,
            show_warnings: false,
            status_message: "Ready".to_string(),
        };
        app.load_builtin();
        app
    }

    /// Swap in a freshly loaded catalog and start over at today.
    fn set_catalog(&mut self, loaded: LoadedCatalog, path: Option<PathBuf>) {
        let LoadedCatalog { catalog, warnings } = loaded;
        self.catalog = catalog;
        self.catalog_path = path;
        self.layout.ensure(&self.catalog, &self.config);
        self.feedback.reset(&self.catalog.sections);
        // Next frame re-attaches and jumps to today.
        self.controller.detach();
        self.highlight = self
            .catalog
            .closest_event_to_today(date::today())
            .map(|event| event.id);
        self.card = None;

        self.status_message = if warnings.is_empty() {
            format!(
                "Loaded '{}': {} sections, {} events",
                self.catalog.title,
                self.catalog.sections.len(),
                self.catalog.event_count()
            )
        } else {
            format!(
                "Loaded '{}' with {} warning(s)",
                self.catalog.title,
                warnings.len()
            )
        };
        self.warnings = warnings;
    }

    // --- Catalog operations ---

    pub fn load_builtin(&mut self) {
        match io::builtin_catalog() {
            Ok(loaded) => self.set_catalog(loaded, None),
            Err(e) => {
                log::error!("built-in catalog is unusable: {}", e);
                self.status_message = format!("Error loading built-in story: {}", e);
            }
        }
    }

    pub fn open_catalog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline Catalog", &["json"])
            .pick_file()
        {
            self.load_from(path);
        }
    }

    pub fn reload_catalog(&mut self) {
        if let Some(path) = self.catalog_path.clone() {
            self.load_from(path);
        }
    }

    /// Load `path`; on failure the current catalog stays on screen.
    fn load_from(&mut self, path: PathBuf) {
        match io::load_catalog(&path) {
            Ok(loaded) => self.set_catalog(loaded, Some(path)),
            Err(e) => {
                log::warn!("could not load {}: {}", path.display(), e);
                self.status_message = format!("Error loading: {}", e);
            }
        }
    }

    // --- Navigation ---

    pub fn scroll_to_today(&mut self) {
        self.controller
            .scroll_to_today(&self.catalog.sections, date::today(), true);
    }

    pub fn jump_to_section(&mut self, index: usize) {
        if let Some(section) = self.layout.section(index) {
            self.controller.scroll_to(section.left, true);
        }
    }

    pub fn open_event(&mut self, id: Uuid) {
        if let Some(event) = self.catalog.event(id) {
            log::debug!("opening '{}'", event.title);
            self.card = Some(EventCard::new(id));
        }
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.layout.ensure(&self.catalog, &self.config);

        // Keyboard shortcuts, ignored while a card or text field has focus
        if self.card.is_none() && ctx.memory(|m| m.focused().is_none()) {
            let (today, left, right) = ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::T),
                    i.key_pressed(egui::Key::ArrowLeft),
                    i.key_pressed(egui::Key::ArrowRight),
                )
            });
            if today {
                self.scroll_to_today();
            }
            if left {
                self.controller.navigate(Direction::Left);
            }
            if right {
                self.controller.navigate(Direction::Right);
            }
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_DARK)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    if !self.warnings.is_empty()
                        && ui
                            .small_button(format!("{} warnings", self.warnings.len()))
                            .clicked()
                    {
                        self.show_warnings = true;
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let active = self
                            .catalog
                            .sections
                            .get(self.feedback.active_section())
                            .map(|s| s.title.as_str())
                            .unwrap_or("-");
                        ui.label(
                            egui::RichText::new(format!(
                                "Sections: {} · Events: {} · {}",
                                self.catalog.sections.len(),
                                self.catalog.event_count(),
                                active
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Bottom panel: the timeline strip, tall enough for the visible lanes
        // Taller tracks scroll on their own.
        let strip_height = ui::theme::SECTION_HEADER_HEIGHT
            + crate::layout::geometry::track_height(0, &self.config);
        let mut timeline = ui::timeline_view::TimelineOutput::default();
        egui::TopBottomPanel::bottom("timeline")
            .exact_height(strip_height)
            .frame(egui::Frame::none().fill(ui::theme::BG_TRACK))
            .show(ctx, |ui| {
                timeline = ui::timeline_view::show_timeline(
                    ui,
                    &self.catalog,
                    &self.layout,
                    &mut self.controller,
                    &self.config,
                    self.highlight,
                    date::today(),
                );
            });

        let now = ctx.input(|i| i.time);
        if let Some(update) = &timeline.update {
            self.feedback.on_scroll(update, &self.catalog.sections, now);
        }
        if let Some(id) = timeline.selected {
            self.open_event(id);
        }

        // Central panel: backdrop
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui::background::show_background(
                    ui,
                    &self.feedback,
                    self.catalog.main_background.as_deref(),
                    self.config.parallax_max,
                );
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.label(
                        egui::RichText::new(&self.catalog.title)
                            .size(40.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    if !self.catalog.subtitle.is_empty() {
                        ui.label(
                            egui::RichText::new(&self.catalog.subtitle)
                                .size(18.0)
                                .color(ui::theme::TEXT_SECONDARY),
                        );
                    }
                });
            });

        // Event card
        if let Some(card) = self.card.as_mut() {
            let keep = match self.catalog.event(card.event_id) {
                Some(event) => ui::event_card::show_event_card(card, event, ctx),
                None => false,
            };
            if !keep {
                self.card = None;
            }
        }

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_warnings {
            ui::dialogs::show_warnings_dialog(self, ctx);
        }
    }
}
