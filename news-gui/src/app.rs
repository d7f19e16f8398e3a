use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Color32, Stroke};
use news_core::{AppConfig, AppState, FetchHandle, SearchState, ThemeConfig};
use tokio::runtime::Runtime;
use tracing::{info, warn};

pub struct AppInit {
    pub runtime: Arc<Runtime>,
    pub state: Arc<AppState>,
    pub fetch: Option<FetchHandle>,
    pub config: AppConfig,
}

pub struct NewsApp {
    runtime: Arc<Runtime>,
    state: Arc<AppState>,
    fetch: Option<FetchHandle>,
    config: AppConfig,
    search: SearchState,
}

impl NewsApp {
    pub fn new(ctx: &egui::Context, init: AppInit) -> Self {
        apply_theme(ctx, &init.config.theme);
        Self {
            runtime: init.runtime,
            state: init.state,
            fetch: init.fetch,
            config: init.config,
            search: SearchState::new(),
        }
    }

    fn draw_titles(&mut self, ui: &mut egui::Ui) {
        if !self.state.is_ready() {
            ui.label("No news available.");
            return;
        }
        ui.label(egui::RichText::new("News Titles:").strong());
        let selected = self.state.selected();
        egui::ScrollArea::vertical()
            .id_source("news_titles")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, title) in self.state.list_titles().into_iter().enumerate() {
                    ui.push_id(("news", index), |ui| {
                        let is_selected = selected.as_deref() == Some(title.as_str());
                        if ui.selectable_label(is_selected, title.as_str()).clicked() {
                            self.state.select(&title);
                        }
                    });
                }
            });
    }

    fn draw_details(&mut self, ui: &mut egui::Ui) {
        let Some((title, details)) = self.state.selected_details() else {
            return;
        };
        ui.label(egui::RichText::new("Details:").strong());
        ui.label(egui::RichText::new(title.as_str()).heading());
        ui.label(details);
        ui.add_space(6.0);

        if self.state.is_favorite(&title) {
            ui.label(egui::RichText::new("In favorites").weak());
        } else if ui.button("Add to Favorites").clicked() {
            if let Err(err) = self.state.toggle_favorite(&title) {
                warn!(%err, "cannot add favorite");
            }
        }
    }

    fn draw_search(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search.query).hint_text("Filter titles"),
            );
            if response.changed() {
                self.search.on_input();
            }
        });

        if !self.search.is_active() {
            return;
        }
        ui.label(egui::RichText::new("Search Results:").strong());
        let selected = self.state.selected();
        let mut picked = None;
        for (index, title) in self.search.results(&self.state).into_iter().enumerate() {
            ui.push_id(("search", index), |ui| {
                let is_selected = selected.as_deref() == Some(title.as_str());
                if ui.selectable_label(is_selected, title.as_str()).clicked() {
                    picked = Some(title.clone());
                }
            });
            if picked.is_some() {
                break;
            }
        }
        if let Some(title) = picked {
            self.search.pick(&title, &self.state);
        }
    }

    fn draw_favorites(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Favorites:").strong());
        let favorites = self.state.favorites();
        if favorites.is_empty() {
            ui.label(egui::RichText::new("No favorites yet.").weak());
            return;
        }
        let selected = self.state.selected();
        let mut to_remove = None;
        for (index, title) in favorites.iter().enumerate() {
            ui.push_id(("favorite", index), |ui| {
                ui.horizontal(|ui| {
                    let is_selected = selected.as_deref() == Some(title.as_str());
                    if ui.selectable_label(is_selected, title.as_str()).clicked() {
                        self.state.select(title);
                    }
                    if ui.small_button("Remove").clicked() {
                        to_remove = Some(title.clone());
                    }
                });
            });
        }
        // Removal happens after the loop so the list drawn this frame stays intact.
        if let Some(title) = to_remove {
            self.state.remove_favorite(&title);
        }
    }
}

fn apply_theme(ctx: &egui::Context, theme: &ThemeConfig) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = theme.panel_color32();
    visuals.window_fill = theme.background_color32();
    visuals.extreme_bg_color = theme.background_color32();
    visuals.override_text_color = Some(theme.text_color32());
    visuals.selection.bg_fill = theme.accent_color32();
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = theme.accent_color32();
    ctx.set_visuals(visuals);
}

impl Drop for NewsApp {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch.take() {
            match self.runtime.block_on(handle.stop()) {
                Ok(outcome) => info!(?outcome, "fetch worker stopped"),
                Err(err) => warn!(%err, "fetch worker ended abnormally"),
            }
        }
        self.state.shutdown();
    }
}

impl eframe::App for NewsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.state.is_ready() && self.fetch.as_ref().is_some_and(|h| !h.is_finished()) {
            ctx.request_repaint_after(Duration::from_millis(self.config.ui.repaint_interval_ms));
        }

        egui::SidePanel::left("titles_panel")
            .resizable(true)
            .default_width(self.config.ui.list_panel_width)
            .show(ctx, |ui| {
                ui.heading("News Viewer");
                ui.separator();
                self.draw_titles(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("main_content")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.draw_details(ui);
                    ui.separator();
                    self.draw_search(ui);
                    ui.separator();
                    self.draw_favorites(ui);
                });
        });
    }
}
