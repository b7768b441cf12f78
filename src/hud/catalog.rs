use super::HudAction;
use crate::catalog::{Catalog, CatalogFilter, Difficulty, Experiment, CATEGORIES};

/// Search box, facet pickers and the filtered experiment list.
#[derive(Debug, Clone, Default)]
pub struct CatalogBrowser {
    search: String,
    category: usize,
    difficulty: Option<Difficulty>,
}

impl CatalogBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter::new()
            .search(self.search.trim())
            .category(CATEGORIES[self.category])
            .difficulty(self.difficulty)
    }

    pub fn show(&mut self, ctx: &egui::Context, catalog: &Catalog) -> Option<HudAction> {
        let mut action = None;

        egui::TopBottomPanel::top("catalog_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Virtual Science Lab");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🎮 3D Game Mode").clicked() {
                        action = Some(HudAction::EnterGame);
                    }
                });
            });

            ui.horizontal(|ui| {
                ui.label("Search:");
                ui.text_edit_singleline(&mut self.search);

                egui::ComboBox::from_label("Category")
                    .selected_text(CATEGORIES[self.category])
                    .show_ui(ui, |ui| {
                        for (i, name) in CATEGORIES.iter().enumerate() {
                            ui.selectable_value(&mut self.category, i, *name);
                        }
                    });

                egui::ComboBox::from_label("Difficulty")
                    .selected_text(self.difficulty.map_or("All", Difficulty::label))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.difficulty, None, "All");
                        for d in Difficulty::ALL {
                            ui.selectable_value(&mut self.difficulty, Some(d), d.label());
                        }
                    });
            });
        });

        let filter = self.filter();
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut shown = 0;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for experiment in catalog.filter(&filter) {
                    shown += 1;
                    if experiment_card(ui, experiment) {
                        action = Some(HudAction::Open(experiment.id.clone()));
                    }
                }
            });
            if shown == 0 {
                ui.label("No experiments match your search.");
            }
        });

        action
    }
}

fn experiment_card(ui: &mut egui::Ui, experiment: &Experiment) -> bool {
    let mut open = false;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&experiment.title).strong().size(16.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                open = ui.button("Start").clicked();
            });
        });
        ui.label(&experiment.description);
        ui.horizontal(|ui| {
            ui.small(&experiment.category);
            ui.small("·");
            ui.small(experiment.difficulty.label());
            ui.small("·");
            ui.small(&experiment.duration);
            ui.small("·");
            ui.small(format!("{} steps", experiment.steps.len()));
        });
    });
    open
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_browser_filters_nothing() {
        assert!(CatalogBrowser::new().filter().is_empty());
    }

    #[test]
    fn facets_map_onto_the_filter() {
        let browser = CatalogBrowser {
            search: "  volcano ".into(),
            category: 1,
            difficulty: Some(Difficulty::Easy),
        };
        let filter = browser.filter();
        assert_eq!(filter.search, "volcano");
        assert_eq!(filter.category.as_deref(), Some("Chemistry"));
        assert_eq!(filter.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn renders_headless_without_action() {
        let catalog = Catalog::builtin().unwrap();
        let mut browser = CatalogBrowser::new();
        let ctx = egui::Context::default();
        let mut action = Some(HudAction::Back);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = browser.show(ctx, &catalog);
        });
        assert_eq!(action, None);
    }
}
