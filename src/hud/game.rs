use super::HudAction;
use crate::view::RoomView;
use std::time::Duration;

/// Instruction banner shown when the room opens and hidden after a delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Banner {
    shown_for: Duration,
    lifetime: Duration,
}

impl Default for Banner {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Banner {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            shown_for: Duration::ZERO,
            lifetime,
        }
    }

    pub fn tick(&mut self, elapsed: Duration) {
        self.shown_for = self.shown_for.saturating_add(elapsed);
    }

    pub fn is_visible(&self) -> bool {
        self.shown_for < self.lifetime
    }
}

pub fn game_hud(ctx: &egui::Context, room: &RoomView, banner: &Banner) -> Option<HudAction> {
    let mut action = None;

    if banner.is_visible() {
        egui::Area::new(egui::Id::new("game_banner"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 16.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new("Walk to the lab table to start an experiment").strong());
                    ui.label("W A S D to move, drag to turn");
                });
            });
    }

    egui::Window::new("Lab")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            let experiment = room.selected();
            ui.label(egui::RichText::new(&experiment.title).strong());
            ui.small(format!(
                "{} of {}",
                room.selected_index() + 1,
                room.experiments().len()
            ));
            ui.label(&experiment.description);
            ui.small(format!(
                "{} · {} · {}",
                experiment.category, experiment.difficulty, experiment.duration
            ));
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("← Q").clicked() {
                    action = Some(HudAction::SelectPrev);
                }
                if ui.button("R →").clicked() {
                    action = Some(HudAction::SelectNext);
                }
            });
            if room.in_reach() {
                ui.colored_label(egui::Color32::LIGHT_GREEN, "E  start experiment");
            } else {
                ui.weak("E  start experiment (get closer to the table)");
            }
            ui.separator();
            if ui.button("Exit Game").clicked() {
                action = Some(HudAction::ExitGame);
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::view::RoomOptions;

    #[test]
    fn hud_renders_headless_without_acting() {
        let experiments = Catalog::builtin().unwrap().experiments().to_vec();
        let room = RoomView::new(experiments, RoomOptions::default(), |_| {});
        let ctx = egui::Context::default();

        for banner in [Banner::default(), Banner::new(Duration::ZERO)] {
            let mut action = Some(HudAction::ExitGame);
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                action = game_hud(ctx, &room, &banner);
            });
            assert_eq!(action, None);
        }
    }

    #[test]
    fn banner_hides_after_its_lifetime() {
        let mut banner = Banner::default();
        assert!(banner.is_visible());
        banner.tick(Duration::from_millis(4999));
        assert!(banner.is_visible());
        banner.tick(Duration::from_millis(1));
        assert!(!banner.is_visible());
    }
}
