use super::HudAction;
use crate::progression::Session;

/// Side panel walking through the session's steps.
pub fn experiment_panel(ctx: &egui::Context, session: &Session) -> Option<HudAction> {
    let mut action = None;
    let experiment = session.experiment();
    let step = session.current_step();

    egui::SidePanel::right("experiment_panel")
        .default_width(340.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("← Back").clicked() {
                    action = Some(HudAction::Back);
                }
                ui.heading(&experiment.title);
            });
            ui.small(format!("{} · {}", experiment.difficulty.label(), experiment.duration));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing("Materials", |ui| {
                    for material in &experiment.materials {
                        ui.label(format!("• {material}"));
                    }
                });

                let (done, total) = session.progress();
                ui.add(
                    egui::ProgressBar::new(done as f32 / total.max(1) as f32)
                        .text(format!("{done} of {total} steps done")),
                );
                ui.add_space(6.0);

                ui.label(
                    egui::RichText::new(format!("Step {} of {}", session.step_number(), total)).strong(),
                );
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(step.glyph()).size(28.0));
                    ui.label(&step.instruction);
                });

                if session.is_animating() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("In progress…");
                    });
                } else if session.show_visual() {
                    if let Some(observation) = &step.observation {
                        ui.colored_label(egui::Color32::LIGHT_BLUE, observation);
                    }
                    if let Some(visual) = &step.visual {
                        ui.label(egui::RichText::new(format!("{} → {}", visual.before, visual.after)).size(24.0));
                    }
                } else {
                    let label = match step.action_kind() {
                        Some(kind) => format!("{} {}", kind.glyph(), kind.label()),
                        None => "Perform Action".to_string(),
                    };
                    if ui.button(label).clicked() {
                        action = Some(HudAction::PerformAction);
                    }
                }

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!session.is_first_step(), egui::Button::new("Previous"))
                        .clicked()
                    {
                        action = Some(HudAction::PrevStep);
                    }
                    if ui
                        .add_enabled(!session.is_last_step(), egui::Button::new("Next"))
                        .clicked()
                    {
                        action = Some(HudAction::NextStep);
                    }
                });

                if session.all_complete() {
                    ui.separator();
                    ui.label(egui::RichText::new("🎉 Experiment complete!").strong().size(18.0));
                    if ui.button("Try Again").clicked() {
                        action = Some(HudAction::TryAgain);
                    }
                }

                ui.separator();
                ui.label(egui::RichText::new("Fun fact").strong());
                ui.label(&experiment.fun_fact);

                ui.add_space(4.0);
                ui.label(egui::RichText::new("Safety tips").strong());
                for tip in &experiment.safety_tips {
                    ui.label(format!("⚠ {tip}"));
                }
            });
        });

    action
}
