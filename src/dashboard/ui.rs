//! egui renderer for the loan prediction dashboard.

mod plots;
mod style;

use eframe::egui::{self, ComboBox, Grid, RichText, ScrollArea, Slider, SliderClamping, Ui};

use crate::input::WidgetKind;
use crate::pipeline::CLASS_NAMES;
use crate::report::HISTOGRAM_COLUMNS;

use super::DashboardController;

/// Smallest window size that still fits the sidebar next to the report.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

const SIDEBAR_WIDTH: f32 = 300.0;

/// Renders the dashboard around a [`DashboardController`].
pub struct DashboardApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl DashboardApp {
    pub fn new(controller: DashboardController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("user_inputs")
            .resizable(false)
            .exact_width(SIDEBAR_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading("User Input Parameters");
                ui.add_space(6.0);
                let mut inputs = self.controller.draft_inputs().clone();
                let mut dragging = false;
                ScrollArea::vertical()
                    .id_salt("user_inputs_scroll")
                    .show(ui, |ui| {
                        for (spec, value) in inputs.iter_mut() {
                            ui.label(spec.label);
                            match spec.kind {
                                WidgetKind::Slider => {
                                    let response = ui.add(
                                        Slider::new(value, spec.min..=spec.max)
                                            .clamping(SliderClamping::Always),
                                    );
                                    dragging |= response.dragged();
                                }
                                WidgetKind::Choice => {
                                    ui.horizontal(|ui| {
                                        ui.radio_value(value, 0, "0");
                                        ui.radio_value(value, 1, "1");
                                    });
                                }
                            }
                            ui.add_space(4.0);
                        }
                        ui.separator();
                        let mut extended = self.controller.extended_report();
                        if ui.checkbox(&mut extended, "Extended report").changed() {
                            self.controller.set_extended_report(extended);
                        }
                    });
                self.controller.edit_inputs(inputs, dragging);
            });
    }

    fn render_main(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .id_salt("dashboard_scroll")
                .show(ui, |ui| {
                    ui.heading("Loan Prediction Dataset");
                    ui.add_space(8.0);
                    self.render_feature_row(ui);
                    ui.add_space(12.0);
                    self.render_prediction(ui);
                    if self.controller.extended_report() {
                        ui.add_space(16.0);
                        self.render_report(ui);
                    }
                });
        });
    }

    fn render_feature_row(&self, ui: &mut Ui) {
        ui.label(RichText::new("User Input parameters").strong());
        let row = self.controller.feature_row();
        ScrollArea::horizontal()
            .id_salt("feature_row_scroll")
            .show(ui, |ui| {
                Grid::new("feature_row")
                    .striped(true)
                    .spacing([14.0, 4.0])
                    .show(ui, |ui| {
                        for (name, _) in row.iter() {
                            ui.label(RichText::new(name).small());
                        }
                        ui.end_row();
                        for (_, value) in row.iter() {
                            ui.monospace(format!("{value:.0}"));
                        }
                        ui.end_row();
                    });
            });
    }

    fn render_prediction(&self, ui: &mut Ui) {
        let palette = style::palette();
        match self.controller.outcome() {
            None => {
                ui.spinner();
            }
            Some(Err(message)) => {
                ui.label(RichText::new("Prediction failed").color(palette.warning).strong());
                ui.label(message);
            }
            Some(Ok(prediction)) => {
                ui.heading("Prediction");
                ui.label(
                    RichText::new(format!("{} ({})", prediction.label, prediction.label_name()))
                        .size(18.0)
                        .color(style::label_color(usize::from(prediction.label))),
                );
                ui.add_space(8.0);
                ui.heading("Prediction Probability");
                Grid::new("prediction_probability")
                    .spacing([18.0, 4.0])
                    .show(ui, |ui| {
                        for (label, name) in CLASS_NAMES.iter().enumerate() {
                            ui.label(format!("{label} ({name})"));
                            ui.add(
                                egui::ProgressBar::new(prediction.probabilities[label] as f32)
                                    .desired_width(220.0)
                                    .fill(style::label_color(label))
                                    .text(format!("{:.3}", prediction.probabilities[label])),
                            );
                            ui.end_row();
                        }
                    });
            }
        }
    }

    fn render_report(&mut self, ui: &mut Ui) {
        ui.heading("Correlation Heatmap");
        match self.controller.correlation() {
            Some(matrix) => plots::render_heatmap(ui, matrix),
            None => {
                ui.spinner();
            }
        }
        ui.add_space(16.0);

        ui.heading("Histogram by Loan Status");
        let mut selected = self.controller.histogram_column().to_string();
        ComboBox::from_id_salt("histogram_column")
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for column in HISTOGRAM_COLUMNS {
                    ui.selectable_value(&mut selected, column.to_string(), column);
                }
            });
        if selected != self.controller.histogram_column() {
            self.controller.set_histogram_column(&selected);
            return;
        }
        match self.controller.histogram() {
            Some(Ok(histogram)) => plots::render_histogram(ui, histogram),
            Some(Err(message)) => {
                ui.colored_label(style::palette().warning, message);
            }
            None => {
                ui.spinner();
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.refresh();
        self.render_sidebar(ctx);
        self.render_main(ctx);
        if self.controller.needs_refresh() {
            ctx.request_repaint();
        }
    }
}

/// Minimal fallback app to display startup errors.
pub struct LaunchError {
    message: String,
}

impl LaunchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Loan Prediction Dataset");
                ui.add_space(12.0);
                ui.label(RichText::new("Failed to load the dataset").strong());
                ui.label(&self.message);
            });
        });
    }
}
