//! Doughnut chart drawn with the egui painter.

use crate::theme::Theme;
use chatstats::view::{ChartBackend, ChartData, ChartSink};
use eframe::egui::{self, Pos2, RichText, Stroke};
use std::f32::consts::TAU;

const OUTER_RADIUS: f32 = 64.0;
/// Hole size as a fraction of the outer radius.
const CUTOUT: f32 = 0.6;
const ARC_STEP: f32 = 0.05;

pub struct DonutChart {
    ctx: egui::Context,
    pending: ChartData,
    shown: ChartData,
}

impl DonutChart {
    fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            pending: ChartData::default(),
            shown: ChartData::default(),
        }
    }

    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) {
        let size = egui::vec2(OUTER_RADIUS * 2.0, OUTER_RADIUS * 2.0);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let inner = OUTER_RADIUS * CUTOUT;
        let width = OUTER_RADIUS - inner;
        let mid = inner + width / 2.0;

        let total = self.shown.total();
        if total == 0 {
            painter.circle_stroke(center, mid, Stroke::new(width, theme.surface_3));
        } else {
            let mut start = -TAU / 4.0;
            for (index, value) in self.shown.values.iter().enumerate() {
                let sweep = TAU * (*value as f32) / (total as f32);
                if sweep > 0.0 {
                    let points = arc_points(center, mid, start, sweep);
                    painter.add(egui::Shape::line(
                        points,
                        Stroke::new(width, Theme::segment_color(index)),
                    ));
                }
                start += sweep;
            }
        }

        for index in 0..self.shown.labels.len() {
            let Some(line) = self.shown.describe(index) else {
                continue;
            };
            ui.horizontal(|ui| {
                let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(dot.center(), 5.0, Theme::segment_color(index));
                ui.label(RichText::new(line).small().color(theme.text_muted));
            });
        }
    }
}

fn arc_points(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Pos2> {
    let steps = ((sweep / ARC_STEP).ceil() as usize).max(2);
    (0..=steps)
        .map(|step| {
            let angle = start + sweep * step as f32 / steps as f32;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect()
}

impl ChartSink for DonutChart {
    fn set_data(&mut self, labels: Vec<String>, values: Vec<u32>) {
        self.pending = ChartData { labels, values };
    }

    fn redraw(&mut self) {
        self.shown = self.pending.clone();
        self.ctx.request_repaint();
    }
}

pub struct DonutBackend {
    ctx: egui::Context,
    enabled: bool,
}

impl DonutBackend {
    pub fn new(ctx: egui::Context, enabled: bool) -> Self {
        Self { ctx, enabled }
    }
}

impl ChartBackend for DonutBackend {
    type Sink = DonutChart;

    fn create(&mut self) -> Option<DonutChart> {
        self.enabled.then(|| DonutChart::new(self.ctx.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_points_span_the_sweep() {
        let center = Pos2::new(0.0, 0.0);
        let points = arc_points(center, 10.0, 0.0, TAU / 4.0);
        assert!(points.len() >= 3);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - 10.0).abs() < 1e-3 && first.y.abs() < 1e-3);
        assert!(last.x.abs() < 1e-3 && (last.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn data_is_shown_only_after_redraw() {
        let mut chart = DonutChart::new(egui::Context::default());
        chart.set_data(vec!["Alice".into()], vec![2]);
        assert_eq!(chart.shown, ChartData::default());
        chart.redraw();
        assert_eq!(chart.shown.labels, ["Alice"]);
    }

    #[test]
    fn disabled_backend_creates_nothing() {
        let mut backend = DonutBackend::new(egui::Context::default(), false);
        assert!(backend.create().is_none());
        let mut backend = DonutBackend::new(egui::Context::default(), true);
        assert!(backend.create().is_some());
    }
}
