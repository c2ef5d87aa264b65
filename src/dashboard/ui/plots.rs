use eframe::egui::{Align2, FontId, Rect, Sense, Stroke, StrokeKind, Ui, pos2, vec2};

use crate::pipeline::CLASS_NAMES;
use crate::report::{CorrelationMatrix, LabelHistogram};

use super::style;

const HEATMAP_LABEL_WIDTH: f32 = 170.0;
const HEATMAP_MIN_CELL: f32 = 34.0;
const HISTOGRAM_HEIGHT: f32 = 240.0;

/// Annotated correlation grid, row labels left and column indices on top.
pub(super) fn render_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    if n == 0 {
        ui.label("No columns to correlate.");
        return;
    }
    let available = ui.available_width() - HEATMAP_LABEL_WIDTH;
    let cell = (available / n as f32).max(HEATMAP_MIN_CELL);
    let header = 18.0;
    let size = vec2(HEATMAP_LABEL_WIDTH + cell * n as f32, header + cell * n as f32);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let palette = style::palette();
    let font = FontId::proportional(11.0);
    let grid_min = pos2(rect.min.x + HEATMAP_LABEL_WIDTH, rect.min.y + header);

    for col in 0..n {
        painter.text(
            pos2(grid_min.x + (col as f32 + 0.5) * cell, rect.min.y + header * 0.5),
            Align2::CENTER_CENTER,
            col.to_string(),
            font.clone(),
            palette.text_muted,
        );
    }
    for (row, name) in matrix.columns().iter().enumerate() {
        let y = grid_min.y + row as f32 * cell;
        painter.text(
            pos2(rect.min.x + HEATMAP_LABEL_WIDTH - 6.0, y + cell * 0.5),
            Align2::RIGHT_CENTER,
            format!("{name} ({row})"),
            font.clone(),
            palette.text_primary,
        );
        for col in 0..n {
            let value = matrix.get(row, col);
            let cell_rect = Rect::from_min_size(
                pos2(grid_min.x + col as f32 * cell, y),
                vec2(cell, cell),
            );
            let fill = style::correlation_color(value);
            painter.rect_filled(cell_rect.shrink(0.5), 0.0, fill);
            let text = if value.is_nan() {
                "-".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                text,
                font.clone(),
                style::contrast_text(fill),
            );
        }
    }

    if let Some(pointer) = response.hover_pos() {
        let col = ((pointer.x - grid_min.x) / cell).floor();
        let row = ((pointer.y - grid_min.y) / cell).floor();
        if col >= 0.0 && row >= 0.0 && (col as usize) < n && (row as usize) < n {
            let (row, col) = (row as usize, col as usize);
            let columns = matrix.columns();
            response.on_hover_text(format!(
                "{} vs {}: {:.3}",
                columns[row],
                columns[col],
                matrix.get(row, col)
            ));
        }
    }
}

/// Overlaid per-label bars over shared bin edges.
pub(super) fn render_histogram(ui: &mut Ui, histogram: &LabelHistogram) {
    let palette = style::palette();
    ui.horizontal(|ui| {
        for (label, name) in CLASS_NAMES.iter().enumerate() {
            let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
            ui.painter().rect_filled(swatch, 0.0, style::label_color(label));
            ui.label(format!("{label} {name} ({})", histogram.total(label)));
            ui.add_space(8.0);
        }
    });

    let width = ui.available_width().max(120.0);
    let (rect, response) = ui.allocate_exact_size(vec2(width, HISTOGRAM_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_stroke(rect, 0.0, style::panel_border(), StrokeKind::Inside);

    let bins = histogram.bins();
    let max_count = histogram.max_count().max(1) as f32;
    let plot = rect.shrink2(vec2(4.0, 18.0));
    let bin_width = plot.width() / bins.max(1) as f32;
    for bin in 0..bins {
        for label in 0..2 {
            let count = histogram.counts[label][bin];
            if count == 0 {
                continue;
            }
            let height = plot.height() * count as f32 / max_count;
            let x = plot.min.x + bin as f32 * bin_width;
            let bar = Rect::from_min_max(
                pos2(x + 0.5, plot.max.y - height),
                pos2(x + bin_width - 0.5, plot.max.y),
            );
            painter.rect_filled(bar, 0.0, style::label_color(label).gamma_multiply(0.6));
        }
    }
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, palette.text_muted),
    );

    let font = FontId::proportional(11.0);
    if let (Some(first), Some(last)) = (histogram.edges.first(), histogram.edges.last()) {
        painter.text(
            pos2(plot.min.x, rect.max.y - 2.0),
            Align2::LEFT_BOTTOM,
            format_value(*first),
            font.clone(),
            palette.text_muted,
        );
        painter.text(
            pos2(plot.max.x, rect.max.y - 2.0),
            Align2::RIGHT_BOTTOM,
            format_value(*last),
            font.clone(),
            palette.text_muted,
        );
    }
    painter.text(
        pos2(plot.min.x, rect.min.y + 2.0),
        Align2::LEFT_TOP,
        format!("max {}", histogram.max_count()),
        font,
        palette.text_muted,
    );

    if let Some(pointer) = response.hover_pos()
        && plot.x_range().contains(pointer.x)
    {
        let bin = (((pointer.x - plot.min.x) / bin_width) as usize).min(bins.saturating_sub(1));
        if bins > 0 {
            response.on_hover_text(format!(
                "[{}, {}): rejected {}, approved {}",
                format_value(histogram.edges[bin]),
                format_value(histogram.edges[bin + 1]),
                histogram.counts[0][bin],
                histogram.counts[1][bin]
            ));
        }
    }
}

/// Compact number for axis labels.
fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn axis_values_are_compact() {
        assert_eq!(format_value(14_500_000.0), "14.5M");
        assert_eq!(format_value(250_000.0), "250k");
        assert_eq!(format_value(900.0), "900");
        assert_eq!(format_value(9.5), "9.5");
    }
}
