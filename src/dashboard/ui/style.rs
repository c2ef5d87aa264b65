use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_ice: Color32,
    pub approved: Color32,
    pub rejected: Color32,
    pub warning: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 13, 15),
        bg_secondary: Color32::from_rgb(24, 26, 29),
        bg_tertiary: Color32::from_rgb(40, 43, 48),
        panel_outline: Color32::from_rgb(46, 50, 56),
        grid_soft: Color32::from_rgb(32, 35, 39),
        text_primary: Color32::from_rgb(205, 210, 216),
        text_muted: Color32::from_rgb(140, 146, 155),
        accent_ice: Color32::from_rgb(167, 217, 255),
        approved: Color32::from_rgb(102, 176, 136),
        rejected: Color32::from_rgb(214, 112, 92),
        warning: Color32::from_rgb(220, 150, 96),
    }
}

/// Color for a label value: `1` approved, anything else rejected.
pub fn label_color(label: usize) -> Color32 {
    let palette = palette();
    if label == 1 {
        palette.approved
    } else {
        palette.rejected
    }
}

/// Diverging color for a correlation in `[-1, 1]`; `NaN` renders as a flat gray.
pub fn correlation_color(value: f64) -> Color32 {
    if value.is_nan() {
        return palette().bg_tertiary;
    }
    let t = value.clamp(-1.0, 1.0) as f32;
    let (r, g, b) = if t >= 0.0 {
        lerp_rgb((236, 236, 236), (180, 40, 48), t)
    } else {
        lerp_rgb((236, 236, 236), (48, 92, 180), -t)
    };
    Color32::from_rgb(r, g, b)
}

fn lerp_rgb(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    (mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Dark text on light cells, light text on saturated ones.
pub fn contrast_text(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::from_rgb(20, 20, 22)
    } else {
        Color32::from_rgb(240, 240, 240)
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_ice;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.grid_soft;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.bg_tertiary;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_ice);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        set_rectilinear(widget, palette);
    }
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn panel_border() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_colors_diverge_from_neutral() {
        assert_eq!(correlation_color(0.0), Color32::from_rgb(236, 236, 236));
        assert_eq!(correlation_color(1.0), Color32::from_rgb(180, 40, 48));
        assert_eq!(correlation_color(-1.0), Color32::from_rgb(48, 92, 180));
        assert_eq!(correlation_color(f64::NAN), palette().bg_tertiary);
    }

    #[test]
    fn contrast_text_flips_on_dark_fills() {
        assert_eq!(contrast_text(Color32::WHITE), Color32::from_rgb(20, 20, 22));
        assert_eq!(contrast_text(Color32::BLACK), Color32::from_rgb(240, 240, 240));
    }
}
