use eframe::egui::Color32;

use crate::data::MasteryLevel;

/// Presentation policy for mastery levels. Node size and color are pure
/// functions of the mastery ordinal and nothing else; the renderer never
/// derives them on its own.

pub(super) const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const HOVERED_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const BORDER_COLOR: Color32 = Color32::from_rgba_premultiplied(15, 15, 15, 190);
pub(super) const LABEL_COLOR: Color32 = Color32::from_gray(238);

/// World-space radius, growing with the mastery ordinal (1..=5).
pub(super) fn mastery_radius(level: MasteryLevel) -> f32 {
    6.0 + level.ordinal() as f32 * 3.0
}

/// Hue in degrees, strictly increasing with the mastery ordinal: cold red
/// for untouched topics up to blue for mastered ones.
pub(super) fn mastery_hue(level: MasteryLevel) -> f32 {
    (level.ordinal() - 1) as f32 * 60.0
}

pub(super) fn mastery_color(level: MasteryLevel) -> Color32 {
    hsl_color(mastery_hue(level), 0.62, 0.55)
}

/// Fill color with the fixed priority: search match > selected > hovered >
/// the node's cached mastery color.
pub(super) fn node_fill(
    base: Color32,
    is_match: bool,
    is_selected: bool,
    is_hovered: bool,
) -> Color32 {
    if is_match {
        SEARCH_MATCH_COLOR
    } else if is_selected {
        SELECTED_COLOR
    } else if is_hovered {
        HOVERED_COLOR
    } else {
        base
    }
}

fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hue_sector = (hue.rem_euclid(360.0)) / 60.0;
    let secondary = chroma * (1.0 - (hue_sector % 2.0 - 1.0).abs());

    let (r, g, b) = match hue_sector as u32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };

    let offset = lightness - chroma * 0.5;
    Color32::from_rgb(
        ((r + offset) * 255.0) as u8,
        ((g + offset) * 255.0) as u8,
        ((b + offset) * 255.0) as u8,
    )
}
