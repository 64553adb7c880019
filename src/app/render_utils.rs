use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const MIN_ZOOM: f32 = 0.5;
pub(super) const MAX_ZOOM: f32 = 3.0;
pub(super) const ZOOM_STEP: f32 = 1.1;

/// Scroll points one wheel notch reports.
const WHEEL_NOTCH_POINTS: f32 = 50.0;

/// Camera transform: translate by the pan offset (screen pixels), then scale
/// by zoom. World positions live in surface coordinates, so at zoom 1 and
/// zero pan the transform is the identity.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.left_top() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.left_top() - pan) / zoom
}

pub(super) fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// One zoom step per wheel notch, compounding for multi-notch events and
/// interpolating smoothly for sub-notch (touchpad) deltas.
pub(super) fn wheel_zoom_factor(scroll_y: f32) -> f32 {
    ZOOM_STEP.powf(scroll_y / WHEEL_NOTCH_POINTS)
}

/// Zoom anchored at a screen point: the world point under the pointer stays
/// fixed on screen while the zoom changes.
pub(super) fn zoom_at(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    pointer: Pos2,
    factor: f32,
) -> (Vec2, f32) {
    let world = screen_to_world(rect, pan, zoom, pointer);
    let next_zoom = clamp_zoom(zoom * factor);
    let next_pan = pointer - rect.left_top() - world * next_zoom;
    (next_pan, next_zoom)
}

/// Pan offset that maps a world point onto the exact surface center at the
/// given zoom.
pub(super) fn center_on(rect: Rect, zoom: f32, world: Vec2) -> Vec2 {
    rect.size() * 0.5 - world * zoom
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.left_top() + pan;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(120.0, 80.0), vec2(800.0, 600.0))
    }

    #[test]
    fn camera_round_trips() {
        let rect = canvas();
        for &(zoom, pan) in &[
            (1.0, vec2(0.0, 0.0)),
            (0.5, vec2(-35.0, 110.0)),
            (2.75, vec2(400.0, -9.5)),
        ] {
            for &world in &[vec2(0.0, 0.0), vec2(123.4, 567.8), vec2(-50.0, 42.0)] {
                let screen = world_to_screen(rect, pan, zoom, world);
                let back = screen_to_world(rect, pan, zoom, screen);
                assert!((back - world).length() < 1e-3);
            }
        }
    }

    #[test]
    fn zoom_stays_clamped_under_cumulative_wheel_input() {
        let rect = canvas();
        let pointer = pos2(300.0, 250.0);

        let mut pan = vec2(10.0, -20.0);
        let mut zoom = 1.0;
        for _ in 0..100 {
            (pan, zoom) = zoom_at(rect, pan, zoom, pointer, ZOOM_STEP);
        }
        assert!((zoom - MAX_ZOOM).abs() < 1e-6);

        for _ in 0..200 {
            (pan, zoom) = zoom_at(rect, pan, zoom, pointer, 1.0 / ZOOM_STEP);
        }
        assert!((zoom - MIN_ZOOM).abs() < 1e-6);
    }

    #[test]
    fn zoom_is_anchored_at_the_pointer() {
        let rect = canvas();
        let pointer = pos2(512.0, 300.0);
        let pan = vec2(25.0, 40.0);
        let zoom = 1.2;

        let anchor_world = screen_to_world(rect, pan, zoom, pointer);
        let (next_pan, next_zoom) = zoom_at(rect, pan, zoom, pointer, ZOOM_STEP);
        let anchor_screen = world_to_screen(rect, next_pan, next_zoom, anchor_world);

        assert!((anchor_screen - pointer).length() < 1e-3);
    }

    #[test]
    fn center_on_maps_world_point_to_surface_center() {
        let rect = canvas();
        for &zoom in &[0.5, 1.0, 2.0, 3.0] {
            let world = vec2(612.0, 113.0);
            let pan = center_on(rect, zoom, world);
            let screen = world_to_screen(rect, pan, zoom, world);
            assert!((screen - rect.center()).length() < 1e-3);
        }
    }

    #[test]
    fn wheel_factor_scales_with_notch_count() {
        assert!((wheel_zoom_factor(WHEEL_NOTCH_POINTS) - ZOOM_STEP).abs() < 1e-6);
        assert!((wheel_zoom_factor(-WHEEL_NOTCH_POINTS) - 1.0 / ZOOM_STEP).abs() < 1e-6);
        assert!((wheel_zoom_factor(2.0 * WHEEL_NOTCH_POINTS) - ZOOM_STEP * ZOOM_STEP).abs() < 1e-5);

        let partial = wheel_zoom_factor(0.5 * WHEEL_NOTCH_POINTS);
        assert!(partial > 1.0 && partial < ZOOM_STEP);
    }
}
