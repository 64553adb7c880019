use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Local};
use eframe::egui::{self, ColorImage, Context, Rect, UserData};

use super::ViewModel;

fn export_file_name(now: DateTime<Local>) -> String {
    format!("knowledge-map-{}.png", now.format("%Y-%m-%d"))
}

/// Cuts the canvas region out of a full-window frame capture. The rect is in
/// UI points; the capture is in physical pixels.
fn crop_to_canvas(frame: &ColorImage, canvas: Rect, pixels_per_point: f32) -> ColorImage {
    let [frame_width, frame_height] = frame.size;
    let left = ((canvas.min.x * pixels_per_point).floor().max(0.0) as usize).min(frame_width);
    let top = ((canvas.min.y * pixels_per_point).floor().max(0.0) as usize).min(frame_height);
    let right = ((canvas.max.x * pixels_per_point).ceil().max(0.0) as usize).min(frame_width);
    let bottom = ((canvas.max.y * pixels_per_point).ceil().max(0.0) as usize).min(frame_height);

    let width = right.saturating_sub(left);
    let height = bottom.saturating_sub(top);

    let mut pixels = Vec::with_capacity(width * height);
    for row in top..bottom {
        let start = row * frame_width + left;
        pixels.extend_from_slice(&frame.pixels[start..start + width]);
    }

    ColorImage::new([width, height], pixels)
}

fn save_png(capture: &ColorImage, path: &str) -> anyhow::Result<()> {
    let [width, height] = capture.size;
    if width == 0 || height == 0 {
        return Err(anyhow!("capture region is empty"));
    }

    let mut bytes = Vec::with_capacity(width * height * 4);
    for pixel in &capture.pixels {
        bytes.extend_from_slice(&pixel.to_array());
    }

    let image = image::RgbaImage::from_raw(width as u32, height as u32, bytes)
        .ok_or_else(|| anyhow!("capture buffer does not match {width}x{height}"))?;
    image
        .save(path)
        .with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

impl ViewModel {
    /// Asks the backend for a frame capture; the pixels arrive as an input
    /// event on a later frame and are handled by `handle_export_events`.
    pub(in crate::app) fn request_export(&mut self, ctx: &Context) {
        self.export_status = None;
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(UserData::default()));
    }

    pub(in crate::app) fn handle_export_events(&mut self, ctx: &Context) {
        let capture = ctx.input(|input| {
            input.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(frame) = capture else {
            return;
        };

        let canvas = crop_to_canvas(&frame, self.last_canvas_rect, ctx.pixels_per_point());
        let path = export_file_name(Local::now());
        match save_png(&canvas, &path) {
            Ok(()) => {
                log::info!("exported map canvas to {path}");
                self.export_status = Some(format!("Saved {path}"));
            }
            Err(error) => {
                log::warn!("PNG export failed: {error:#}");
                self.export_status = Some(format!("Export failed: {error:#}"));
            }
        }
    }
}
