use eframe::egui::{
    self, Align2, Color32, Context, FontId, Sense, Shape, Stroke, Ui, Vec2, vec2,
};

use super::super::render_utils::{center_on, circle_visible, draw_background, world_to_screen};
use super::super::scheduler::LayoutUpdate;
use super::super::{ViewModel, style};

const LABEL_FONT_SIZE: f32 = 12.0;
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(72, 76, 84, 160);

/// Surface-size changes below this are jitter from panel resizing, not a
/// reason to recompute the whole layout.
const SURFACE_EPSILON: f32 = 1.0;

impl ViewModel {
    /// Relays scheduler messages into view state. Positions are replaced
    /// wholesale on completion; failures leave the previous positions (and
    /// all view/selection state) untouched.
    pub(in crate::app) fn poll_layout(&mut self, ctx: &Context) {
        for update in self.scheduler.poll() {
            match update {
                LayoutUpdate::Progress(percent) => {
                    self.layout_progress = Some(percent);
                }
                LayoutUpdate::Complete(positions) => {
                    log::debug!("layout complete for {} nodes", positions.len());
                    if let Some(scene) = self.scene.as_mut() {
                        scene.apply_positions(&positions);
                    }
                    self.layout_progress = None;
                    self.layout_error = None;
                }
                LayoutUpdate::Failed(detail) => {
                    log::warn!("layout failed: {detail}");
                    self.layout_progress = None;
                    self.layout_error = Some(detail);
                }
            }
        }

        if self.scheduler.is_in_flight() {
            ctx.request_repaint();
        }
    }

    pub(in crate::app) fn request_layout(&mut self, surface: Vec2) {
        self.layout_surface = Some(surface);
        self.layout_progress = Some(0.0);
        self.layout_error = None;
        let request = self.layout_request(surface);
        self.scheduler.request(request, self.layout_config);
    }

    fn ensure_layout(&mut self, surface: Vec2) {
        if self.graph.is_empty() {
            return;
        }

        let needs_layout = match self.layout_surface {
            None => true,
            Some(previous) => (previous - surface).length() > SURFACE_EPSILON,
        };
        if needs_layout {
            self.request_layout(surface);
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.last_canvas_rect = rect;
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        if self.graph.is_empty() {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No topics in this knowledge map yet",
                FontId::proportional(15.0),
                style::LABEL_COLOR,
            );
            return;
        }

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        if response.dragged() {
            // Continuous redraw while a pan gesture is active.
            ui.ctx().request_repaint();
        }

        self.ensure_layout(rect.size());

        if let Some(id) = self.pending_recenter.take() {
            let world = self.scene.as_ref().and_then(|scene| {
                let index = *scene.index_by_id.get(&id)?;
                scene.positions.as_ref().map(|positions| positions[index])
            });
            if let Some(world) = world {
                self.pan = center_on(rect, self.zoom, world);
            } else {
                // Positions not in yet; try again next frame.
                self.pending_recenter = Some(id);
            }
        }

        let hovered = response
            .hover_pos()
            .and_then(|pointer| self.hit_test(rect, pointer));
        let pending_selection = if response.clicked() {
            Some(hovered.and_then(|index| {
                self.scene
                    .as_ref()
                    .map(|scene| scene.nodes[index].id.clone())
            }))
        } else {
            None
        };

        let pan = self.pan;
        let zoom = self.zoom;
        let selected_index = self
            .selected
            .as_ref()
            .and_then(|id| self.scene.as_ref().and_then(|scene| scene.index_by_id.get(id)))
            .copied();

        let mut visible_node_count = 0;
        let mut visible_edge_count = 0;

        if let Some(scene) = self.scene.as_ref() {
            if let Some(positions) = scene.positions.as_ref() {
                let filter = self.category_filter.as_deref();

                let screen_positions = positions
                    .iter()
                    .map(|&world| world_to_screen(rect, pan, zoom, world))
                    .collect::<Vec<_>>();
                let visible = (0..scene.nodes.len())
                    .map(|index| scene.node_visible(index, filter))
                    .collect::<Vec<_>>();

                // Edges first, in a single batch. Stronger connections draw
                // more opaque.
                let mut edge_shapes = Vec::new();
                for edge in &scene.edges {
                    if !scene.edge_visible(edge, filter) {
                        continue;
                    }
                    visible_edge_count += 1;
                    let alpha = edge.strength.clamp(0.25, 1.0);
                    edge_shapes.push(Shape::line_segment(
                        [screen_positions[edge.source], screen_positions[edge.target]],
                        Stroke::new(1.0, EDGE_COLOR.gamma_multiply(alpha)),
                    ));
                }
                painter.extend(edge_shapes);

                // Node fills grouped by color so each group draws as one
                // batch; order inside a group is list order.
                let mut groups: Vec<(Color32, Vec<usize>)> = Vec::new();
                for index in 0..scene.nodes.len() {
                    if !visible[index] {
                        continue;
                    }
                    visible_node_count += 1;
                    if !circle_visible(
                        rect,
                        screen_positions[index],
                        scene.nodes[index].radius * zoom,
                    ) {
                        continue;
                    }

                    let is_match = self.search_matches.binary_search(&index).is_ok();
                    let fill = style::node_fill(
                        scene.nodes[index].fill,
                        is_match,
                        selected_index == Some(index),
                        hovered == Some(index),
                    );
                    match groups.iter_mut().find(|(color, _)| *color == fill) {
                        Some((_, bucket)) => bucket.push(index),
                        None => groups.push((fill, vec![index])),
                    }
                }

                let mut fill_shapes = Vec::new();
                for (color, bucket) in &groups {
                    for &index in bucket {
                        fill_shapes.push(Shape::circle_filled(
                            screen_positions[index],
                            scene.nodes[index].radius * zoom,
                            *color,
                        ));
                    }
                }
                painter.extend(fill_shapes);

                // Second pass: borders and labels.
                for (_, bucket) in &groups {
                    for &index in bucket {
                        let position = screen_positions[index];
                        let screen_radius = scene.nodes[index].radius * zoom;

                        let emphasized = hovered == Some(index)
                            || selected_index == Some(index)
                            || self.search_matches.binary_search(&index).is_ok();
                        let stroke_width = if emphasized { 2.5 } else { 1.0 };
                        painter.circle_stroke(
                            position,
                            screen_radius,
                            Stroke::new(stroke_width, style::BORDER_COLOR),
                        );

                        painter.text(
                            position + vec2(0.0, screen_radius + 4.0),
                            Align2::CENTER_TOP,
                            &scene.nodes[index].label,
                            FontId::proportional(LABEL_FONT_SIZE),
                            style::LABEL_COLOR,
                        );
                    }
                }
            } else if let Some(percent) = self.layout_progress {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("Computing layout... {percent:.0}%"),
                    FontId::proportional(15.0),
                    style::LABEL_COLOR,
                );
            } else if self.layout_error.is_some() {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Layout failed — retry from the controls panel",
                    FontId::proportional(15.0),
                    style::LABEL_COLOR,
                );
            }
        }

        self.visible_node_count = visible_node_count;
        self.visible_edge_count = visible_edge_count;

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if let Some(selection) = pending_selection {
            self.apply_selection(selection);
        }
    }
}
