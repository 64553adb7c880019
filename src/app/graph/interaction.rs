use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, wheel_zoom_factor, zoom_at};

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let factor = wheel_zoom_factor(scroll);
        (self.pan, self.zoom) = zoom_at(rect, self.pan, self.zoom, pointer, factor);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            self.pan_by(response.drag_delta());
        }
    }

    /// Pan is a screen-space delta: the same drag moves the scene the same
    /// number of pixels at any zoom.
    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Inverts the camera transform and scans the filtered node list in
    /// order, returning the first node whose world-space distance to the
    /// point is within its radius. List order decides ties between
    /// overlapping nodes.
    pub(in crate::app) fn hit_test(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        let scene = self.scene.as_ref()?;
        let positions = scene.positions.as_ref()?;
        let filter = self.category_filter.as_deref();
        let world = screen_to_world(rect, self.pan, self.zoom, pointer);

        (0..scene.nodes.len()).find(|&index| {
            scene.node_visible(index, filter)
                && (positions[index] - world).length() <= scene.nodes[index].radius
        })
    }

    /// Click selection: the selected node toggles off, any other node
    /// replaces the selection, empty space clears it.
    pub(in crate::app) fn apply_selection(&mut self, clicked: Option<String>) {
        match clicked {
            Some(id) if self.selected.as_deref() == Some(id.as_str()) => self.selected = None,
            other => self.selected = other,
        }
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::{pos2, vec2};

    use crate::data::{KnowledgeGraph, MasteryLevel, TopicNode};
    use crate::layout::LayoutConfig;

    use super::*;

    fn topic(id: &str, name: &str, category: Option<&str>) -> TopicNode {
        TopicNode {
            id: id.to_owned(),
            display_name: name.to_owned(),
            category: category.map(str::to_owned),
            mastery: MasteryLevel::Developing,
            review_count: 0,
            origin_session_title: String::new(),
        }
    }

    fn model_with_positions(positions: &[(&str, Vec2)]) -> ViewModel {
        let graph = KnowledgeGraph {
            nodes: positions
                .iter()
                .enumerate()
                .map(|(index, (id, _))| {
                    let category = if index % 2 == 0 { Some("even") } else { Some("odd") };
                    topic(id, &format!("Topic {id}"), category)
                })
                .collect(),
            connections: Vec::new(),
            categories: vec!["even".to_owned(), "odd".to_owned()],
            total_topics: positions.len(),
        };
        let mut model = ViewModel::new(graph, LayoutConfig::default());

        let map = positions
            .iter()
            .map(|(id, position)| ((*id).to_owned(), *position))
            .collect::<HashMap<_, _>>();
        model
            .scene
            .as_mut()
            .expect("non-empty scene")
            .apply_positions(&map);
        model
    }

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn hit_at_node_center_returns_that_node() {
        let model = model_with_positions(&[("a", vec2(100.0, 100.0)), ("b", vec2(300.0, 100.0))]);
        let hit = model.hit_test(canvas(), pos2(100.0, 100.0));
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn hit_respects_camera_transform() {
        let mut model = model_with_positions(&[("a", vec2(100.0, 100.0))]);
        model.zoom = 2.0;
        model.pan_by(vec2(40.0, -10.0));

        // screen = pan + world * zoom
        let hit = model.hit_test(canvas(), pos2(240.0, 190.0));
        assert_eq!(hit, Some(0));
        assert_eq!(model.hit_test(canvas(), pos2(500.0, 500.0)), None);
    }

    #[test]
    fn overlapping_nodes_resolve_to_list_order() {
        let model = model_with_positions(&[("a", vec2(150.0, 150.0)), ("b", vec2(150.0, 150.0))]);
        assert_eq!(model.hit_test(canvas(), pos2(150.0, 150.0)), Some(0));
    }

    #[test]
    fn category_filter_excludes_from_hit_testing() {
        let mut model =
            model_with_positions(&[("a", vec2(100.0, 100.0)), ("b", vec2(100.0, 100.0))]);
        model.category_filter = Some("odd".to_owned());
        assert_eq!(model.hit_test(canvas(), pos2(100.0, 100.0)), Some(1));
    }

    #[test]
    fn selection_toggles_and_replaces() {
        let mut model = model_with_positions(&[("a", vec2(0.0, 0.0)), ("b", vec2(50.0, 0.0))]);

        model.apply_selection(Some("a".to_owned()));
        assert_eq!(model.selected.as_deref(), Some("a"));

        model.apply_selection(Some("a".to_owned()));
        assert_eq!(model.selected, None);

        model.apply_selection(Some("a".to_owned()));
        model.apply_selection(Some("b".to_owned()));
        assert_eq!(model.selected.as_deref(), Some("b"));

        model.apply_selection(None);
        assert_eq!(model.selected, None);
    }

    #[test]
    fn pan_delta_is_zoom_independent() {
        let mut model = model_with_positions(&[("a", vec2(0.0, 0.0))]);
        model.zoom = 2.0;
        model.pan_by(vec2(50.0, 30.0));
        assert_eq!(model.pan, vec2(50.0, 30.0));
    }

    #[test]
    fn reset_view_restores_defaults() {
        let mut model = model_with_positions(&[("a", vec2(0.0, 0.0))]);
        model.zoom = 2.4;
        model.pan_by(vec2(-120.0, 75.0));

        model.reset_view();
        assert_eq!(model.zoom, 1.0);
        assert_eq!(model.pan, Vec2::ZERO);
    }
}
