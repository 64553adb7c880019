use eframe::egui::{self, Align, Layout, Ui};

use crate::data::MasteryLevel;

use super::super::style::mastery_color;
use super::super::{ViewModel, render_utils};

impl ViewModel {
    /// Recomputes the search match set from the current query. Matching is a
    /// case-insensitive substring test against the display name; a query of
    /// only whitespace clears the matches. When exactly one topic matches it
    /// also becomes the selection and the view recenters on it.
    pub(in crate::app) fn refresh_search_matches(&mut self) {
        self.search_matches.clear();

        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return;
        }

        let Some(scene) = self.scene.as_ref() else {
            return;
        };

        for (index, node) in scene.nodes.iter().enumerate() {
            if node.display_name.to_lowercase().contains(&query) {
                self.search_matches.push(index);
            }
        }

        if let [only] = self.search_matches[..] {
            let id = scene.nodes[only].id.clone();
            self.selected = Some(id.clone());
            self.pending_recenter = Some(id);
        }
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Map Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search topics");
        let search_response = ui
            .text_edit_singleline(&mut self.search)
            .on_hover_text("Highlight topics whose name contains the query.");
        if search_response.changed() {
            self.refresh_search_matches();
        }

        if self.search_matches.len() > 1 {
            ui.add_space(2.0);
            ui.label(format!("{} matches", self.search_matches.len()));

            let rows = self
                .scene
                .as_ref()
                .map(|scene| {
                    self.search_matches
                        .iter()
                        .map(|&index| {
                            (
                                scene.nodes[index].id.clone(),
                                scene.nodes[index].display_name.clone(),
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            let mut jump_to = None;
            egui::ScrollArea::vertical()
                .id_salt("search_match_list")
                .max_height(160.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for (id, name) in &rows {
                        let is_selected = self.selected.as_deref() == Some(id.as_str());
                        if ui.selectable_label(is_selected, name).clicked() {
                            jump_to = Some(id.clone());
                        }
                    }
                });
            if let Some(id) = jump_to {
                self.selected = Some(id.clone());
                self.pending_recenter = Some(id);
            }
        }

        ui.separator();

        ui.label("Category filter");
        let categories = self.graph.categories.clone();
        let current_label = self
            .category_filter
            .clone()
            .unwrap_or_else(|| "All categories".to_owned());
        let mut filter_changed = false;
        egui::ComboBox::from_id_salt("category_filter")
            .width(200.0)
            .selected_text(current_label)
            .show_ui(ui, |ui| {
                filter_changed |= ui
                    .selectable_value(&mut self.category_filter, None, "All categories")
                    .changed();
                for category in &categories {
                    filter_changed |= ui
                        .selectable_value(
                            &mut self.category_filter,
                            Some(category.clone()),
                            category,
                        )
                        .changed();
                }
            });
        if filter_changed
            && let (Some(filter), Some(selected)) =
                (self.category_filter.as_deref(), self.selected.clone())
            && let Some(scene) = self.scene.as_ref()
            && let Some(&index) = scene.index_by_id.get(&selected)
            && scene.nodes[index].category.as_deref() != Some(filter)
        {
            // A selection hidden by the filter is no longer clickable or
            // visible, so drop it.
            self.selected = None;
        }

        ui.separator();

        ui.label("Layout");
        if let Some(percent) = self.layout_progress {
            ui.add(egui::ProgressBar::new(percent / 100.0).text(format!("{percent:.0}%")));
        } else if let Some(error) = self.layout_error.clone() {
            ui.colored_label(egui::Color32::LIGHT_RED, error);
            if ui.button("Retry layout").clicked()
                && let Some(surface) = self.layout_surface
            {
                self.request_layout(surface);
            }
        } else if ui.button("Recompute layout").clicked()
            && let Some(surface) = self.layout_surface
        {
            self.request_layout(surface);
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.reset_view();
            }
            if ui
                .button("Export PNG")
                .on_hover_text("Save the current canvas as a PNG in the working directory.")
                .clicked()
            {
                self.request_export(ui.ctx());
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!("zoom: {:.2}x", self.zoom));
            });
        });
        if let Some(status) = &self.export_status {
            ui.add_space(2.0);
            ui.label(status.as_str());
        }

        ui.separator();

        ui.label("Mastery legend");
        for level in MasteryLevel::ALL {
            ui.horizontal(|ui| {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(rect.center(), 5.0, mastery_color(level));
                ui.label(level.label());
            });
        }

        ui.add_space(8.0);
        ui.small(format!(
            "Scroll to zoom ({:.1}x-{:.1}x), drag to pan, click a topic for details.",
            render_utils::MIN_ZOOM,
            render_utils::MAX_ZOOM,
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::data::{KnowledgeGraph, MasteryLevel, TopicNode};
    use crate::layout::LayoutConfig;

    use super::super::super::ViewModel;

    fn topic(id: &str, name: &str) -> TopicNode {
        TopicNode {
            id: id.to_owned(),
            display_name: name.to_owned(),
            category: None,
            mastery: MasteryLevel::Developing,
            review_count: 0,
            origin_session_title: String::new(),
        }
    }

    fn model(names: &[(&str, &str)]) -> ViewModel {
        let graph = KnowledgeGraph {
            nodes: names.iter().map(|(id, name)| topic(id, name)).collect(),
            connections: Vec::new(),
            categories: Vec::new(),
            total_topics: names.len(),
        };
        ViewModel::new(graph, LayoutConfig::default())
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut model = model(&[
            ("a", "Rust Ownership"),
            ("b", "Borrow Checker"),
            ("c", "ownership rules"),
        ]);

        model.search = "OWNERS".to_owned();
        model.refresh_search_matches();
        assert_eq!(model.search_matches, vec![0, 2]);
    }

    #[test]
    fn whitespace_query_clears_matches() {
        let mut model = model(&[("a", "Rust Ownership")]);

        model.search = "rust".to_owned();
        model.refresh_search_matches();
        assert_eq!(model.search_matches, vec![0]);

        model.search = "   ".to_owned();
        model.refresh_search_matches();
        assert!(model.search_matches.is_empty());
    }

    #[test]
    fn unique_match_selects_and_recenters() {
        let mut model = model(&[("a", "Rust Ownership"), ("b", "Borrow Checker")]);

        model.search = "borrow".to_owned();
        model.refresh_search_matches();

        assert_eq!(model.search_matches, vec![1]);
        assert_eq!(model.selected.as_deref(), Some("b"));
        assert_eq!(model.pending_recenter.as_deref(), Some("b"));
    }

    #[test]
    fn multiple_matches_leave_selection_alone() {
        let mut model = model(&[("a", "Graph Theory"), ("b", "Graph Coloring")]);

        model.search = "graph".to_owned();
        model.refresh_search_matches();

        assert_eq!(model.search_matches, vec![0, 1]);
        assert_eq!(model.selected, None);
        assert_eq!(model.pending_recenter, None);
    }
}
