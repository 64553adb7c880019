use eframe::egui::{self, Align, Context, Layout, Rect, Vec2};

use crate::data::KnowledgeGraph;
use crate::layout::LayoutConfig;

use super::super::scheduler::LayoutScheduler;
use super::super::{SceneGraph, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(graph: KnowledgeGraph, layout_config: LayoutConfig) -> Self {
        let scene = (!graph.is_empty()).then(|| SceneGraph::build(&graph));

        Self {
            graph,
            layout_config,
            scheduler: LayoutScheduler::new(),
            scene,
            layout_progress: None,
            layout_error: None,
            layout_surface: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            selected: None,
            search: String::new(),
            search_matches: Vec::new(),
            category_filter: None,
            pending_recenter: None,
            last_canvas_rect: Rect::ZERO,
            export_status: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    /// The provider may report more topics than the dataset carries (a
    /// truncated payload); show both counts when they disagree.
    fn topic_stat_label(&self) -> String {
        let loaded = self.graph.node_count();
        if self.graph.total_topics > loaded {
            format!("topics: {loaded} of {}", self.graph.total_topics)
        } else {
            format!("topics: {loaded}")
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.poll_layout(ctx);
        self.handle_export_events(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Knowledge Map");
                    ui.separator();
                    ui.label(self.topic_stat_label());
                    ui.label(format!("connections: {}", self.graph.edge_count()));
                    ui.label(format!("categories: {}", self.graph.categories.len()));
                    ui.label(format!("mastered: {}", self.graph.mastered_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.category_filter.is_some() || !self.search.trim().is_empty() {
                            ui.label(format!(
                                "showing {} topics, {} connections",
                                self.visible_node_count, self.visible_edge_count
                            ));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Loading knowledge map...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::data::{KnowledgeGraph, MasteryLevel, TopicNode};
    use crate::layout::LayoutConfig;

    use super::super::super::ViewModel;

    fn graph_with_total(node_count: usize, total_topics: usize) -> KnowledgeGraph {
        KnowledgeGraph {
            nodes: (0..node_count)
                .map(|index| TopicNode {
                    id: format!("n{index}"),
                    display_name: format!("Topic {index}"),
                    category: None,
                    mastery: MasteryLevel::Introduced,
                    review_count: 0,
                    origin_session_title: String::new(),
                })
                .collect(),
            connections: Vec::new(),
            categories: Vec::new(),
            total_topics,
        }
    }

    #[test]
    fn topic_stat_shows_plain_count_when_complete() {
        let model = ViewModel::new(graph_with_total(3, 3), LayoutConfig::default());
        assert_eq!(model.topic_stat_label(), "topics: 3");
    }

    #[test]
    fn topic_stat_shows_provider_total_when_truncated() {
        let model = ViewModel::new(graph_with_total(3, 10), LayoutConfig::default());
        assert_eq!(model.topic_stat_label(), "topics: 3 of 10");
    }
}
