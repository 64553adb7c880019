use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

struct TopicDetails {
    display_name: String,
    category: Option<String>,
    mastery_label: &'static str,
    review_count: u32,
    origin_session_title: String,
    neighbors: Vec<(String, String)>,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Topic Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a topic on the map to see its details.");
            return;
        };

        let details = self.topic_details(&selected_id);
        let Some(details) = details else {
            ui.label("Selected topic no longer exists in the dataset.");
            return;
        };

        ui.label(RichText::new(&details.display_name).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        ui.label(format!(
            "Category: {}",
            details.category.as_deref().unwrap_or("(uncategorized)")
        ));
        ui.label(format!("Mastery: {}", details.mastery_label));
        ui.label(format!("Times reviewed: {}", details.review_count));
        if !details.origin_session_title.is_empty() {
            ui.label(format!("First seen in: {}", details.origin_session_title));
        }

        ui.separator();
        ui.label(RichText::new("Connected topics").strong());
        if details.neighbors.is_empty() {
            ui.label("No connections for this topic.");
        } else {
            let mut jump_to = None;
            egui::ScrollArea::vertical()
                .id_salt("neighbor_list_scroll")
                .max_height(320.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for (id, name) in &details.neighbors {
                        if ui.link(name).on_hover_text(id.as_str()).clicked() {
                            jump_to = Some(id.clone());
                        }
                    }
                });
            if let Some(id) = jump_to {
                self.selected = Some(id.clone());
                self.pending_recenter = Some(id);
            }
        }

        ui.add_space(10.0);
        if ui.button("Deselect").clicked() {
            self.selected = None;
        }
    }

    fn topic_details(&self, id: &str) -> Option<TopicDetails> {
        let scene = self.scene.as_ref()?;
        let index = *scene.index_by_id.get(id)?;
        let topic = &self.graph.nodes[index];

        let neighbors = scene
            .neighbors(index)
            .into_iter()
            .map(|neighbor| {
                (
                    scene.nodes[neighbor].id.clone(),
                    scene.nodes[neighbor].display_name.clone(),
                )
            })
            .collect();

        Some(TopicDetails {
            display_name: topic.display_name.clone(),
            category: topic.category.clone(),
            mastery_label: topic.mastery.label(),
            review_count: topic.review_count,
            origin_session_title: topic.origin_session_title.clone(),
            neighbors,
        })
    }
}
