use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Rect, Vec2};

use crate::data::{KnowledgeGraph, load_knowledge_graph};
use crate::layout::LayoutConfig;

mod export;
mod graph;
mod render_utils;
mod scheduler;
mod style;
mod ui;

use scheduler::LayoutScheduler;

pub struct KnowledgeMapApp {
    graph_path: PathBuf,
    layout_config: LayoutConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<KnowledgeGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<KnowledgeGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: KnowledgeGraph,
    layout_config: LayoutConfig,
    scheduler: LayoutScheduler,
    scene: Option<SceneGraph>,
    layout_progress: Option<f32>,
    layout_error: Option<String>,
    layout_surface: Option<Vec2>,
    pan: Vec2,
    zoom: f32,
    selected: Option<String>,
    search: String,
    search_matches: Vec<usize>,
    category_filter: Option<String>,
    pending_recenter: Option<String>,
    last_canvas_rect: Rect,
    export_status: Option<String>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Dataset-derived render state. Radius, fill color, and the truncated label
/// are computed once per dataset; positions arrive later from the layout
/// scheduler and are replaced wholesale, never mutated in place.
struct SceneGraph {
    nodes: Vec<SceneNode>,
    edges: Vec<SceneEdge>,
    index_by_id: HashMap<String, usize>,
    positions: Option<Vec<Vec2>>,
}

struct SceneNode {
    id: String,
    display_name: String,
    label: String,
    category: Option<String>,
    radius: f32,
    fill: Color32,
}

struct SceneEdge {
    source: usize,
    target: usize,
    strength: f32,
}

impl KnowledgeMapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph_path: PathBuf,
        layout_config: LayoutConfig,
    ) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            layout_config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: PathBuf) -> Receiver<Result<KnowledgeGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                load_knowledge_graph(&graph_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for KnowledgeMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(
                            graph,
                            self.layout_config,
                        ))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading knowledge map...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load knowledge map dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(
                                    graph,
                                    self.layout_config,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
