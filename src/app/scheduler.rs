use std::collections::{HashMap, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::Vec2;

use crate::layout::{LayoutConfig, LayoutRequest, compute_layout};

pub enum LayoutUpdate {
    Progress(f32),
    Complete(HashMap<String, Vec2>),
    Failed(String),
}

impl LayoutUpdate {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Failed(_))
    }
}

/// Decides where a layout computation runs and relays its messages.
///
/// Graphs below the small-graph threshold are computed inline; larger ones go
/// to a dedicated worker thread that communicates only over an mpsc channel.
/// At most one computation is live per scheduler: a new request tears the
/// previous one down first, and updates from a superseded worker land on a
/// dropped receiver and are never observed.
pub struct LayoutScheduler {
    rx: Option<Receiver<LayoutUpdate>>,
    pending: VecDeque<LayoutUpdate>,
    in_flight: bool,
}

impl LayoutScheduler {
    pub fn new() -> Self {
        Self {
            rx: None,
            pending: VecDeque::new(),
            in_flight: false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn request(&mut self, request: LayoutRequest, config: LayoutConfig) {
        self.cancel();
        self.in_flight = true;

        if request.nodes.len() < config.small_graph_threshold {
            log::debug!(
                "computing layout inline for {} nodes",
                request.nodes.len()
            );
            let mut updates = Vec::new();
            let positions = compute_layout(&request, &config, |percent| {
                updates.push(LayoutUpdate::Progress(percent));
                true
            });
            self.pending.extend(updates);
            self.pending.push_back(LayoutUpdate::Complete(positions));
            return;
        }

        log::debug!(
            "dispatching layout worker for {} nodes, {} edges",
            request.nodes.len(),
            request.edges.len()
        );
        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);

        thread::spawn(move || {
            let progress_tx = tx.clone();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                compute_layout(&request, &config, |percent| {
                    // A failed send means the scheduler tore this worker
                    // down; stop simulating.
                    progress_tx.send(LayoutUpdate::Progress(percent)).is_ok()
                })
            }));

            match outcome {
                Ok(positions) => {
                    let _ = tx.send(LayoutUpdate::Complete(positions));
                }
                Err(panic) => {
                    let detail = panic
                        .downcast_ref::<&str>()
                        .map(|message| (*message).to_owned())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "layout worker panicked".to_owned());
                    let _ = tx.send(LayoutUpdate::Failed(detail));
                }
            }
        });
    }

    /// Drops the live computation, if any. The worker notices the closed
    /// channel at its next progress report and exits; anything it already
    /// sent is discarded unread.
    pub fn cancel(&mut self) {
        self.rx = None;
        self.pending.clear();
        self.in_flight = false;
    }

    /// Drains every update currently available. Progress updates for one
    /// request arrive non-decreasing and the terminal update is always last;
    /// a worker that disconnects without a terminal update is reported as a
    /// failure exactly once.
    pub fn poll(&mut self) -> Vec<LayoutUpdate> {
        let mut updates: Vec<LayoutUpdate> = self.pending.drain(..).collect();

        if let Some(rx) = &self.rx {
            loop {
                match rx.try_recv() {
                    Ok(update) => updates.push(update),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if self.in_flight && !updates.iter().any(LayoutUpdate::is_terminal) {
                            updates.push(LayoutUpdate::Failed(
                                "layout worker disconnected".to_owned(),
                            ));
                        }
                        self.rx = None;
                        break;
                    }
                }
            }
        }

        if updates.iter().any(LayoutUpdate::is_terminal) {
            self.in_flight = false;
            self.rx = None;
        }

        updates
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::layout::{LayoutEdge, LayoutNode};

    fn make_request(node_count: usize) -> LayoutRequest {
        LayoutRequest {
            nodes: (0..node_count)
                .map(|index| LayoutNode {
                    id: format!("n{index}"),
                    category: None,
                })
                .collect(),
            edges: (1..node_count)
                .map(|index| LayoutEdge {
                    source: format!("n{}", index - 1),
                    target: format!("n{index}"),
                    strength: 1.0,
                })
                .collect(),
            width: 800.0,
            height: 600.0,
        }
    }

    fn drain_until_terminal(scheduler: &mut LayoutScheduler) -> Vec<LayoutUpdate> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut updates = Vec::new();
        while Instant::now() < deadline {
            updates.extend(scheduler.poll());
            if updates.iter().any(LayoutUpdate::is_terminal) {
                return updates;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("no terminal update within deadline");
    }

    #[test]
    fn small_graph_completes_inline() {
        let mut scheduler = LayoutScheduler::new();
        scheduler.request(make_request(5), LayoutConfig::default());

        // No waiting: the inline path queues its result synchronously.
        let updates = scheduler.poll();
        let terminals = updates
            .iter()
            .filter(|update| update.is_terminal())
            .count();
        assert_eq!(terminals, 1);
        assert!(matches!(updates.last(), Some(LayoutUpdate::Complete(_))));
        assert!(!scheduler.is_in_flight());
    }

    #[test]
    fn large_graph_runs_on_worker_with_single_terminal() {
        let mut scheduler = LayoutScheduler::new();
        scheduler.request(make_request(90), LayoutConfig::default());
        assert!(scheduler.is_in_flight());

        let updates = drain_until_terminal(&mut scheduler);

        let mut progress = Vec::new();
        let mut terminals = 0;
        for update in &updates {
            match update {
                LayoutUpdate::Progress(percent) => progress.push(*percent),
                LayoutUpdate::Complete(positions) => {
                    terminals += 1;
                    assert_eq!(positions.len(), 90);
                }
                LayoutUpdate::Failed(detail) => panic!("unexpected failure: {detail}"),
            }
        }
        assert_eq!(terminals, 1);
        assert!(updates.last().unwrap().is_terminal());
        assert!(progress.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(progress.last().copied(), Some(100.0));
        assert!(!scheduler.is_in_flight());

        // Nothing trails the terminal update.
        assert!(scheduler.poll().is_empty());
    }

    #[test]
    fn superseding_request_discards_previous_worker() {
        let mut scheduler = LayoutScheduler::new();
        scheduler.request(make_request(120), LayoutConfig::default());
        scheduler.request(make_request(60), LayoutConfig::default());

        let updates = drain_until_terminal(&mut scheduler);
        let Some(LayoutUpdate::Complete(positions)) = updates.last() else {
            panic!("expected completion of the superseding request");
        };
        assert_eq!(positions.len(), 60);
        assert_eq!(
            updates
                .iter()
                .filter(|update| update.is_terminal())
                .count(),
            1
        );
    }

    #[test]
    fn cancel_discards_everything() {
        let mut scheduler = LayoutScheduler::new();
        scheduler.request(make_request(120), LayoutConfig::default());
        scheduler.cancel();

        assert!(!scheduler.is_in_flight());
        assert!(scheduler.poll().is_empty());
        thread::sleep(Duration::from_millis(20));
        assert!(scheduler.poll().is_empty());
    }
}
