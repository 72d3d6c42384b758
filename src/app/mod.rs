use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2};
use log::{error, info, warn};

use skill_horizon::engine::LayoutEngine;
use skill_horizon::generate::{ClientSetup, GeminiClient};
use skill_horizon::layout::{CanvasSize, LayoutConfig};
use skill_horizon::skill::{Graph, fallback_graph};

mod graph;
mod render_utils;
mod ui;

const GENERATION_POLL: Duration = Duration::from_millis(100);

pub struct SkillHorizonApp {
    setup: ClientSetup,
    view: ViewModel,
    generation: Option<Receiver<Result<Graph, String>>>,
    status: Status,
}

enum Status {
    Idle,
    Info(String),
    Failed(String),
}

struct ViewModel {
    engine: LayoutEngine,
    config: LayoutConfig,
    topic: String,
    search: String,
    pan: Vec2,
    zoom: f32,
    show_details: bool,
}

impl SkillHorizonApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph: Graph,
        config: LayoutConfig,
        topic: String,
        setup: ClientSetup,
    ) -> Self {
        Self {
            setup,
            view: ViewModel::new(graph, config, topic),
            generation: None,
            status: Status::Idle,
        }
    }

    fn spawn_generation(client: GeminiClient, topic: String) -> Receiver<Result<Graph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = client.generate(&topic).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn request_generation(&mut self) {
        let topic = self.view.topic.trim().to_owned();
        if topic.is_empty() || self.generation.is_some() {
            return;
        }

        self.view.set_selected(None);
        match &self.setup {
            ClientSetup::Ready(client) => {
                self.status = Status::Info(format!("Generating a skill tree for \"{topic}\""));
                self.generation = Some(Self::spawn_generation(client.clone(), topic));
            }
            ClientSetup::MissingCredentials => {
                warn!("generation requested for {topic:?} without credentials");
                self.view.load_graph(fallback_graph());
                self.status = Status::Info(
                    "No API key configured; showing the bundled skill tree".to_owned(),
                );
            }
        }
    }

    fn poll_generation(&mut self) {
        let Some(rx) = self.generation.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(graph)) => {
                info!("loading generated skill tree");
                self.view.load_graph(graph);
                self.status = Status::Idle;
            }
            Ok(Err(message)) => {
                error!("{message}");
                self.status = Status::Failed(format!(
                    "Generation failed, keeping the current tree: {message}"
                ));
            }
            Err(TryRecvError::Empty) => {
                self.generation = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.status = Status::Failed("Generation worker disconnected".to_owned());
            }
        }
    }
}

impl eframe::App for SkillHorizonApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_generation();
        let is_generating = self.generation.is_some();
        if is_generating {
            ctx.request_repaint_after(GENERATION_POLL);
        }

        let mut generate_requested = false;
        self.view
            .show(ctx, &self.status, is_generating, &mut generate_requested);

        if generate_requested {
            self.request_generation();
        }
    }
}

impl ViewModel {
    fn new(graph: Graph, config: LayoutConfig, topic: String) -> Self {
        let mut engine = LayoutEngine::new(config.clone());
        // The canvas size is unknown until the first frame lays out the panels.
        engine.start(graph, CanvasSize::default());
        Self {
            engine,
            config,
            topic,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            show_details: false,
        }
    }

    fn load_graph(&mut self, graph: Graph) {
        let size = self.engine.size();
        self.engine.start(graph, size);
        self.show_details = false;
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    fn set_selected(&mut self, selected: Option<String>) {
        self.show_details = selected.is_some();
        self.engine.select(selected.as_deref());
    }

    fn selected_id(&self) -> Option<String> {
        self.engine.selected().map(str::to_owned)
    }

    fn show(
        &mut self,
        ctx: &Context,
        status: &Status,
        is_generating: bool,
        generate_requested: &mut bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, status, is_generating, generate_requested));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.show_details && self.engine.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(360.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui, is_generating));
    }
}
