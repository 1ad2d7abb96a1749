//! App module - contains the main application state and logic

use crate::constants::vote_url;
use crate::settings::Settings;
use crate::theme;
use crate::types::{Choice, VoteState};
use crate::vote::VoteSubmitter;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Form state
    pub(crate) name_input: String,
    pub(crate) focus_name: bool,
    pub(crate) vote_state: Arc<Mutex<VoteState>>,
    pub(crate) submitter: VoteSubmitter,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Backend endpoint (resolved once at startup)
    pub(crate) backend_host: String,
    // Settings modal
    pub(crate) show_settings: bool,
    // Window tracking for saving on exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let backend_host = settings.backend_host_or_default();
        let submitter = VoteSubmitter::new(vote_url(&backend_host));
        let vote_state = submitter.state();

        Self {
            name_input: String::new(),
            focus_name: true,
            vote_state,
            submitter,
            runtime: tokio::runtime::Runtime::new().unwrap(),
            backend_host,
            show_settings: false,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            backend_host: Some(self.backend_host.clone()),
        };
        settings.save(&self.data_dir);
    }

    /// Forward a button press to the submitter with the current name input
    pub fn submit_vote(&self, choice: Choice, ctx: &egui::Context) {
        self.submitter.submit(choice, &self.name_input, &self.runtime, ctx);
    }
}
