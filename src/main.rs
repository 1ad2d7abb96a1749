#![windows_subsystem = "windows"]
//! Voting App - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod settings;
mod theme;
mod types;
mod ui;
mod vote;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use types::Choice;
use ui::components::{action_button, icon_line};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "voting-app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,voting_app=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Voting App");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Voting App starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(420.0, 520.0)))
        .with_min_inner_size([360.0, 440.0])
        .with_title("Voting App");

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Voting App",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        self.render_settings_modal(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(24, 0)),
            )
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();

                // Header
                ui.add_space(32.0);
                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Voting App")
                                .size(26.0)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(24.0);

                // Name input with border style
                theme::input_frame().show(ui, |ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(egui_phosphor::regular::USER)
                                    .size(14.0)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.name_input)
                                .hint_text("Enter your name")
                                .frame(false)
                                .desired_width(ui.available_width()),
                        );
                        if self.focus_name {
                            self.focus_name = false;
                            response.request_focus();
                        }
                    });
                });

                ui.add_space(24.0);

                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Vote for your choice:")
                                .size(14.0)
                                .color(theme::TEXT_MUTED),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(8.0);

                // Choice buttons. Both stay clickable while a POST is pending;
                // racing submissions resolve last-response-wins.
                let btn_width = (ui.available_width() - 8.0) / 2.0;
                let mut clicked: Option<Choice> = None;
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 8.0;
                    for choice in Choice::ALL {
                        let (fill, text_color) = match choice {
                            Choice::First => (theme::BTN_CHOICE_ONE, theme::BTN_CHOICE_ONE_TEXT),
                            Choice::Second => (theme::BTN_CHOICE_TWO, theme::BTN_CHOICE_TWO_TEXT),
                        };
                        let label = format!("Vote for {}", choice.label());
                        if action_button(
                            ui,
                            egui::vec2(btn_width, theme::BUTTON_HEIGHT_LARGE),
                            fill,
                            text_color,
                            &label,
                        ) {
                            clicked = Some(choice);
                        }
                    }
                });
                if let Some(choice) = clicked {
                    self.submit_vote(choice, ctx);
                }

                ui.add_space(24.0);

                let (last_choice, last_error, in_flight) = {
                    let s = self.vote_state.lock().unwrap();
                    (s.last_choice, s.last_error.clone(), s.in_flight)
                };

                if in_flight > 0 {
                    ui.vertical_centered(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("Submitting...")
                                    .size(12.0)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                    ui.add_space(4.0);
                }

                if let Some(choice) = last_choice {
                    icon_line(
                        ui,
                        egui_phosphor::regular::CHECK_CIRCLE,
                        &format!("You voted for: {}", choice.label()),
                        theme::STATUS_SUCCESS,
                    );
                    ui.add_space(4.0);
                }

                if let Some(error) = &last_error {
                    icon_line(ui, egui_phosphor::regular::X_CIRCLE, error, theme::STATUS_ERROR);
                }

                // Footer - version left, settings gear right
                let footer_y = panel_rect.bottom() - 18.0;
                ui.painter().text(
                    egui::pos2(panel_rect.left(), footer_y),
                    egui::Align2::LEFT_CENTER,
                    format!("v{}", APP_VERSION),
                    egui::FontId::proportional(10.0),
                    theme::TEXT_DIM,
                );
                let gear_rect = egui::Rect::from_center_size(
                    egui::pos2(panel_rect.right() - 10.0, footer_y),
                    egui::vec2(20.0, 20.0),
                );
                let gear_resp = ui.interact(gear_rect, ui.id().with("settings_gear"), egui::Sense::click());
                let gear_color = if gear_resp.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    theme::TEXT_PRIMARY
                } else {
                    theme::TEXT_DIM
                };
                ui.painter().text(
                    gear_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::GEAR,
                    egui::FontId::proportional(14.0),
                    gear_color,
                );
                if gear_resp.clicked() {
                    self.show_settings = true;
                }
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// SETTINGS MODAL
// ============================================================================

impl App {
    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(300.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(close_size, close_size),
                            egui::Sense::click(),
                        );
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Backend section
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Backend").size(13.0).color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(vote_url(&self.backend_host))
                            .size(13.0)
                            .color(theme::TEXT_SECONDARY),
                    )
                    .selectable(false),
                );
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Set \"backend_host\" in settings.json to change it")
                            .size(11.0)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Session section
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Session").size(13.0).color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                let requests_sent = self.vote_state.lock().unwrap().requests_sent;
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!("Votes sent: {}", requests_sent))
                            .size(13.0)
                            .color(theme::TEXT_SECONDARY),
                    )
                    .selectable(false),
                );

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Logs section
                ui.add(
                    egui::Label::new(egui::RichText::new("Logs").size(13.0).color(theme::ACCENT))
                        .selectable(false),
                );
                ui.add_space(2.0);
                let open_logs = format!("{}  Open Logs", egui_phosphor::regular::FOLDER_OPEN);
                if action_button(
                    ui,
                    egui::vec2(110.0, 26.0),
                    theme::BTN_DEFAULT,
                    theme::TEXT_PRIMARY,
                    &open_logs,
                ) {
                    let _ = open::that(self.data_dir.join("logs"));
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}
