use std::time::{Duration, Instant};

use client_core::view::ROLE_TITLES;
use client_core::{ChatError, PortfolioClient, Settings};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use tokio::runtime::Handle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::PortfolioState;
use crate::ui::panels::{self, CarouselAction, ChatAction};
use crate::ui::theme::{self, PersistedDesktopSettings, ThemeMode, SETTINGS_STORAGE_KEY};
use crate::ui::widgets::TextureCache;

const PENDING_REPAINT: Duration = Duration::from_millis(100);
const IDLE_REPAINT: Duration = Duration::from_secs(1);

pub struct PortfolioApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: PortfolioState,
    textures: TextureCache,
    theme: ThemeMode,
    applied_theme: Option<ThemeMode>,
    started_at: Instant,
    role_interval: Duration,
}

impl PortfolioApp {
    /// Builds the shell and mounts every section, starting its one load.
    pub fn new(
        settings: &Settings,
        client: &PortfolioClient,
        runtime: &Handle,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: PersistedDesktopSettings,
    ) -> Self {
        let now = Instant::now();
        let mut state = PortfolioState::new(settings, now);
        state.mount_all(client, runtime);
        Self {
            cmd_tx,
            ui_rx,
            state,
            textures: TextureCache::default(),
            theme: persisted.theme,
            applied_theme: None,
            started_at: now,
            role_interval: settings.carousel_interval(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply(event);
        }
    }

    fn request_new_images(&mut self) {
        for url in self.state.take_unrequested_images() {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::FetchImage { url },
                &mut self.state.status,
            );
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme != Some(self.theme) {
            ctx.set_visuals(theme::visuals_for_mode(self.theme));
            self.applied_theme = Some(self.theme);
        }
    }

    fn role_title(&self, now: Instant) -> &'static str {
        let step = self.role_interval.as_millis().max(1);
        let elapsed = now.saturating_duration_since(self.started_at).as_millis();
        ROLE_TITLES[((elapsed / step) % ROLE_TITLES.len() as u128) as usize]
    }

    fn apply_carousel_action(&mut self, action: CarouselAction, now: Instant) {
        let carousel = &mut self.state.carousel;
        let result = match action {
            CarouselAction::Previous => {
                carousel.previous(now);
                Ok(())
            }
            CarouselAction::Next => {
                carousel.next(now);
                Ok(())
            }
            CarouselAction::GoTo(index) => carousel.go_to(index, now),
        };
        if let Err(err) = result {
            tracing::debug!("ignored carousel request: {err}");
        }
    }

    fn apply_chat_action(&mut self, action: ChatAction) {
        let chat = &mut self.state.chat;
        let submitted = match action {
            ChatAction::SubmitDraft => chat.submit_draft(),
            ChatAction::SubmitSuggestion(index) => chat.submit_suggestion(index),
        };
        let request = match submitted {
            Ok(request) => request,
            Err(rejected) => {
                tracing::debug!("chat submission rejected: {rejected}");
                return;
            }
        };

        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SendChat { request },
            &mut self.state.status,
        );
        if !queued {
            // Nothing will ever answer this turn; close it with the fallback reply.
            self.state
                .chat
                .finish(Err(ChatError::Transport(self.state.status.clone())));
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("folio-top-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Portfolio").strong().size(18.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let chat_label = if self.state.chat.is_open() {
                        "Close chat"
                    } else {
                        "Chat"
                    };
                    if ui.button(chat_label).clicked() {
                        self.state.chat.toggle();
                    }
                    if ui.button(self.theme.toggle_label()).clicked() {
                        self.theme = self.theme.toggled();
                    }
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("folio-status-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state.any_pending() {
                    ui.spinner();
                }
                ui.label(egui::RichText::new(&self.state.status).small());
            });
        });
    }

    fn show_sections(&mut self, ctx: &egui::Context, now: Instant) -> Option<CarouselAction> {
        let role_title = self.role_title(now);
        let mut carousel_action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.set_max_width(960.0);
                    panels::hero(ui, &self.state, &mut self.textures, role_title, self.theme);
                    panels::about(ui, &self.state);
                    panels::timeline(ui, &self.state, &mut self.textures);
                    carousel_action = panels::achievements(ui, &self.state, &mut self.textures);
                    panels::projects(ui, &self.state, &mut self.textures);
                    panels::skills(ui, &self.state, &mut self.textures);
                });
        });
        carousel_action
    }

    fn next_repaint(&self, now: Instant) -> Duration {
        if self.state.any_pending() || self.state.chat.is_submitting() {
            return PENDING_REPAINT;
        }
        let until_role = {
            let step = self.role_interval.as_millis().max(1);
            let elapsed = now.saturating_duration_since(self.started_at).as_millis();
            Duration::from_millis((step - elapsed % step) as u64)
        };
        [self.state.carousel.time_until_tick(now), Some(until_role)]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(IDLE_REPAINT)
            .min(IDLE_REPAINT)
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.process_ui_events();
        self.state.poll_sections(now);
        self.request_new_images();
        self.state.carousel.tick(now);
        self.apply_theme_if_needed(ctx);

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        if let Some(action) = self.show_sections(ctx, now) {
            self.apply_carousel_action(action, now);
        }
        if let Some(action) = panels::chat_window(ctx, &mut self.state.chat) {
            self.apply_chat_action(action);
        }

        ctx.request_repaint_after(self.next_repaint(now));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedDesktopSettings { theme: self.theme };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

impl Drop for PortfolioApp {
    fn drop(&mut self) {
        self.state.unmount_all();
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
