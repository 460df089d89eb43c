//! One function per portfolio section. Panels only read state; interactions
//! come back as values for the app shell to apply.

use client_core::markdown;
use client_core::view::{
    about_text, description_items, greeting, message_time, period_text, primary_links, social_links,
    technology_tags, ProficiencyBar,
};
use client_core::{ChatSession, RemoteResource};
use eframe::egui;
use shared::domain::{ChatRole, Profile};

use crate::controller::reducer::PortfolioState;
use crate::ui::theme::{self, ThemeMode};
use crate::ui::widgets::{self, TextureCache};

const AVATAR_SIZE: egui::Vec2 = egui::vec2(160.0, 160.0);
const CERTIFICATE_SIZE: egui::Vec2 = egui::vec2(420.0, 300.0);
const TIMELINE_AVATAR_SIZE: egui::Vec2 = egui::vec2(120.0, 120.0);
const BANNER_SIZE: egui::Vec2 = egui::vec2(360.0, 180.0);
const SKILL_ICON_SIZE: egui::Vec2 = egui::vec2(28.0, 28.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselAction {
    Previous,
    Next,
    GoTo(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    SubmitDraft,
    SubmitSuggestion(usize),
}

pub fn hero(
    ui: &mut egui::Ui,
    state: &PortfolioState,
    textures: &mut TextureCache,
    role_title: &str,
    mode: ThemeMode,
) {
    let profile = match state.profile.state() {
        RemoteResource::Loaded(profile) => profile,
        RemoteResource::Errored(err) => {
            ui.label(
                egui::RichText::new(format!("Error loading profile: {err}"))
                    .color(theme::error_color(mode)),
            );
            return;
        }
        RemoteResource::Unloaded => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
            return;
        }
    };

    ui.horizontal(|ui| {
        widgets::image_slot(
            ui,
            textures,
            &state.images,
            profile.avatar_url.as_deref(),
            AVATAR_SIZE,
            &profile.full_name,
        );
        ui.add_space(16.0);
        ui.vertical(|ui| {
            ui.heading(egui::RichText::new(greeting(profile)).size(28.0).strong());
            ui.label(
                egui::RichText::new(role_title)
                    .size(18.0)
                    .color(theme::accent_color()),
            );
            ui.add_space(8.0);
            social_row(ui, profile);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                for link in primary_links(profile) {
                    if ui.button(link.label).clicked() {
                        ui.ctx().open_url(egui::OpenUrl::new_tab(&link.url));
                    }
                }
            });
        });
    });
}

fn social_row(ui: &mut egui::Ui, profile: &Profile) {
    ui.horizontal_wrapped(|ui| {
        for link in social_links(profile) {
            ui.hyperlink_to(link.kind.label(), &link.url);
        }
    });
}

pub fn about(ui: &mut egui::Ui, state: &PortfolioState) {
    widgets::section_heading(ui, "About Me");
    let text = match state.profile.state().value() {
        Some(profile) => about_text(profile),
        None => client_core::view::DEFAULT_ABOUT_TEXT,
    };
    ui.label(text);
}

/// Avatar beside a Period / Title / Description table.
pub fn timeline(ui: &mut egui::Ui, state: &PortfolioState, textures: &mut TextureCache) {
    widgets::section_heading(ui, "Timeline");
    ui.horizontal_top(|ui| {
        widgets::image_slot(
            ui,
            textures,
            &state.images,
            state.avatar_url(),
            TIMELINE_AVATAR_SIZE,
            "Avatar",
        );
        ui.add_space(16.0);

        let Some(entries) = state.timeline.state().value() else {
            return;
        };
        egui::Grid::new("timeline-grid")
            .num_columns(3)
            .striped(true)
            .spacing([24.0, 10.0])
            .show(ui, |ui| {
                for header in ["Period", "Title", "Description"] {
                    ui.label(egui::RichText::new(header).strong());
                }
                ui.end_row();

                for entry in entries {
                    ui.label(egui::RichText::new(period_text(&entry.period)).weak());
                    ui.label(egui::RichText::new(&entry.title).strong());
                    ui.add(egui::Label::new(&entry.description).wrap());
                    ui.end_row();
                }
            });
    });
}

pub fn achievements(
    ui: &mut egui::Ui,
    state: &PortfolioState,
    textures: &mut TextureCache,
) -> Option<CarouselAction> {
    widgets::section_heading(ui, "Achievements");
    let certificates = state.certificates.state().value()?;
    let carousel = &state.carousel;
    let current = carousel.current(certificates)?;
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.horizontal(|ui| {
            if carousel.shows_controls() && ui.button("<").clicked() {
                action = Some(CarouselAction::Previous);
            }
            ui.vertical(|ui| {
                widgets::image_slot(
                    ui,
                    textures,
                    &state.images,
                    current.image_url.as_deref(),
                    CERTIFICATE_SIZE,
                    &current.name,
                );
                ui.label(egui::RichText::new(&current.name).strong());
            });
            if carousel.shows_controls() && ui.button(">").clicked() {
                action = Some(CarouselAction::Next);
            }
        });

        if carousel.shows_controls() {
            ui.horizontal(|ui| {
                for index in 0..carousel.len() {
                    let selected = carousel.current_index() == Some(index);
                    let dot = if selected { "\u{25CF}" } else { "\u{25CB}" };
                    if ui.selectable_label(selected, dot).clicked() {
                        action = Some(CarouselAction::GoTo(index));
                    }
                }
            });
        }
    });
    action
}

pub fn projects(ui: &mut egui::Ui, state: &PortfolioState, textures: &mut TextureCache) {
    widgets::section_heading(ui, "Projects");
    let Some(projects) = state.projects.state().value() else {
        return;
    };
    for project in projects {
        card(ui, |ui| {
            widgets::image_slot(
                ui,
                textures,
                &state.images,
                project.banner_url.as_deref(),
                BANNER_SIZE,
                &project.title,
            );
            ui.label(egui::RichText::new(&project.title).strong().size(16.0));
            for item in description_items(&project.description) {
                ui.label(format!("\u{2022} {item}"));
            }
            widgets::tag_row(ui, &technology_tags(&project.technologies));
            ui.label(egui::RichText::new(&project.stack).weak());
            ui.horizontal(|ui| {
                ui.hyperlink_to("Source", &project.repository_url);
                if let Some(live) = &project.live_url {
                    ui.hyperlink_to("Live", live);
                }
            });
        });
    }
}

pub fn skills(ui: &mut egui::Ui, state: &PortfolioState, textures: &mut TextureCache) {
    widgets::section_heading(ui, "Skills");
    let Some(skills) = state.skills.state().value() else {
        return;
    };
    egui::Grid::new("skills-grid")
        .num_columns(2)
        .spacing([16.0, 12.0])
        .show(ui, |ui| {
            for skill in skills {
                widgets::image_slot(
                    ui,
                    textures,
                    &state.images,
                    skill.icon_url.as_deref(),
                    SKILL_ICON_SIZE,
                    "",
                );
                ui.vertical(|ui| {
                    ui.set_min_width(280.0);
                    widgets::proficiency_bar(ui, &skill.title, &ProficiencyBar::new(skill.proficiency));
                });
                ui.end_row();
            }
        });
}

/// The floating assistant window. Returns what the user asked to send.
pub fn chat_window(ctx: &egui::Context, chat: &mut ChatSession) -> Option<ChatAction> {
    if !chat.is_open() {
        return None;
    }
    let mut open = true;
    let mut action = None;

    egui::Window::new("Chat")
        .open(&mut open)
        .default_size([380.0, 480.0])
        .resizable(true)
        .show(ctx, |ui| {
            let scroll_to_bottom = chat.take_scroll_request();
            egui::ScrollArea::vertical()
                .max_height(320.0)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in chat.transcript() {
                        let who = match message.role {
                            ChatRole::User => "You",
                            ChatRole::Assistant => "Assistant",
                        };
                        ui.label(egui::RichText::new(who).small().weak());
                        widgets::markdown(ui, &markdown::parse(&message.content));
                        ui.label(egui::RichText::new(message_time(message)).small().weak());
                        ui.add_space(6.0);
                    }
                    if chat.is_submitting() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(egui::RichText::new("Thinking...").weak());
                        });
                    }
                    if scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                for (index, suggestion) in chat.suggestions().iter().enumerate() {
                    let button = egui::Button::new(egui::RichText::new(suggestion).small());
                    if ui.add_enabled(!chat.is_submitting(), button).clicked() {
                        action = Some(ChatAction::SubmitSuggestion(index));
                    }
                }
            });

            ui.horizontal(|ui| {
                let focus = chat.take_focus_request();
                let can_send = chat.can_send();
                let response = ui.add(
                    egui::TextEdit::singleline(chat.input_mut())
                        .hint_text("Ask me anything...")
                        .desired_width(280.0),
                );
                if focus {
                    response.request_focus();
                }
                let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui.add_enabled(can_send, egui::Button::new("Send")).clicked();
                if (enter && can_send) || clicked {
                    action = Some(ChatAction::SubmitDraft);
                }
            });
        });

    if !open {
        chat.close();
    }
    action
}

fn card(ui: &mut egui::Ui, add: impl FnOnce(&mut egui::Ui)) {
    let mode = if ui.visuals().dark_mode {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    };
    egui::Frame::NONE
        .fill(theme::card_fill(mode))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add(ui);
        });
    ui.add_space(8.0);
}
