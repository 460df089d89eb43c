//! Small reusable widgets: proficiency bars, markdown text, tags and image slots.

use std::collections::HashMap;

use client_core::markdown::{Block, BlockKind, Span};
use client_core::view::ProficiencyBar;
use eframe::egui;
use egui::TextureHandle;

use crate::controller::events::PreviewImage;
use crate::controller::reducer::ImageState;

/// GPU textures for decoded previews, keyed by image URL.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, TextureHandle>,
}

impl TextureCache {
    fn get_or_upload(
        &mut self,
        ctx: &egui::Context,
        url: &str,
        image: &PreviewImage,
    ) -> TextureHandle {
        if let Some(texture) = self.textures.get(url) {
            return texture.clone();
        }
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
        let texture = ctx.load_texture(
            format!("folio-image-{url}"),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(url.to_string(), texture.clone());
        texture
    }
}

/// Draws the image at `url` scaled to fit `max_size`, or a placeholder while
/// it is pending or when it could not be decoded.
pub fn image_slot(
    ui: &mut egui::Ui,
    textures: &mut TextureCache,
    images: &HashMap<String, ImageState>,
    url: Option<&str>,
    max_size: egui::Vec2,
    alt: &str,
) {
    let Some(url) = url else {
        placeholder(ui, max_size, alt);
        return;
    };
    match images.get(url) {
        Some(ImageState::Ready(image)) => {
            let texture = textures.get_or_upload(ui.ctx(), url, image);
            let size = fit_within(texture.size_vec2(), max_size);
            ui.add(egui::Image::new((texture.id(), size)));
        }
        Some(ImageState::Failed(_)) => placeholder(ui, max_size, alt),
        Some(ImageState::Requested) | None => {
            ui.add_sized(max_size, egui::Spinner::new());
        }
    }
}

fn placeholder(ui: &mut egui::Ui, size: egui::Vec2, alt: &str) {
    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(6.0)
        .show(ui, |ui| {
            ui.set_min_size(size);
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new(alt).weak());
            });
        });
}

fn fit_within(size: egui::Vec2, max: egui::Vec2) -> egui::Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return max;
    }
    let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
    size * scale
}

pub fn proficiency_bar(ui: &mut egui::Ui, title: &str, bar: &ProficiencyBar) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(title).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(&bar.label);
        });
    });
    ui.add(
        egui::ProgressBar::new(bar.fraction())
            .desired_height(8.0)
            .fill(super::theme::accent_color()),
    );
}

pub fn tag_row(ui: &mut egui::Ui, tags: &[&str]) {
    ui.horizontal_wrapped(|ui| {
        for tag in tags {
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(8, 2))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(*tag).small());
                });
        }
    });
}

pub fn section_heading(ui: &mut egui::Ui, title: &str) {
    ui.add_space(16.0);
    ui.heading(egui::RichText::new(title).strong());
    ui.separator();
}

pub fn markdown(ui: &mut egui::Ui, blocks: &[Block]) {
    for block in blocks {
        match &block.kind {
            BlockKind::CodeBlock => {
                egui::Frame::NONE
                    .fill(ui.visuals().extreme_bg_color)
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::same(6))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(block.plain_text().trim_end()).monospace());
                    });
            }
            BlockKind::ListItem { marker, depth } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(12.0 * (*depth as f32));
                    ui.label(marker.as_str());
                    spans(ui, &block.spans, None);
                });
            }
            BlockKind::Heading(level) => {
                let size = match level {
                    1 => 20.0,
                    2 => 17.0,
                    _ => 15.0,
                };
                ui.horizontal_wrapped(|ui| spans(ui, &block.spans, Some(size)));
            }
            BlockKind::Quote => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new("|").weak());
                    spans(ui, &block.spans, None);
                });
            }
            BlockKind::Paragraph => {
                ui.horizontal_wrapped(|ui| spans(ui, &block.spans, None));
            }
        }
    }
}

fn spans(ui: &mut egui::Ui, spans: &[Span], heading_size: Option<f32>) {
    ui.spacing_mut().item_spacing.x = 0.0;
    for span in spans {
        let mut text = egui::RichText::new(&span.text);
        if let Some(size) = heading_size {
            text = text.size(size).strong();
        }
        if span.style.strong {
            text = text.strong();
        }
        if span.style.emphasis {
            text = text.italics();
        }
        if span.style.code {
            text = text.code();
        }
        match &span.style.link {
            Some(url) => {
                ui.hyperlink_to(text, url);
            }
            None => {
                ui.label(text);
            }
        }
    }
}
