//! Plain-text rendering of each section for the terminal.

use std::fmt::Write as _;

use client_core::view::{
    about_text, description_items, greeting, period_text, primary_links, social_links,
    technology_tags, ProficiencyBar,
};
use shared::domain::{CertificateEntry, Profile, ProjectEntry, SkillEntry, TimelineEntry};

const BAR_WIDTH: usize = 20;

pub fn profile(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", greeting(profile));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", about_text(profile));
    for link in primary_links(profile) {
        let _ = writeln!(out, "  {}: {}", link.label, link.url);
    }
    for link in social_links(profile) {
        let _ = writeln!(out, "  {}: {}", link.kind.label(), link.url);
    }
    out
}

pub fn certificates(entries: &[CertificateEntry]) -> String {
    let mut out = String::new();
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", index + 1, entry.name);
    }
    out
}

pub fn projects(entries: &[ProjectEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}", entry.title);
        for item in description_items(&entry.description) {
            let _ = writeln!(out, "  - {item}");
        }
        let tags = technology_tags(&entry.technologies);
        if !tags.is_empty() {
            let _ = writeln!(out, "  [{}]", tags.join("] ["));
        }
        let _ = writeln!(out, "  stack: {}", entry.stack);
        let _ = writeln!(out, "  source: {}", entry.repository_url);
        if let Some(live) = &entry.live_url {
            let _ = writeln!(out, "  live: {live}");
        }
    }
    out
}

pub fn skills(entries: &[SkillEntry]) -> String {
    let width = entries.iter().map(|e| e.title.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let bar = ProficiencyBar::new(entry.proficiency);
        let filled = usize::from(bar.width_percent) * BAR_WIDTH / 100;
        let _ = writeln!(
            out,
            "{:<width$}  {}{}  {}",
            entry.title,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            bar.label,
        );
    }
    out
}

pub fn timeline(entries: &[TimelineEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}  ({})", entry.title, period_text(&entry.period));
        let _ = writeln!(out, "  {}", entry.description);
    }
    out
}
