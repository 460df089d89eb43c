//! What each section shows, computed from validated domain records.

use chrono::Local;
use shared::domain::{ChatMessage, Period, Proficiency, Profile};

pub const DEFAULT_ABOUT_TEXT: &str =
    "Professional developer with a passion for creating impactful digital solutions.";
pub const PRESENT_LABEL: &str = "Present";
pub const MAX_SOCIAL_LINKS: usize = 5;

pub const ROLE_TITLES: [&str; 5] = [
    "Full Stack Developer",
    "Mobile Developer",
    "UI/UX Designer",
    "Data Analyst",
    "IoT Engineer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialKind {
    LinkedIn,
    Mail,
    Instagram,
    Facebook,
}

impl SocialKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Mail => "Email",
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub kind: SocialKind,
    pub url: String,
}

/// Social links with a usable URL, in display order.
pub fn social_links(profile: &Profile) -> Vec<SocialLink> {
    let candidates = [
        (SocialKind::LinkedIn, profile.linkedin_url.clone()),
        (
            SocialKind::Mail,
            profile.email.as_ref().map(|email| format!("mailto:{email}")),
        ),
        (SocialKind::Instagram, profile.instagram_url.clone()),
        (SocialKind::Facebook, profile.facebook_url.clone()),
    ];

    candidates
        .into_iter()
        .filter_map(|(kind, url)| {
            url.filter(|u| !u.trim().is_empty())
                .map(|url| SocialLink { kind, url })
        })
        .take(MAX_SOCIAL_LINKS)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryLink {
    pub label: &'static str,
    pub url: String,
}

/// The GitHub and Resume buttons next to the greeting.
pub fn primary_links(profile: &Profile) -> Vec<PrimaryLink> {
    [
        ("Github", profile.github_url.as_ref()),
        ("Resume", profile.resume_url.as_ref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        url.map(|url| PrimaryLink {
            label,
            url: url.clone(),
        })
    })
    .collect()
}

pub fn greeting(profile: &Profile) -> String {
    format!("Hi! I'm {}", profile.full_name)
}

pub fn about_text(profile: &Profile) -> &str {
    profile.about_me.as_deref().unwrap_or(DEFAULT_ABOUT_TEXT)
}

pub fn description_items(description: &str) -> Vec<&str> {
    description
        .split(". ")
        .filter(|item| !item.trim().is_empty())
        .collect()
}

pub fn technology_tags(technologies: &str) -> Vec<&str> {
    technologies
        .split(", ")
        .filter(|tag| !tag.trim().is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProficiencyBar {
    pub width_percent: u8,
    pub label: String,
}

impl ProficiencyBar {
    pub fn new(proficiency: Proficiency) -> Self {
        let percent = proficiency.percent();
        Self {
            width_percent: percent,
            label: format!("{percent}%"),
        }
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.width_percent) / 100.0
    }
}

pub fn period_text(period: &Period) -> String {
    format!(
        "{} - {}",
        period.from,
        period.to.as_deref().unwrap_or(PRESENT_LABEL)
    )
}

/// `HH:MM` in local time, shown under each chat bubble.
pub fn message_time(message: &ChatMessage) -> String {
    message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            full_name: "Amit".into(),
            ..Profile::default()
        }
    }

    #[test]
    fn only_present_social_urls_are_shown() {
        let p = Profile {
            email: Some("amit@example.test".into()),
            facebook_url: Some("https://facebook.test/amit".into()),
            instagram_url: Some(String::new()),
            ..profile()
        };
        let links = social_links(&p);
        assert_eq!(
            links,
            vec![
                SocialLink {
                    kind: SocialKind::Mail,
                    url: "mailto:amit@example.test".into()
                },
                SocialLink {
                    kind: SocialKind::Facebook,
                    url: "https://facebook.test/amit".into()
                },
            ]
        );
    }

    #[test]
    fn profile_without_socials_has_no_links() {
        assert!(social_links(&profile()).is_empty());
    }

    #[test]
    fn primary_links_skip_missing_resume() {
        let p = Profile {
            github_url: Some("https://github.test/amit".into()),
            ..profile()
        };
        assert_eq!(
            primary_links(&p),
            vec![PrimaryLink {
                label: "Github",
                url: "https://github.test/amit".into()
            }]
        );
    }

    #[test]
    fn about_falls_back_to_default_blurb() {
        assert_eq!(about_text(&profile()), DEFAULT_ABOUT_TEXT);
        assert_eq!(greeting(&profile()), "Hi! I'm Amit");
    }

    #[test]
    fn skill_bar_width_and_label_match_proficiency() {
        let bar = ProficiencyBar::new(Proficiency::try_from(87).expect("valid"));
        assert_eq!(bar.width_percent, 87);
        assert_eq!(bar.label, "87%");
    }

    #[test]
    fn open_ended_period_reads_present() {
        let period = Period {
            from: "2020".into(),
            to: None,
        };
        assert_eq!(period_text(&period), "2020 - Present");

        let closed = Period {
            from: "2018".into(),
            to: Some("2020".into()),
        };
        assert_eq!(period_text(&closed), "2018 - 2020");
    }

    #[test]
    fn description_splits_on_sentence_boundaries() {
        assert_eq!(
            description_items("Built an API. Deployed it on Vercel. "),
            vec!["Built an API", "Deployed it on Vercel"]
        );
        assert!(description_items("").is_empty());
    }

    #[test]
    fn technologies_split_on_comma_space() {
        assert_eq!(
            technology_tags("React, Node.js, MongoDB"),
            vec!["React", "Node.js", "MongoDB"]
        );
    }

    #[test]
    fn message_time_is_hours_and_minutes() {
        use shared::domain::{ChatRole, MessageId};

        let message = ChatMessage {
            id: MessageId(0),
            role: ChatRole::Assistant,
            content: "hi".into(),
            created_at: "2024-03-05T09:07:00Z".parse().expect("timestamp"),
        };
        let time = message_time(&message);
        let (hours, minutes) = time.split_once(':').expect("HH:MM");
        assert_eq!((hours.len(), minutes.len()), (2, 2));
        assert!(hours.parse::<u8>().expect("hours") < 24);
        assert!(minutes.parse::<u8>().expect("minutes") < 60);
    }
}
