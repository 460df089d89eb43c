//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ChatError, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    ChatReplied(Result<String, ChatError>),
    ImageLoaded { url: String, image: PreviewImage },
    ImageFailed { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
}

/// A failed load, classified for the status bar.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn from_fetch(err: &FetchError) -> Self {
        let category = match err {
            FetchError::Transport(_) => UiErrorCategory::Transport,
            FetchError::Status { .. } => UiErrorCategory::Server,
            FetchError::Malformed(_) => UiErrorCategory::Validation,
        };
        Self {
            category,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Validation => "Malformed response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_categories_by_kind() {
        let status = UiError::from_fetch(&FetchError::Status { status: 404 });
        assert_eq!(status.category(), UiErrorCategory::Server);
        assert_eq!(status.status_line(), "Server error: server responded with status 404");

        let malformed = UiError::from_fetch(&FetchError::Malformed("missing field `user`".into()));
        assert_eq!(malformed.category(), UiErrorCategory::Validation);
        assert!(malformed.message().contains("`user`"));
    }

    #[test]
    fn transport_failures_read_as_network_errors() {
        let err = UiError::from_fetch(&FetchError::Transport("connection refused".into()));
        assert_eq!(err_label(err.category()), "Network");
    }
}
