//! Single-conversation chat session: a client-held transcript and one
//! request/response exchange at a time.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use shared::{
    domain::{ChatMessage, ChatRole, MessageId},
    protocol::{ChatRequest, ChatResponse, ChatTurn},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::error::ChatError;

pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I hit a snag. Try again?";

pub fn welcome_message(owner_name: &str) -> String {
    format!("**Hey! I'm {owner_name}'s AI assistant. What do you want to know?**")
}

pub fn default_suggestions(owner_name: &str) -> Vec<String> {
    vec![
        format!("What's {owner_name} good at?"),
        format!("What has {owner_name} worked on?"),
        format!("What are {owner_name}'s qualifications?"),
        format!("How can I collaborate with {owner_name}?"),
    ]
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

pub struct HttpChatTransport {
    http: Client,
    url: Url,
}

impl HttpChatTransport {
    pub fn new(http: Client, url: Url) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let res = self
            .http
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| ChatError::Transport(err.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
            });
        }
        let body: ChatResponse = res
            .json()
            .await
            .map_err(|err| ChatError::Malformed(err.to_string()))?;
        Ok(body.response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    EmptyInput,
    #[error("a request is already in flight")]
    RequestInFlight,
    #[error("no suggestion at index {0}")]
    UnknownSuggestion(usize),
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    next_id: u64,
    phase: ChatPhase,
    input: String,
    suggestions: Vec<String>,
    open: bool,
    focus_requested: bool,
    scroll_requested: bool,
}

impl ChatSession {
    pub fn new(welcome: impl Into<String>, suggestions: Vec<String>) -> Self {
        let mut session = Self {
            transcript: Vec::new(),
            next_id: 0,
            phase: ChatPhase::Idle,
            input: String::new(),
            suggestions,
            open: false,
            focus_requested: false,
            scroll_requested: false,
        };
        session.push(ChatRole::Assistant, welcome.into());
        session
    }

    pub fn for_owner(owner_name: &str) -> Self {
        Self::new(welcome_message(owner_name), default_suggestions(owner_name))
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == ChatPhase::Submitting
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Draft buffer for a text field to edit in place.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_typing(&self) -> bool {
        !self.input.is_empty()
    }

    /// Whether the send button should be enabled.
    pub fn can_send(&self) -> bool {
        !self.is_submitting() && !self.input.trim().is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus_requested = true;
        self.scroll_requested = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn submit_draft(&mut self) -> Result<ChatRequest, SubmitRejected> {
        let text = self.input.clone();
        self.begin_submit(&text)
    }

    pub fn submit_suggestion(&mut self, index: usize) -> Result<ChatRequest, SubmitRejected> {
        let suggestion = self
            .suggestions
            .get(index)
            .cloned()
            .ok_or(SubmitRejected::UnknownSuggestion(index))?;
        self.begin_submit(&suggestion)
    }

    /// Idle -> Submitting. The returned request carries the transcript as it
    /// was before this turn.
    pub fn begin_submit(&mut self, text: &str) -> Result<ChatRequest, SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::RequestInFlight);
        }
        if text.trim().is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }

        let history = self.transcript.iter().map(ChatTurn::from).collect();
        self.push(ChatRole::User, text.to_string());
        self.input.clear();
        self.phase = ChatPhase::Submitting;
        debug!(turns = self.transcript.len(), "chat request started");

        Ok(ChatRequest {
            message: text.to_string(),
            history,
        })
    }

    /// Submitting -> Idle. Returns the appended assistant message, or `None`
    /// when no request was in flight.
    pub fn finish(&mut self, outcome: Result<String, ChatError>) -> Option<&ChatMessage> {
        if !self.is_submitting() {
            warn!("chat reply arrived with no request in flight; dropping it");
            return None;
        }
        self.phase = ChatPhase::Idle;

        let content = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                warn!("chat request failed: {err}");
                CHAT_FALLBACK_REPLY.to_string()
            }
        };
        self.push(ChatRole::Assistant, content);
        self.transcript.last()
    }

    pub async fn submit<T>(&mut self, transport: &T) -> Result<&ChatMessage, SubmitRejected>
    where
        T: ChatTransport + ?Sized,
    {
        let request = self.submit_draft()?;
        let outcome = transport.send(&request).await;
        self.finish(outcome).ok_or(SubmitRejected::RequestInFlight)
    }

    fn push(&mut self, role: ChatRole, content: String) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.transcript.push(ChatMessage {
            id,
            role,
            content,
            created_at: Utc::now(),
        });
        if self.open {
            self.scroll_requested = true;
        }
    }
}
