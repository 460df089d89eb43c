//! Backend commands queued from UI to backend worker.

use shared::protocol::ChatRequest;

pub enum BackendCommand {
    SendChat { request: ChatRequest },
    FetchImage { url: String },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SendChat { .. } => "send_chat",
            BackendCommand::FetchImage { .. } => "fetch_image",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
