//! Per-session chat state.

use serde::Serialize;
#[cfg(feature = "native")]
use futures_util::StreamExt;
#[cfg(feature = "native")]
use tracing::{debug, warn};

#[cfg(feature = "native")]
use crate::chat::{CompletionSource, Result};
use crate::models::chat::{transcript, ChatMessage, Theme};
use crate::models::financials::ExtractedFinancials;
use crate::models::tax::TaxComputationResult;

/// Outcome of the most recent certificate upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadAnalysis {
    pub financials: ExtractedFinancials,
    pub computation: TaxComputationResult,
}

/// State owned by one interactive session.
///
/// History starts with the greeting as an assistant message and only ever
/// holds user and assistant turns.
#[derive(Debug, Clone)]
pub struct ChatSession {
    system_context: String,
    greeting: String,
    history: Vec<ChatMessage>,
    theme: Theme,
    analysis: Option<UploadAnalysis>,
}

impl ChatSession {
    pub fn new(system_context: impl Into<String>, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            system_context: system_context.into(),
            history: vec![ChatMessage::assistant(greeting.clone())],
            greeting,
            theme: Theme::default(),
            analysis: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip between light and dark; returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn analysis(&self) -> Option<&UploadAnalysis> {
        self.analysis.as_ref()
    }

    /// Replace the previous upload's results.
    pub fn record_upload(&mut self, analysis: UploadAnalysis) {
        self.analysis = Some(analysis);
    }

    pub fn transcript(&self) -> String {
        transcript(&self.history)
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage::user(content));
    }

    /// Append a completed assistant reply.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ChatMessage::assistant(content));
    }

    /// Messages sent to the service: system context, greeting, then history.
    pub fn request_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(self.system_context.clone()));
        messages.push(ChatMessage::assistant(self.greeting.clone()));
        messages.extend(self.history.iter().cloned());
        messages
    }
}

#[cfg(feature = "native")]
impl ChatSession {
    /// Ask a question and stream the answer.
    ///
    /// Each fragment is passed to `on_fragment` as it arrives; the full
    /// reply is appended to history once the stream is exhausted. If the
    /// stream fails, the partial reply is dropped and the question stays in
    /// history without an answer.
    pub async fn respond<S, F>(
        &mut self,
        source: &S,
        prompt: &str,
        mut on_fragment: F,
    ) -> Result<String>
    where
        S: CompletionSource,
        F: FnMut(&str),
    {
        self.push_user(prompt);

        let mut stream = source.stream_completion(&self.request_messages()).await?;
        let mut reply = String::new();

        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(text) => {
                    on_fragment(&text);
                    reply.push_str(&text);
                }
                Err(e) => {
                    warn!("Reply stream interrupted after {} chars: {}", reply.len(), e);
                    return Err(e);
                }
            }
        }

        debug!("Reply complete: {} chars", reply.len());
        self.push_assistant(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new("ctx", "Hello!");
        assert_eq!(session.history(), &[ChatMessage::assistant("Hello!")]);
        assert_eq!(session.theme(), Theme::Light);
        assert!(session.analysis().is_none());
    }

    #[test]
    fn test_request_messages_layout() {
        let session = ChatSession::new("You are a tax assistant.", "Hello!");
        let roles: Vec<Role> = session.request_messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::Assistant, Role::Assistant]);
    }

    #[test]
    fn test_pushed_turns_follow_greeting() {
        let mut session = ChatSession::new("ctx", "Hello!");
        session.push_user("What is 80D?");
        session.push_assistant("Health insurance premiums.");

        let sent = session.request_messages();
        assert_eq!(sent.len(), 5);
        assert_eq!(sent[3], ChatMessage::user("What is 80D?"));
        assert_eq!(
            session.transcript(),
            "Assistant: Hello!\nUser: What is 80D?\nAssistant: Health insurance premiums."
        );
    }

    #[test]
    fn test_toggle_theme_is_per_session() {
        let mut first = ChatSession::new("ctx", "Hello!");
        let second = ChatSession::new("ctx", "Hello!").with_theme(Theme::Dark);

        assert_eq!(first.toggle_theme(), Theme::Dark);
        assert_eq!(first.toggle_theme(), Theme::Light);
        assert_eq!(second.theme(), Theme::Dark);
    }

    #[test]
    fn test_transcript_uses_history() {
        let session = ChatSession::new("ctx", "Hello!");
        assert_eq!(session.transcript(), "Assistant: Hello!");
    }

    #[cfg(feature = "native")]
    mod streaming {
        use super::*;
        use crate::chat::FragmentStream;
        use crate::error::ChatError;
        use futures_util::stream;
        use std::sync::Mutex;

        /// Replays canned fragments and records the request it was given.
        struct ScriptedSource {
            fragments: Vec<std::result::Result<&'static str, &'static str>>,
            seen: Mutex<Vec<ChatMessage>>,
        }

        impl ScriptedSource {
            fn new(fragments: Vec<std::result::Result<&'static str, &'static str>>) -> Self {
                Self {
                    fragments,
                    seen: Mutex::new(Vec::new()),
                }
            }
        }

        impl CompletionSource for ScriptedSource {
            async fn stream_completion(&self, messages: &[ChatMessage]) -> Result<FragmentStream> {
                *self.seen.lock().unwrap() = messages.to_vec();
                let items: Vec<Result<String>> = self
                    .fragments
                    .iter()
                    .map(|f| match f {
                        Ok(text) => Ok(text.to_string()),
                        Err(msg) => Err(ChatError::Http(msg.to_string())),
                    })
                    .collect();
                Ok(stream::iter(items).boxed())
            }
        }

        #[tokio::test]
        async fn test_respond_accumulates_fragments() {
            let source = ScriptedSource::new(vec![Ok("Section 80C "), Ok("allows up to "), Ok("1.5 lakh.")]);
            let mut session = ChatSession::new("ctx", "Hello!");
            let mut shown = Vec::new();

            let reply = session
                .respond(&source, "What is 80C?", |f| shown.push(f.to_string()))
                .await
                .unwrap();

            assert_eq!(reply, "Section 80C allows up to 1.5 lakh.");
            assert_eq!(shown.len(), 3);
            assert_eq!(session.history().len(), 3);
            assert_eq!(session.history()[2], ChatMessage::assistant(reply));

            let sent = source.seen.lock().unwrap().clone();
            assert_eq!(sent.len(), 4);
            assert_eq!(sent[0], ChatMessage::system("ctx"));
            assert_eq!(sent[3], ChatMessage::user("What is 80C?"));
        }

        #[tokio::test]
        async fn test_stream_error_keeps_question_only() {
            let source = ScriptedSource::new(vec![Ok("partial"), Err("connection reset")]);
            let mut session = ChatSession::new("ctx", "Hello!");

            let err = session.respond(&source, "Refund status?", |_| {}).await.unwrap_err();

            assert!(matches!(err, ChatError::Http(_)));
            assert_eq!(session.history().last(), Some(&ChatMessage::user("Refund status?")));
        }
    }
}
