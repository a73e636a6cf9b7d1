//! OpenAI-compatible streaming chat-completion client.

use std::collections::VecDeque;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tracing::{debug, info};

use super::sse::{SseDecoder, SseEvent};
use super::Result;
use crate::error::ChatError;
use crate::models::chat::ChatMessage;
use crate::models::config::ChatConfig;

/// Lazy, finite, non-restartable sequence of reply fragments.
///
/// The stream ends after the service's end marker or when the body closes;
/// a transport or decoding failure is yielded once and ends the stream.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// Anything that can stream a reply for a message list.
pub trait CompletionSource {
    fn stream_completion(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<FragmentStream>> + Send;
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
}

/// HTTP client for a hosted chat-completion service.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &ChatConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request<'a>(&'a self, messages: &'a [ChatMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages,
            stream: true,
        }
    }
}

impl CompletionSource for ChatClient {
    async fn stream_completion(&self, messages: &[ChatMessage]) -> Result<FragmentStream> {
        info!("Requesting completion from {} ({} messages)", self.model, messages.len());

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(messages))
            .send()
            .await
            .map_err(|e| ChatError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status { status, body });
        }

        Ok(fragments(response.bytes_stream()).boxed())
    }
}

struct FragmentState<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

impl<S> FragmentState<S> {
    /// Queue decoded events; returns true once the end marker is seen.
    fn enqueue(&mut self, events: Vec<SseEvent>) -> bool {
        for event in events {
            match event {
                SseEvent::Delta(text) => self.pending.push_back(text),
                SseEvent::Done => return true,
            }
        }
        false
    }
}

/// Turn a raw event-stream body into reply fragments.
pub fn fragments<S, B, E>(body: S) -> impl Stream<Item = Result<String>> + Send + 'static
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = FragmentState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }

            let decoded = match state.body.next().await {
                Some(Ok(chunk)) => state.decoder.feed(chunk.as_ref()),
                Some(Err(e)) => Err(ChatError::Http(e.to_string())),
                None => {
                    debug!("Completion body closed");
                    state.finished = true;
                    state.decoder.finish()
                }
            };

            match decoded {
                Ok(events) => {
                    if state.enqueue(events) {
                        state.finished = true;
                    }
                }
                Err(e) => {
                    state.finished = true;
                    state.pending.clear();
                    return Some((Err(e), state));
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;

    fn body(chunks: Vec<&'static str>) -> impl Stream<Item = std::result::Result<&'static [u8], String>> {
        stream::iter(chunks.into_iter().map(|c| Ok(c.as_bytes())))
    }

    #[tokio::test]
    async fn test_fragments_in_order() {
        let stream = fragments(body(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\ndata: {\"choi",
            "ces\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            "data: [DONE]\n\n",
        ]));

        let parts: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(parts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_stops_at_done_marker() {
        let stream = fragments(body(vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\ndata: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
        ]));

        let parts: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(parts, vec!["a"]);
    }

    #[tokio::test]
    async fn test_body_without_done_marker() {
        let stream = fragments(body(vec!["data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}"]));

        let parts: Vec<String> = stream.try_collect().await.unwrap();
        assert_eq!(parts, vec!["tail"]);
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let chunks: Vec<std::result::Result<&'static [u8], String>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n".as_slice()),
            Err("connection reset".to_string()),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n".as_slice()),
        ];
        let items: Vec<Result<String>> = fragments(stream::iter(chunks)).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "partial");
        assert!(matches!(&items[1], Err(ChatError::Http(msg)) if msg == "connection reset"));
    }

    #[test]
    fn test_request_body() {
        let client = ChatClient::new(&ChatConfig::default(), "key");
        let messages = vec![ChatMessage::system("ctx"), ChatMessage::user("hi")];

        let json = serde_json::to_value(client.request(&messages)).unwrap();
        assert_eq!(json["model"], "llama3-8b-8192");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }
}
