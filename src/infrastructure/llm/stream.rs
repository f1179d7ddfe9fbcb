//! Reassembly of generation responses.
//!
//! The oracle answers in one of three framings: a single JSON object
//! (non-streaming requests), newline-delimited JSON chunks ending in a
//! `"done": true` chunk, or server-sent events whose `data` fields carry the
//! same chunk shapes. Each framing is decoded into a lazy stream of
//! [`Fragment`]s, which [`collect_text`] folds into one string.

use async_stream::try_stream;
use bytes::Buf;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt, TryStreamExt};
use serde_json::Value;
use std::io;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub done: bool,
}

/// Parses one chunk payload: an NDJSON line or the `data` of one event.
/// Blank payloads yield `None`; `[DONE]` ends the response.
pub fn parse_payload(payload: &str) -> Result<Option<Fragment>, DomainError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(None);
    }
    if payload == "[DONE]" {
        return Ok(Some(Fragment {
            text: String::new(),
            done: true,
        }));
    }

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| DomainError::generation(format!("malformed response chunk: {e}")))?;
    fragment_from_value(&value).map(Some)
}

/// Extracts text from one response object.
///
/// Accepted shapes: Ollama chat (`message.content`), Ollama generate
/// (`response`), and OpenAI-compatible objects and deltas (`choices[0]`).
pub fn fragment_from_value(value: &Value) -> Result<Fragment, DomainError> {
    if let Some(error) = value.get("error") {
        let detail = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(DomainError::generation(detail));
    }

    if let Some(choice) = value.pointer("/choices/0") {
        let (text, complete_object) = match choice.pointer("/message/content") {
            Some(content) => (content, true),
            None => (choice.pointer("/delta/content").unwrap_or(&Value::Null), false),
        };
        let finished = choice
            .get("finish_reason")
            .is_some_and(|reason| !reason.is_null());
        return Ok(Fragment {
            text: text.as_str().unwrap_or_default().to_string(),
            done: complete_object || finished,
        });
    }

    let text = value
        .pointer("/message/content")
        .or_else(|| value.get("response"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let done = value.get("done").and_then(Value::as_bool).unwrap_or(false);

    Ok(Fragment { text, done })
}

/// Frames a newline-delimited JSON body. A final line without a trailing
/// newline is still parsed.
pub fn ndjson_fragments<S, B, E>(body: S) -> impl Stream<Item = Result<Fragment, DomainError>>
where
    S: Stream<Item = Result<B, E>>,
    B: Buf,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let reader = StreamReader::new(body.map_err(io::Error::other));

    try_stream! {
        let mut lines = Box::pin(FramedRead::new(reader, LinesCodec::new()));

        while let Some(line) = lines.next().await {
            let line = line
                .map_err(|e| DomainError::generation(format!("response stream failed: {e}")))?;
            if let Some(fragment) = parse_payload(&line)? {
                yield fragment;
            }
        }
    }
}

/// Decodes a `text/event-stream` body. Comments, keep-alives and event
/// names are handled by the event parser; only `data` reaches
/// [`parse_payload`].
pub fn sse_fragments<S, B, E>(body: S) -> impl Stream<Item = Result<Fragment, DomainError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    try_stream! {
        let mut events = Box::pin(body.eventsource());

        while let Some(event) = events.next().await {
            let event = event
                .map_err(|e| DomainError::generation(format!("event stream failed: {e}")))?;
            if let Some(fragment) = parse_payload(&event.data)? {
                yield fragment;
            }
        }
    }
}

/// Concatenates fragment text in arrival order up to and including the first
/// `done` fragment. Anything after it is not read.
pub async fn collect_text<S>(fragments: S) -> Result<String, DomainError>
where
    S: Stream<Item = Result<Fragment, DomainError>>,
{
    let mut fragments = Box::pin(fragments);
    let mut text = String::new();

    while let Some(fragment) = fragments.next().await {
        let fragment = fragment?;
        text.push_str(&fragment.text);
        if fragment.done {
            return Ok(text);
        }
    }

    Err(DomainError::generation(
        "response ended before the completion marker",
    ))
}
