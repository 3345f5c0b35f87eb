//src/coach.rs
//! AI coaching chat.
//!
//! A [`CoachSession`] owns the transcript and allows a single request in
//! flight. Submitting appends the user's message right away, then runs the
//! completion on a background thread that reports back over a channel. The
//! outcome, whatever it is, becomes exactly one model message.

use crate::config::CoachConfig;
use crate::model::{format_weight, ChatMessage, LogEntry, WorkoutDay};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

pub const GREETING: &str = "Hi! I am your AI Gym Coach. How can I help you with your workout today?";
pub const MISSING_REPLY_MESSAGE: &str = "Connection error. Please try again.";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error connecting to AI service.";

const ROLE_DESCRIPTION: &str = "You are an expert fitness coach.";
const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachError {
    #[error("The coach is still answering the previous question.")]
    Busy,
    #[error("Prompt cannot be empty.")]
    EmptyPrompt,
    #[error("No API key configured. Set GEMINI_API_KEY or coach.api_key in {0}.")]
    MissingApiKey(String),
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("Request to the completion endpoint failed: {0}")]
    Transport(String),
    #[error("Could not decode the completion response: {0}")]
    Decode(String),
}

/// How much of the user's data goes into the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextKind {
    #[default]
    General,
    /// Schedule plus the most recent log entries.
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPrompt {
    Shorten,
    Meal,
    Analyze,
    Form,
}

impl QuickPrompt {
    pub const fn prompt(self) -> &'static str {
        match self {
            QuickPrompt::Analyze => "Analyze my recent lifting logs. Am I being consistent? Do you see any progress trends?",
            QuickPrompt::Meal => "Suggest a high-protein post-workout meal based on my most recent workout focus.",
            QuickPrompt::Shorten => "I have only 30 mins today. Modify today's scheduled workout to be shorter but intense.",
            QuickPrompt::Form => "Give me form tips for the main compound movement in today's workout.",
        }
    }

    pub const fn context_kind(self) -> ContextKind {
        match self {
            QuickPrompt::Analyze => ContextKind::Logs,
            _ => ContextKind::General,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            QuickPrompt::Shorten => "Short on time?",
            QuickPrompt::Meal => "Meal idea",
            QuickPrompt::Analyze => "Analyze progress",
            QuickPrompt::Form => "Form check",
        }
    }
}

impl fmt::Display for QuickPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuickPrompt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shorten" => Ok(Self::Shorten),
            "meal" => Ok(Self::Meal),
            "analyze" | "analyse" => Ok(Self::Analyze),
            "form" => Ok(Self::Form),
            other => Err(format!("Unknown quick prompt '{other}'")),
        }
    }
}

#[derive(Serialize)]
struct DaySummary<'a> {
    day: &'a str,
    focus: &'a str,
    exercises: String,
}

fn week_summary_json(days: &[WorkoutDay]) -> String {
    let summary: Vec<DaySummary> = days
        .iter()
        .map(|d| DaySummary {
            day: &d.day,
            focus: &d.focus,
            exercises: d.exercise_names().collect::<Vec<_>>().join(", "),
        })
        .collect();
    // Plain strings only, serialization cannot fail.
    serde_json::to_string(&summary).unwrap_or_default()
}

/// Builds the text describing the user's schedule (and optionally logs) for the model.
/// `recent_logs` are listed as given, newest first.
pub fn build_context(
    week1: &[WorkoutDay],
    week2: &[WorkoutDay],
    recent_logs: &[LogEntry],
    kind: ContextKind,
) -> String {
    let mut context = format!(
        "{ROLE_DESCRIPTION}\nCurrent User Schedule Week 1: {}\nCurrent User Schedule Week 2: {}\n",
        week_summary_json(week1),
        week_summary_json(week2)
    );

    if kind == ContextKind::Logs {
        let recent = recent_logs
            .iter()
            .map(|l| format!("{}: {} @ {}kg", l.date.format("%Y-%m-%d"), l.exercise, format_weight(l.weight)))
            .collect::<Vec<_>>()
            .join("\n");
        context.push_str("\n\nUser logs:\n");
        context.push_str(&recent);
    }
    context
}

/// The single text part sent to the endpoint.
pub fn request_text(context: &str, prompt: &str) -> String {
    format!("System Context: {context}\n\nUser Question: {prompt}")
}

/// A text-in, text-out completion backend.
pub trait CompletionClient: Send + Sync {
    /// Returns `Ok(None)` when the endpoint answered without any reply text.
    /// # Errors
    /// `CoachError::Transport` or `CoachError::Decode` on failure.
    fn complete(&self, text: &str) -> Result<Option<String>, CoachError>;
}

// --- Gemini wire types ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

impl GenerateRequest {
    fn from_text(text: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: text.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn reply_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// # Errors
    /// `CoachError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, CoachError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| CoachError::ClientBuild(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Builds a client from config. `GEMINI_API_KEY` takes precedence over `coach.api_key`.
    /// # Errors
    /// `CoachError::MissingApiKey` if neither is set.
    pub fn from_config(config: &CoachConfig, config_path_hint: &str) -> Result<Self, CoachError> {
        let api_key = resolve_api_key(std::env::var(API_KEY_ENV_VAR).ok(), config.api_key.as_deref())
            .ok_or_else(|| CoachError::MissingApiKey(config_path_hint.to_string()))?;
        Self::new(api_key, config.model.clone(), config.api_base_url.clone())
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

impl CompletionClient for GeminiClient {
    #[instrument(skip(self, text), fields(model = %self.model))]
    fn complete(&self, text: &str) -> Result<Option<String>, CoachError> {
        debug!(chars = text.len(), "sending completion request");
        let response = self
            .client
            .post(self.build_url())
            .json(&GenerateRequest::from_text(text))
            .send()
            .map_err(|e| CoachError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| CoachError::Transport(e.without_url().to_string()))?;
        if !status.is_success() {
            warn!(status = %status, "completion endpoint returned an error status");
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| CoachError::Decode(e.to_string()))?;
        Ok(parsed.reply_text())
    }
}

/// Picks the key from the environment, then from config. Blank values count as unset.
fn resolve_api_key(from_env: Option<String>, from_config: Option<&str>) -> Option<String> {
    from_env
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            from_config
                .filter(|key| !key.trim().is_empty())
                .map(str::to_string)
        })
}

// --- Session ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachState {
    Idle,
    AwaitingReply,
}

type Outcome = Result<Option<String>, CoachError>;

pub struct CoachSession {
    client: Arc<dyn CompletionClient>,
    transcript: Vec<ChatMessage>,
    pending: Option<Receiver<Outcome>>,
}

impl CoachSession {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            transcript: vec![ChatMessage::model(GREETING)],
            pending: None,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn state(&self) -> CoachState {
        if self.pending.is_some() {
            CoachState::AwaitingReply
        } else {
            CoachState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Appends the prompt to the transcript and starts the request.
    /// # Errors
    /// `CoachError::Busy` while a reply is pending, `CoachError::EmptyPrompt` for blank input.
    /// Neither touches the transcript.
    pub fn submit(&mut self, prompt: &str, context: &str) -> Result<(), CoachError> {
        if self.is_busy() {
            return Err(CoachError::Busy);
        }
        if prompt.trim().is_empty() {
            return Err(CoachError::EmptyPrompt);
        }

        self.transcript.push(ChatMessage::user(prompt));
        let text = request_text(context, prompt);
        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The session may be gone by now; the outcome is then dropped.
            let _ = tx.send(client.complete(&text));
        });
        self.pending = Some(rx);
        debug!("coach request started");
        Ok(())
    }

    /// Applies a finished reply if one has arrived. Returns true if the transcript changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(CoachError::Transport("request task ended without a reply".to_string()))
            }
        };
        self.finish(outcome);
        true
    }

    /// Blocks until the pending reply (if any) is in the transcript.
    pub fn wait(&mut self) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        let outcome = rx.recv().unwrap_or_else(|_| {
            Err(CoachError::Transport("request task ended without a reply".to_string()))
        });
        self.finish(outcome);
    }

    /// The last model message, if the transcript ends with one.
    pub fn last_reply(&self) -> Option<&str> {
        self.transcript
            .last()
            .filter(|m| m.role == crate::model::ChatRole::Model)
            .map(|m| m.text.as_str())
    }

    fn finish(&mut self, outcome: Outcome) {
        self.pending = None;
        let text = match outcome {
            Ok(Some(reply)) if !reply.is_empty() => reply,
            Ok(_) => {
                warn!("completion response had no reply text");
                MISSING_REPLY_MESSAGE.to_string()
            }
            Err(e) => {
                error!(error = %e, "coach request failed");
                TRANSPORT_ERROR_MESSAGE.to_string()
            }
        };
        self.transcript.push(ChatMessage::model(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{default_week1, default_week2};
    use crate::model::ChatRole;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct FixedReply(Option<String>);

    impl CompletionClient for FixedReply {
        fn complete(&self, _text: &str) -> Result<Option<String>, CoachError> {
            Ok(self.0.clone())
        }
    }

    struct Unreachable;

    impl CompletionClient for Unreachable {
        fn complete(&self, _text: &str) -> Result<Option<String>, CoachError> {
            Err(CoachError::Transport("connection refused".to_string()))
        }
    }

    /// Holds every request until the test releases it.
    struct Gated {
        release: Mutex<Receiver<()>>,
        seen: Mutex<Vec<String>>,
    }

    impl CompletionClient for Gated {
        fn complete(&self, text: &str) -> Result<Option<String>, CoachError> {
            self.seen.lock().unwrap().push(text.to_string());
            let _ = self.release.lock().unwrap().recv();
            Ok(Some("Done".to_string()))
        }
    }

    #[test]
    fn new_session_starts_with_greeting() {
        let session = CoachSession::new(Arc::new(FixedReply(None)));
        assert_eq!(session.transcript(), &[ChatMessage::model(GREETING)]);
        assert_eq!(session.state(), CoachState::Idle);
    }

    #[test]
    fn reply_is_appended_after_user_message() {
        let mut session = CoachSession::new(Arc::new(FixedReply(Some("Eat eggs".to_string()))));
        session.submit("Meal?", "ctx").unwrap();
        assert_eq!(session.transcript().last(), Some(&ChatMessage::user("Meal?")));
        session.wait();
        assert_eq!(session.state(), CoachState::Idle);
        assert_eq!(session.last_reply(), Some("Eat eggs"));
        assert_eq!(session.transcript().len(), 3);
    }

    #[test]
    fn missing_or_empty_reply_uses_fallback() {
        for reply in [None, Some(String::new())] {
            let mut session = CoachSession::new(Arc::new(FixedReply(reply)));
            session.submit("Hi", "ctx").unwrap();
            session.wait();
            assert_eq!(session.last_reply(), Some(MISSING_REPLY_MESSAGE));
        }
    }

    #[test]
    fn transport_failure_becomes_one_error_message() {
        let mut session = CoachSession::new(Arc::new(Unreachable));
        session.submit("Hi", "ctx").unwrap();
        session.wait();
        assert_eq!(session.state(), CoachState::Idle);
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[2].role, ChatRole::Model);
        assert_eq!(session.transcript()[2].text, TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn second_submit_is_rejected_while_pending() {
        let (release_tx, release_rx) = mpsc::channel();
        let client = Arc::new(Gated {
            release: Mutex::new(release_rx),
            seen: Mutex::new(Vec::new()),
        });
        let mut session = CoachSession::new(client.clone());

        session.submit("First", "ctx").unwrap();
        assert_eq!(session.state(), CoachState::AwaitingReply);
        assert_eq!(session.submit("Second", "ctx"), Err(CoachError::Busy));
        assert!(!session.poll());
        assert_eq!(session.transcript().len(), 2);

        release_tx.send(()).unwrap();
        session.wait();
        assert_eq!(session.state(), CoachState::Idle);
        assert_eq!(session.last_reply(), Some("Done"));
        assert_eq!(client.seen.lock().unwrap().len(), 1);

        session.submit("Second", "ctx").unwrap();
        release_tx.send(()).unwrap();
        session.wait();
        assert_eq!(session.transcript().len(), 5);
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut session = CoachSession::new(Arc::new(FixedReply(None)));
        assert_eq!(session.submit("   ", "ctx"), Err(CoachError::EmptyPrompt));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn context_lists_schedule_and_optionally_logs() {
        let logs: Vec<LogEntry> = (0..25)
            .map(|i| LogEntry {
                id: i.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                exercise: "Squat".to_string(),
                weight: 100.0 + f64::from(i),
            })
            .collect();
        let general = build_context(&default_week1(), &default_week2(), &logs, ContextKind::General);
        assert!(general.starts_with("You are an expert fitness coach.\nCurrent User Schedule Week 1: [{\"day\":\"Day 1\",\"focus\":\"Anterior (Front)\",\"exercises\":\"Bench Press, Squats, Overhead Press, Leg Extensions, Plank\"}"));
        assert!(!general.contains("User logs"));

        let with_logs = build_context(&default_week1(), &default_week2(), &logs[..20], ContextKind::Logs);
        let log_section = with_logs.split("\n\nUser logs:\n").nth(1).unwrap();
        assert_eq!(log_section.lines().count(), 20);
        assert_eq!(log_section.lines().next(), Some("2024-01-01: Squat @ 100kg"));
    }

    #[test]
    fn request_body_matches_endpoint_shape() {
        let body = serde_json::to_value(GenerateRequest::from_text("hello")).unwrap();
        assert_eq!(body, serde_json::json!({ "contents": [ { "parts": [ { "text": "hello" } ] } ] }));
        assert_eq!(request_text("C", "Q"), "System Context: C\n\nUser Question: Q");
    }

    #[test]
    fn reply_text_is_extracted_or_missing() {
        let ok: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Lift"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(ok.reply_text().as_deref(), Some("Lift"));

        let error_body: GenerateResponse =
            serde_json::from_str(r#"{"error":{"code":400,"message":"API key not valid"}}"#).unwrap();
        assert_eq!(error_body.reply_text(), None);

        let empty: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#).unwrap();
        assert_eq!(empty.reply_text(), None);
    }

    #[test]
    fn url_targets_model_and_drops_trailing_slash() {
        let client = GeminiClient::new(
            "k123",
            "gemini-2.5-flash-preview-09-2025",
            "https://generativelanguage.googleapis.com/v1beta/",
        )
        .unwrap();
        assert_eq!(
            client.build_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent?key=k123"
        );
    }

    #[test]
    fn env_key_wins_and_blank_keys_are_ignored() {
        assert_eq!(
            resolve_api_key(Some("env".to_string()), Some("cfg")).as_deref(),
            Some("env")
        );
        assert_eq!(
            resolve_api_key(Some("  ".to_string()), Some("cfg")).as_deref(),
            Some("cfg")
        );
        assert_eq!(resolve_api_key(None, Some("cfg")).as_deref(), Some("cfg"));
        assert_eq!(resolve_api_key(None, Some(" ")), None);
        assert_eq!(resolve_api_key(Some(String::new()), None), None);
    }

    #[test]
    fn config_key_alone_builds_a_client() {
        let config = CoachConfig {
            api_key: Some("cfg-key".to_string()),
            ..CoachConfig::default()
        };
        let client = GeminiClient::from_config(&config, "config.toml").unwrap();
        assert!(client.build_url().contains(&format!("/models/{}:generateContent?key=", config.model)));
    }

    #[test]
    fn quick_prompts_parse_and_pick_context() {
        assert_eq!("analyze".parse::<QuickPrompt>(), Ok(QuickPrompt::Analyze));
        assert_eq!(QuickPrompt::Analyze.context_kind(), ContextKind::Logs);
        assert_eq!(QuickPrompt::Meal.context_kind(), ContextKind::General);
        assert!("dance".parse::<QuickPrompt>().is_err());
    }
}
