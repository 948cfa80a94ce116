//! Hand-written collaborators for handler tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::clarification::{
    ActionItem, Effort, FinalOutput, Priority, QuestionDraft, RoundDraft, Session, Understanding,
};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{
    GenerationError, GenerationRequest, Generator, ListSessionsQuery, SessionRepository,
    SynthesisRequest, Synthesizer,
};

pub fn draft() -> RoundDraft {
    RoundDraft {
        understanding: Understanding {
            main_themes: vec!["writing".to_string()],
            user_intent: "share ideas".to_string(),
            clarified_points: vec![],
            remaining_uncertainties: vec!["audience".to_string()],
        },
        summary: "A newsletter".to_string(),
        questions: vec![
            QuestionDraft::new("Who reads it?", vec!["Friends", "Professionals"], false),
            QuestionDraft::new("How often?", vec!["Weekly", "Monthly"], true),
        ],
        should_conclude: false,
        conclusion_reason: None,
    }
}

pub fn settled_draft() -> RoundDraft {
    let mut d = draft();
    d.understanding.remaining_uncertainties.clear();
    d.questions.clear();
    d
}

pub fn output() -> FinalOutput {
    FinalOutput {
        final_summary: "Launch a monthly newsletter".to_string(),
        action_items: vec![ActionItem::new("Pick a platform", Priority::High, Effort::Minimal)],
        tips: vec!["Keep it short".to_string()],
        insights: vec![],
        next_steps: "Write issue one".to_string(),
        encouragement: "Go for it".to_string(),
    }
}

pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<RoundDraft, GenerationError>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    delay: Duration,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<RoundDraft, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<GenerationRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<RoundDraft, GenerationError> {
        self.requests.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::provider("script exhausted")))
    }
}

pub struct ScriptedSynthesizer {
    replies: Mutex<VecDeque<Result<FinalOutput, GenerationError>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSynthesizer {
    pub fn new(replies: Vec<Result<FinalOutput, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Synthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, _request: SynthesisRequest) -> Result<FinalOutput, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::provider("script exhausted")))
    }
}

/// Repository whose writes always fail.
pub struct FailingRepository;

#[async_trait]
impl SessionRepository for FailingRepository {
    async fn save(&self, _session: &Session) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::StorageError, "Simulated save failure"))
    }

    async fn find_by_id(&self, _id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(None)
    }

    async fn list(&self, _query: ListSessionsQuery) -> Result<Vec<Session>, DomainError> {
        Err(DomainError::new(ErrorCode::StorageError, "Simulated list failure"))
    }

    async fn delete(&self, _id: &SessionId) -> Result<bool, DomainError> {
        Err(DomainError::new(ErrorCode::StorageError, "Simulated delete failure"))
    }
}
