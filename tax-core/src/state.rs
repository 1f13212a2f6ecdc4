//! Application state shared by every front end.
//!
//! [`AppState`] owns the calculation history, the calculation currently in
//! focus and the chat transcript about it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::TaxEstimator;
use crate::chat::{self, ChatMessage, ChatRole};
use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::db::KeyValueRepository;
use crate::history::{HistoryError, HistoryStore};
use crate::models::{NewClientProfile, ProfileError, TaxCalculation};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid client profile: {}", join_errors(.0))]
    Profile(Vec<ProfileError>),

    #[error(transparent)]
    History(#[from] HistoryError),
}

fn join_errors(errors: &[ProfileError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct AppState {
    history: HistoryStore,
    current: Option<TaxCalculation>,
    chat: Vec<ChatMessage>,
    estimator: TaxEstimator,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl AppState {
    pub fn new(
        history: HistoryStore,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            history,
            current: None,
            chat: Vec::new(),
            estimator: TaxEstimator::new(clock.clone(), ids.clone()),
            clock,
            ids,
        }
    }

    /// Opens the history in `repo` with wall-clock time and UUID ids.
    pub async fn open(repo: Box<dyn KeyValueRepository>) -> Result<Self, StateError> {
        let history = HistoryStore::open(repo).await?;
        Ok(Self::new(
            history,
            Arc::new(SystemClock),
            Arc::new(UuidGenerator),
        ))
    }

    /// Validates `input`, estimates it, records the result and makes it
    /// the current calculation.
    pub async fn calculate(
        &mut self,
        input: NewClientProfile,
    ) -> Result<TaxCalculation, StateError> {
        let profile = input
            .into_profile(self.ids.next_id(), self.clock.now())
            .map_err(StateError::Profile)?;

        info!(client = %profile.name, company_type = %profile.company_type.as_str(), "calculating taxes");
        let calculation = self.estimator.estimate(profile);
        self.add_calculation(calculation.clone()).await?;
        Ok(calculation)
    }

    /// Records an already computed calculation and makes it current.
    pub async fn add_calculation(
        &mut self,
        calculation: TaxCalculation,
    ) -> Result<(), StateError> {
        self.history.append(calculation.clone()).await?;
        self.focus(Some(calculation));
        Ok(())
    }

    /// Focuses the recorded calculation with `id`. Returns `false` when
    /// there is no such record; the current calculation is then unchanged.
    pub fn set_current(
        &mut self,
        id: &str,
    ) -> bool {
        match self.history.get(id) {
            Some(calculation) => {
                let calculation = calculation.clone();
                self.focus(Some(calculation));
                true
            }
            None => false,
        }
    }

    /// Deletes the record with `id`, unfocusing it if it was current.
    pub async fn remove_calculation(
        &mut self,
        id: &str,
    ) -> Result<bool, StateError> {
        let removed = self.history.remove(id).await?;
        if removed && self.current.as_ref().is_some_and(|c| c.id == id) {
            self.focus(None);
        }
        Ok(removed)
    }

    /// Deletes every recorded calculation and drops the focus.
    pub async fn clear_history(&mut self) -> Result<usize, StateError> {
        let cleared = self.history.len();
        self.history.clear().await?;
        self.focus(None);
        info!(cleared, "history cleared");
        Ok(cleared)
    }

    pub fn current(&self) -> Option<&TaxCalculation> {
        self.current.as_ref()
    }

    /// Every recorded calculation, newest first.
    pub fn calculations(&self) -> impl Iterator<Item = &TaxCalculation> {
        self.history.list()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Asks a question about the current calculation.
    ///
    /// Returns `None` without touching the transcript when nothing is in
    /// focus or `question` is blank.
    pub fn ask(
        &mut self,
        question: &str,
    ) -> Option<&ChatMessage> {
        let question = question.trim();
        let calculation = self.current.as_ref()?;
        if question.is_empty() {
            return None;
        }

        let answer = chat::respond(question, calculation);
        debug!(question, "answering chat question");

        let user = self.message(ChatRole::User, question.to_string());
        let assistant = self.message(ChatRole::Assistant, answer);
        self.chat.push(user);
        self.chat.push(assistant);
        self.chat.last()
    }

    pub fn chat_messages(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }

    fn message(
        &self,
        role: ChatRole,
        content: String,
    ) -> ChatMessage {
        ChatMessage {
            id: self.ids.next_id(),
            role,
            content,
            timestamp: self.clock.now(),
        }
    }

    // The transcript belongs to the calculation it was about.
    fn focus(
        &mut self,
        calculation: Option<TaxCalculation>,
    ) {
        let changed = self.current.as_ref().map(|c| &c.id) != calculation.as_ref().map(|c| &c.id);
        if changed {
            self.clear_chat();
        }
        self.current = calculation;
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("calculations", &self.history.len())
            .field("current", &self.current.as_ref().map(|c| &c.id))
            .field("chat_messages", &self.chat.len())
            .finish_non_exhaustive()
    }
}
