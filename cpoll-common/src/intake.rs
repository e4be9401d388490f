//! Intake wizard state machine
//!
//! ```text
//! LanguageSelect -> PersonalInfo -> KnowledgeQuestions -> Confirmation -> PersonaFollowup
//! ```
//!
//! Forward moves are gated by validation of the current step. Leaving
//! KnowledgeQuestions validates the whole draft and appends it to the
//! response store; from then on the record is persisted and the wizard can
//! no longer step back. [`IntakeWizard::reset`] discards everything.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ValidationErrors;
use crate::models::{ResponseRecord, ResponseSubmission};
use crate::persona::{self, PersonaCompleter, FALLBACK_ANSWER};
use crate::reference::ReferenceData;
use crate::store::ResponseStore;
use crate::validation;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStep {
    LanguageSelect,
    PersonalInfo,
    KnowledgeQuestions,
    Confirmation,
    PersonaFollowup,
}

impl IntakeStep {
    /// Steps before submission may be revisited
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            IntakeStep::LanguageSelect | IntakeStep::PersonalInfo | IntakeStep::KnowledgeQuestions
        )
    }
}

/// One persona exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaAnswer {
    pub question: String,
    pub text: String,
    /// True when `text` is the fallback message rather than a generated answer
    pub fallback: bool,
}

pub struct IntakeWizard {
    step: IntakeStep,
    draft: ResponseSubmission,
    reference: Arc<ReferenceData>,
    submitted: Option<ResponseRecord>,
    suggestions: Vec<&'static str>,
}

impl IntakeWizard {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            step: IntakeStep::LanguageSelect,
            draft: default_draft(),
            reference,
            submitted: None,
            suggestions: Vec::new(),
        }
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn draft(&self) -> &ResponseSubmission {
        &self.draft
    }

    /// Edit draft fields; ignored once the response is submitted.
    /// Use [`IntakeWizard::select_state`] for the state field.
    pub fn edit(&mut self, f: impl FnOnce(&mut ResponseSubmission)) {
        if self.step.is_editable() {
            f(&mut self.draft);
        }
    }

    /// Choose a state; a changed state clears the dependent LGA
    pub fn select_state(&mut self, state: &str) {
        if !self.step.is_editable() {
            return;
        }
        if self.draft.state != state {
            self.draft.state = state.to_string();
            self.draft.lga.clear();
        }
    }

    /// LGA choices for the currently selected state
    pub fn lga_options(&self) -> &[String] {
        self.reference.lgas_for(&self.draft.state)
    }

    /// Record stored on submission
    pub fn submitted(&self) -> Option<&ResponseRecord> {
        self.submitted.as_ref()
    }

    /// Suggested questions offered in the follow-up step
    pub fn suggestions(&self) -> &[&'static str] {
        &self.suggestions
    }

    /// Validation failures blocking the current step, if any
    pub fn current_step_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        match self.step {
            IntakeStep::LanguageSelect => validation::check_language(&self.draft, &mut errors),
            IntakeStep::PersonalInfo => {
                validation::check_personal_info(&self.draft, &self.reference, &mut errors)
            }
            IntakeStep::KnowledgeQuestions => validation::check_knowledge(&self.draft, &mut errors),
            IntakeStep::Confirmation | IntakeStep::PersonaFollowup => {}
        }
        errors
    }

    pub fn can_advance(&self) -> bool {
        self.step != IntakeStep::PersonaFollowup && self.current_step_errors().is_empty()
    }

    /// Move forward one step
    ///
    /// Leaving KnowledgeQuestions appends the response to `store`; on a
    /// storage failure the wizard stays put and the error is returned.
    pub async fn advance(&mut self, store: &dyn ResponseStore) -> Result<IntakeStep> {
        self.current_step_errors().into_result()?;

        self.step = match self.step {
            IntakeStep::LanguageSelect => IntakeStep::PersonalInfo,
            IntakeStep::PersonalInfo => IntakeStep::KnowledgeQuestions,
            IntakeStep::KnowledgeQuestions => {
                let response = validation::validate_submission(&self.draft, &self.reference)?;
                let record = store.append(&response).await?;
                info!(backend = store.backend_name(), "Intake response submitted");
                self.submitted = Some(record);
                IntakeStep::Confirmation
            }
            IntakeStep::Confirmation => {
                self.suggestions = persona::suggest_questions(&mut rand::thread_rng());
                IntakeStep::PersonaFollowup
            }
            IntakeStep::PersonaFollowup => IntakeStep::PersonaFollowup,
        };

        Ok(self.step)
    }

    /// Move back one step; no-op at the first step and after submission
    pub fn back(&mut self) -> IntakeStep {
        self.step = match self.step {
            IntakeStep::PersonalInfo => IntakeStep::LanguageSelect,
            IntakeStep::KnowledgeQuestions => IntakeStep::PersonalInfo,
            other => other,
        };
        self.step
    }

    /// Ask the persona a question (follow-up step only)
    ///
    /// Upstream failures yield the fallback message instead of an error.
    pub async fn ask(
        &self,
        completer: &dyn PersonaCompleter,
        question: &str,
    ) -> Result<PersonaAnswer> {
        if self.step != IntakeStep::PersonaFollowup {
            let mut errors = ValidationErrors::new();
            errors.add("step", "Questions are available after submitting the survey");
            return Err(errors.into());
        }

        let question = persona::validate_question(question)?;
        match completer.complete(question).await {
            Ok(text) => Ok(PersonaAnswer {
                question: question.to_string(),
                text,
                fallback: false,
            }),
            Err(Error::Upstream(reason)) => {
                warn!("Persona completion failed: {}", reason);
                Ok(PersonaAnswer {
                    question: question.to_string(),
                    text: FALLBACK_ANSWER.to_string(),
                    fallback: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh the suggestion list
    pub fn reshuffle_suggestions<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.step == IntakeStep::PersonaFollowup {
            self.suggestions = persona::suggest_questions(rng);
        }
    }

    /// Discard all state and start over
    pub fn reset(&mut self) {
        self.step = IntakeStep::LanguageSelect;
        self.draft = default_draft();
        self.submitted = None;
        self.suggestions.clear();
    }
}

fn default_draft() -> ResponseSubmission {
    ResponseSubmission {
        language: "English".to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<ResponseRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl ResponseStore for MemoryStore {
        fn backend_name(&self) -> &'static str {
            "memory"
        }

        async fn append(&self, response: &NewResponse) -> Result<ResponseRecord> {
            if self.fail {
                return Err(Error::Storage("disk full".to_string()));
            }
            let record = response.to_record(None, chrono::Utc::now());
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn list_all(&self) -> Result<Vec<ResponseRecord>> {
            Ok(self.records.lock().unwrap().clone())
        }
    }

    struct EchoPersona;

    #[async_trait]
    impl PersonaCompleter for EchoPersona {
        async fn complete(&self, question: &str) -> Result<String> {
            Ok(format!("On {}: together we build Osun.", question))
        }
    }

    struct DownPersona;

    #[async_trait]
    impl PersonaCompleter for DownPersona {
        async fn complete(&self, _question: &str) -> Result<String> {
            Err(Error::Upstream("timed out".to_string()))
        }
    }

    fn wizard() -> IntakeWizard {
        IntakeWizard::new(Arc::new(ReferenceData::embedded().unwrap()))
    }

    fn fill_personal(w: &mut IntakeWizard) {
        w.select_state("Osun");
        w.edit(|d| {
            d.name = "Funke Adeyemi".to_string();
            d.lga = "Ilesa East".to_string();
            d.ward = "Ward 2".to_string();
            d.age = "18 - 24 years".to_string();
            d.gender = "female".to_string();
        });
    }

    fn fill_knowledge(w: &mut IntakeWizard) {
        w.edit(|d| {
            d.knows_romeo = "Yes".to_string();
            d.knows_muyideen = "No".to_string();
            d.knows_abdulrasheed = "Yes".to_string();
            d.heard_savewell = "No".to_string();
            d.residence = "7 Station Rd".to_string();
        });
    }

    #[tokio::test]
    async fn test_full_flow_persists_once() {
        let store = MemoryStore::default();
        let mut w = wizard();

        assert_eq!(w.advance(&store).await.unwrap(), IntakeStep::PersonalInfo);
        fill_personal(&mut w);
        assert_eq!(w.advance(&store).await.unwrap(), IntakeStep::KnowledgeQuestions);
        fill_knowledge(&mut w);
        assert_eq!(w.advance(&store).await.unwrap(), IntakeStep::Confirmation);
        assert_eq!(w.advance(&store).await.unwrap(), IntakeStep::PersonaFollowup);

        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert_eq!(w.submitted().unwrap().name, "Funke Adeyemi");
        assert_eq!(w.suggestions().len(), persona::SUGGESTION_COUNT);

        w.reshuffle_suggestions(&mut rand::thread_rng());
        assert_eq!(w.suggestions().len(), persona::SUGGESTION_COUNT);
    }

    #[tokio::test]
    async fn test_invalid_step_blocks_progress() {
        let store = MemoryStore::default();
        let mut w = wizard();
        w.advance(&store).await.unwrap();

        w.edit(|d| d.name = "Only a name".to_string());
        assert!(!w.can_advance());
        let err = w.advance(&store).await.unwrap_err();
        match err {
            Error::Validation(errors) => {
                assert_eq!(errors.message_for("state"), Some("State is required"));
                assert!(errors.message_for("name").is_none());
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert_eq!(w.step(), IntakeStep::PersonalInfo);
    }

    #[tokio::test]
    async fn test_bad_phone_blocks_submission() {
        let store = MemoryStore::default();
        let mut w = wizard();
        w.advance(&store).await.unwrap();
        fill_personal(&mut w);
        w.advance(&store).await.unwrap();
        fill_knowledge(&mut w);
        w.edit(|d| d.phone = Some("12345".to_string()));

        assert!(w.advance(&store).await.is_err());
        assert_eq!(w.step(), IntakeStep::KnowledgeQuestions);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_back_is_unconditional_until_submitted() {
        let store = MemoryStore::default();
        let mut w = wizard();
        assert_eq!(w.back(), IntakeStep::LanguageSelect);

        w.advance(&store).await.unwrap();
        fill_personal(&mut w);
        w.advance(&store).await.unwrap();
        // Knowledge answers still empty; going back needs no validation
        assert_eq!(w.back(), IntakeStep::PersonalInfo);
        assert_eq!(w.back(), IntakeStep::LanguageSelect);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_step() {
        let store = MemoryStore {
            fail: true,
            ..Default::default()
        };
        let mut w = wizard();
        w.advance(&store).await.unwrap();
        fill_personal(&mut w);
        w.advance(&store).await.unwrap();
        fill_knowledge(&mut w);

        let err = w.advance(&store).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(w.step(), IntakeStep::KnowledgeQuestions);
        assert!(w.submitted().is_none());
    }

    #[test]
    fn test_changing_state_clears_lga() {
        let mut w = wizard();
        fill_personal(&mut w);
        assert!(w.lga_options().iter().any(|l| l == "Ilesa East"));

        w.select_state("Osun");
        assert_eq!(w.draft().lga, "Ilesa East");

        w.select_state("Lagos");
        assert!(w.draft().lga.is_empty());
        assert!(w.lga_options().iter().any(|l| l == "Ikeja"));
    }

    #[tokio::test]
    async fn test_persona_follow_up() {
        let store = MemoryStore::default();
        let mut w = wizard();

        assert!(w.ask(&EchoPersona, "Vision for 2027").await.is_err());

        w.advance(&store).await.unwrap();
        fill_personal(&mut w);
        w.advance(&store).await.unwrap();
        fill_knowledge(&mut w);
        w.advance(&store).await.unwrap();
        w.advance(&store).await.unwrap();

        let answer = w.ask(&EchoPersona, "Vision for 2027").await.unwrap();
        assert!(!answer.fallback);
        assert!(answer.text.contains("Vision for 2027"));

        let answer = w.ask(&DownPersona, "Policies on Economy").await.unwrap();
        assert!(answer.fallback);
        assert_eq!(answer.text, FALLBACK_ANSWER);

        assert!(matches!(
            w.ask(&EchoPersona, "  ").await,
            Err(Error::Validation(_))
        ));

        // Submitted records cannot be revisited
        assert_eq!(w.back(), IntakeStep::PersonaFollowup);
        w.reset();
        assert_eq!(w.step(), IntakeStep::LanguageSelect);
        assert!(w.draft().name.is_empty());
    }
}
