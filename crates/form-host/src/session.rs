use serde::{Deserialize, Serialize};

use form_spec::{
    Dispatched, DynamicForm, EngineError, FormCallbacks, FormConfiguration, FormData, FormEvent,
    FormPatch, FormText, MissingFields, Node, StepDescriptor, StepFlags, Translator, UiAdapter,
};

use crate::HostError;

/// Host-owned part of a form session: step index and accumulated data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub step: usize,
    #[serde(default)]
    pub data: FormData,
    #[serde(default)]
    pub completed: bool,
}

/// Callback effects gathered while the engine borrows the session.
#[derive(Default)]
struct Effects {
    patches: Vec<FormPatch>,
    next: bool,
    previous: bool,
    blocked: Option<MissingFields>,
}

impl FormCallbacks for Effects {
    fn on_data_change(&mut self, patch: FormPatch) {
        self.patches.push(patch);
    }

    fn on_next(&mut self) {
        self.next = true;
    }

    fn on_previous(&mut self) {
        self.previous = true;
    }

    fn on_validation_error(&mut self, error: &MissingFields) {
        self.blocked = Some(error.clone());
    }
}

/// State container driving the engine for one user.
///
/// Merges change patches, advances on `next`, steps back on `previous` and
/// marks the form complete when the last step is submitted.
#[derive(Debug, Clone)]
pub struct FormSession {
    config: FormConfiguration,
    state: SessionState,
    last_error: Option<MissingFields>,
}

impl FormSession {
    pub fn new(config: FormConfiguration) -> Result<Self, HostError> {
        Self::from_state(config, SessionState::default())
    }

    pub fn from_state(config: FormConfiguration, state: SessionState) -> Result<Self, HostError> {
        if state.step >= config.step_count() {
            return Err(HostError::Engine(EngineError::StepOutOfRange {
                index: state.step,
                count: config.step_count(),
            }));
        }
        Ok(Self {
            config,
            state,
            last_error: None,
        })
    }

    pub fn config(&self) -> &FormConfiguration {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn data(&self) -> &FormData {
        &self.state.data
    }

    pub fn step_index(&self) -> usize {
        self.state.step
    }

    pub fn current_step(&self) -> &StepDescriptor {
        &self.config.steps[self.state.step]
    }

    pub fn is_complete(&self) -> bool {
        self.state.completed
    }

    pub fn last_error(&self) -> Option<&MissingFields> {
        self.last_error.as_ref()
    }

    pub fn flags(&self) -> StepFlags {
        StepFlags::for_position(self.state.step, self.config.step_count())
    }

    pub fn form<'s, U, T>(
        &'s self,
        ui: &'s U,
        translator: &'s T,
        text: &'s FormText,
    ) -> Result<DynamicForm<'s, U, T>, EngineError>
    where
        U: UiAdapter + ?Sized,
        T: Translator + ?Sized,
    {
        Ok(DynamicForm::new(
            &self.config,
            self.state.step,
            &self.state.data,
            self.flags(),
            ui,
            translator,
        )?
        .with_text(text))
    }

    pub fn render<U, T>(
        &self,
        ui: &U,
        translator: &T,
        text: &FormText,
    ) -> Result<Node<U::Widget>, EngineError>
    where
        U: UiAdapter + ?Sized,
        T: Translator + ?Sized,
    {
        Ok(self.form(ui, translator, text)?.render())
    }

    /// Routes `event` through the engine and applies the resulting effects.
    pub fn handle<U, T>(
        &mut self,
        event: FormEvent,
        ui: &U,
        translator: &T,
        text: &FormText,
    ) -> Result<Dispatched, HostError>
    where
        U: UiAdapter + ?Sized,
        T: Translator + ?Sized,
    {
        let mut effects = Effects::default();
        let outcome = self
            .form(ui, translator, text)?
            .dispatch(event, &mut effects)?;
        self.apply(effects);
        Ok(outcome)
    }

    fn apply(&mut self, effects: Effects) {
        for patch in effects.patches {
            self.state.data.merge(patch);
        }
        if let Some(error) = effects.blocked {
            self.last_error = Some(error);
        }
        if effects.previous {
            self.state.step = self.state.step.saturating_sub(1);
            self.state.completed = false;
            self.last_error = None;
        }
        if effects.next {
            self.last_error = None;
            if self.state.step + 1 < self.config.step_count() {
                self.state.step += 1;
            } else {
                self.state.completed = true;
                tracing::debug!(form = %self.config.id, "form completed");
            }
        }
    }

    /// Form data encoded as CBOR.
    pub fn data_to_cbor(&self) -> Result<Vec<u8>, HostError> {
        serde_cbor::to_vec(&self.state.data).map_err(HostError::Cbor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_spec::{BasicTranslator, FieldInput, FieldValue, adapters::TextUi};
    use serde_json::json;

    fn config() -> FormConfiguration {
        serde_json::from_value(json!({
            "id": "signup",
            "templateName": "signup",
            "steps": [
                {
                    "id": "account",
                    "title": "Account",
                    "description": "",
                    "fields": [{ "name": "email", "type": "input", "label": "Email", "required": true }]
                },
                {
                    "id": "prefs",
                    "title": "Preferences",
                    "description": "",
                    "fields": [{ "name": "news", "type": "checkbox", "label": "News", "required": false }]
                }
            ]
        }))
        .expect("config")
    }

    fn handle(session: &mut FormSession, event: FormEvent) -> Dispatched {
        session
            .handle(event, &TextUi::default(), &BasicTranslator::new(), &FormText::default())
            .expect("handled")
    }

    #[test]
    fn session_walks_through_steps() {
        let mut session = FormSession::new(config()).expect("session");

        let blocked = handle(&mut session, FormEvent::Submit);
        assert!(matches!(blocked, Dispatched::Blocked(_)));
        assert_eq!(session.step_index(), 0);
        assert!(session.last_error().is_some());

        handle(
            &mut session,
            FormEvent::Input {
                field: "email".into(),
                input: FieldInput::Text("a@b.com".into()),
            },
        );
        assert_eq!(handle(&mut session, FormEvent::Submit), Dispatched::Next);
        assert_eq!(session.step_index(), 1);
        assert!(session.last_error().is_none());

        assert_eq!(handle(&mut session, FormEvent::Submit), Dispatched::Next);
        assert!(session.is_complete());
        assert_eq!(session.step_index(), 1);
        assert_eq!(
            session.data().get("email"),
            Some(&FieldValue::Text("a@b.com".into()))
        );
    }

    #[test]
    fn previous_never_goes_below_first_step() {
        let mut session = FormSession::new(config()).expect("session");
        assert_eq!(handle(&mut session, FormEvent::Previous), Dispatched::Previous);
        assert_eq!(session.step_index(), 0);
    }

    #[test]
    fn out_of_range_state_is_rejected() {
        let state = SessionState {
            step: 4,
            ..SessionState::default()
        };
        assert!(FormSession::from_state(config(), state).is_err());
    }

    #[test]
    fn data_encodes_as_cbor() {
        let mut state = SessionState::default();
        state.data.insert("email", "a@b.com");
        let session = FormSession::from_state(config(), state).expect("session");
        let bytes = session.data_to_cbor().expect("cbor");
        let decoded: FormData = serde_cbor::from_slice(&bytes).expect("decode");
        assert_eq!(&decoded, session.data());
    }
}
