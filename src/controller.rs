use crate::error::{FailureKind, FormError, GenerationError, TransitionError};
use crate::form::FormDraft;
use crate::generator::GenerateAd;
use crate::models::{BusinessField, BusinessInfo, GeneratedAd};
use crate::preview::{cta_label, CtaLabelMode};
use crate::view;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Form,
    Loading,
    Preview,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Form => "form",
            Phase::Loading => "loading",
            Phase::Preview => "preview",
            Phase::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EditField,
    Submit,
    Finish,
    Reset,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::EditField => "edit a field",
            Action::Submit => "submit",
            Action::Finish => "finish generating",
            Action::Reset => "reset",
        })
    }
}

/// What the error screen knows about a failed generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&GenerationError> for GenerationFailure {
    fn from(error: &GenerationError) -> Self {
        Self {
            kind: error.kind(),
            message: GenerationError::USER_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Form(FormDraft),
    Loading(BusinessInfo),
    Preview { info: BusinessInfo, ad: GeneratedAd },
    Error(GenerationFailure),
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Form(_) => Phase::Form,
            ViewState::Loading(_) => Phase::Loading,
            ViewState::Preview { .. } => Phase::Preview,
            ViewState::Error(_) => Phase::Error,
        }
    }
}

#[derive(Serialize)]
struct StateEvent {
    state: Phase,
}

fn state_event(state: Phase) -> Option<String> {
    match serde_json::to_string(&StateEvent { state }) {
        Ok(event) => Some(event),
        Err(e) => {
            log::error!("Failed to encode state event: {}", e);
            None
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub state: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<BusinessInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad: Option<GeneratedAd>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GenerationFailure>,
}

pub struct Controller {
    state: ViewState,
    events: broadcast::Sender<String>,
}

impl Controller {
    pub fn new(events: broadcast::Sender<String>) -> Self {
        Self {
            state: ViewState::Form(FormDraft::default()),
            events,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    fn invalid(&self, action: Action) -> TransitionError {
        TransitionError::Invalid {
            from: self.phase(),
            action,
        }
    }

    fn draft_mut(&mut self, action: Action) -> Result<&mut FormDraft, TransitionError> {
        let from = self.phase();
        match &mut self.state {
            ViewState::Form(draft) => Ok(draft),
            _ => Err(TransitionError::Invalid { from, action }),
        }
    }

    fn transition(&mut self, next: ViewState) {
        let from = self.phase();
        self.state = next;
        let to = self.phase();
        log::info!("View state {} -> {}", from, to);

        if let Some(event) = state_event(to) {
            // Fails only when no page is listening.
            if self.events.send(event).is_err() {
                log::debug!("No event subscribers");
            }
        }
    }

    pub fn edit_field(&mut self, field: BusinessField, value: &str) -> Result<(), TransitionError> {
        self.draft_mut(Action::EditField)?.set_field(field, value);
        Ok(())
    }

    pub fn apply_form<'a, I>(&mut self, pairs: I) -> Result<(), TransitionError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.draft_mut(Action::EditField)?.apply(pairs);
        Ok(())
    }

    /// Form → loading. Blank required fields keep the form (and its draft) in place.
    pub fn submit(&mut self) -> Result<BusinessInfo, TransitionError> {
        let info = self.draft_mut(Action::Submit)?.submit()?;
        self.transition(ViewState::Loading(info.clone()));
        Ok(info)
    }

    /// Loading → preview or error. Only whole results reach the preview.
    pub fn finish(
        &mut self,
        outcome: Result<GeneratedAd, GenerationError>,
    ) -> Result<Phase, TransitionError> {
        let info = match &self.state {
            ViewState::Loading(info) => info.clone(),
            _ => return Err(self.invalid(Action::Finish)),
        };

        let next = match outcome {
            Ok(ad) => ViewState::Preview { info, ad },
            Err(error) => ViewState::Error(GenerationFailure::from(&error)),
        };
        self.transition(next);
        Ok(self.phase())
    }

    /// Preview or error → a fresh form. Nothing from the last run survives.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        match self.state {
            ViewState::Preview { .. } | ViewState::Error(_) => {
                self.transition(ViewState::Form(FormDraft::default()));
                Ok(())
            }
            _ => Err(self.invalid(Action::Reset)),
        }
    }

    pub fn snapshot(&self, mode: CtaLabelMode) -> StateSnapshot {
        let mut snapshot = StateSnapshot {
            state: self.phase(),
            draft: None,
            ad: None,
            cta_label: None,
            error: None,
        };
        match &self.state {
            ViewState::Form(draft) => snapshot.draft = Some(draft.values().clone()),
            ViewState::Loading(_) => {}
            ViewState::Preview { info, ad } => {
                snapshot.cta_label = Some(cta_label(ad, &info.call_to_action, mode).to_string());
                snapshot.ad = Some(ad.clone());
            }
            ViewState::Error(failure) => snapshot.error = Some(failure.clone()),
        }
        snapshot
    }
}

/// A controller shared between request handlers and the generation task.
#[derive(Clone)]
pub struct Studio {
    controller: Arc<Mutex<Controller>>,
    generator: Arc<dyn GenerateAd>,
    events: broadcast::Sender<String>,
    cta_label: CtaLabelMode,
}

impl Studio {
    pub fn new(generator: Arc<dyn GenerateAd>, cta_label: CtaLabelMode) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            controller: Arc::new(Mutex::new(Controller::new(events.clone()))),
            generator,
            events,
            cta_label,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.events.subscribe()
    }

    /// The current state as an event, plus a receiver for every later one.
    /// Taken under the controller lock so no transition falls in between.
    pub fn subscribe_from_current(&self) -> (Option<String>, broadcast::Receiver<String>) {
        let controller = self.controller.lock();
        (state_event(controller.phase()), self.events.subscribe())
    }

    pub fn phase(&self) -> Phase {
        self.controller.lock().phase()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.controller.lock().snapshot(self.cta_label)
    }

    pub fn render(&self) -> String {
        self.render_with(None)
    }

    /// Renders the current screen, flagging a rejected form post if given.
    pub fn render_with(&self, problem: Option<&FormError>) -> String {
        view::render_page(self.controller.lock().state(), self.cta_label, problem)
    }

    pub fn edit_field(&self, field: BusinessField, value: &str) -> Result<(), TransitionError> {
        self.controller.lock().edit_field(field, value)
    }

    pub fn reset(&self) -> Result<(), TransitionError> {
        self.controller.lock().reset()
    }

    /// Applies posted form values and submits them in one step.
    pub fn submit_form<'a, I>(&self, pairs: I) -> Result<JoinHandle<Phase>, TransitionError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let info = {
            let mut controller = self.controller.lock();
            controller.apply_form(pairs)?;
            controller.submit()?
        };
        Ok(self.spawn_generation(info))
    }

    /// Runs to completion; there is no cancel.
    fn spawn_generation(&self, info: BusinessInfo) -> JoinHandle<Phase> {
        let controller = self.controller.clone();
        let generator = self.generator.clone();
        tokio::spawn(async move {
            let outcome = generator.generate(&info).await;
            let finished = controller.lock().finish(outcome);
            match finished {
                Ok(phase) => phase,
                Err(e) => {
                    log::error!("Dropping generation result: {}", e);
                    controller.lock().phase()
                }
            }
        })
    }
}
