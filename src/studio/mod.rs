use tracing::{debug, error, info, warn};

use crate::log::Recorder;
use crate::prompt::build_instruction;
use crate::provider::DynClient;
use crate::session::{Action, SessionState};
use crate::wire::GenerationRequest;

pub const GENERATION_FAILED: &str = "Failed to generate content. Please try again.";

/// Async driver around [`SessionState`]: wires user actions to the request
/// builder, the generation client and the recorder.
pub struct Studio {
    state: SessionState,
    client: DynClient,
    recorder: Option<Recorder>,
}

impl Studio {
    pub fn new(state: SessionState, client: DynClient) -> Self {
        Self { state, client, recorder: None }
    }

    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = recorder.is_enabled().then_some(recorder);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action);
    }

    /// Run one generation for the current selection. Returns false when
    /// nothing was sent (empty topic, already loading, wrong view).
    pub async fn generate(&mut self) -> bool {
        let instruction = match build_instruction(
            self.state.tool(),
            self.state.platform(),
            self.state.form(),
        ) {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "generate skipped");
                return false;
            }
        };

        if !self.state.can_submit() {
            debug!(mode = ?self.state.mode(), loading = self.state.is_loading(), "generate skipped");
            return false;
        }
        self.dispatch(Action::Submit);
        let Some(ticket) = self.state.in_flight() else {
            return false;
        };

        let req = GenerationRequest {
            instruction,
            platform: ticket.platform,
            is_premium: self.state.is_premium(),
        };
        info!(
            provider = self.client.name(),
            tool = %ticket.tool,
            platform = %ticket.platform,
            premium = req.is_premium,
            "generating"
        );

        let outcome = self.client.generate(&req).await;

        if let Some(rec) = &self.recorder {
            let (resp, err) = match &outcome {
                Ok(r) => (Some(r), None),
                Err(e) => (None, Some(e.to_string())),
            };
            if let Err(e) = rec.save(&req, resp, err.as_deref()) {
                warn!(error = %e, "could not record exchange");
            }
        }

        match outcome {
            Ok(response) => {
                if response.content_type() != ticket.tool {
                    warn!(
                        requested = %ticket.tool,
                        received = %response.content_type(),
                        "service answered with a different content type"
                    );
                }
                self.dispatch(Action::ReceiveResult { ticket: ticket.id, response });
            }
            Err(e) => {
                error!(error = %e, "generation failed");
                self.dispatch(Action::ReceiveError {
                    ticket: ticket.id,
                    message: GENERATION_FAILED.to_string(),
                });
            }
        }
        true
    }
}
