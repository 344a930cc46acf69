use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::client::{ApiClient, ApiError, COMPLETE_PATH, GENERATE_PATH, REFINE_PATH};
use crate::api::types::{CandidateResponse, CompleteRequest, RefineRequest};
use crate::wizard::form::{FormAttributes, FormUpdate};
use crate::wizard::step::Step;

/// Fixed sample candidates shown when the generate endpoint is unavailable or
/// returns an incomplete payload. The paths are part of the frontend asset
/// contract.
pub const SAMPLE_A: &str = "/images/sample_a.PNG";
pub const SAMPLE_B: &str = "/images/sample_b.PNG";

/// Two image references offered for selection. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub a: String,
    pub b: String,
}

impl CandidatePair {
    pub fn get(&self, which: Candidate) -> &str {
        match which {
            Candidate::A => &self.a,
            Candidate::B => &self.b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    A,
    B,
}

/// Owns the step machine, the form, and the single in-flight request handle.
///
/// Network operations never fail outward: any transport, protocol, or payload
/// problem is converted into a user-visible notice and the wizard still moves
/// forward with fallback data. The one exception is cancellation, which means
/// a newer operation (or an explicit abort) owns the state, so a superseded
/// request applies nothing.
pub struct WizardController {
    api: ApiClient,
    step: Step,
    form: FormAttributes,
    candidates: Option<CandidatePair>,
    refinements: Option<CandidatePair>,
    result_url: Option<String>,
    refine_note: String,
    notice: Option<String>,
    loading: bool,
    inflight: Option<CancellationToken>,
}

impl WizardController {
    pub fn new(api: ApiClient) -> Self {
        WizardController {
            api,
            step: Step::Input,
            form: FormAttributes::default(),
            candidates: None,
            refinements: None,
            result_url: None,
            refine_note: String::new(),
            notice: None,
            loading: false,
            inflight: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn form(&self) -> &FormAttributes {
        &self.form
    }

    pub fn candidates(&self) -> Option<&CandidatePair> {
        self.candidates.as_ref()
    }

    pub fn refinements(&self) -> Option<&CandidatePair> {
        self.refinements.as_ref()
    }

    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    pub fn refine_note(&self) -> &str {
        &self.refine_note
    }

    pub fn update_field(&mut self, update: FormUpdate) {
        self.form.update_field(update);
    }

    pub fn set_refine_note(&mut self, note: impl Into<String>) {
        self.refine_note = note.into();
    }

    /// Cancels any in-flight request. The abort affordance of the UI layer.
    pub fn cancel(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        self.loading = false;
    }

    /// Replaces the in-flight handle: cancels the previous token and installs
    /// a fresh one, so a superseded request can never apply a late result.
    fn new_signal(&mut self) -> CancellationToken {
        if let Some(previous) = self.inflight.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.inflight = Some(token.clone());
        token
    }

    /// Folds server-supplied notice/error strings into the single notice slot,
    /// error first.
    fn apply_server_notice(&mut self, response: &CandidateResponse) {
        if let Some(notice) = &response.notice {
            self.notice = Some(notice.clone());
        }
        if let Some(error) = &response.error {
            self.notice = Some(match self.notice.take() {
                Some(previous) => format!("{error} / {previous}"),
                None => error.clone(),
            });
        }
    }

    /// Input → Choose. Requests a candidate pair for the current form. On any
    /// failure the fixed samples are substituted and the step still advances;
    /// the wizard never blocks the user behind a network error.
    pub async fn start(&mut self) {
        if self.loading || self.step != Step::Input {
            return;
        }
        self.loading = true;
        self.notice = None;
        let token = self.new_signal();
        let timeout = self.api.start_timeout();

        let result = self
            .api
            .post_json::<CandidateResponse>(GENERATE_PATH, &self.form, &token, timeout)
            .await;
        self.loading = false;

        match result {
            Ok(response) => {
                let mut options = response.options.iter();
                let a = options.next().cloned().unwrap_or_else(|| SAMPLE_A.to_string());
                let b = options.next().cloned().unwrap_or_else(|| SAMPLE_B.to_string());
                self.candidates = Some(CandidatePair { a, b });
                self.step = Step::Choose;
                self.apply_server_notice(&response);
                info!("Generated candidate pair");
            }
            Err(ApiError::Cancelled) => {
                debug!("Generate request superseded, leaving state untouched");
            }
            Err(err) => {
                warn!("Generate request failed, falling back to samples: {err}");
                self.candidates = Some(CandidatePair {
                    a: SAMPLE_A.to_string(),
                    b: SAMPLE_B.to_string(),
                });
                self.step = Step::Choose;
                self.notice = Some(format!(
                    "Showing sample images because the request failed ({err})"
                ));
            }
        }
    }

    /// Choose → Review. Pure selection, no network call.
    pub fn pick(&mut self, which: Candidate) {
        if self.loading || self.step != Step::Choose {
            return;
        }
        let Some(pair) = &self.candidates else {
            return;
        };
        self.result_url = Some(pair.get(which).to_string());
        self.step = Step::Review;
    }

    /// Review → ChooseRefinement. Posts the selected image plus the free-text
    /// note; on failure both refinement slots fall back to the selected image
    /// itself, so a failed refinement shows no surprising content.
    pub async fn refine(&mut self) {
        if self.loading || self.step != Step::Review {
            return;
        }
        let Some(selected) = self.result_url.clone() else {
            return;
        };
        self.loading = true;
        self.notice = None;
        let token = self.new_signal();
        let timeout = self.api.request_timeout();

        let request = RefineRequest {
            selected: &selected,
            note: &self.refine_note,
            context: &self.form,
        };
        let result = self
            .api
            .post_json::<CandidateResponse>(REFINE_PATH, &request, &token, timeout)
            .await;
        self.loading = false;

        match result {
            Ok(response) => {
                let mut options = response.options.iter();
                let a = options.next().cloned().unwrap_or_else(|| selected.clone());
                let b = options.next().cloned().unwrap_or_else(|| selected.clone());
                self.refinements = Some(CandidatePair { a, b });
                self.step = Step::ChooseRefinement;
                self.apply_server_notice(&response);
                info!("Generated refinement pair");
            }
            Err(ApiError::Cancelled) => {
                debug!("Refine request superseded, leaving state untouched");
            }
            Err(err) => {
                warn!("Refine request failed, duplicating the selected image: {err}");
                self.refinements = Some(CandidatePair {
                    a: selected.clone(),
                    b: selected,
                });
                self.step = Step::ChooseRefinement;
                self.notice = Some(format!(
                    "Could not fetch refinements, showing the original image ({err})"
                ));
            }
        }
    }

    /// ChooseRefinement → Review. Overwrites the selected result with the
    /// chosen refinement.
    pub fn pick_refinement(&mut self, which: Candidate) {
        if self.loading || self.step != Step::ChooseRefinement {
            return;
        }
        let Some(pair) = &self.refinements else {
            return;
        };
        self.result_url = Some(pair.get(which).to_string());
        self.step = Step::Review;
        self.notice = Some("Refinement applied.".to_string());
    }

    /// Saves the selected result. A terminal side effect, not a navigation:
    /// the step never changes, only the notice reports the outcome.
    pub async fn complete(&mut self) {
        if self.loading || self.step != Step::Review {
            return;
        }
        let Some(selected) = self.result_url.clone() else {
            return;
        };
        self.loading = true;
        self.notice = None;
        let token = self.new_signal();
        let timeout = self.api.request_timeout();

        let request = CompleteRequest {
            image_url: &selected,
            meta: &self.form,
        };
        // The response body is ignored beyond status handling.
        let result = self
            .api
            .post_json::<serde_json::Value>(COMPLETE_PATH, &request, &token, timeout)
            .await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.notice = Some("Saved.".to_string());
                info!("Result saved");
            }
            Err(ApiError::Cancelled) => {
                debug!("Complete request superseded, leaving state untouched");
            }
            Err(err) => {
                warn!("Complete request failed: {err}");
                self.notice = Some(format!("Failed to save: {err}"));
            }
        }
    }

    /// Inverse of the last forward transition. Leaving Review discards the
    /// selected result; the candidate pair survives so Choose is restored
    /// exactly as it was.
    pub fn back(&mut self) {
        if self.loading {
            return;
        }
        match self.step {
            Step::Input => {}
            Step::Choose => {
                self.step = Step::Input;
            }
            Step::Review => {
                self.result_url = None;
                self.step = Step::Choose;
            }
            Step::ChooseRefinement => {
                self.step = Step::Review;
            }
        }
    }
}
