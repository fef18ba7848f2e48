use crate::Result;
use crate::types::GenerationResponse;

/// Lifecycle of one form's generation request:
/// `Idle → Dispatching → {Succeeded | Failed} → Idle` (via reset or a new
/// submit).
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Dispatching,
    Succeeded(GenerationResponse),
    Failed(String),
}

impl SubmissionState {
    fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dispatching => "dispatching",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Proof that a submission was begun. The embedded ticket number lets
/// `resolve` discard results from calls that were superseded by a reset or
/// a newer submit, so a form that was navigated away from never shows a
/// stale image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// Per-form request/result state. Each form instance owns exactly one of
/// these; independent forms are independent. Enforces the one-in-flight
/// invariant: `try_begin` refuses while a request is dispatching.
#[derive(Debug, Default)]
pub struct Submission {
    state: SubmissionState,
    ticket: u64,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Whether the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        !matches!(self.state, SubmissionState::Dispatching)
    }

    /// Enter `Dispatching`. Returns `None` while a request is already in
    /// flight; the caller keeps the prior state and must wait for it to
    /// resolve.
    pub fn try_begin(&mut self) -> Option<SubmissionTicket> {
        if !self.can_submit() {
            return None;
        }
        self.ticket += 1;
        self.state = SubmissionState::Dispatching;
        Some(SubmissionTicket(self.ticket))
    }

    /// Apply the outcome of the dispatch call begun with `ticket`. Returns
    /// false (and leaves the state untouched) when the ticket is stale.
    pub fn resolve(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<GenerationResponse>,
    ) -> bool {
        if ticket.0 != self.ticket || !matches!(self.state, SubmissionState::Dispatching) {
            tracing::debug!(
                state = self.state.label(),
                "discarding stale submission result"
            );
            return false;
        }
        self.state = match outcome {
            Ok(response) => SubmissionState::Succeeded(response),
            Err(err) => SubmissionState::Failed(err.to_string()),
        };
        true
    }

    /// Clear result and error state back to `Idle`, invalidating any
    /// in-flight ticket.
    pub fn reset(&mut self) {
        self.ticket += 1;
        self.state = SubmissionState::Idle;
    }

    pub fn response(&self) -> Option<&GenerationResponse> {
        match &self.state {
            SubmissionState::Succeeded(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImagenError;
    use crate::types::ImageRef;

    fn response() -> GenerationResponse {
        GenerationResponse::new(ImageRef::Url {
            url: "https://cdn.example.com/out.png".to_string(),
        })
    }

    #[test]
    fn one_request_in_flight_per_form() {
        let mut submission = Submission::new();
        let ticket = submission.try_begin().expect("idle form accepts submit");
        assert!(!submission.can_submit());
        assert!(submission.try_begin().is_none());

        assert!(submission.resolve(ticket, Ok(response())));
        assert!(submission.can_submit());
        assert!(submission.response().is_some());
    }

    #[test]
    fn failure_keeps_form_usable() {
        let mut submission = Submission::new();
        let ticket = submission.try_begin().expect("begin");
        assert!(submission.resolve(ticket, Err(ImagenError::MissingCredential)));

        let message = submission.error().expect("failed state");
        assert!(message.contains("api key"));
        assert!(submission.can_submit());
    }

    #[test]
    fn reset_returns_to_idle_and_invalidates_ticket() {
        let mut submission = Submission::new();
        let ticket = submission.try_begin().expect("begin");
        submission.reset();

        assert!(matches!(submission.state(), SubmissionState::Idle));
        // The in-flight call resolves after the user already reset; its
        // result must not be applied.
        assert!(!submission.resolve(ticket, Ok(response())));
        assert!(matches!(submission.state(), SubmissionState::Idle));
    }

    #[test]
    fn newer_submit_supersedes_older_ticket() {
        let mut submission = Submission::new();
        let stale = submission.try_begin().expect("begin");
        submission.reset();
        let current = submission.try_begin().expect("begin again");

        assert!(!submission.resolve(stale, Err(ImagenError::Aborted)));
        assert!(submission.resolve(current, Ok(response())));
        assert!(submission.response().is_some());
    }
}
