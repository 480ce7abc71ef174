//! Scanner screen state machine.
//!
//! Two axes folded into one enum: the camera permission (pending, denied,
//! granted) and, once granted, whether detection is armed or paused on a
//! result. A resolved permission never reverts within one mount; the screen
//! is rebuilt on every visit, which is what re-prompts.

use crate::platform::permissions::Decision;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Camera permission prompt is outstanding.
    PermissionPending,
    /// Permission denied. Terminal until the screen is reopened.
    PermissionDenied,
    /// Camera running, watching for codes.
    Armed,
    /// A code was decoded; detection pauses until the user re-arms.
    Scanned { payload: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    PermissionResolved(Decision),
    Detected(String),
    ScanAgain,
}

impl ScanState {
    pub fn new() -> Self {
        ScanState::PermissionPending
    }

    /// True while the screen should react to detections.
    pub fn armed(&self) -> bool {
        matches!(self, ScanState::Armed)
    }

    /// Applies an event, returning the next state. Events that make no
    /// sense in the current state leave it unchanged.
    pub fn apply(self, event: ScanEvent) -> ScanState {
        match (self, event) {
            (ScanState::PermissionPending, ScanEvent::PermissionResolved(Decision::Granted)) => {
                ScanState::Armed
            }
            (ScanState::PermissionPending, ScanEvent::PermissionResolved(Decision::Denied)) => {
                ScanState::PermissionDenied
            }
            (ScanState::Armed, ScanEvent::Detected(payload)) => ScanState::Scanned { payload },
            (ScanState::Scanned { .. }, ScanEvent::ScanAgain) => ScanState::Armed,
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending() {
        assert_eq!(ScanState::new(), ScanState::PermissionPending);
        assert!(!ScanState::new().armed());
    }

    #[test]
    fn grant_arms_the_scanner() {
        let state = ScanState::new().apply(ScanEvent::PermissionResolved(Decision::Granted));
        assert_eq!(state, ScanState::Armed);
        assert!(state.armed());
    }

    #[test]
    fn denial_is_terminal_for_the_mount() {
        let state = ScanState::new().apply(ScanEvent::PermissionResolved(Decision::Denied));
        assert_eq!(state, ScanState::PermissionDenied);

        // A stray second resolution must not flip the answer.
        let state = state.apply(ScanEvent::PermissionResolved(Decision::Granted));
        assert_eq!(state, ScanState::PermissionDenied);
    }

    #[test]
    fn detection_pauses_and_stores_the_payload() {
        let state = ScanState::Armed.apply(ScanEvent::Detected("Grace, 5559876".into()));
        assert_eq!(
            state,
            ScanState::Scanned {
                payload: "Grace, 5559876".into()
            }
        );
        assert!(!state.armed());
    }

    #[test]
    fn detections_while_paused_are_ignored() {
        let paused = ScanState::Scanned {
            payload: "first".into(),
        };
        let state = paused.clone().apply(ScanEvent::Detected("second".into()));
        assert_eq!(state, paused);
    }

    #[test]
    fn detections_before_grant_are_ignored() {
        let state = ScanState::new().apply(ScanEvent::Detected("early".into()));
        assert_eq!(state, ScanState::PermissionPending);

        let denied = ScanState::PermissionDenied.apply(ScanEvent::Detected("late".into()));
        assert_eq!(denied, ScanState::PermissionDenied);
    }

    #[test]
    fn scan_again_rearms_and_clears() {
        let state = ScanState::Scanned {
            payload: "Grace, 5559876".into(),
        }
        .apply(ScanEvent::ScanAgain);
        assert_eq!(state, ScanState::Armed);
    }
}
