use statig::prelude::*;

use super::events::SessionEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Provisioning,
    Active,
    /// Terminal; reached from either phase on an unrecoverable failure.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransitionStatus {
    Applied,
    Unchanged,
    InvalidTransition,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct SessionMachine {
    pub(super) phase: SessionPhase,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: TransitionStatus,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: TransitionStatus::Unchanged,
        }
    }
}

impl SessionMachine {
    pub(super) fn new() -> Self {
        Self {
            phase: SessionPhase::Provisioning,
        }
    }

    fn enter(&mut self, phase: SessionPhase, context: &mut DispatchContext) {
        context.status = if self.phase == phase {
            TransitionStatus::Unchanged
        } else {
            TransitionStatus::Applied
        };
        self.phase = phase;
    }
}

#[state_machine(initial = "State::provisioning()")]
impl SessionMachine {
    #[state]
    fn provisioning(
        &mut self,
        context: &mut DispatchContext,
        event: &SessionEvent,
    ) -> Outcome<State> {
        match event {
            SessionEvent::Opened => {
                self.enter(SessionPhase::Active, context);
                Transition(State::active())
            }
            SessionEvent::ProvisioningFailed => {
                self.enter(SessionPhase::Stopped, context);
                Transition(State::stopped())
            }
            _ => {
                context.status = TransitionStatus::InvalidTransition;
                Handled
            }
        }
    }

    #[state]
    fn active(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::Committed => {
                context.status = TransitionStatus::Unchanged;
                Handled
            }
            SessionEvent::IntegrityLost => {
                self.enter(SessionPhase::Stopped, context);
                Transition(State::stopped())
            }
            _ => {
                context.status = TransitionStatus::InvalidTransition;
                Handled
            }
        }
    }

    #[state]
    fn stopped(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        let _ = event;
        context.status = TransitionStatus::Unchanged;
        Handled
    }
}
