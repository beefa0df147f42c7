use statig::blocking::IntoStateMachineExt as _;

use super::events::SessionEvent;
use super::machine::{DispatchContext, SessionMachine, SessionPhase, TransitionStatus};

#[derive(Clone, Copy, Debug)]
pub(crate) struct TransitionResult {
    pub(crate) before: SessionPhase,
    pub(crate) after: SessionPhase,
    pub(crate) status: TransitionStatus,
}

impl TransitionResult {
    pub(crate) fn changed(self) -> bool {
        matches!(self.status, TransitionStatus::Applied)
    }
}

pub(crate) struct SessionEngine {
    machine: statig::blocking::StateMachine<SessionMachine>,
}

impl SessionEngine {
    pub(crate) fn new() -> Self {
        Self {
            machine: SessionMachine::new().state_machine(),
        }
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        self.machine.inner().phase
    }

    pub(crate) fn apply(&mut self, event: SessionEvent) -> TransitionResult {
        let before = self.phase();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        TransitionResult {
            before,
            after: self.phase(),
            status: context.status,
        }
    }
}
