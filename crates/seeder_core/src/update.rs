use crate::{AppState, Effect, Msg, ShutdownPhase};

/// Pure update function: applies a message to state and returns any effects.
///
/// The cleanup sequence can only be entered from `Running`, so it runs at most
/// once per process no matter how many interrupts arrive.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InterruptReceived => {
            state.count_interrupt();
            if state.phase() == ShutdownPhase::Running {
                state.set_phase(ShutdownPhase::Cleaning);
                // Acquisition must be quiesced before any sweep enumerates the store.
                vec![
                    Effect::HaltAcquisition,
                    Effect::StopReporter,
                    Effect::RunCleanup,
                ]
            } else {
                Vec::new()
            }
        }
        Msg::CleanupFinished(summary) => {
            if state.phase() == ShutdownPhase::Cleaning {
                state.set_phase(ShutdownPhase::Reported);
                vec![Effect::PrintSummary(summary)]
            } else {
                Vec::new()
            }
        }
        Msg::SummaryPrinted => {
            if state.phase() == ShutdownPhase::Reported {
                state.set_phase(ShutdownPhase::Terminated);
                vec![Effect::Exit]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}
