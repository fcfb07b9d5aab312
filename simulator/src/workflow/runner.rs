use carriercore::element_interface::Mode;
use carriercore::prelude::{ControllerError, Host, HostSignal, SpectrumElement};
use carriercore::telemetry::MetricsSnapshot;
use carriercore::{ControllerConfig, InitializationController};
use log::{error, info};

/// Script parameters supplied by whoever launches the run.
#[derive(Clone, Debug, Default)]
pub struct ScriptParams {
    pub mode: String,
    pub index_reference: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed(String),
}

pub struct RunReport {
    pub outcome: RunOutcome,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: ControllerConfig,
}

impl Runner {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    /// Runs one script invocation against `element`.
    ///
    /// Host signals end the run and are handed back untouched; every other
    /// failure becomes a [`RunOutcome::Failed`] message.
    pub fn execute(
        &self,
        element: &dyn SpectrumElement,
        host: &dyn Host,
        params: &ScriptParams,
    ) -> Result<RunReport, HostSignal> {
        let controller = InitializationController::new(element, host, self.config.clone());
        let mode = Mode::parse(&params.mode);
        info!("running mode {} (index reference '{}')", mode, params.index_reference);

        let outcome = match controller.dispatch(&mode, &params.index_reference) {
            Ok(()) => RunOutcome::Completed,
            Err(ControllerError::HostSignal(signal)) => return Err(signal),
            Err(err @ ControllerError::RowsNotCreated) => RunOutcome::Failed(err.to_string()),
            Err(err) => RunOutcome::Failed(format!("Run|Something went wrong: {}", err)),
        };
        if let RunOutcome::Failed(message) = &outcome {
            error!("{}", message);
        }

        Ok(RunReport {
            outcome,
            metrics: controller.metrics().snapshot(),
        })
    }
}
