//! Scripted command pacing
//!
//! Switch CLIs give no framing for request/response, so the only
//! synchronisation available is time: each command is followed by a settle
//! delay before the next one goes out.
//!
//! ```text
//! terminal length 0              → 1s
//! show interface * transceiver   → 1s + 3s (dump needs time to accumulate)
//! exit                           → 1s
//! ```
//!
//! Slow CLIs that take longer than this to answer will have their output cut
//! short only if the read deadline also expires; output that arrives late is
//! still collected by the drain.

use std::time::Duration;

use tracing::{debug, instrument, trace};

use crate::error::PollResult;
use crate::session::ShellSession;

const DISABLE_PAGING: &str = "terminal length 0";
const TRANSCEIVER_DUMP: &str = "show interface * transceiver";
const EXIT: &str = "exit";

const SETTLE_DELAY: Duration = Duration::from_secs(1);
const DUMP_EXTRA_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    pub command: String,
    /// Wait after writing the command, before the next one is issued
    pub settle: Duration,
}

/// Ordered command script with its timing contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScript {
    steps: Vec<CommandStep>,
}

impl CommandScript {
    pub fn new(steps: Vec<CommandStep>) -> Self {
        Self { steps }
    }

    /// Disable paging, dump transceiver diagnostics, leave the shell
    pub fn transceiver_dump() -> Self {
        Self::paced(SETTLE_DELAY, DUMP_EXTRA_DELAY)
    }

    /// The transceiver script with custom delays. Tests use zero delays.
    pub fn paced(settle: Duration, dump_extra: Duration) -> Self {
        Self::new(vec![
            CommandStep {
                command: DISABLE_PAGING.to_string(),
                settle,
            },
            CommandStep {
                command: TRANSCEIVER_DUMP.to_string(),
                settle: settle + dump_extra,
            },
            CommandStep {
                command: EXIT.to_string(),
                settle,
            },
        ])
    }

    pub fn steps(&self) -> &[CommandStep] {
        &self.steps
    }

    /// Total time spent pacing, excluding write latency
    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|step| step.settle).sum()
    }

    /// Send every command in order. Stops at the first failed write.
    #[instrument(skip_all)]
    pub async fn run(&self, session: &mut dyn ShellSession) -> PollResult<()> {
        for step in &self.steps {
            trace!("sending `{}`", step.command);
            session.send_line(&step.command).await?;
            tokio::time::sleep(step.settle).await;
        }

        debug!("sent {} commands", self.steps.len());
        Ok(())
    }
}

impl Default for CommandScript {
    fn default() -> Self {
        Self::transceiver_dump()
    }
}
