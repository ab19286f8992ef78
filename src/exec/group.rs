// src/exec/group.rs

use tracing::debug;

use crate::config::model::CommandConfig;
use crate::exec::CommandRunner;

/// Run `commands` one after another, each starting only once the previous
/// one has finished or timed out.
///
/// There is no error aggregation: the runner logs each failure itself and the
/// group always runs to the end.
pub async fn run_group(runner: &dyn CommandRunner, group: &str, commands: &[CommandConfig]) {
    debug!(group, count = commands.len(), "command group started");

    for cmd in commands {
        runner.run(cmd).await;
    }

    debug!(group, "command group finished");
}
