//! Structured log events for a pipeline run.

use std::time::Duration;

use crate::error::{EditError, Stage};

pub fn log_run_start(instruction: &str, preset: &str) {
    tracing::info!(preset, instruction_len = instruction.len(), "Starting edit run");
}

pub fn log_run_complete(uri: &str, duration: f64) {
    tracing::info!(uri, duration, "Edit run complete");
}

pub fn log_stage_start(stage: Stage, attempt: usize) {
    tracing::debug!(stage = %stage, attempt, "Starting stage");
}

pub fn log_stage_complete(stage: Stage, elapsed: Duration) {
    tracing::debug!(stage = %stage, elapsed_ms = elapsed.as_millis() as u64, "Stage complete");
}

pub fn log_stage_retry(stage: Stage, retry: usize, delay: Duration, error: &EditError) {
    tracing::warn!(
        stage = %stage,
        retry,
        delay_ms = delay.as_millis() as u64,
        %error,
        "Stage failed with a transient error; retrying"
    );
}

pub fn log_stage_error(stage: Stage, error: &EditError) {
    tracing::error!(stage = %stage, %error, "Stage failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_functions_do_not_panic() {
        log_run_start("make a reel", "reels");
        log_stage_start(Stage::Planner, 0);
        log_stage_complete(Stage::Planner, Duration::from_millis(3));
        log_stage_retry(
            Stage::Retriever,
            0,
            Duration::from_millis(10),
            &EditError::EmptyPlan,
        );
        log_stage_error(Stage::Assembler, &EditError::Assembly("x".into()));
        log_run_complete("memory://renders/1.mp4", 30.0);
    }
}
