//! Display implementation for application messages.
//!
//! The single place where `Message` variants become user-visible text.
//! Keeping every string here means wording changes never touch the call
//! sites and the compiler checks parameter usage for each variant.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === TIMER MESSAGES ===
            Message::TimerStarted(task) => format!("Started tracking '{}'", task),
            Message::TimerPaused { task, elapsed } => format!("Paused '{}' at {}", task, elapsed),
            Message::TimerResumed(task) => format!("Resumed '{}'", task),
            Message::TimerStopped { task, total } => format!("Stopped '{}', total {}", task, total),
            Message::TimerReset(task) => format!("Reset timer for '{}'", task),
            Message::TimerOperationFailed(reason) => reason.clone(),
            Message::TimerBusy(task) => format!("An operation for '{}' is still in flight", task),
            Message::NoActiveTimerForTask(task) => format!("No active timer for task '{}'", task),
            Message::ActiveTimersTitle => "Active timers".to_string(),
            Message::NoActiveTimers => "No active timers".to_string(),

            // === SESSION MESSAGES ===
            Message::SessionStarted => "Tracking session started. Type 'help' for commands.".to_string(),
            Message::SessionHelp => concat!(
                "Commands:\n",
                "  start <task>   begin tracking a task\n",
                "  pause <task>   pause the task's running timer\n",
                "  resume <task>  resume the task's paused timer\n",
                "  stop <task>    complete the task's timer\n",
                "  reset <task>   zero the task's timer, keep it running\n",
                "  status         show all active timers\n",
                "  refresh        re-fetch active timers from the store\n",
                "  quit           end the session"
            )
            .to_string(),
            Message::SessionEnded => "Tracking session ended".to_string(),
            Message::UnknownCommand(input) => format!("Unknown command '{}'. Type 'help' for commands.", input),
            Message::MissingTaskArgument(command) => format!("'{}' needs a task name", command),
            Message::RefreshSkipped => "Refresh already in progress".to_string(),
            Message::RefreshFailed(reason) => format!("Refresh failed: {}", reason),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::ConfigSaveError => "Failed to save configuration".to_string(),
            Message::PromptTickInterval => "Tick interval in milliseconds".to_string(),
            Message::PromptRefreshInterval => "Full refresh interval in seconds".to_string(),
            Message::PromptSingleTimerPolicy => "Single-timer policy".to_string(),
        };
        write!(f, "{}", text)
    }
}
