#[derive(Debug, Clone)]
pub enum Message {
    // === TIMER MESSAGES ===
    TimerStarted(String),                          // task
    TimerPaused { task: String, elapsed: String }, // frozen elapsed at pause
    TimerResumed(String),
    TimerStopped { task: String, total: String }, // final duration
    TimerReset(String),
    TimerOperationFailed(String),
    TimerBusy(String),
    NoActiveTimerForTask(String),
    ActiveTimersTitle,
    NoActiveTimers,

    // === SESSION MESSAGES ===
    SessionStarted,
    SessionHelp,
    SessionEnded,
    UnknownCommand(String),
    MissingTaskArgument(String), // command that needed one
    RefreshSkipped,
    RefreshFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    ConfigSaveError,
    PromptTickInterval,
    PromptRefreshInterval,
    PromptSingleTimerPolicy,
}
