use std::fmt;

/// Why the frame loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(String),
    Error(String),
    UserRequest,
    /// The frame source ran out of frames
    EndOfStream,
}

impl ShutdownReason {
    /// Process exit code for this reason
    pub fn exit_code(&self) -> i32 {
        match self {
            ShutdownReason::Error(_) => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(signal) => write!(f, "received {}", signal),
            ShutdownReason::Error(error) => write!(f, "error: {}", error),
            ShutdownReason::UserRequest => f.write_str("user request"),
            ShutdownReason::EndOfStream => f.write_str("end of frame stream"),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub reason: ShutdownReason,
    /// Process exit code; non-zero when the run or the shutdown failed
    pub exit_code: i32,
}

/// Launch switches that come from the command line rather than the config file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Log commands instead of sending them to the broker
    pub no_publish: bool,
}
