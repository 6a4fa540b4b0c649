//! Command Handlers
//!
//! One JSON object per input line, shaped like a host runtime method call:
//!
//! ```text
//! {"method": "open", "args": [paymentMethods, configuration]}
//! {"method": "handle", "args": [action]}
//! {"method": "hide", "args": [true, {"message": "Authorised"}]}
//! {"method": "addListener", "args": ["didSubmitCallback"]}
//! {"method": "removeListeners", "args": [1]}
//! {"method": "reload"}
//! {"method": "cancel"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dropin_core::value::json_to_map;
use dropin_core::{CheckoutError, HostMap, NativeError};

use crate::state::AppState;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct CommandLine {
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

/// Written to stdout when a line can't be turned into a command
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// A parsed host call
#[derive(Clone, Debug, PartialEq)]
pub enum HostCommand {
    Open {
        payment_methods: HostMap,
        configuration: HostMap,
    },
    Handle(HostMap),
    Hide {
        success: bool,
        message: Option<HostMap>,
    },
    AddListener(String),
    RemoveListeners(u32),

    /// Recreate the module while the native flow keeps running
    Reload,

    /// Shopper dismisses the native drop-in
    Cancel,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Malformed command: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown method `{0}`")]
    UnknownMethod(String),

    #[error("`{method}` expects {expected}")]
    Arguments {
        method: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Conversion(#[from] CheckoutError),
}

impl CommandError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "MALFORMED_COMMAND",
            Self::UnknownMethod(_) => "UNKNOWN_METHOD",
            Self::Arguments { .. } => "INVALID_ARGUMENTS",
            Self::Conversion(e) => e.code(),
        }
    }
}

impl From<&CommandError> for ErrorResponse {
    fn from(e: &CommandError) -> Self {
        Self {
            error: e.to_string(),
            code: e.code(),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

pub fn parse_command(line: &str) -> Result<HostCommand, CommandError> {
    let CommandLine { method, args } = serde_json::from_str(line)?;

    Ok(match method.as_str() {
        "open" => HostCommand::Open {
            payment_methods: map_arg(&args, 0, "open", "two objects")?,
            configuration: map_arg(&args, 1, "open", "two objects")?,
        },
        "handle" => HostCommand::Handle(map_arg(&args, 0, "handle", "an action object")?),
        "hide" => {
            const EXPECTED: &str = "a boolean and an optional object";
            let success = args
                .first()
                .and_then(Value::as_bool)
                .ok_or(CommandError::Arguments {
                    method: "hide",
                    expected: EXPECTED,
                })?;
            let message = match args.get(1) {
                None | Some(Value::Null) => None,
                Some(_) => Some(map_arg(&args, 1, "hide", EXPECTED)?),
            };
            HostCommand::Hide { success, message }
        }
        "addListener" => HostCommand::AddListener(
            args.first()
                .and_then(Value::as_str)
                .ok_or(CommandError::Arguments {
                    method: "addListener",
                    expected: "an event name",
                })?
                .to_string(),
        ),
        "removeListeners" => HostCommand::RemoveListeners(
            args.first()
                .and_then(Value::as_u64)
                .and_then(|count| u32::try_from(count).ok())
                .ok_or(CommandError::Arguments {
                    method: "removeListeners",
                    expected: "a listener count",
                })?,
        ),
        "reload" => HostCommand::Reload,
        "cancel" => HostCommand::Cancel,
        _ => return Err(CommandError::UnknownMethod(method)),
    })
}

fn map_arg(
    args: &[Value],
    index: usize,
    method: &'static str,
    expected: &'static str,
) -> Result<HostMap, CommandError> {
    match args.get(index) {
        Some(value @ Value::Object(_)) => Ok(json_to_map(value)?),
        _ => Err(CommandError::Arguments { method, expected }),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run one input line; returns the error to report when it isn't a command
pub fn execute(state: &mut AppState, line: &str) -> Option<ErrorResponse> {
    match parse_command(line) {
        Ok(command) => {
            dispatch(state, command);
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected input line");
            Some(ErrorResponse::from(&e))
        }
    }
}

pub fn dispatch(state: &mut AppState, command: HostCommand) {
    match command {
        HostCommand::Open {
            payment_methods,
            configuration,
        } => state.module.open(&payment_methods, &configuration),
        HostCommand::Handle(action) => state.module.handle(&action),
        HostCommand::Hide { success, message } => state.module.hide(success, message.as_ref()),
        HostCommand::AddListener(event_name) => state.module.add_listener(&event_name),
        HostCommand::RemoveListeners(count) => state.module.remove_listeners(count),
        HostCommand::Reload => state.reload_module(),
        HostCommand::Cancel => match state.launcher.callbacks() {
            Some(callbacks) => callbacks
                .on_fail(NativeError::new("Payment canceled by shopper").with_code("canceledByShopper")),
            None => tracing::warn!("Nothing to cancel, drop-in was never launched"),
        },
    }
}
