//! Parsing of the scripted steps given on the command line.

use std::{error::Error, fmt, str::FromStr};

/// Separates a step name from its repeat count, as in `attach*5`.
const REPEAT_DELIMITER: char = '*';
/// Separates a step name from its value, as in `detach-cores=12`.
const VALUE_DELIMITER: char = '=';

/// One scripted action against the trooper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Rebuild the volume at its entry count.
    Reset,
    /// Attach cells one at a time.
    Attach(u32),
    /// Detach cells one at a time.
    Detach(u32),
    /// Detach cells in one bulk penalty.
    DetachCores(u32),
    /// Advance the energy meters.
    Tick(u32),
    /// Switch cloaking on.
    Cloak,
    /// Switch cloaking off.
    Decloak,
    /// Spend the teleport meter.
    Teleport,
    /// Collect cores, one per frame.
    Pickup(u32),
    /// Collide with sentinels, one per frame.
    Collide(u32),
    /// Refill both meters as at level entry.
    Recharge,
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScriptError::EmptyStep);
        }

        if let Some((name, amount)) = trimmed.split_once(VALUE_DELIMITER) {
            return match name {
                "detach-cores" => Ok(Self::DetachCores(parse_count(trimmed, amount)?)),
                _ => Err(ScriptError::UnexpectedValue(trimmed.to_owned())),
            };
        }

        let (name, repeat) = match trimmed.split_once(REPEAT_DELIMITER) {
            Some((name, repeat)) => (name, Some(parse_count(trimmed, repeat)?)),
            None => (trimmed, None),
        };
        let count = repeat.unwrap_or(1);

        let step = match name {
            "attach" => Self::Attach(count),
            "detach" => Self::Detach(count),
            "tick" => Self::Tick(count),
            "pickup" => Self::Pickup(count),
            "collide" => Self::Collide(count),
            "reset" | "cloak" | "decloak" | "teleport" | "recharge" if repeat.is_some() => {
                return Err(ScriptError::UnexpectedRepeat(trimmed.to_owned()));
            }
            "reset" => Self::Reset,
            "cloak" => Self::Cloak,
            "decloak" => Self::Decloak,
            "teleport" => Self::Teleport,
            "recharge" => Self::Recharge,
            "detach-cores" => return Err(ScriptError::MissingValue(trimmed.to_owned())),
            _ => return Err(ScriptError::UnknownStep(name.to_owned())),
        };
        Ok(step)
    }
}

/// Parses every step, stopping at the first malformed one.
pub(crate) fn parse<S: AsRef<str>>(steps: &[S]) -> Result<Vec<Step>, ScriptError> {
    steps.iter().map(|step| step.as_ref().parse()).collect()
}

/// Errors that can occur while parsing scripted steps.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// A step was empty or contained only whitespace.
    EmptyStep,
    /// The step name is not recognised.
    UnknownStep(String),
    /// A repeat count or value could not be parsed.
    InvalidCount(String),
    /// A step that runs once was given a repeat count.
    UnexpectedRepeat(String),
    /// A step that takes no value was given one.
    UnexpectedValue(String),
    /// A step that needs a value was given none.
    MissingValue(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStep => write!(f, "script step was empty"),
            Self::UnknownStep(name) => write!(f, "script step '{name}' is not supported"),
            Self::InvalidCount(step) => write!(f, "could not parse the count in '{step}'"),
            Self::UnexpectedRepeat(step) => write!(f, "step '{step}' cannot be repeated"),
            Self::UnexpectedValue(step) => write!(f, "step '{step}' does not take a value"),
            Self::MissingValue(step) => {
                write!(f, "step '{step}' needs a value, as in '{step}=12'")
            }
        }
    }
}

impl Error for ScriptError {}

fn parse_count(step: &str, count: &str) -> Result<u32, ScriptError> {
    count
        .trim()
        .parse::<u32>()
        .map_err(|_| ScriptError::InvalidCount(step.to_owned()))
}
