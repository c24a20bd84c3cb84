use core::fmt;

/// Errors reported by the scheduler and the light engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The task table has no free slot
    TaskListFull,
    /// Task interval exceeds the wrap-safe range (`2^31 - 1` ms)
    IntervalOutOfRange,
    /// A channel or strip table has no free slot
    CapacityExceeded,
    /// Name does not fit into the fixed-size name buffer
    NameTooLong,
    /// Strip length is zero or larger than the pixel buffer
    InvalidLength,
    /// Program has no steps or colours
    EmptyProgram,
    /// Program has more steps or colours than can be stored
    ProgramTooLong,
    /// Mode name is not one of the known pixel modes
    UnknownMode,
    /// Colour token is neither a number nor `random`
    InvalidColor,
    /// Numeric field could not be parsed or is out of range
    InvalidNumber,
    /// No channel or strip at the given index
    UnknownTarget,
    /// Program changes are locked until the initial interval elapses
    ProgramLocked,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::TaskListFull => "task list is full",
            Self::IntervalOutOfRange => "task interval is out of range",
            Self::CapacityExceeded => "capacity exceeded",
            Self::NameTooLong => "name is too long",
            Self::InvalidLength => "invalid strip length",
            Self::EmptyProgram => "program is empty",
            Self::ProgramTooLong => "program is too long",
            Self::UnknownMode => "unknown mode",
            Self::InvalidColor => "invalid colour",
            Self::InvalidNumber => "invalid number",
            Self::UnknownTarget => "unknown channel or strip",
            Self::ProgramLocked => "program is locked by initial interval",
        };
        f.write_str(message)
    }
}

impl core::error::Error for Error {}
