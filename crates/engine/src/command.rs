//! Operator commands.
//!
//! Text form, one command per line:
//!
//! | Text | Command |
//! |---|---|
//! | `click X Y` | [`Command::PointerPress`] |
//! | `clear` | [`Command::ClearArea`] |
//! | `save` | [`Command::SaveArea`] |
//! | `edit` / `play` | [`Command::ToggleEdit`] / [`Command::TogglePlay`] |
//! | `flipx` / `flipy` | [`Command::ToggleFlipX`] / [`Command::ToggleFlipY`] |
//! | `grab`, `space` | [`Command::GrabBackground`] |
//! | `w` / `s` / `threshold N` | [`Command::NudgeThreshold`] |
//! | `tab` | [`Command::ToggleCalibrationSync`] |

use std::str::FromStr;

/// A synchronous operator action applied between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pointer press in window coordinates. Appends a vertex in edit mode.
    PointerPress { x: f64, y: f64 },
    ClearArea,
    SaveArea,
    ToggleEdit,
    TogglePlay,
    ToggleFlipX,
    ToggleFlipY,
    GrabBackground,
    /// Add to the tracker threshold.
    NudgeThreshold(f64),
    /// Stop or resume pushing calibration into the tracker every frame.
    ToggleCalibrationSync,
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Command '{command}' expects {expected} argument(s)")]
    Arity {
        command: &'static str,
        expected: usize,
    },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

fn number(token: &str) -> Result<f64, CommandParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandParseError::InvalidNumber(token.to_string()))
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Err(CommandParseError::Empty);
        };
        let args: Vec<&str> = tokens.collect();
        let head = head.to_ascii_lowercase();

        let arity = |command: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(CommandParseError::Arity { command, expected })
            }
        };

        match head.as_str() {
            "click" => {
                arity("click", 2)?;
                Ok(Command::PointerPress {
                    x: number(args[0])?,
                    y: number(args[1])?,
                })
            }
            "threshold" => {
                arity("threshold", 1)?;
                Ok(Command::NudgeThreshold(number(args[0])?))
            }
            simple => {
                let command = match simple {
                    "clear" => Command::ClearArea,
                    "save" => Command::SaveArea,
                    "edit" => Command::ToggleEdit,
                    "play" => Command::TogglePlay,
                    "flipx" => Command::ToggleFlipX,
                    "flipy" => Command::ToggleFlipY,
                    "grab" | "space" => Command::GrabBackground,
                    "w" => Command::NudgeThreshold(1.0),
                    "s" => Command::NudgeThreshold(-1.0),
                    "tab" => Command::ToggleCalibrationSync,
                    other => return Err(CommandParseError::Unknown(other.to_string())),
                };
                if !args.is_empty() {
                    return Err(CommandParseError::Arity {
                        command: "simple commands",
                        expected: 0,
                    });
                }
                Ok(command)
            }
        }
    }
}
