//! Text commands standing in for key presses.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// New terrain at fresh random offsets (space bar).
    Regenerate,
    Rain,
    Snow,
    Wind,
    /// World height at grid cell `(x, y)` of the current terrain.
    Height { x: usize, y: usize },
    /// Write a color preview of the current terrain.
    Preview(PathBuf),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  space | regen      regenerate terrain
  r | rain           start rain
  s | snow           start snow
  w | wind           apply wind
  h X Y | height X Y terrain height at grid cell
  p PATH | preview   write a PNG preview
  status             show current terrain
  help               this text
  q | quit           exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        // A bare space is the regenerate key.
        if !line.is_empty() && line.trim().is_empty() {
            return Ok(Self::Regenerate);
        }

        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "space" | "regen" | "g" => Self::Regenerate,
            "r" | "rain" => Self::Rain,
            "s" | "snow" => Self::Snow,
            "w" | "wind" => Self::Wind,
            "h" | "height" => {
                const USAGE: &str = "height X Y";
                let x = parts.next().and_then(|v| v.parse().ok());
                let y = parts.next().and_then(|v| v.parse().ok());
                match (x, y) {
                    (Some(x), Some(y)) => Self::Height { x, y },
                    _ => return Err(CommandError::Usage(USAGE)),
                }
            }
            "p" | "preview" => match parts.next() {
                Some(path) => Self::Preview(PathBuf::from(path)),
                None => return Err(CommandError::Usage("preview PATH")),
            },
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}
