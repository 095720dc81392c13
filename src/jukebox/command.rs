//! Text commands received over the serial link.

use crate::hw::EMPTY_BYTE;
use thiserror::Error;

/// A parsed serial command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Stop,
    Pause,
    /// Requested player speed, before clamping.
    Speed(f64),
    Next,
    Select(usize),
    Info,
}

/// Rejections reported back over the serial link.
///
/// The `Display` text is the exact reply line.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Error: Command not found")]
    NotFound,

    #[error("Error: Melody not found")]
    MelodyNotFound,

    #[error("Error: Invalid parameter")]
    InvalidParameter,
}

impl Command {
    /// Parse one line: a case-sensitive command word and an optional
    /// parameter, separated by spaces.
    ///
    /// Returns `Ok(None)` for a line without any word; the host side of the
    /// link sends one when it opens the port.
    pub fn parse(message: &str) -> Result<Option<Command>, CommandError> {
        let mut tokens = message.split(' ').filter(|t| !t.is_empty());
        let Some(word) = tokens.next() else {
            return Ok(None);
        };
        let param = tokens.next();

        let command = match word {
            "play" => Command::Play,
            "stop" => Command::Stop,
            "pause" => Command::Pause,
            "next" => Command::Next,
            "info" => Command::Info,
            "speed" => {
                let speed = param
                    .and_then(|p| p.parse::<f64>().ok())
                    .filter(|s| s.is_finite())
                    .ok_or(CommandError::InvalidParameter)?;
                Command::Speed(speed)
            }
            "select" => {
                let index = param
                    .and_then(|p| p.parse::<usize>().ok())
                    .ok_or(CommandError::InvalidParameter)?;
                Command::Select(index)
            }
            _ => return Err(CommandError::NotFound),
        };

        Ok(Some(command))
    }
}

/// Text of a received buffer: bytes up to the first empty byte, without a
/// trailing carriage return.
pub fn decode_line(buf: &[u8]) -> String {
    let len = buf.iter().position(|&b| b == EMPTY_BYTE).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..len])
        .trim_end_matches('\r')
        .to_string()
}
