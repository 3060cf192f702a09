/// Interactive commands read from stdin
use crate::error::{CliError, Result};
use riff_playback::Player;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  p, play, pause     toggle play/pause (restarts a finished track)
  s, stop            pause playback
  n, next            load the track at the playlist cursor
  b, prev            step the playlist cursor back and load that track
                     (right after a next this reloads the current track)
  r, rewind          back to start; at the start, same as prev
  seek <seconds>     jump to a position
  vol <dB>           set volume from the mute point up to the maximum
                     (the lowest value mutes)
  status             print the current status
  h, help            show this help
  q, quit            exit";

/// A parsed user command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    TogglePlay,
    Stop,
    Next,
    Previous,
    Rewind,
    Seek(f64),
    Volume(f32),
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let command = match name.as_str() {
            "p" | "play" | "pause" => Command::TogglePlay,
            "s" | "stop" => Command::Stop,
            "n" | "next" => Command::Next,
            "b" | "prev" | "previous" => Command::Previous,
            "r" | "rewind" => Command::Rewind,
            "seek" => Command::Seek(parse_arg("seek", arg)?),
            "vol" | "volume" => Command::Volume(parse_arg("vol", arg)?),
            "status" => Command::Status,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CliError::UnknownCommand(line.trim().to_string())),
        };
        Ok(command)
    }
}

fn parse_arg<T: FromStr>(command: &'static str, arg: Option<&str>) -> Result<T> {
    let value = arg.unwrap_or_default();
    value
        .parse()
        .map_err(|_| CliError::InvalidArgument {
            command,
            value: value.to_string(),
        })
}

/// What the control loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl Command {
    /// Apply the command to the player
    ///
    /// `Status` and `Help` are handled by the caller and leave the player
    /// untouched.
    pub fn apply(self, player: &mut Player) -> Result<Flow> {
        match self {
            Command::TogglePlay => player.toggle_play(),
            Command::Stop => player.stop(),
            Command::Next => {
                player.skip_next()?;
            }
            Command::Previous => {
                player.skip_previous()?;
            }
            Command::Rewind => {
                player.rewind_or_previous()?;
            }
            Command::Seek(seconds) => {
                let rate = player
                    .transport()
                    .format()
                    .map_or(0, |format| format.sample_rate.as_hz());
                let frame = (seconds.max(0.0) * f64::from(rate)) as u64;
                player.set_position(frame);
            }
            Command::Volume(db) => {
                let (low, high) = player.volume_mapper().slider_bounds();
                player.volume_change(db.clamp(low as f32, high as f32));
            }
            Command::Status | Command::Help => {}
            Command::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }
}
