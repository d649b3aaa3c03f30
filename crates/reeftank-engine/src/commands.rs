//! Console commands read from standard input while the tank runs.
//!
//! One command per line:
//!
//! | Command                          | Effect                                    |
//! |----------------------------------|-------------------------------------------|
//! | `food <x> <y> [size] [duration]` | Queue a pellet drop for the next tick     |
//! | `pause`                          | Hold the tick loop                        |
//! | `resume`                         | Continue after a pause                    |
//! | `speed <ms>`                     | Change the real-time tick interval        |
//! | `stop` or `quit`                 | End the run after the current tick        |
//!
//! Blank lines are ignored.

use std::io::BufRead;
use std::sync::Arc;

use reeftank_core::operator::{FoodRequest, MIN_TICK_INTERVAL_MS, OperatorState};
use reeftank_types::Point;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Drop a food pellet.
    Food(FoodRequest),
    /// Pause the simulation.
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Set the tick interval in milliseconds.
    Speed(u64),
    /// Stop the simulation.
    Stop,
}

/// Reasons a console line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("unknown command `{0}`")]
    Unknown(String),

    /// The command was given the wrong number of arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An argument could not be parsed as a number.
    #[error("`{value}` is not a valid {field}")]
    BadNumber {
        /// Which argument was malformed.
        field: &'static str,
        /// The text that failed to parse.
        value: String,
    },
}

const FOOD_USAGE: &str = "food <x> <y> [size] [duration_ms]";
const SPEED_USAGE: &str = "speed <interval_ms>";

/// Parse one console line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("pause", []) => Command::Pause,
        ("resume", []) => Command::Resume,
        ("stop" | "quit", []) => Command::Stop,
        ("speed", [ms]) => Command::Speed(number(ms, "interval")?),
        ("speed", _) => return Err(CommandError::Usage(SPEED_USAGE)),
        ("food", [x, y, rest @ ..]) if rest.len() <= 2 => {
            let position = Point::new(number(x, "x coordinate")?, number(y, "y coordinate")?);
            let size = rest.first().map(|s| number(s, "size")).transpose()?;
            let duration_ms = rest.get(1).map(|d| number(d, "duration")).transpose()?;
            Command::Food(FoodRequest {
                position,
                size,
                duration_ms,
            })
        }
        ("food", _) => return Err(CommandError::Usage(FOOD_USAGE)),
        ("pause" | "resume" | "stop" | "quit", _) => {
            return Err(CommandError::Usage("command takes no arguments"));
        }
        (other, _) => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, CommandError> {
    value.parse().map_err(|_err| CommandError::BadNumber {
        field,
        value: value.to_owned(),
    })
}

/// Apply a command to the shared operator state.
pub async fn apply(operator: &OperatorState, command: Command) {
    match command {
        Command::Food(request) => {
            info!(
                x = request.position.x,
                y = request.position.y,
                size = ?request.size,
                duration_ms = ?request.duration_ms,
                "Food drop queued"
            );
            operator.request_food(request).await;
        }
        Command::Pause => {
            operator.pause();
            info!("Pause requested");
        }
        Command::Resume => {
            operator.resume();
        }
        Command::Speed(ms) => match operator.set_tick_interval_ms(ms) {
            Some(previous) => info!(previous, current = ms, "Tick interval changed"),
            None => warn!(
                requested = ms,
                minimum = MIN_TICK_INTERVAL_MS,
                "Tick interval below minimum, ignored"
            ),
        },
        Command::Stop => {
            info!("Stop requested from console");
            operator.request_stop();
        }
    }
}

/// Read standard input on a background thread, one line per message.
///
/// Reading happens on a plain OS thread so a blocked read never holds up
/// runtime shutdown. The channel closes when input reaches end of file.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name("console-input".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        warn!(%err, "Console input failed, commands disabled");
                        return;
                    }
                }
            }
        });
    if let Err(err) = spawned {
        warn!(%err, "Could not start console reader, commands disabled");
    }
    rx
}

/// Apply console lines until the input closes or a stop is requested.
pub async fn read_commands(
    mut lines: mpsc::UnboundedReceiver<String>,
    operator: Arc<OperatorState>,
) {
    while let Some(line) = lines.recv().await {
        match parse(&line) {
            Ok(Some(command)) => {
                let stopping = matches!(command, Command::Stop);
                apply(&operator, command).await;
                if stopping {
                    return;
                }
            }
            Ok(None) => {}
            Err(err) => warn!(%err, line = %line, "Ignoring console input"),
        }
    }
}
