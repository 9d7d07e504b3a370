use std::fmt;
use std::io::{self, BufRead, Write};

use pose_core::model::{BodyPart, Coordinate};
use services::{
    AnnotationError, Annotator, ConfirmOutcome, DragOutcome, PlaceOutcome, SessionPhase,
};

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

/// One line of console input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Place the current part.
    Place(Coordinate),
    Drag(BodyPart, Coordinate),
    Absent(BodyPart),
    Confirm,
    Back,
    Skip,
    Status,
    Help,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
    TooManyArguments { command: &'static str },
    InvalidNumber(String),
    UnknownPart(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::MissingArgument { command } => {
                write!(f, "{command}: missing argument")
            }
            CommandError::TooManyArguments { command } => {
                write!(f, "{command}: too many arguments")
            }
            CommandError::InvalidNumber(raw) => write!(f, "not a number: {raw}"),
            CommandError::UnknownPart(raw) => write!(f, "unknown body part: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse a console line such as `place 0.4 0.2` or `drag left_knee 0.5 0.7`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for blank lines, unknown verbs and bad arguments.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "place" | "p" => Command::Place(point("place", &args)?),
            "drag" | "d" => {
                let (part, rest) = args
                    .split_first()
                    .ok_or(CommandError::MissingArgument { command: "drag" })?;
                Command::Drag(body_part(part)?, point("drag", rest)?)
            }
            "absent" | "a" => match *args.as_slice() {
                [part] => Command::Absent(body_part(part)?),
                [] => return Err(CommandError::MissingArgument { command: "absent" }),
                _ => return Err(CommandError::TooManyArguments { command: "absent" }),
            },
            "confirm" | "c" => no_args("confirm", &args, Command::Confirm)?,
            "back" | "b" => no_args("back", &args, Command::Back)?,
            "skip" => no_args("skip", &args, Command::Skip)?,
            "status" | "s" => no_args("status", &args, Command::Status)?,
            "help" | "?" => no_args("help", &args, Command::Help)?,
            "quit" | "q" | "exit" => no_args("quit", &args, Command::Quit)?,
            _ => return Err(CommandError::Unknown(verb.to_owned())),
        };
        Ok(command)
    }
}

fn no_args(command: &'static str, args: &[&str], cmd: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::TooManyArguments { command })
    }
}

fn number(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .map_err(|_| CommandError::InvalidNumber(raw.to_owned()))
}

/// `<x> <y>` in normalized units, or `<px> <py> <width> <height>` in pixels.
fn point(command: &'static str, args: &[&str]) -> Result<Coordinate, CommandError> {
    match *args {
        [x, y] => Ok(Coordinate::new(number(x)?, number(y)?)),
        [px, py, width, height] => {
            let size = |raw: &str| {
                number(raw).and_then(|value| {
                    if value > 0.0 {
                        Ok(value)
                    } else {
                        Err(CommandError::InvalidNumber(raw.to_owned()))
                    }
                })
            };
            Ok(Coordinate::from_pixels(
                number(px)?,
                number(py)?,
                size(width)?,
                size(height)?,
            ))
        }
        [] | [_] | [_, _, _] => Err(CommandError::MissingArgument { command }),
        _ => Err(CommandError::TooManyArguments { command }),
    }
}

/// Accepts a column name (`left_knee`), a display name (`Left knee`) or an index.
fn body_part(raw: &str) -> Result<BodyPart, CommandError> {
    if let Ok(index) = raw.parse::<usize>() {
        return BodyPart::from_index(index)
            .ok_or_else(|| CommandError::UnknownPart(raw.to_owned()));
    }
    let wanted = raw.to_ascii_lowercase().replace(['-', ' '], "_");
    BodyPart::from_column(&wanted).ok_or_else(|| CommandError::UnknownPart(raw.to_owned()))
}

//
// ─── LOOP ──────────────────────────────────────────────────────────────────────
//

const HELP: &str = "\
commands:
  place <x> <y>          place the current part (normalized coordinates)
  place <x> <y> <w> <h>  same, in pixels of a w by h image
  drag <part> <x> <y>    move an existing marker (pixels accepted as for place)
  absent <part>          toggle the absent flag of a part
  confirm                store the current image and move on
  back                   return to the previous image
  skip                   leave training and start annotating
  status                 show progress and placed markers
  quit                   save the session log and exit";

/// Read commands from `input` until `quit` or end of input, then write the
/// session log.
///
/// Command mistakes are reported and the loop continues; storage errors end it
/// but the session log is still written.
///
/// # Errors
///
/// Returns the first storage or I/O error hit while saving or prompting.
pub fn run<R: BufRead, W: Write>(
    annotator: &mut Annotator,
    input: R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = read_commands(annotator, input, out);

    match annotator.finish() {
        Ok(Some(entry)) => writeln!(
            out,
            "{} images annotated in {:.0} seconds",
            entry.images_annotated(),
            entry.seconds_spent()
        )?,
        Ok(None) => {}
        Err(err) => log::warn!("could not write the session log: {err}"),
    }
    result
}

fn read_commands<R: BufRead, W: Write>(
    annotator: &mut Annotator,
    input: R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    prompt(annotator, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        execute(annotator, command, out)?;
        prompt(annotator, out)?;
    }
    Ok(())
}

fn execute<W: Write>(
    annotator: &mut Annotator,
    command: Command,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Place(coord) => {
            let Some(part) = annotator.session().current_part() else {
                writeln!(out, "every part is placed, confirm or drag")?;
                return Ok(());
            };
            match annotator.session_mut().place_marker(part, coord) {
                PlaceOutcome::Placed { .. } => {}
                PlaceOutcome::OffTarget { part } => {
                    writeln!(out, "{part} is off target, drag it closer")?;
                }
                PlaceOutcome::Rejected => writeln!(out, "placement rejected")?,
            }
        }
        Command::Drag(part, coord) => match annotator.session_mut().drag_marker(part, coord) {
            DragOutcome::Moved | DragOutcome::Advanced { .. } => {}
            DragOutcome::OffTarget => writeln!(out, "{part} is still off target")?,
            DragOutcome::Rejected => writeln!(out, "{part} has no marker yet")?,
        },
        Command::Absent(part) => {
            let absent = annotator.session_mut().toggle_absent(part);
            writeln!(out, "{part} {}", if absent { "absent" } else { "present" })?;
        }
        Command::Confirm => match annotator.confirm()? {
            ConfirmOutcome::NotReady => writeln!(out, "place every part before confirming")?,
            ConfirmOutcome::Confirmed {
                phase: SessionPhase::TrainingComplete,
                ..
            } => {
                writeln!(out, "Training completed!")?;
                annotator.skip_training()?;
            }
            ConfirmOutcome::Confirmed { .. } => {}
        },
        Command::Back => {
            if !annotator.session_mut().go_back() {
                writeln!(out, "already at the first image")?;
            }
        }
        Command::Skip => match annotator.skip_training() {
            Ok(()) => {}
            Err(AnnotationError::NotTraining) => writeln!(out, "not in training")?,
            Err(err) => return Err(err.into()),
        },
        Command::Status => status(annotator, out)?,
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

fn prompt<W: Write>(annotator: &Annotator, out: &mut W) -> io::Result<()> {
    let session = annotator.session();
    if let Some(image) = session.current_image() {
        match (image.video_name(), image.frame_number()) {
            (Some(video), Some(frame)) => writeln!(out, "[{image}] {video} frame {frame}")?,
            _ => writeln!(out, "[{image}]")?,
        }
    }
    writeln!(out, "{}", session.progress().status_line())?;
    out.flush()
}

fn status<W: Write>(annotator: &Annotator, out: &mut W) -> io::Result<()> {
    let session = annotator.session();
    let progress = session.progress();
    writeln!(
        out,
        "{} mode, image {} of {}, {} of {} parts placed",
        if progress.training { "training" } else { "live" },
        (progress.image_index + 1).min(progress.total_images),
        progress.total_images,
        progress.placed,
        BodyPart::ALL.len()
    )?;
    for part in BodyPart::ALL {
        if !session.has_marker(part) {
            continue;
        }
        let marker = session.keypoints().get(part);
        let flag = if session.is_absent(part) { " (absent)" } else { "" };
        writeln!(out, "  {:<16}{} {marker}{flag}", part.column_name(), part.color())?;
    }
    let drawn = BodyPart::skeleton_edges()
        .filter(|(part, parent)| session.has_marker(*part) && session.has_marker(*parent))
        .count();
    writeln!(out, "  skeleton: {drawn} of {} bones", BodyPart::skeleton_edges().count())?;
    Ok(())
}
