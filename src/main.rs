//! Haptic Rods entry point
//!
//! Headless driver: loads a puzzle, connects to the actuator and replays a
//! pointer script from stdin, one frame per line.
//!
//! ```text
//! haptic-rods [--timing immediate|forgiving] <layout> [settings.json] < script
//!
//! down X Y     press at (X, Y)
//! move X Y     pointer at (X, Y)
//! up           release
//! save PATH    queue a save of the current layout
//! load PATH    queue a puzzle switch
//! ping         queue an actuator ping
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use glam::Vec2;

use haptic_rods::haptics::HapticDevice;
use haptic_rods::intents::{Intent, IntentSender};
use haptic_rods::persistence::load_layout;
use haptic_rods::settings::TimingPreset;
use haptic_rods::sim::TickInput;
use haptic_rods::{AppState, Settings};

const USAGE: &str = "usage: haptic-rods [--timing immediate|forgiving] <layout> [settings.json] < script";

/// Command line options
#[derive(Debug, PartialEq)]
struct Args {
    layout: PathBuf,
    settings: Option<PathBuf>,
    /// Overrides the timing fields of the settings file
    timing: Option<TimingPreset>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut timing = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--timing" {
            let name = args.next().ok_or("--timing needs a preset name")?;
            let preset = TimingPreset::from_str(&name)
                .ok_or_else(|| format!("unknown timing preset {:?}", name))?;
            timing = Some(preset);
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    let mut positional = positional.into_iter();
    let layout = positional.next().ok_or("missing layout path")?;
    let settings = positional.next();
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument {}", extra.display()));
    }
    Ok(Args {
        layout,
        settings,
        timing,
    })
}

/// One parsed script line
enum Step {
    Pointer(TickInput),
    Queue(Intent),
}

fn parse_point<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<Vec2> {
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some(Vec2::new(x, y))
}

fn parse_step(line: &str, last_pointer: Vec2) -> Option<Step> {
    let mut parts = line.split_whitespace();
    let step = match parts.next()? {
        "down" => Step::Pointer(TickInput::press(parse_point(parts)?)),
        "move" => Step::Pointer(TickInput::hover(parse_point(parts)?)),
        "up" => Step::Pointer(TickInput::release(last_pointer)),
        "save" => Step::Queue(Intent::SavePuzzle(PathBuf::from(parts.next()?))),
        "load" => Step::Queue(Intent::LoadPuzzle(PathBuf::from(parts.next()?))),
        "ping" => Step::Queue(Intent::Ping),
        _ => return None,
    };
    Some(step)
}

fn run(args: &Args) -> haptic_rods::Result<()> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(preset) = args.timing {
        log::info!("Using {} timing", preset.as_str());
        settings.apply_preset(preset);
    }
    let rods = load_layout(&args.layout)?;
    let device = HapticDevice::connect(settings.device_path.as_deref());

    let mut app = AppState::new(rods, &settings, device);
    let intents: IntentSender = app.intent_sender();
    let mut pointer = Vec2::ZERO;

    for (number, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input = match parse_step(&line, pointer) {
            Some(Step::Pointer(input)) => input,
            Some(Step::Queue(intent)) => {
                // The session owns the receiver, so this only fails after shutdown
                intents.send(intent).ok();
                TickInput::hover(pointer)
            }
            None => {
                log::warn!("Ignoring script line {}: {:?}", number + 1, line);
                continue;
            }
        };
        pointer = input.pointer;
        app.tick(&input)?;
    }

    log::info!(
        "Script finished after {} frames, signal state {:?}",
        app.sim.frame,
        app.playing()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Haptic Rods starting...");

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            args(&["puzzle.txt"]).unwrap(),
            Args {
                layout: PathBuf::from("puzzle.txt"),
                settings: None,
                timing: None,
            }
        );
        assert_eq!(
            args(&["--timing", "immediate", "puzzle.txt", "rods.json"]).unwrap(),
            Args {
                layout: PathBuf::from("puzzle.txt"),
                settings: Some(PathBuf::from("rods.json")),
                timing: Some(TimingPreset::Immediate),
            }
        );
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(args(&[]).is_err());
        assert!(args(&["puzzle.txt", "--timing"]).is_err());
        assert!(args(&["--timing", "slow", "puzzle.txt"]).is_err());
        assert!(args(&["a.txt", "b.json", "c"]).is_err());
    }

    #[test]
    fn test_parse_step() {
        let pointer = Vec2::new(3.0, 4.0);
        assert!(matches!(
            parse_step("down 10 20.5", pointer),
            Some(Step::Pointer(input)) if input.pressed && input.pointer == Vec2::new(10.0, 20.5)
        ));
        assert!(matches!(
            parse_step("up", pointer),
            Some(Step::Pointer(input)) if input.released && input.pointer == pointer
        ));
        assert!(matches!(parse_step("ping", pointer), Some(Step::Queue(Intent::Ping))));
        assert!(parse_step("move 1", pointer).is_none());
        assert!(parse_step("jump 1 2", pointer).is_none());
    }
}
