//! Line-driven session: one machine, many commands, live timers.
//!
//! Unlike one-shot subcommands, a failed save parks the command in the
//! running machine, so `retry` is meaningful here.

use crate::commands::Machine;
use crate::error_fmt::{format_error_json, humanize};
use crate::render;
use eyre::{Result, WrapErr};
use overload_core::{Command, Rating};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Cmd(Command),
    Status,
    Quit,
    Blank,
}

pub fn parse_line(line: &str) -> Result<Line> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Line::Blank);
    };
    let args: Vec<&str> = words.collect();
    let cmd = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        (h, _) if h.starts_with('#') => return Ok(Line::Blank),
        ("status" | "s", []) => return Ok(Line::Status),
        ("quit" | "exit" | "q", []) => return Ok(Line::Quit),
        ("begin", []) => Command::Begin,
        ("select" | "start", [id]) => Command::SelectWorkout((*id).to_string()),
        ("advance" | "a", []) => Command::Advance,
        ("skip-stretch", []) => Command::SkipStretch,
        ("skip-warmup", []) => Command::SkipWarmup,
        ("log", [reps, rating, rest @ ..]) if rest.len() <= 1 => {
            let reps = reps.parse::<u32>().wrap_err_with(|| format!("reps '{reps}'"))?;
            let rating = rating.parse::<Rating>().map_err(|e| eyre::eyre!(e))?;
            let weight = match rest.first() {
                Some(w) => Some(w.parse::<f64>().wrap_err_with(|| format!("weight '{w}'"))?),
                None => None,
            };
            Command::LogSet { reps, rating, weight }
        }
        ("rest", [delta]) => {
            Command::AdjustRest(delta.parse::<i64>().wrap_err_with(|| format!("seconds '{delta}'"))?)
        }
        ("finish" | "finish-exercise", []) => Command::FinishExercise,
        ("abandon", []) => Command::Abandon,
        ("retry", []) => Command::Retry,
        _ => eyre::bail!("unrecognized input '{}' (try: advance, log <reps> <rating> [weight], rest <+/-secs>, finish, abandon, retry, status, quit)", line.trim()),
    };
    Ok(Line::Cmd(cmd))
}

fn emit<W: Write>(out: &mut W, m: &mut Machine, json: bool) -> Result<()> {
    let view = m.tick();
    if json {
        writeln!(out, "{}", serde_json::to_string(&view)?)?;
    } else {
        writeln!(out, "{}\n", render::view_text(&view))?;
    }
    Ok(())
}

/// Read commands until EOF or `quit`. Command errors are reported and the
/// loop continues; only I/O errors end it early.
pub fn run<R: BufRead, W: Write>(m: &mut Machine, input: R, mut out: W, json: bool) -> Result<()> {
    emit(&mut out, m, json)?;
    for line in input.lines() {
        let line = line.wrap_err("read stdin")?;
        let outcome = parse_line(&line).and_then(|parsed| match parsed {
            Line::Blank => Ok(false),
            Line::Quit => Ok(true),
            Line::Status => emit(&mut out, m, json).map(|()| false),
            Line::Cmd(cmd) => {
                m.apply(cmd)?;
                emit(&mut out, m, json).map(|()| false)
            }
        });
        match outcome {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) if json => writeln!(out, "{}", format_error_json(&e))?,
            Err(e) => writeln!(out, "error: {}\n", humanize(&e))?,
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("advance", Line::Cmd(Command::Advance))]
    #[case("  select lower ", Line::Cmd(Command::SelectWorkout("lower".into())))]
    #[case("log 8 easy", Line::Cmd(Command::LogSet { reps: 8, rating: Rating::Easy, weight: None }))]
    #[case("log 6 very_hard 92.5", Line::Cmd(Command::LogSet { reps: 6, rating: Rating::VeryHard, weight: Some(92.5) }))]
    #[case("rest -30", Line::Cmd(Command::AdjustRest(-30)))]
    #[case("retry", Line::Cmd(Command::Retry))]
    #[case("", Line::Blank)]
    #[case("# comment", Line::Blank)]
    #[case("q", Line::Quit)]
    fn parses_lines(#[case] input: &str, #[case] want: Line) {
        assert_eq!(parse_line(input).unwrap(), want);
    }

    #[rstest]
    #[case("log eight easy")]
    #[case("log 8 meh")]
    #[case("log 8")]
    #[case("rest")]
    #[case("jump")]
    fn rejects_malformed_lines(#[case] input: &str) {
        assert!(parse_line(input).is_err());
    }
}
