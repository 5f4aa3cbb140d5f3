use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::Value;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

/// Print a report: pretty JSON with `--json`, `key: value` lines otherwise.
pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let v = serde_json::to_value(value)?;
    if is_json() {
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    let mut out = stdout();
    match &v {
        Value::Object(map) => {
            for (key, val) in map {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
                write!(out, "{key}")?;
                out.reset()?;
                writeln!(out, ": {}", human(val))?;
            }
        }
        other => writeln!(out, "{}", human(other))?,
    }
    Ok(())
}

pub fn eprintln_line(msg: &str) {
    let _ = writeln!(io::stderr(), "{msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}

fn human(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
