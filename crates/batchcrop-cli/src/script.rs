//! Text form of shell events, for replaying editing sessions.
//!
//! ```text
//! down:X,Y     pointer pressed at canvas (X, Y)
//! drag:X,Y     pointer moved to (X, Y) while pressed
//! up           pointer released
//! resize:WxH   canvas resized
//! select:N     image N of the list selected
//! ```
//!
//! Tokens are separated by whitespace or `;`.

use anyhow::{anyhow, bail, Context, Result};
use batchcrop_core::{PointerEvent, ShellEvent};

/// Parse a `WIDTHxHEIGHT` size.
pub fn parse_size(text: &str) -> Result<(u32, u32), String> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", text))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("bad height '{}': {}", h, e))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got '{}'", text));
    }
    Ok((width, height))
}

fn parse_point(text: &str) -> Result<(f64, f64)> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y, got '{}'", text))?;
    let x = x.trim().parse::<f64>().with_context(|| format!("bad x '{}'", x))?;
    let y = y.trim().parse::<f64>().with_context(|| format!("bad y '{}'", y))?;
    Ok((x, y))
}

fn parse_event(token: &str) -> Result<ShellEvent> {
    let (kind, arg) = match token.split_once(':') {
        Some((kind, arg)) => (kind, Some(arg)),
        None => (token, None),
    };

    let event = match (kind.to_ascii_lowercase().as_str(), arg) {
        ("down", Some(arg)) => {
            let (x, y) = parse_point(arg)?;
            ShellEvent::Pointer(PointerEvent::Down { x, y })
        }
        ("drag", Some(arg)) => {
            let (x, y) = parse_point(arg)?;
            ShellEvent::Pointer(PointerEvent::Drag { x, y })
        }
        ("up", None) => ShellEvent::Pointer(PointerEvent::Up),
        ("resize", Some(arg)) => {
            let (width, height) = parse_size(arg).map_err(|e| anyhow!(e))?;
            ShellEvent::ViewportResized { width, height }
        }
        ("select", Some(arg)) => {
            let index = arg.trim().parse::<usize>().with_context(|| format!("bad index '{}'", arg))?;
            ShellEvent::ImageSelected(index)
        }
        _ => bail!("unknown event '{}'", token),
    };
    Ok(event)
}

/// Parse a whole event script.
pub fn parse_script(script: &str) -> Result<Vec<ShellEvent>> {
    script
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|token| !token.is_empty())
        .map(|token| parse_event(token).with_context(|| format!("in event '{}'", token)))
        .collect()
}
