//! Notification message formatting

use types::{Direction, Signal};

/// Plain-text message for one announced signal
pub fn format_message(signal: &Signal) -> String {
    let mut lines = Vec::with_capacity(5);

    let headline = match (signal.direction, signal.strategy) {
        (Direction::Wait, _) | (_, None) => {
            format!("{} {}", signal.direction.as_str().to_uppercase(), signal.symbol)
        }
        (direction, Some(kind)) => format!(
            "{} {} ({})",
            direction.as_str().to_uppercase(),
            signal.symbol,
            kind
        ),
    };
    lines.push(headline);

    match (&signal.levels, signal.reason) {
        (Some(levels), _) => {
            let places = decimal_places(levels.entry);
            lines.push(format!("Entry: {:.*}", places, levels.entry));
            lines.push(format!("TP: {:.*}", places, levels.take_profit));
            lines.push(format!("SL: {:.*}", places, levels.stop_loss));
        }
        (None, Some(reason)) => lines.push(format!("Reason: {}", reason)),
        (None, None) => lines.push("Reason: no setup".to_string()),
    }

    if let Some(timestamp) = signal.timestamp {
        lines.push(format!("Candle: {}", timestamp.format("%Y-%m-%d %H:%M UTC")));
    }

    lines.join("\n")
}

/// Decimal places scaled to the entry price, shared by every level in a message
fn decimal_places(entry: f64) -> usize {
    let magnitude = entry.abs();
    if magnitude >= 100.0 {
        2
    } else if magnitude >= 10.0 {
        3
    } else {
        5
    }
}
