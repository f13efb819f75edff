//! Renderers for board snapshots.
//!
//! The board hands a slice of `Snapshot`s to a `Renderer` after every cycle.
//! `CardRenderer` draws the familiar grid of price cards with a sparkline per
//! symbol; `JsonRenderer` emits one JSON object per snapshot per line for other
//! programs to consume.

use chrono::Local;
use market_common::{ChangeClass, Result, Snapshot};
use std::io::Write;

/// Width of one card, in characters.
const CARD_WIDTH: usize = 30;
/// Sparkline length, in characters.
const SPARK_WIDTH: usize = 28;
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Consumer of per-cycle snapshots.
pub trait Renderer {
    /// Draw one cycle's snapshots.
    fn render(&mut self, snapshots: &[Snapshot]) -> Result<()>;
}

/// Text grid of price cards.
pub struct CardRenderer<W: Write> {
    out: W,
    columns: usize,
    color: bool,
}

impl<W: Write> CardRenderer<W> {
    /// Grid with `columns` cards per row, ANSI-coloured when `color` is set.
    pub fn new(out: W, columns: usize, color: bool) -> Self {
        Self {
            out,
            columns: columns.max(1),
            color,
        }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn card_lines(&self, snap: &Snapshot) -> Vec<String> {
        let pad = |s: String| format!("{:<width$}", s, width = CARD_WIDTH);

        if snap.is_pending() {
            return vec![
                pad(snap.display_name.clone()),
                pad("updating…".to_string()),
                pad(String::new()),
                pad(String::new()),
                pad(format!("Prev  {:>24}", "-")),
                pad(format!("High  {:>24}", "-")),
                pad(format!("Low   {:>24}", "-")),
            ];
        }

        let change_line = pad(format!(
            "{} ({:+.2}%)",
            format_signed(snap.change),
            snap.change_percent
        ));
        let change_line = if self.color {
            let code = match snap.class {
                ChangeClass::Positive => GREEN,
                ChangeClass::Negative => RED,
            };
            format!("{code}{change_line}{RESET}")
        } else {
            change_line
        };

        vec![
            pad(snap.display_name.clone()),
            pad(format_number(snap.price)),
            change_line,
            pad(sparkline(&snap.history, SPARK_WIDTH)),
            pad(format!("Prev  {:>24}", format_number(snap.previous_close))),
            pad(format!("High  {:>24}", format_number(snap.day_high))),
            pad(format!("Low   {:>24}", format_number(snap.day_low))),
        ]
    }
}

impl<W: Write> Renderer for CardRenderer<W> {
    fn render(&mut self, snapshots: &[Snapshot]) -> Result<()> {
        writeln!(self.out, "Market board, updated {}", Local::now().format("%H:%M:%S"))?;
        writeln!(self.out)?;

        for row in snapshots.chunks(self.columns) {
            let cards: Vec<Vec<String>> = row.iter().map(|s| self.card_lines(s)).collect();
            let height = cards.iter().map(Vec::len).max().unwrap_or(0);
            for line in 0..height {
                let parts: Vec<&str> = cards
                    .iter()
                    .map(|c| c.get(line).map(String::as_str).unwrap_or(""))
                    .collect();
                writeln!(self.out, "{}", parts.join("  ").trim_end())?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// JSON-lines output, one snapshot per line.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the renderer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, snapshots: &[Snapshot]) -> Result<()> {
        for snap in snapshots {
            serde_json::to_writer(&mut self.out, snap)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Two decimals with thousands separators, e.g. `38,950.50`.
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int, frac) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// `format_number` with an explicit `+` for non-negative values.
pub fn format_signed(value: f64) -> String {
    let body = format_number(value);
    if body.starts_with('-') {
        body
    } else {
        format!("+{body}")
    }
}

/// Block-character sparkline of `values`, sampled down to at most `width` points.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let n = values.len().min(width);
    let sampled: Vec<f64> = if n == 1 {
        vec![values[values.len() - 1]]
    } else {
        (0..n)
            .map(|i| values[i * (values.len() - 1) / (n - 1)])
            .collect()
    };

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    sampled
        .iter()
        .map(|v| {
            if range > 0.0 {
                let idx = ((v - min) / range * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            } else {
                BARS[BARS.len() / 2 - 1]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_common::{FetchKey, Quote};

    fn snapshot(name: &str, price: f64, previous_close: f64) -> Snapshot {
        let quote = Quote {
            price,
            previous_close,
            day_high: price,
            day_low: price,
            history: vec![1.0, 2.0, 3.0],
        };
        Snapshot::from_quote(name, &FetchKey::new(name), &quote)
    }

    #[test]
    fn numbers_get_thousands_separators() {
        assert_eq!(format_number(38950.5), "38,950.50");
        assert_eq!(format_number(999.999), "1,000.00");
        assert_eq!(format_number(12.0), "12.00");
        assert_eq!(format_number(-1234567.891), "-1,234,567.89");
        assert_eq!(format_number(-0.001), "0.00");
    }

    #[test]
    fn signed_numbers_carry_plus() {
        assert_eq!(format_signed(5.0), "+5.00");
        assert_eq!(format_signed(-5.0), "-5.00");
        assert_eq!(format_signed(0.0), "+0.00");
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▄▄");
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn sparkline_downsamples_to_width() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let line = sparkline(&values, 10);
        assert_eq!(line.chars().count(), 10);
        assert!(line.starts_with('▁'));
        assert!(line.ends_with('█'));
    }

    #[test]
    fn cards_show_change_and_placeholder() {
        let mut renderer = CardRenderer::new(Vec::new(), 3, false);
        renderer
            .render(&[snapshot("Nikkei", 100.0, 95.0), snapshot("Empty", 0.0, 0.0)])
            .unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("Nikkei"));
        assert!(text.contains("+5.00 (+5.26%)"));
        assert!(text.contains("updating…"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn colour_follows_change_class() {
        let mut renderer = CardRenderer::new(Vec::new(), 1, true);
        renderer.render(&[snapshot("Down", 90.0, 100.0)]).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains(RED));
        assert!(!text.contains(GREEN));
    }

    #[test]
    fn json_renderer_writes_one_line_per_snapshot() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer
            .render(&[snapshot("A", 100.0, 95.0), snapshot("B", 1.0, 0.0)])
            .unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Snapshot = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.display_name, "A");
        assert_eq!(first.class, ChangeClass::Positive);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["change_percent"], 0.0);
        assert_eq!(second["class"], "positive");
    }
}
