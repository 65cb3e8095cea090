use crate::db::Journal;
use crate::db::models::JournalEntry;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const MAX_OP_WIDTH: usize = 40;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI pattern"));

fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

/// ANSI colour for each journal operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "report" => Colour::Green,
        "motion" => Colour::Yellow,
        "capture" | "detect" => Colour::Cyan,
        "telemetry" => Colour::Blue,
        "stop" => Colour::Red,
        "init" => Colour::RGB(255, 153, 51),
        "idle" => Colour::Fixed(244),
        _ => Colour::White,
    }
}

/// One printable line: `id: date | op (target)   => message`
fn render_entry(e: &JournalEntry, id_w: usize, date_w: usize, op_w: usize) -> String {
    let date = chrono::DateTime::parse_from_rfc3339(&e.date)
        .map(|dt| dt.format("%F %T").to_string())
        .unwrap_or_else(|_| e.date.clone());

    let mut op = color_for_operation(&e.operation)
        .paint(e.operation.as_str())
        .to_string();
    if !e.target.is_empty() {
        op.push_str(&format!(" ({})", e.target));
    }
    let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).len()));

    format!(
        "{:>id_w$}: {:<date_w$} | {}{} => {}",
        e.id,
        date,
        op,
        padding,
        e.message,
        id_w = id_w,
        date_w = date_w
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(journal: &Journal, limit: Option<usize>) -> AppResult<()> {
        let entries = journal.entries(limit)?;
        if entries.is_empty() {
            println!("📜 Journal is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let op_w = entries
            .iter()
            .map(|e| e.operation.len() + e.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        // "YYYY-MM-DD HH:MM:SS"
        let date_w = 19;

        println!("📜 Journal:\n");
        for e in &entries {
            println!("{}", render_entry(e, id_w, date_w, op_w));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colours() {
        let painted = Colour::Green.paint("report").to_string();
        assert_ne!(painted, "report");
        assert_eq!(strip_ansi(&painted), "report");
    }

    #[test]
    fn rendered_line_has_all_parts() {
        let e = JournalEntry {
            id: 7,
            date: "2024-05-01T12:30:00+09:00".into(),
            operation: "report".into(),
            target: "kintone".into(),
            message: "1 delivered, 0 failed".into(),
        };
        let line = strip_ansi(&render_entry(&e, 2, 19, 20));
        assert_eq!(
            line,
            " 7: 2024-05-01 12:30:00 | report (kintone)     => 1 delivered, 0 failed"
        );
    }
}
