//!
//! Replays edits of a text field through a mask.
//!
//! ```text
//! cargo run --example mask_edit -- "{{9999}} {{9999}} {{9999}} {{9999}} {{999}}"
//! ```
//!
//! Reads one edit per line from stdin:
//! * `+<pos> <text>` insert text at pos.
//! * `-<pos> <n>` remove n graphemes at pos.
//! * `=<text>` format a complete value.
//!
//! Debug output goes to mask_edit.log.
//!

use anyhow::anyhow;
use rat_mask::{FormatResult, TextEdit, TextMask};
use std::fs;
use std::io::{stdin, BufRead};
use std::path::PathBuf;
use unicode_segmentation::UnicodeSegmentation;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let mask = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "{{9999}} {{9999}} {{9999}} {{9999}} {{999}}".into());
    let mask = TextMask::new(&mask);
    println!("mask    {}", mask.mask());
    println!("relaxed {}", mask.relaxed());

    let mut state = FormatResult::default();
    for line in stdin().lock().lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        match edit(&mask, &state, line) {
            Ok(r) => {
                state = r;
                println!(
                    "{:?} cursor={} raw={:?} complete={}",
                    state.value,
                    state.cursor,
                    mask.unmask(&state.value),
                    mask.is_complete(&state.value)
                );
            }
            Err(e) => {
                log::debug!("{:?}", e);
                println!("error: {}", e);
            }
        }
    }

    Ok(())
}

fn edit(mask: &TextMask, state: &FormatResult, line: &str) -> Result<FormatResult, anyhow::Error> {
    let mut chars = line.chars();
    let cmd = chars.next();
    let rest = chars.as_str();
    match cmd {
        Some('=') => Ok(mask.apply_cursor(rest, rest.graphemes(true).count() as u32)),
        Some('+') => {
            let (pos, text) = rest.split_once(' ').ok_or_else(|| anyhow!("+<pos> <text>"))?;
            let pos = pos.parse::<usize>()?;
            let mut old = state.value.graphemes(true).collect::<Vec<_>>();
            let pos = pos.min(old.len());
            let inserted = text.graphemes(true).collect::<Vec<_>>();
            let count = inserted.len();
            old.splice(pos..pos, inserted);
            let new_value = old.concat();

            let r = mask.apply_edit(&TextEdit::insert(
                &new_value,
                &state.value,
                pos as u32,
                count as i32,
            ))?;
            Ok(r)
        }
        Some('-') => {
            let (pos, n) = rest.split_once(' ').ok_or_else(|| anyhow!("-<pos> <n>"))?;
            let pos = pos.parse::<usize>()?;
            let n = n.parse::<i32>()?;
            let mut old = state.value.graphemes(true).collect::<Vec<_>>();
            let pos = pos.min(old.len());
            let end = (pos + n.max(0) as usize).min(old.len());
            old.drain(pos..end);
            let new_value = old.concat();

            let r = mask.apply_edit(&TextEdit::remove(&new_value, &state.value, pos as u32, n))?;
            Ok(r)
        }
        _ => Err(anyhow!("unknown command {:?}", cmd)),
    }
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("mask_edit.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
