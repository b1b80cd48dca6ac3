use serde::Serialize;

use chatdock_core::contrast::{contrast_ratio, meets_aa};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ContrastCheck<'a> {
    foreground: &'a str,
    background: &'a str,
    ratio: f64,
    passes_aa: bool,
}

pub fn run(foreground: &str, background: &str) -> CommandResult {
    let ratio = match contrast_ratio(foreground, background) {
        Ok(ratio) => ratio,
        Err(error) => return CommandResult::rejected("contrast", error),
    };

    let check = ContrastCheck { foreground, background, ratio, passes_aa: meets_aa(ratio) };
    let verdict = if check.passes_aa { "passes" } else { "fails" };
    CommandResult::success_with_data(
        "contrast",
        format!("{ratio:.2}:1 {verdict} WCAG AA (4.5:1)"),
        &check,
    )
}
