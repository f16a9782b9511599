//! Status lines for the `ssi` commands
//!
//! Every line has a status tag. On a terminal the tag picks the cliclack log
//! style; otherwise it is printed as a bracketed prefix so CI logs stay
//! greppable.

use super::context::UiContext;
use console::style;

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Info,
}

impl Status {
    fn tag(self) -> String {
        match self {
            Self::Ok => style("[OK]").green().to_string(),
            Self::Warn => style("[WARN]").yellow().to_string(),
            Self::Info => style("[INFO]").cyan().to_string(),
        }
    }
}

fn line(ctx: &UiContext, status: Status, text: String) {
    if !ctx.use_fancy_output() {
        println!("  {} {}", status.tag(), text);
        return;
    }

    let shown = match status {
        Status::Ok => cliclack::log::success(text),
        Status::Warn => cliclack::log::warning(text),
        Status::Info => cliclack::log::info(text),
    };
    shown.ok();
}

fn closing(ctx: &UiContext, status: Status, message: &str) {
    if !ctx.use_fancy_output() {
        println!("{} {}", status.tag(), message);
        return;
    }

    let styled = match status {
        Status::Warn => style(message).yellow().bold(),
        _ => style(message).green().bold(),
    };
    cliclack::outro(styled).ok();
}

/// Command banner
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
    }
}

/// Closing line for a run that finished cleanly
pub fn outro_success(ctx: &UiContext, message: &str) {
    closing(ctx, Status::Ok, message);
}

/// Closing line for a run with skipped or failed files
pub fn outro_warn(ctx: &UiContext, message: &str) {
    closing(ctx, Status::Warn, message);
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    line(ctx, Status::Ok, message.to_string());
}

/// Success with a dimmed detail such as a written path
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    let detail = if ctx.use_fancy_output() {
        style(detail).dim().to_string()
    } else {
        detail.to_string()
    };
    line(ctx, Status::Ok, format!("{} ({})", message, detail));
}

/// Warning followed by what to do about it
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    let hint = if ctx.use_fancy_output() {
        style(hint).dim().to_string()
    } else {
        hint.to_string()
    };
    line(ctx, Status::Warn, format!("{} - {}", message, hint));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    line(ctx, Status::Info, message.to_string());
}

/// Setting shown under the banner, e.g. `Base dir: html`
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let key = if ctx.use_fancy_output() {
        style(key).dim().to_string()
    } else {
        key.to_string()
    };
    println!("  {}: {}", key, value);
}
