use crate::output::is_quiet;
use crate::ui::{style, Icons, Tone};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::ROCKET, text.style(style(Tone::Header)));
}

pub fn status(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon, label.style(style(Tone::Label)), value);
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(style(Tone::Success)));
}

/// Errors are printed even in quiet mode
pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(style(Tone::Error)));
}

pub fn warn(label: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", Icons::WARN, label.style(style(Tone::Warn)));
}

pub fn info(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        Icons::INFO.style(style(Tone::Info)),
        label.style(style(Tone::Label)),
        value
    );
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(style(Tone::Header)));
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", label.style(style(Tone::Label)), value);
}
