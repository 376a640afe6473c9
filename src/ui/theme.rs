use console::Term;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// What a piece of CLI output is, independent of how it is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Header,
    Success,
    Error,
    Warn,
    Info,
    Label,
}

impl Tone {
    /// Errors and warnings are written to stderr, everything else to stdout
    pub fn on_stderr(self) -> bool {
        matches!(self, Tone::Error | Tone::Warn)
    }
}

/// Color switch per output stream.
///
/// `userbase list --format json > users.json` keeps warnings colored on the
/// terminal while the redirected stdout stays plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    stdout_colors: bool,
    stderr_colors: bool,
}

impl Theme {
    pub fn detect() -> Self {
        Self {
            stdout_colors: Term::stdout().is_term(),
            stderr_colors: Term::stderr().is_term(),
        }
    }

    pub fn new(stdout_colors: bool, stderr_colors: bool) -> Self {
        Self { stdout_colors, stderr_colors }
    }

    pub fn style(&self, tone: Tone) -> Style {
        let enabled = if tone.on_stderr() { self.stderr_colors } else { self.stdout_colors };
        if !enabled {
            return Style::new();
        }

        match tone {
            Tone::Header => Style::new().cyan().bold(),
            Tone::Success => Style::new().green().bold(),
            Tone::Error => Style::new().red().bold(),
            Tone::Warn => Style::new().yellow().bold(),
            Tone::Info => Style::new().magenta(),
            Tone::Label => Style::new().white().dimmed(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

/// Style for `tone` under the detected theme
pub fn style(tone: Tone) -> Style {
    theme().style(tone)
}
