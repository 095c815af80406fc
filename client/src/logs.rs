//! Colored console output for the scripts. Info and success lines go to stdout, warnings and
//! errors to stderr.

use std::{
    fmt::Display,
    io::{
        self,
        Write,
    },
};

use colored::{
    Color,
    Colorize,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn color(self) -> LogColor {
        match self {
            Self::Info => LogColor::Info,
            Self::Success => LogColor::Highlight,
            Self::Warning => LogColor::Warning,
            Self::Error => LogColor::Error,
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Writes one `[LEVEL] label message` line.
fn write_line(
    out: &mut impl Write,
    level: Level,
    label: impl Display,
    msg: impl Display,
) -> io::Result<()> {
    writeln!(
        out,
        "[{}] {} {}",
        level.to_string().color(level.color()),
        label.to_string().color(LogColor::Debug),
        msg.to_string().color(LogColor::Gray)
    )
}

fn log(level: Level, label: impl Display, msg: impl Display) {
    // A closed stdout/stderr isn't worth failing a command over.
    let _ = if level.to_stderr() {
        write_line(&mut io::stderr().lock(), level, label, msg)
    } else {
        write_line(&mut io::stdout().lock(), level, label, msg)
    };
}

#[derive(Clone, Copy, Debug)]
pub enum LogColor {
    Highlight,
    Debug,
    Error,
    Warning,
    Info,
    Gray,
}

/// Prints `key: value` with the key highlighted.
#[macro_export]
macro_rules! print_kv {
    ($key:expr, $value:expr) => {{
        use $crate::colored::Colorize as _;
        println!(
            "{}: {}",
            $key.to_string().color($crate::LogColor::Highlight),
            $value
        );
    }};
}

#[rustfmt::skip]
mod unformatted {
    use super::*;

    pub fn log_info(label: impl Display, msg: impl Display) { log(Level::Info, label, msg) }
    pub fn log_success(label: impl Display, msg: impl Display) { log(Level::Success, label, msg) }
    pub fn log_warning(label: impl Display, msg: impl Display) { log(Level::Warning, label, msg) }
    pub fn log_error(label: impl Display, msg: impl Display) { log(Level::Error, label, msg) }
    pub fn log_divider() { println!("-----"); }

    impl From<LogColor> for Color {
        fn from(value: LogColor) -> Color {
            match value {
                LogColor::Highlight  => Color::TrueColor { r: 255, g: 215, b: 87  },
                LogColor::Debug      => Color::TrueColor { r: 40,  g: 100, b: 153 },
                LogColor::Error      => Color::TrueColor { r: 255, g: 0,   b: 45  },
                LogColor::Warning    => Color::TrueColor { r: 180, g: 105, b: 0   },
                LogColor::Info       => Color::TrueColor { r: 0,   g: 95,  b: 255 },
                LogColor::Gray       => Color::TrueColor { r: 128, g: 128, b: 128 },
            }
        }
    }
}

pub use unformatted::*;
