mod connected_to_journal;

use std::{io::Write as _, time::SystemTime};

use anstyle::{AnsiColor, Effects, Style};
use connected_to_journal::connected_to_journal;
use env_logger::Env;
use log::Level;

/// Sets up the global logger. The filter is read from `MAILVIEW_LOG`, and
/// `label` (usually the signed-in user) prefixes every line.
pub fn init(label: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(Env::new().filter_or("MAILVIEW_LOG", "info"));
    let label = label.map_or_else(String::new, |label| format!("{label} "));

    if connected_to_journal() {
        builder.format(move |buf, record| {
            writeln!(
                buf,
                "<{}>{label}{}: {}",
                journal_priority(record.level()),
                record.target(),
                record.args()
            )
        });
    } else {
        let subtle = AnsiColor::BrightBlack.on_default();
        builder.format(move |buf, record| {
            write!(buf, "{subtle}[{subtle:#}")?;
            match jiff::Timestamp::try_from(SystemTime::now()) {
                Ok(now) => write!(buf, "{now:.3} ")?,
                Err(_) => write!(buf, "timestamp_error ")?,
            }
            let level_style = level_style(record.level());
            write!(
                buf,
                "{level_style}{}{level_style:#} {label}{}",
                record.level(),
                record.target(),
            )?;
            if let Some(line) = record.line() {
                write!(buf, ":{line}")?;
            }
            write!(buf, "{subtle}]{subtle:#} ")?;
            writeln!(buf, "{}", record.args())
        });
    }

    builder.init();
}

/// syslog priority as understood by journald on `<n>` prefixed lines.
fn journal_priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => AnsiColor::Red.on_default().effects(Effects::BOLD),
        Level::Warn => AnsiColor::Yellow.on_default(),
        Level::Info => AnsiColor::Green.on_default(),
        Level::Debug => AnsiColor::Blue.on_default(),
        Level::Trace => AnsiColor::Cyan.on_default(),
    }
}
