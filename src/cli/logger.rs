use std::{
    fs::File,
    io::{self, LineWriter, Write},
    path::PathBuf,
    sync::Mutex,
};

use chrono::Local;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Log, Metadata, Record};

// Console output stays terse; the run log gets everything down to Debug.
const FILE_LEVEL: Level = Level::Debug;

pub fn init(verbose: u8, quiet: u8, dry_run: bool, log_file: Option<PathBuf>) -> Option<PathBuf> {
    let level = console_level(verbose, quiet, dry_run);
    let console = env_logger::Builder::new()
        .format(format)
        .filter_level(level)
        .build();

    let path = log_file.unwrap_or_else(default_log_path);
    let file = match File::create(&path) {
        Ok(file) => Some(Mutex::new(LineWriter::new(file))),
        Err(err) => {
            eprintln!("warning: could not open log file `{}`: {err}", path.display());
            None
        }
    };
    let opened = file.is_some();

    let logger = DualLogger { console, file };
    log::set_max_level(LevelFilter::Debug.max(level));
    if log::set_boxed_logger(Box::new(logger)).is_err() {
        return None;
    }

    opened.then_some(path)
}

fn console_level(verbose: u8, quiet: u8, dry_run: bool) -> LevelFilter {
    let base_verbosity: i8 = if dry_run { 1 } else { 0 };
    let verbosity =
        base_verbosity + i8::try_from(verbose).unwrap() - i8::try_from(quiet).unwrap();
    match verbosity {
        i8::MIN..=-1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn default_log_path() -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("backstop_{timestamp}.log"))
}

struct DualLogger {
    console: env_logger::Logger,
    file: Option<Mutex<LineWriter<File>>>,
}

impl Log for DualLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
            || (self.file.is_some() && metadata.level() <= FILE_LEVEL)
    }

    fn log(&self, record: &Record) {
        if self.console.matches(record) {
            self.console.log(record);
        }

        if record.level() <= FILE_LEVEL {
            if let Some(file) = &self.file {
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
                let mut writer = file.lock().unwrap();
                let _ = writeln!(writer, "{timestamp} [{}] {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = &self.file {
            let _ = file.lock().unwrap().flush();
        }
    }
}

fn format(f: &mut Formatter, record: &Record) -> io::Result<()> {
    let level = record.level();
    let prefix_style = f.default_level_style(level);
    let prefix = level_prefix(level);
    writeln!(f, "{prefix_style}{prefix}{prefix_style:#}{}", record.args())
}

fn level_prefix(level: Level) -> &'static str {
    match level {
        Level::Debug | Level::Trace | Level::Info => "",
        Level::Warn => "warning: ",
        Level::Error => "error: ",
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::console_level;

    #[test]
    fn default_console_level_is_warn() {
        assert_eq!(console_level(0, 0, false), LevelFilter::Warn);
    }

    #[test]
    fn dry_run_raises_console_to_info() {
        assert_eq!(console_level(0, 0, true), LevelFilter::Info);
    }

    #[test]
    fn verbosity_flags_shift_the_level() {
        assert_eq!(console_level(1, 0, false), LevelFilter::Info);
        assert_eq!(console_level(2, 0, false), LevelFilter::Debug);
        assert_eq!(console_level(3, 0, false), LevelFilter::Trace);
        assert_eq!(console_level(0, 1, false), LevelFilter::Error);
        assert_eq!(console_level(0, 2, false), LevelFilter::Error);
    }
}
