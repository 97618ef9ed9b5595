use anyhow::Result;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// How many lines the bot log is allowed to keep after each pass.
pub const MAX_LOG_LINES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// Append-only bot log, written as `timestamp - LEVEL - message` lines.
///
/// Constructed once at startup and owned by the loop; there is no global
/// logger state. Writes are best-effort: a failed append is reported on
/// stderr and the loop keeps running.
pub struct BotLog {
    path: PathBuf,
    file: File,
}

impl BotLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&mut self, msg: impl AsRef<str>) {
        self.write_line(Level::Info, msg.as_ref());
    }

    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.write_line(Level::Warning, msg.as_ref());
    }

    pub fn error(&mut self, msg: impl AsRef<str>) {
        self.write_line(Level::Error, msg.as_ref());
    }

    fn write_line(&mut self, level: Level, msg: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{} - {} - {}\n", stamp, level.as_str(), msg);
        if let Err(e) = self.file.write_all(line.as_bytes()).and_then(|_| self.file.flush()) {
            eprintln!("Warning: could not write to {}: {}", self.path.display(), e);
        }
    }

    /// Rewrite the log so only the most recent `max_lines` lines remain,
    /// preserving their order. No-op when the log is already within bounds.
    pub fn truncate_to_last(&mut self, max_lines: usize) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let lines: Vec<&str> = contents.lines().collect();
        if lines.len() <= max_lines {
            return Ok(());
        }

        let keep = &lines[lines.len() - max_lines..];
        let mut rewritten = keep.join("\n");
        rewritten.push('\n');
        fs::write(&self.path, rewritten)?;

        // the old append handle points at the replaced file
        self.file = OpenOptions::new().append(true).open(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn writes_timestamped_level_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let mut log = BotLog::open(&path).unwrap();
        log.info("Deleted email with ID: m1");
        log.warn("Rate limit or server error occurred");
        log.error("An error occurred");

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" - INFO - Deleted email with ID: m1"));
        assert!(lines[1].contains(" - WARNING - Rate limit or server error occurred"));
        assert!(lines[2].contains(" - ERROR - An error occurred"));
        // timestamp prefix: "YYYY-MM-DD HH:MM:SS - ..."
        assert_eq!(lines[0].as_bytes()[4], b'-');
        assert_eq!(lines[0].as_bytes()[10], b' ');
    }

    #[test]
    fn truncates_to_last_n_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let mut log = BotLog::open(&path).unwrap();
        for i in 0..25 {
            log.info(format!("line {}", i));
        }

        log.truncate_to_last(10).unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 10);
        assert!(lines[0].ends_with("line 15"));
        assert!(lines[9].ends_with("line 24"));

        // appends still land after truncation
        log.info("line 25");
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 11);
        assert!(lines[10].ends_with("line 25"));
    }

    #[test]
    fn truncation_within_bounds_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.log");
        let mut log = BotLog::open(&path).unwrap();
        log.info("only line");
        log.truncate_to_last(10).unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("only line"));
    }
}
