/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;
use flume::{Receiver, Sender, TrySendError};
use slog::{Drain, Level, OwnedKVList, Record};

mod format;
use format::StdLogFormatter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    location: Option<String>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }
}

#[derive(Clone, Debug)]
pub struct StdLogConfig {
    channel_capacity: usize,
    thread_name: String,
    append_code_position: bool,
    use_stdout: bool,
}

impl Default for StdLogConfig {
    fn default() -> Self {
        StdLogConfig {
            channel_capacity: 4096,
            thread_name: "log-stdio".to_string(),
            append_code_position: false,
            use_stdout: false,
        }
    }
}

impl StdLogConfig {
    pub fn set_channel_capacity(&mut self, capacity: usize) {
        self.channel_capacity = capacity.max(1);
    }

    pub fn set_thread_name(&mut self, name: String) {
        self.thread_name = name;
    }

    pub fn set_append_code_position(&mut self, enable: bool) {
        self.append_code_position = enable;
    }

    pub fn set_use_stdout(&mut self, enable: bool) {
        self.use_stdout = enable;
    }
}

#[derive(Default)]
pub struct LogStats {
    passed: AtomicU64,
    dropped: AtomicU64,
    io_failed: AtomicU64,
}

impl LogStats {
    pub fn passed(&self) -> u64 {
        self.passed.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn io_failed(&self) -> u64 {
        self.io_failed.load(Ordering::Relaxed)
    }
}

/// A slog drain that hands formatted records to a dedicated io thread
pub struct StdLogDrain {
    sender: Sender<StdLogValue>,
    formatter: StdLogFormatter,
    stats: Arc<LogStats>,
}

impl StdLogDrain {
    pub fn stats(&self) -> Arc<LogStats> {
        Arc::clone(&self.stats)
    }
}

impl Drain for StdLogDrain {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        let v = self.formatter.format(record, values);
        match self.sender.try_send(v) {
            Ok(_) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }
}

pub fn new_async_logger(config: &StdLogConfig) -> StdLogDrain {
    let (sender, receiver) = flume::bounded::<StdLogValue>(config.channel_capacity);

    let stats = Arc::new(LogStats::default());

    let io_thread = AsyncIoThread {
        receiver,
        stats: Arc::clone(&stats),
    };

    let use_stdout = config.use_stdout;
    let _detached_thread = std::thread::Builder::new()
        .name(config.thread_name.clone())
        .spawn(move || {
            if use_stdout {
                io_thread.run_with_stdout();
            } else {
                io_thread.run_with_stderr();
            }
        });

    StdLogDrain {
        sender,
        formatter: StdLogFormatter::new(config.append_code_position),
        stats,
    }
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
    stats: Arc<LogStats>,
}

impl AsyncIoThread {
    fn write_time<IO: Write>(&self, io: &mut IO) -> io::Result<()> {
        let datetime = Local::now();
        write!(io, "{}", datetime.format(TIME_FORMAT))?;
        Ok(())
    }

    fn run_with_stderr(self) {
        let stderr = io::stderr();
        if stderr.is_terminal() {
            self.run_console(stderr)
        } else {
            self.run_plain(stderr)
        }
    }

    fn run_with_stdout(self) {
        let stdout = io::stdout();
        if stdout.is_terminal() {
            self.run_console(stdout)
        } else {
            self.run_plain(stdout)
        }
    }

    fn run_plain<IO: Write>(&self, mut io: IO) {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = self.write_plain(&mut buf, v);
            self.write_buf(&mut io, &buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = self.write_plain(&mut buf, v);
                self.write_buf(&mut io, &buf);
            }

            let _ = io.flush();
        }
    }

    fn write_plain<IO: Write>(&self, io: &mut IO, v: StdLogValue) -> io::Result<()> {
        self.write_time(io)?;
        write_plain_record(io, v)
    }

    fn run_console<IO: Write>(&self, mut io: IO) {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = self.write_console(&mut buf, v);
            self.write_buf(&mut io, &buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = self.write_console(&mut buf, v);
                self.write_buf(&mut io, &buf);
            }

            let _ = io.flush();
        }
    }

    fn write_console<IO: Write>(&self, io: &mut IO, v: StdLogValue) -> io::Result<()> {
        use anstyle::{AnsiColor, Color, Style};

        const COLOR_MAGENTA: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta)));
        const COLOR_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
        const COLOR_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
        const COLOR_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
        const COLOR_CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
        const COLOR_BLUE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue)));
        const STYLE_BOLD: Style = Style::new().bold();
        const STYLE_ITALIC: Style = Style::new().italic();

        let bold_s = STYLE_BOLD.render();
        let bold_e = STYLE_BOLD.render_reset();

        self.write_time(io)?;
        let level_color = match v.level {
            Level::Critical => COLOR_MAGENTA,
            Level::Error => COLOR_RED,
            Level::Warning => COLOR_YELLOW,
            Level::Info => COLOR_GREEN,
            Level::Debug => COLOR_CYAN,
            Level::Trace => COLOR_BLUE,
        };
        write!(
            io,
            " {}{}{}",
            level_color.render(),
            v.level,
            level_color.render_reset(),
        )?;

        for (k, v) in &v.kv_pairs {
            write!(io, " {bold_s}{k}{bold_e}={v},")?;
        }

        write!(io, " {bold_s}{}{bold_e}", v.message_str())?;

        if let Some(location) = v.location {
            write!(
                io,
                " <{}{location}{}>",
                STYLE_ITALIC.render(),
                STYLE_ITALIC.render_reset()
            )?;
        }
        writeln!(io)?;
        io.flush()?;

        Ok(())
    }

    fn write_buf<IO: Write>(&self, io: &mut IO, buf: &[u8]) {
        match io.write_all(buf) {
            Ok(_) => {
                self.stats.passed.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.stats.io_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

fn write_plain_record<IO: Write>(io: &mut IO, v: StdLogValue) -> io::Result<()> {
    write!(io, " {}", v.level)?;
    for (k, v) in &v.kv_pairs {
        write!(io, " {k}: {v},")?;
    }
    write!(io, " {}", v.message_str())?;
    if let Some(location) = v.location {
        write!(io, " <{location}>")?;
    }
    writeln!(io)?;
    io.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::{Logger, info, o, warn};

    fn test_drain(append_code_position: bool) -> (StdLogDrain, Receiver<StdLogValue>) {
        let (sender, receiver) = flume::bounded(4);
        let drain = StdLogDrain {
            sender,
            formatter: StdLogFormatter::new(append_code_position),
            stats: Arc::new(LogStats::default()),
        };
        (drain, receiver)
    }

    #[test]
    fn format_record() {
        let (drain, receiver) = test_drain(false);
        let logger = Logger::root(drain, o!("probe" => "latency"));
        info!(logger, "proxy {} online", "socks5://198.51.100.1:1080"; "latency_ms" => 42);

        let v = receiver.try_recv().unwrap();
        assert_eq!(v.level, Level::Info);
        assert_eq!(v.message_str(), "proxy socks5://198.51.100.1:1080 online");
        assert!(v.kv_pairs.contains(&("probe".to_string(), "latency".to_string())));
        assert!(v.kv_pairs.contains(&("latency_ms".to_string(), "42".to_string())));
        assert!(v.location.is_none());

        let mut buf = Vec::new();
        write_plain_record(&mut buf, v).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.starts_with(" INFO "));
        assert!(line.ends_with(" proxy socks5://198.51.100.1:1080 online\n"));
    }

    #[test]
    fn code_position() {
        let (drain, receiver) = test_drain(true);
        let logger = Logger::root(drain, o!());
        warn!(logger, "");

        let v = receiver.try_recv().unwrap();
        assert_eq!(v.message_str(), "()");
        let location = v.location.unwrap();
        assert!(location.starts_with(file!()));
    }

    #[test]
    fn drop_on_full() {
        let (drain, receiver) = test_drain(false);
        let stats = drain.stats();
        let logger = Logger::root(drain, o!());
        for i in 0..6 {
            info!(logger, "record {i}");
        }
        assert_eq!(receiver.len(), 4);
        assert_eq!(stats.dropped(), 2);
    }
}
