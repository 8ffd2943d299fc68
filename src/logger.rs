use crate::config::BedrockConfig;
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

/// Installs the console logger. A second call fails and leaves the active
/// configuration untouched.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    log::set_logger(&*CONSOLE_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;

    log::set_max_level(config.min_level.to_level_filter());
    CONSOLE_LOGGER.update_config(config);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        self.to_level().to_level_filter()
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
    pub thread: String,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        let thread = std::thread::current();
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: record.level().into(),
            message: record.args().to_string(),
            module: record.module_path().unwrap_or("unknown").to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
            thread: thread
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("{:?}", thread.id())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    /// Worker-pool calls log from blocking threads, so this is useful when
    /// following a single request.
    pub show_thread: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub timestamp_format: String,
    pub output_json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_thread: false,
            show_file_location: true,
            show_module: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_thread: true,
            ..Default::default()
        }
    }
}

pub struct ConsoleLogger {
    config: RwLock<LoggerConfig>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            config: RwLock::new(LoggerConfig::default()),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Ok(mut config) = self.config.write() {
            *config = new_config;
        }
    }

    fn format_line(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let paint = |text: String, color: Color| -> String {
            if config.show_colors {
                text.color(color).to_string()
            } else {
                text
            }
        };

        let mut output = String::new();

        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        output.push_str(&paint(timestamp, Color::BrightBlack));
        output.push(' ');

        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };
        if config.show_colors {
            output.push_str(&format!("[{}] ", level.color(entry.level.color()).bold()));
        } else {
            output.push_str(&format!("[{}] ", level));
        }

        if config.show_module && !entry.module.is_empty() {
            output.push_str(&paint(entry.module.clone(), Color::BrightBlue));
            output.push_str("::");
        }

        output.push_str(&entry.message);

        if config.show_thread {
            output.push_str(&format!(" [thread:{}]", paint(entry.thread.clone(), Color::BrightBlack)));
        }

        if config.show_file_location {
            let location = format!("{}:{}", entry.file, entry.line);
            output.push_str(&format!(" ({})", paint(location, Color::BrightBlack)));
        }

        output
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.read() {
            Ok(config) => metadata.level() <= config.min_level.to_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_record(record);
        if let Ok(config) = self.config.read() {
            let line = if config.output_json {
                serde_json::to_string(&entry).unwrap_or_default()
            } else {
                self.format_line(&entry, &config)
            };
            println!("{}", line);
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Logs how long a named operation took when dropped, whatever its outcome.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub const LEVEL: Level = Level::Debug;

    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn summary(&self) -> String {
        format!(
            "⏱️  Timer '{}' stopped after {}ms",
            self.name,
            self.elapsed().as_millis()
        )
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::log!(Self::LEVEL, "{}", self.summary());
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

/// Logs where requests will go without printing secret values.
pub fn log_config_info(config: &BedrockConfig) {
    log::info!("⚙️  Bedrock configuration:");
    log::info!("   Region: {}", config.region_or_default());
    log::info!(
        "   Static credentials: {}",
        if config.has_credentials() {
            "✅"
        } else {
            "❌ (default credential chain)"
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            id: "entry".into(),
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            message: "Image generation failed".into(),
            module: "bedrock_canvas::bedrock".into(),
            file: "src/bedrock/image_client.rs".into(),
            line: 7,
            thread: "tokio-runtime-worker".into(),
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!(LogLevel::from(Level::Warn), LogLevel::Warn);
        assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn test_logger_config() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);
        assert!(config.show_thread);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn test_plain_format() {
        let config = LoggerConfig::new()
            .with_colors(false)
            .with_level(LogLevel::Trace);
        let line = ConsoleLogger::new().format_line(&sample_entry(), &config);

        assert!(line.contains("[⚠️ WARN] "));
        assert!(line.contains("bedrock_canvas::bedrock::Image generation failed"));
        assert!(line.ends_with("(src/bedrock/image_client.rs:7)"));
        assert!(!line.contains("thread:"));
    }

    #[test]
    fn test_entry_serializes_as_json() {
        let json = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(json["level"], "Warn");
        assert_eq!(json["line"], 7);
    }

    #[test]
    fn test_timer_summary_is_outcome_neutral() {
        let timer = Timer::new("nova-canvas invoke_model");
        let summary = timer.summary();

        assert_eq!(Timer::LEVEL, Level::Debug);
        assert!(summary.starts_with("⏱️  Timer 'nova-canvas invoke_model' stopped after "));
        assert!(!summary.contains("completed"));
    }

    // Both calls live in one test because the logger is process-global.
    #[test]
    fn test_logger_initialization() {
        let config = LoggerConfig::development().with_json_output(false);
        assert!(init_with_config(config).is_ok());

        assert!(init_with_config(LoggerConfig::production()).is_err());
        let active = CONSOLE_LOGGER.config.read().unwrap();
        assert_eq!(active.min_level, LogLevel::Debug);
        assert!(active.show_colors);
        assert!(!active.output_json);
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }
}
