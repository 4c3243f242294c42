//! Optional `tracing` subscriber setup driven by environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"
//! - LOG_MAX_SIZE: maximum size of log files in bytes; default is 1GB

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::Path,
};
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use tracing::Subscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;

lazy_static! {
	static ref ANSI_ESCAPE: Option<Regex> = Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").ok();
}

/// Formatter that strips ANSI escape codes, used for file output
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<T> StripAnsiFormatter<T> {
	fn new(inner: T) -> Self {
		Self { inner }
	}
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

/// Strips ANSI escape codes from a string
fn strip_ansi_escapes(s: &str) -> String {
	match &*ANSI_ESCAPE {
		Some(re) => re.replace_all(s, "").to_string(),
		None => s.to_string(),
	}
}

/// Computes the path of the rolled log file given the base file path and the date string.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let trimmed = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", trimmed, date_str, index)
}

/// Returns `file_path`, or the next free sequence-numbered path while the
/// candidate exceeds `max_size` bytes.
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut final_path = file_path.to_string();
	let mut index = 1;
	while let Ok(metadata) = metadata(&final_path) {
		if metadata.len() > max_size {
			final_path = compute_rolled_file_path(base_file_path, date_str, index);
			index += 1;
		} else {
			break;
		}
	}
	final_path
}

/// Creates a log format with configurable ANSI support
fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
	Stdout,
	File,
}

/// Subscriber settings, normally read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
	pub mode: LogMode,
	pub level: tracing::Level,
	pub data_dir: String,
	pub max_size: u64,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			mode: LogMode::Stdout,
			level: tracing::Level::INFO,
			data_dir: "logs/".to_string(),
			max_size: DEFAULT_LOG_MAX_SIZE,
		}
	}
}

impl LogConfig {
	/// Reads `LOG_MODE`, `LOG_LEVEL`, `LOG_DATA_DIR` and `LOG_MAX_SIZE`
	pub fn from_env() -> Result<Self, String> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
		let defaults = Self::default();

		let mode = match lookup("LOG_MODE").map(|m| m.to_lowercase()).as_deref() {
			Some("file") => LogMode::File,
			_ => LogMode::Stdout,
		};
		// Unknown levels fall back to info
		let level = lookup("LOG_LEVEL")
			.and_then(|level| level.parse::<tracing::Level>().ok())
			.unwrap_or(defaults.level);
		let data_dir = lookup("LOG_DATA_DIR").unwrap_or(defaults.data_dir);
		let max_size = parse_log_max_size(lookup("LOG_MAX_SIZE").as_deref())?;

		Ok(Self {
			mode,
			level,
			data_dir,
			max_size,
		})
	}

	/// Path of today's log file, rolled over once it outgrows `max_size`
	fn file_path(&self) -> String {
		let log_dir = format!("{}/", self.data_dir.trim_end_matches('/'));
		let date_str = Utc::now().format("%Y-%m-%d").to_string();
		let base_file_path = format!("{}ethconn.log", log_dir);
		let time_based_path = compute_rolled_file_path(&base_file_path, &date_str, 1);
		space_based_rolling(&time_based_path, &base_file_path, &date_str, self.max_size)
	}
}

/// Installs the global subscriber configured from the environment.
///
/// Library code only emits `tracing` events; applications embedding the
/// client call this once at startup if they have no subscriber of their own.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	setup_logging_with(&LogConfig::from_env()?)
}

pub fn setup_logging_with(config: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
	let subscriber =
		tracing_subscriber::registry().with(EnvFilter::new(config.level.to_string()));

	match config.mode {
		LogMode::File => {
			let final_path = config.file_path();
			let path = Path::new(&final_path);
			let dir = path.parent().unwrap_or(Path::new("."));
			create_dir_all(dir)?;

			let file_appender =
				tracing_appender::rolling::never(dir, path.file_name().unwrap_or_default());

			subscriber
				.with(
					fmt::layer()
						.event_format(StripAnsiFormatter::new(create_log_format(false)))
						.with_writer(file_appender)
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
			info!(path = %final_path, "logging to file");
		}
		LogMode::Stdout => {
			subscriber
				.with(
					fmt::layer()
						.event_format(create_log_format(true))
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
		}
	}

	Ok(())
}

fn parse_log_max_size(raw: Option<&str>) -> Result<u64, String> {
	match raw {
		None => Ok(DEFAULT_LOG_MAX_SIZE),
		Some(value) => value
			.parse::<u64>()
			.map_err(|_| format!("LOG_MAX_SIZE must be a valid u64, got '{}'", value)),
	}
}
