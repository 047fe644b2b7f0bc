use serde::Deserialize;
use std::fmt;
use std::fmt::Formatter;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// 로그 파일을 저장할 디렉토리, `name`과 함께 설정 되었을 때만 파일로 로그를 남긴다.
    dir: Option<String>,
    name: Option<String>,

    /// 최대 로그 파일 개수로 로그 파일이 설정한 개수보다 커질 경우 기존의 로그파일들은 삭제 된다.
    /// 설정 되지 않을 시 로그 파일은 삭제 되지 않는다.
    keep: Option<usize>,

    /// 파일과 stderr에 출력할 로그의 레벨로 지정된 로그 레벨 이상만 로깅된다.
    /// 설정하지 않을시 기본값은 WARN으로 설정 된다.
    ///
    /// 이 값은 [`tracing::Level`]로 변환 됨으로 자세한 사항은 해당 파일을 확인
    level: Option<String>,

    /// 로깅 파일이 분리 되는 기간으로 .log 파일 하나 당 설정된 기간 동안 로그가 기록 된다.
    /// 설정 되지 않을시 기본값은 DAILY로 설정된다.
    ///
    /// 이 값은 [`rolling::Rotation`]으로 변환 됨으로 자세한 사항은 해당 파일을 확인
    rotation: Option<String>,
}

impl Config {
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogConfigError {
    UnknownLevel(String),
    UnknownRotation(String),
    AppenderInitFailed(String),
    SubscriberInitFailed(String),
}

impl fmt::Display for LogConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogConfigError::UnknownLevel(level) =>
                write!(f, "로그 레벨(level)은 TRACE, DEBUG, INFO, WARN, ERROR만 가능 합니다: {}", level),
            LogConfigError::UnknownRotation(rotation) =>
                write!(f, "로깅 파일 로테이션(rotation)은 DAILY, HOURLY, MINUTELY, NEVER만 가능 합니다: {}", rotation),
            LogConfigError::AppenderInitFailed(message) => write!(f, "Appender init failed, {}", message),
            LogConfigError::SubscriberInitFailed(message) => write!(f, "Subscriber init failed, {}", message),
        }
    }
}

impl std::error::Error for LogConfigError {}

/// 전역 로깅 설정을 한다.
///
/// 로그는 항상 stderr에 출력 되며 (stdout은 조회 결과 출력에 사용) 파일 설정이 있으면 JSON 형식으로 파일에도 기록 된다.
/// 파일 로깅을 사용하는 경우 반환된 [`WorkerGuard`]가 drop 될 때 남은 로그가 기록 되므로 프로그램 종료 시까지 유지해야 한다.
pub fn set_global_logging_config(c: &Config) -> Result<Option<WorkerGuard>, LogConfigError> {
    let level = match &c.level {
        Some(level) => parse_level(level)?,
        None => tracing::Level::WARN,
    };

    let (Some(dir), Some(name)) = (&c.dir, &c.name) else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .try_init()
            .map_err(|e| LogConfigError::SubscriberInitFailed(e.to_string()))?;
        return Ok(None);
    };

    let mut file_appender = rolling::RollingFileAppender::builder()
        .filename_prefix(name.clone())
        .filename_suffix("log");

    if let Some(rotation) = &c.rotation {
        file_appender = file_appender.rotation(parse_rotation(rotation)?);
    } else {
        file_appender = file_appender.rotation(rolling::Rotation::DAILY);
    }

    if let Some(keep) = c.keep {
        file_appender = file_appender.max_log_files(keep);
    }

    let file_appender = file_appender.build(dir.clone())
        .map_err(|e| LogConfigError::AppenderInitFailed(e.to_string()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let writer = std::io::stderr.and(non_blocking);

    tracing_subscriber::fmt()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_timer(LocalTime::new(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .with_writer(writer)
        .with_max_level(level)
        .try_init()
        .map_err(|e| LogConfigError::SubscriberInitFailed(e.to_string()))?;

    Ok(Some(guard))
}

fn parse_rotation(s: &str) -> Result<rolling::Rotation, LogConfigError> {
    match s {
        "DAILY" => Ok(rolling::Rotation::DAILY),
        "HOURLY" => Ok(rolling::Rotation::HOURLY),
        "MINUTELY" => Ok(rolling::Rotation::MINUTELY),
        "NEVER" => Ok(rolling::Rotation::NEVER),
        _ => Err(LogConfigError::UnknownRotation(s.to_owned())),
    }
}

fn parse_level(l: &str) -> Result<tracing::Level, LogConfigError> {
    match l {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" => Ok(tracing::Level::WARN),
        "ERROR" => Ok(tracing::Level::ERROR),
        _ => Err(LogConfigError::UnknownLevel(l.to_owned())),
    }
}
