pub mod api;
pub mod log;

use serde::Deserialize;
use std::env;

pub use ::config::ConfigError;

/// 환경 변수로 설정 값을 덮어쓸 때 사용하는 접두어 (`APP_RAKUTEN__APPLICATION_ID`)
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    rakuten: api::Rakuten,
    #[serde(default)]
    logger: log::Config,
}

impl AppConfig {
    pub fn rakuten(&self) -> &api::Rakuten {
        &self.rakuten
    }

    pub fn logger(&self) -> &log::Config {
        &self.logger
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// `config/{RUN_MODE}.json` 파일과 `APP_` 으로 시작하는 환경 변수를 읽어 설정을 만든다.
///
/// 설정 파일은 없어도 되며, 같은 키가 있으면 환경 변수의 값이 우선한다.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_dotenv();

    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
    let config = ::config::Config::builder()
        .add_source(::config::File::with_name(&format!("config/{}", run_mode)).required(false))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
        )
        .build()?;

    config.try_deserialize()
}
