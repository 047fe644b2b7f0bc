use book_lookup_rust::config;
use book_lookup_rust::provider::{Client, ClientError};
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

/// 조회 결과가 없을 때의 종료 코드
const EXIT_NOT_FOUND: u8 = 2;

/// ISBN으로 라쿠텐 북스에서 도서 정보를 조회한다.
#[derive(Debug, Parser)]
#[command(name = "book-lookup", version, about)]
struct Cli {
    /// 조회할 ISBN (형식은 검증하지 않는다)
    isbn: String,

    /// 결과 JSON을 보기 좋게 출력한다
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app_config = match config::load_config() {
        Ok(app_config) => app_config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match config::log::set_global_logging_config(app_config.logger()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("logging configuration error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let client = app_config.rakuten().new_client();
    run(&client, &cli).await
}

async fn run<C: Client>(client: &C, cli: &Cli) -> ExitCode {
    match client.lookup_by_isbn(&cli.isbn).await {
        Ok(Some(record)) => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&record)
            } else {
                serde_json::to_string(&record)
            };
            match json {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("failed to serialize record: {}", err);
                    ExitCode::FAILURE
                }
            }
        }
        Ok(None) => {
            eprintln!("no book found for ISBN {}", cli.isbn);
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(err @ ClientError::Upstream(_)) => {
            debug!(isbn = cli.isbn.as_str(), "Lookup rejected by upstream: {}", err);
            eprintln!("upstream error: {}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            debug!(isbn = cli.isbn.as_str(), "Lookup failed: {}", err);
            eprintln!("lookup failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
