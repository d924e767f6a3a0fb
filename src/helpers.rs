use crate::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use reqwest::header;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use directories::ProjectDirs;

pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Builds a client with the given request timeout. When `max_retries` is above zero, transient
/// failures (connection errors, timeouts, 5xx and 429 responses) are retried with exponential
/// backoff.
pub fn get_default_middleware(
    user_agent_string: &'static str,
    timeout: Duration,
    max_retries: u32,
) -> Result<ClientWithMiddleware, Error> {
    let mut headers = header::HeaderMap::new();

    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(user_agent_string));

    let client = reqwest::ClientBuilder::new()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    let mut builder = ClientBuilder::new(client);

    if max_retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(builder.build())
}

/// Checks the status of the response and reads the body.
pub async fn check_response(response: reqwest::Response) -> Result<bytes::Bytes, Error> {
    let status = response.status();

    match status.as_u16() {
        400..=599 => Err(Error::Http(status)),
        _ => Ok(response.bytes().await?),
    }
}

/// Writes a file atomically by writing to a temporary file in the same directory then renaming
/// it over the destination.
pub async fn write_file_atomic<P>(
    filepath: P,
    bytes: &[u8],
) -> std::io::Result<()>
where
    P: AsRef<Path>,
{
    let filepath = filepath.as_ref();

    if let Some(parent) = filepath.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent).await?;
        }
    }

    let mut temp_filepath = filepath.as_os_str().to_owned();

    temp_filepath.push(".tmp");

    let temp_filepath = PathBuf::from(temp_filepath);

    match async_fs::write(&temp_filepath, bytes).await {
        Ok(_) => async_fs::rename(&temp_filepath, filepath).await,
        Err(error) => {
            // something went wrong writing to this file...
            let _ = async_fs::remove_file(&temp_filepath).await;

            Err(error)
        },
    }
}

/// The platform data directory for the bot, falling back to the working directory.
pub fn default_data_directory() -> PathBuf {
    ProjectDirs::from("com", "epic-free-games", "epic-free-games-bot")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{http_response, serve};

    #[tokio::test]
    async fn maps_error_statuses() {
        for status in ["404 Not Found", "429 Too Many Requests", "500 Internal Server Error"] {
            let response = reqwest::get(serve(http_response(status, "{}")).await).await.unwrap();
            let code = response.status();

            assert!(matches!(check_response(response).await, Err(Error::Http(http)) if http == code));
        }
    }

    #[tokio::test]
    async fn reads_successful_body() {
        let response = reqwest::get(serve(http_response("200 OK", "[1]")).await).await.unwrap();

        assert_eq!(check_response(response).await.unwrap().as_ref(), b"[1]");
    }

    #[tokio::test]
    async fn writes_file_atomically() {
        let directory = std::env::temp_dir().join(format!("epic-bot-helpers-{}", std::process::id()));
        let filepath = directory.join("nested").join("data.json");

        write_file_atomic(&filepath, b"[1]").await.unwrap();
        write_file_atomic(&filepath, b"[1,2]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&filepath).unwrap(), "[1,2]");
        assert!(!directory.join("nested").join("data.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&directory);
    }
}
