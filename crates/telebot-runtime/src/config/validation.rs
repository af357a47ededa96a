//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, LogOutput, LoggingConfig, PollingConfig, RetryConfig, TelebotConfig};

/// Largest batch the remote API returns.
const MAX_POLL_LIMIT: u32 = 100;

/// Validates the entire configuration.
pub fn validate_config(config: &TelebotConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_polling_config(&config.polling, &config.bot)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.token.is_empty() {
        return Err(ConfigError::missing_field("bot.token"));
    }

    if bot.token.contains(|c: char| c.is_whitespace() || c == '/') {
        return Err(ConfigError::validation(
            "Bot token cannot contain whitespace or '/'",
        ));
    }

    validate_url(&bot.api_url)?;

    if bot.request_timeout_secs == 0 {
        return Err(ConfigError::validation(
            "Request timeout must be greater than 0",
        ));
    }

    Ok(())
}

fn validate_polling_config(polling: &PollingConfig, bot: &BotConfig) -> ConfigResult<()> {
    if u64::from(polling.timeout_secs) >= bot.request_timeout_secs {
        return Err(ConfigError::validation(format!(
            "Request timeout ({}s) must exceed the poll timeout ({}s)",
            bot.request_timeout_secs, polling.timeout_secs
        )));
    }

    if let Some(limit) = polling.limit
        && !(1..=MAX_POLL_LIMIT).contains(&limit)
    {
        return Err(ConfigError::validation(format!(
            "Poll limit must be between 1 and {MAX_POLL_LIMIT}, got {limit}"
        )));
    }

    validate_retry_config(&polling.retry)
}

fn validate_retry_config(retry: &RetryConfig) -> ConfigResult<()> {
    if retry.initial_delay_ms == 0 {
        return Err(ConfigError::validation(
            "Initial retry delay must be greater than 0",
        ));
    }

    if retry.max_delay_ms < retry.initial_delay_ms {
        return Err(ConfigError::validation(
            "Max retry delay must be greater than or equal to initial delay",
        ));
    }

    if !retry.backoff_multiplier.is_finite() || retry.backoff_multiplier < 1.0 {
        return Err(ConfigError::validation(
            "Backoff multiplier must be a finite number of at least 1.0",
        ));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

fn validate_url(url: &str) -> ConfigResult<()> {
    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(ConfigError::invalid_url(url, "missing scheme"));
    };

    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::invalid_url(
            url,
            format!("expected http or https, got {scheme}"),
        ));
    }

    if rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::invalid_url(url, "missing host"));
    }

    Ok(())
}
