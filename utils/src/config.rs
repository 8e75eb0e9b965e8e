use std::env;

use config::ConfigError;

pub fn config_path(file_name: &str, environment: &str) -> String {
    format!("{}.{}.toml", file_name, environment)
}

/// Loads `{FILE_NAME}.{ENV}.toml`, `ENV` defaulting to `dev`.
pub fn get_config_from_env<'a, T: 'a>() -> Result<T, ConfigError>
where
    T: serde::Deserialize<'a>,
{
    let environment: String = env::var("ENV").unwrap_or_else(|_| "dev".into());
    let file_name: String = env::var("FILE_NAME")
        .map_err(|_| ConfigError::Message("FILE_NAME was not specified as an environment variable.".into()))?;

    get_config_from_file(&config_path(&file_name, &environment))
}

pub fn get_config_from_file<'a, T: 'a>(file_path: &str) -> Result<T, ConfigError>
where
    T: serde::Deserialize<'a>,
{
    let mut configuration = config::Config::default();
    configuration.merge(config::File::with_name(file_path))?;
    configuration.try_into()
}
