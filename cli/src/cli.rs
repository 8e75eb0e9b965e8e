use crate::actions::Action;
use lnurl_resolver::{ClientSettings, LnurlClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slog as log;
use slog::Logger;
use structopt::StructOpt;
use utils::xlogging::LoggingSettings;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CliSettings {
    #[serde(default)]
    pub resolver_settings: ClientSettings,
    #[serde(default)]
    pub cli_logging_settings: LoggingSettings,
}

#[derive(StructOpt, Debug)]
#[structopt(name = "lnurl_resolver")]
pub struct Cli {
    #[structopt(subcommand)]
    action: Action,
}

impl Cli {
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn into_action(self) -> Action {
        self.action
    }

    /// Runs the action and renders the outcome. Failures come out in the
    /// `{"status": "ERROR", "reason": ...}` shape.
    pub fn execute(self, client: &LnurlClient, logger: &Logger) -> Response {
        match self.action.execute(client) {
            Ok(value) => Response { value, success: true },
            Err(err) => {
                log::warn!(logger, "Action failed: {}", err);
                Response {
                    value: err.to_json(),
                    success: false,
                }
            }
        }
    }
}

pub struct Response {
    pub value: Value,
    pub success: bool,
}

impl Response {
    pub fn print(&self) {
        let rendered = serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string());
        if self.success {
            println!("{}", rendered);
        } else {
            eprintln!("{}", rendered);
        }
    }
}
