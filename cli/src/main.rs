use std::sync::Arc;

use cli::cli::{Cli, CliSettings};
use lnurl_resolver::{LnurlClient, ReqwestTransport};
use structopt::StructOpt;

fn main() {
    let settings = utils::config::get_config_from_env::<CliSettings>().unwrap_or_default();
    let logger = utils::xlogging::init_log(&settings.cli_logging_settings).expect("Failed to init logging.");

    let transport = ReqwestTransport::new(&settings.resolver_settings).expect("Failed to create http client.");
    let client = LnurlClient::new(Arc::new(transport), settings.resolver_settings, logger.clone());

    let response = Cli::from_args().execute(&client, &logger);
    response.print();

    // The async drain only flushes once every logger handle is gone.
    drop(client);
    drop(logger);
    if !response.success {
        std::process::exit(1);
    }
}
