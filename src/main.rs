use clap::{CommandFactory, Parser};
use runbook_exporter::azure::{MgmtClient, TokenCache};
use runbook_exporter::cli::Args;
use runbook_exporter::export::export_runbooks;
use runbook_exporter::models::ExtensionMap;
use runbook_exporter::output::StatusSink;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(err) = log4rs::init_file("log4rs.yml", Default::default()) {
        eprintln!("logging config not loaded: {err}");
    }
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let args = Args::parse();
    let status = match &args.outfile {
        Some(path) => StatusSink::with_outfile(path)?,
        None => StatusSink::console_only(),
    };

    let subscriptions = match args.subscriptions(&status) {
        Ok(subscriptions) => subscriptions,
        Err(err) => {
            status.warn(&format!("{err}, exiting!"));
            Args::command().print_help()?;
            std::process::exit(1);
        }
    };

    let client = MgmtClient::new();
    if let Err(err) = client.ensure_login().await {
        status.fatal(&format!(
            "Unable to locate credentials - did you try running 'az login' in this terminal?\n{err}"
        ));
        std::process::exit(1);
    }

    let extensions = ExtensionMap::default();
    let mut tokens = TokenCache::new();
    for subscription in &subscriptions {
        status.info(&format!(
            "Attempting to locate and export automation runbooks within subscription '{subscription}'"
        ));
        if let Err(err) = export_runbooks(
            &client,
            subscription,
            &args.download_directory,
            &extensions,
            &mut tokens,
            &status,
        )
        .await
        {
            status.fatal(&format!(
                "Export failed for subscription '{subscription}': {err}"
            ));
            log::error!("subscription '{subscription}' export aborted: {err:?}");
        }
    }

    log::info!("#End main()");
    Ok(())
}
