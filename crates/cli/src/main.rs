pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use args::{Arguments, Subcommands};
use error::Error;
use output::{emit, output_filename};

use clap::Parser;

use loupe_config::{config, Configuration};
use loupe_core::{
    loupe_selector::probe,
    loupe_slot::{diff, proxy, slot},
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging, keeping the file writer alive until exit
    let _guard = args
        .logs
        .init_tracing()
        .map_err(|e| Error::Generic(format!("failed to initialize logging: {}", e)))?;

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;
    match args.sub {
        Subcommands::Slot(mut cmd) => {
            // fall back to the configured rpc url, resolving `local` to the local node
            cmd.rpc_url = configuration.resolve_rpc_url(&cmd.rpc_url);

            let result = slot(cmd.clone()).await?;
            result.display();

            emit(
                &result,
                &cmd.output,
                &cmd.target,
                &cmd.rpc_url,
                &output_filename(&cmd.name, "slot.json"),
            )
            .await
            .map_err(|e| Error::Generic(format!("failed to write slot: {}", e)))?;
        }

        Subcommands::Proxy(mut cmd) => {
            // fall back to the configured rpc url, resolving `local` to the local node
            cmd.rpc_url = configuration.resolve_rpc_url(&cmd.rpc_url);

            let report = proxy(cmd.clone()).await?;
            report.display();

            emit(
                &report,
                &cmd.output,
                &cmd.target,
                &cmd.rpc_url,
                &output_filename(&cmd.name, "proxy.json"),
            )
            .await
            .map_err(|e| Error::Generic(format!("failed to write proxy report: {}", e)))?;
        }

        Subcommands::Diff(mut cmd) => {
            // fall back to the configured rpc url, resolving `local` to the local node
            cmd.rpc_url = configuration.resolve_rpc_url(&cmd.rpc_url);

            let result = diff(cmd.clone()).await?;
            result.display();

            emit(
                &result,
                &cmd.output,
                &cmd.target,
                &cmd.rpc_url,
                &output_filename(&cmd.name, "diff.json"),
            )
            .await
            .map_err(|e| Error::Generic(format!("failed to write storage diff: {}", e)))?;
        }

        Subcommands::Selector(cmd) => {
            let report = probe(cmd.clone()).await?;
            report.display();

            emit(
                &report,
                &cmd.output,
                &cmd.target,
                "",
                &output_filename(&cmd.name, "selector.json"),
            )
            .await
            .map_err(|e| Error::Generic(format!("failed to write selector report: {}", e)))?;
        }

        Subcommands::Config(cmd) => {
            config(cmd).map_err(|e| Error::Generic(format!("failed to configure: {}", e)))?;
        }
    }

    Ok(())
}
