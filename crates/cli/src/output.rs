use std::env;

use alloy::primitives::Address;
use eyre::{eyre, Result};
use loupe_common::{ether::rpc, utils::io::file::write_file};
use serde::Serialize;

/// build a standardized output path for the given parameters. follows the following cases:
/// - if `output` is the default value (`output`)
///   - if `target` is a contract address, return `/output/{chain_id}/{target}/{filename}`
///   - otherwise (e.g. a selector), return `/output/local/{filename}`
/// - if `output` is specified, return `/{output}/{filename}`
pub(crate) async fn build_output_path(
    output: &str,
    target: &str,
    rpc_url: &str,
    filename: &str,
) -> Result<String> {
    // if output is the default value, build a path based on the target
    if output == "output" {
        let cwd = env::current_dir()?
            .into_os_string()
            .into_string()
            .map_err(|_| eyre!("Unable to get current working directory"))?;

        if target.parse::<Address>().is_ok() && !rpc_url.is_empty() {
            let chain_id =
                rpc::chain_id(rpc_url).await.map_err(|_| eyre!("Unable to get chain id"))?;
            return Ok(format!("{}/output/{}/{}/{}", cwd, chain_id, target, filename));
        } else {
            return Ok(format!("{}/output/local/{}", cwd, filename));
        }
    }

    // output is specified, return the path
    Ok(format!("{}/{}", output.trim_end_matches('/'), filename))
}

/// prefixes `filename` with the user supplied `name`, if any
pub(crate) fn output_filename(name: &str, filename: &str) -> String {
    if name.is_empty() {
        filename.to_string()
    } else {
        format!("{}-{}", name, filename)
    }
}

/// prints `result` as pretty JSON when `output` is `print`, otherwise writes it to the path
/// built by [`build_output_path`]
pub(crate) async fn emit<T: Serialize>(
    result: &T,
    output: &str,
    target: &str,
    rpc_url: &str,
    filename: &str,
) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;

    if output == "print" {
        println!("{json}");
        return Ok(());
    }

    let output_path = build_output_path(output, target, rpc_url, filename).await?;
    write_file(&output_path, &json)?;
    tracing::info!("wrote output to {}", output_path);

    Ok(())
}
