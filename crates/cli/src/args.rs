use clap::{Parser, Subcommand};

use crate::log_args::LogArgs;
use loupe_config::ConfigArgs;
use loupe_core::{
    loupe_selector::ProbeArgs,
    loupe_slot::{DiffArgs, ProxyArgs, SlotArgs},
};

#[derive(Debug, Parser)]
#[clap(name = "loupe", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub sub: Subcommands,

    #[clap(flatten)]
    pub logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(about = "loupe inspects EVM contract storage and function selectors from the outside.")]
pub(crate) enum Subcommands {
    #[clap(name = "slot", about = "Derive, read and decode a storage slot of a contract")]
    Slot(SlotArgs),

    #[clap(
        name = "proxy",
        about = "Read the implementation, admin and beacon addresses behind a proxy"
    )]
    Proxy(ProxyArgs),

    #[clap(name = "diff", about = "Compare storage slots of a contract between two blocks")]
    Diff(DiffArgs),

    #[clap(
        name = "selector",
        about = "Search for a function signature whose selector matches a target"
    )]
    Selector(ProbeArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}
