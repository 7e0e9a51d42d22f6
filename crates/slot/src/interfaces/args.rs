use alloy::primitives::{Address, B256, U256};
use clap::{Parser, ValueEnum};
use derive_builder::Builder;
use eyre::eyre;
use loupe_config::parse_url_arg;
use serde::Serialize;

use crate::{
    error::Error,
    utils::{
        derive::{parse_word, to_uint, SlotDerivation},
        layout::{FieldOrder, PackedLayout},
    },
};

/// How a raw storage word should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeAs {
    /// The low 20 bytes, checksummed.
    Address,
    /// The full word as an unsigned integer.
    Uint,
    /// Packed fields, as described by `--widths` and `--order`.
    Packed,
}

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Read and decode a single storage slot of a contract",
    override_usage = "loupe slot <TARGET> [OPTIONS]"
)]
/// Arguments for the slot operation
///
/// The storage key is built from exactly one base (`--slot`, `--namespace` or `--erc7201`),
/// then each `--key` is applied as a mapping lookup in order, then `--index` as a dynamic
/// array lookup, and finally `--offset` as a struct field offset.
pub struct SlotArgs {
    /// The contract address to read storage from.
    #[clap(required = true)]
    pub target: String,

    /// The RPC URL to use for fetching data.
    /// This can be an explicit URL or a reference to a MESC endpoint.
    #[clap(long, short, value_parser = parse_url_arg, default_value = "", hide_default_value = true)]
    pub rpc_url: String,

    /// A literal slot, decimal or 0x-prefixed hex.
    #[clap(long, short, conflicts_with_all = ["namespace", "erc7201"])]
    pub slot: Option<String>,

    /// Use the unstructured storage slot `keccak256(<NAMESPACE>) - 1`, e.g.
    /// `eip1967.proxy.implementation`.
    #[clap(long, conflicts_with = "erc7201")]
    pub namespace: Option<String>,

    /// Use the ERC-7201 root slot of the given namespace id.
    #[clap(long)]
    pub erc7201: Option<String>,

    /// Mapping keys to apply to the base slot, in order. Addresses and integers are left
    /// padded to a word.
    #[clap(long = "key", short = 'k')]
    pub keys: Vec<String>,

    /// Treat the current slot as a dynamic array and select this element.
    #[clap(long, short)]
    pub index: Option<String>,

    /// The number of words a single array element occupies.
    #[clap(long, default_value = "1", hide_default_value = true)]
    pub element_words: u64,

    /// The struct field offset, in words, added to the final slot.
    #[clap(long, default_value = "0", hide_default_value = true)]
    pub offset: u64,

    /// How to decode the word. When omitted only the raw word is returned.
    #[clap(long, short, value_enum)]
    pub decode: Option<DecodeAs>,

    /// Bit widths of the packed fields, comma separated. Required with `--decode packed`.
    #[clap(long, short, value_delimiter = ',')]
    pub widths: Vec<usize>,

    /// Which end of the word the first packed field is read from.
    #[clap(long, value_enum, default_value_t = FieldOrder::HighFirst)]
    pub order: FieldOrder,

    /// The block number to read at. Defaults to the latest block.
    #[clap(long, short)]
    pub block: Option<u64>,

    /// Where to write the output: 'print' for the console, 'output' for
    /// `./output/<chain_id>/<target>/`, or any other directory
    #[clap(long = "output", short, default_value = "print", hide_default_value = true)]
    pub output: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,
}

impl SlotArgs {
    /// Parses the target address.
    pub fn address(&self) -> Result<Address, Error> {
        parse_address(&self.target)
    }

    /// Builds the derivation steps described by the arguments, in application order. The last
    /// step resolves to the slot to read.
    pub fn derivations(&self) -> Result<Vec<SlotDerivation>, Error> {
        let base = match (&self.slot, &self.namespace, &self.erc7201) {
            (Some(slot), None, None) => SlotDerivation::Literal(parse_word(slot)?),
            (None, Some(id), None) => SlotDerivation::Namespaced(id.clone()),
            (None, None, Some(id)) => SlotDerivation::Erc7201(id.clone()),
            (None, None, None) => {
                return Err(Error::InvalidLayoutError(
                    "no slot given. pass one of --slot, --namespace or --erc7201".to_string(),
                ))
            }
            _ => {
                return Err(Error::InvalidLayoutError(
                    "--slot, --namespace and --erc7201 are mutually exclusive".to_string(),
                ))
            }
        };

        let mut current = base.resolve();
        let mut steps = vec![base];

        for key in &self.keys {
            let step = SlotDerivation::MappingEntry { base: current, key: parse_word(key)? };
            current = step.resolve();
            steps.push(step);
        }

        if let Some(index) = &self.index {
            if self.element_words == 0 {
                return Err(Error::InvalidLayoutError(
                    "array elements must occupy at least one word".to_string(),
                ));
            }

            let step = SlotDerivation::ArrayElement {
                base: current,
                index: to_uint(parse_word(index)?),
                element_words: U256::from(self.element_words),
            };
            current = step.resolve();
            steps.push(step);
        }

        if self.offset > 0 {
            steps.push(SlotDerivation::FieldOffset { base: current, offset: self.offset });
        }

        Ok(steps)
    }

    /// Resolves the storage key to read.
    pub fn slot_key(&self) -> Result<B256, Error> {
        self.derivations()?
            .last()
            .map(SlotDerivation::resolve)
            .ok_or_else(|| Error::InvalidLayoutError("empty slot derivation".to_string()))
    }

    /// The packed layout, when `--decode packed` was requested.
    pub fn packed_layout(&self) -> Result<Option<PackedLayout>, Error> {
        match self.decode {
            Some(DecodeAs::Packed) => {
                Ok(Some(PackedLayout::new(self.widths.clone())?.with_order(self.order)))
            }
            _ if !self.widths.is_empty() => Err(Error::InvalidLayoutError(
                "--widths is only meaningful with --decode packed".to_string(),
            )),
            _ => Ok(None),
        }
    }
}

impl SlotArgsBuilder {
    /// Creates a new SlotArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            rpc_url: Some(String::new()),
            slot: Some(None),
            namespace: Some(None),
            erc7201: Some(None),
            keys: Some(Vec::new()),
            index: Some(None),
            element_words: Some(1),
            offset: Some(0),
            decode: Some(None),
            widths: Some(Vec::new()),
            order: Some(FieldOrder::HighFirst),
            block: Some(None),
            output: Some(String::from("print")),
            name: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Read the implementation, admin and beacon addresses behind a proxy",
    override_usage = "loupe proxy <TARGET> [OPTIONS]"
)]
/// Arguments for the proxy operation
pub struct ProxyArgs {
    /// The proxy contract address.
    #[clap(required = true)]
    pub target: String,

    /// The RPC URL to use for fetching data.
    /// This can be an explicit URL or a reference to a MESC endpoint.
    #[clap(long, short, value_parser = parse_url_arg, default_value = "", hide_default_value = true)]
    pub rpc_url: String,

    /// The block number to read at. Defaults to the latest block.
    #[clap(long, short)]
    pub block: Option<u64>,

    /// Where to write the output: 'print' for the console, 'output' for
    /// `./output/<chain_id>/<target>/`, or any other directory
    #[clap(long = "output", short, default_value = "print", hide_default_value = true)]
    pub output: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,
}

impl ProxyArgsBuilder {
    /// Creates a new ProxyArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            rpc_url: Some(String::new()),
            block: Some(None),
            output: Some(String::from("print")),
            name: Some(String::new()),
        }
    }
}

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Compare raw storage slots of a contract between two blocks",
    override_usage = "loupe diff <TARGET> --slots <SLOTS> --from-block <BLOCK> [OPTIONS]"
)]
/// Arguments for the diff operation
///
/// Typically used around a proxy upgrade: pick a block before and after the implementation
/// swap and check that only the expected slots moved.
pub struct DiffArgs {
    /// The contract address to compare storage of.
    #[clap(required = true)]
    pub target: String,

    /// The RPC URL to use for fetching data.
    /// This can be an explicit URL or a reference to a MESC endpoint.
    #[clap(long, short, value_parser = parse_url_arg, default_value = "", hide_default_value = true)]
    pub rpc_url: String,

    /// Literal slots to compare, comma separated.
    #[clap(long, short, value_delimiter = ',')]
    pub slots: Vec<String>,

    /// Namespaced (`keccak256(id) - 1`) slots to compare, comma separated.
    #[clap(long = "namespaces", value_delimiter = ',')]
    pub namespaces: Vec<String>,

    /// The block to read the "before" values at.
    #[clap(long, short, alias = "start_block")]
    pub from_block: u64,

    /// The block to read the "after" values at. Defaults to the latest block.
    #[clap(long, short, alias = "end_block")]
    pub to_block: Option<u64>,

    /// Where to write the output: 'print' for the console, 'output' for
    /// `./output/<chain_id>/<target>/`, or any other directory
    #[clap(long = "output", short, default_value = "print", hide_default_value = true)]
    pub output: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,
}

impl DiffArgs {
    /// Parses the target address.
    pub fn address(&self) -> Result<Address, Error> {
        parse_address(&self.target)
    }

    /// Every slot to compare, literal slots first.
    pub fn slot_keys(&self) -> Result<Vec<B256>, Error> {
        let mut keys =
            self.slots.iter().map(|slot| parse_word(slot)).collect::<Result<Vec<_>, _>>()?;
        keys.extend(
            self.namespaces.iter().map(|id| SlotDerivation::Namespaced(id.clone()).resolve()),
        );

        if keys.is_empty() {
            return Err(Error::InvalidLayoutError(
                "no slots given. pass --slots and/or --namespaces".to_string(),
            ));
        }

        Ok(keys)
    }
}

impl DiffArgsBuilder {
    /// Creates a new DiffArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            rpc_url: Some(String::new()),
            slots: Some(Vec::new()),
            namespaces: Some(Vec::new()),
            from_block: Some(0),
            to_block: Some(None),
            output: Some(String::from("print")),
            name: Some(String::new()),
        }
    }
}

pub(crate) fn parse_address(target: &str) -> Result<Address, Error> {
    target
        .trim()
        .parse::<Address>()
        .map_err(|e| eyre!("invalid target address '{target}': {e}").into())
}
