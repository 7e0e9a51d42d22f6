use clap::Parser;
use derive_builder::Builder;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Search for a function signature whose selector matches a target",
    override_usage = "loupe selector <TARGET> --template <TEMPLATE> [OPTIONS]"
)]
/// Arguments for the selector operation
///
/// Every `{i}` in the template is replaced by each integer of `from..=to` in turn, and the
/// first signature hashing to the target wins.
pub struct ProbeArgs {
    /// The 4-byte selector to search for, e.g. `0xb15b76ee`.
    #[clap(required = true)]
    pub target: String,

    /// The signature template, e.g. `testFunc{i}(uint16,uint256,uint256,address)`.
    #[clap(long, short)]
    pub template: String,

    /// The first integer to substitute.
    #[clap(long, short, default_value = "1")]
    pub from: u64,

    /// The last integer to substitute, included.
    #[clap(long = "to", short = 'u', default_value = "9999")]
    pub to: u64,

    /// Where to write the output: 'print' for the console, 'output' for
    /// `./output/<chain_id>/<target>/`, or any other directory
    #[clap(long = "output", short, default_value = "print", hide_default_value = true)]
    pub output: String,

    /// The name for the output file
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub name: String,
}

impl ProbeArgsBuilder {
    /// Creates a new ProbeArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            template: Some(String::new()),
            from: Some(1),
            to: Some(9999),
            output: Some(String::from("print")),
            name: Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = ProbeArgs::parse_from([
            "selector",
            "0xb15b76ee",
            "--template",
            "testFunc{i}(uint16,uint256,uint256,address)",
        ]);

        assert_eq!(args.from, 1);
        assert_eq!(args.to, 9999);
        assert_eq!(args.output, "print");
    }
}
