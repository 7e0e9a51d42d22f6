//! Live tests against the node at `RPC_URL`. Every test returns early when it is unset.

#[cfg(test)]
mod integration_tests {
    use loupe_slot::{ProxyArgsBuilder, SlotArgsBuilder};

    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    #[tokio::test]
    async fn test_usdc_proxy_slots() {
        let Ok(rpc_url) = std::env::var("RPC_URL") else {
            println!("RPC_URL not set, skipping test");
            return;
        };

        let args = ProxyArgsBuilder::new()
            .target(String::from(USDC))
            .rpc_url(rpc_url)
            .block(Some(20_000_000))
            .build()
            .expect("failed to build args");

        let report = loupe_slot::proxy(args).await.expect("failed to inspect proxy");

        assert_eq!(report.block, 20_000_000);
        assert_eq!(
            report.legacy_implementation.map(|a| a.to_string()).as_deref(),
            Some("0x43506849D7C04F9138D1A2050bbF3A0c054402dd")
        );
        assert_eq!(
            report.legacy_admin.map(|a| a.to_string()).as_deref(),
            Some("0x807a96288A1A408dBC13DE2b1d087d10356395d2")
        );
    }

    #[tokio::test]
    async fn test_usdc_implementation_slot() {
        let Ok(rpc_url) = std::env::var("RPC_URL") else {
            println!("RPC_URL not set, skipping test");
            return;
        };

        let args = SlotArgsBuilder::new()
            .target(String::from(USDC))
            .rpc_url(rpc_url)
            .slot(Some(String::from(
                "0x7050c9e0f4ca769c69bd3a8ef740bc37934f8e2c036e5a723fd8ee048ed3f8c3",
            )))
            .decode(Some(loupe_slot::DecodeAs::Address))
            .block(Some(20_000_000))
            .build()
            .expect("failed to build args");

        let result = loupe_slot::slot(args).await.expect("failed to read slot");

        assert_eq!(
            result.decoded.map(|d| d.to_string()).as_deref(),
            Some("0x43506849D7C04F9138D1A2050bbF3A0c054402dd")
        );
    }
}
