use alloy::primitives::Selector;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::{
    error::Error,
    interfaces::ProbeArgs,
    utils::{
        candidates::generate_candidates,
        selector::{parse_selector, SelectorCandidate},
    },
};

/// The outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeResult {
    /// A candidate hashed to the target.
    Found {
        /// The matching signature.
        signature: String,
        /// Its selector, equal to the target.
        selector: Selector,
        /// The zero-based position of the match in the candidate sequence.
        position: usize,
    },
    /// No candidate hashed to the target.
    NotFound,
}

/// The result of the `selector` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// The selector searched for.
    pub target: Selector,
    /// Whether, and where, a match was found.
    pub result: ProbeResult,
    /// The number of candidates hashed before the search stopped.
    pub evaluations: usize,
}

impl ProbeReport {
    /// The matching signature, if any.
    pub fn signature(&self) -> Option<&str> {
        match &self.result {
            ProbeResult::Found { signature, .. } => Some(signature),
            ProbeResult::NotFound => None,
        }
    }

    /// Logs the report in a human readable form.
    pub fn display(&self) {
        match &self.result {
            ProbeResult::Found { signature, selector, position } => {
                info!("{} matches {} (candidate #{})", signature, selector, position + 1)
            }
            ProbeResult::NotFound => {
                info!("no candidate matches {}", self.target)
            }
        }
        info!("{} candidates evaluated", self.evaluations);
    }
}

/// Hashes `candidates` in order until one hashes to `target`.
///
/// A match at position `k` costs `k + 1` evaluations. When nothing matches, every candidate
/// is evaluated once and the result is [`ProbeResult::NotFound`].
pub fn find_match<I>(target: Selector, candidates: I) -> ProbeReport
where
    I: IntoIterator<Item = String>, {
    let mut evaluations = 0;

    for (position, signature) in candidates.into_iter().enumerate() {
        evaluations += 1;
        let SelectorCandidate { signature, selector } = SelectorCandidate::new(signature);
        trace!("{} -> {}", signature, selector);

        if selector == target {
            return ProbeReport {
                target,
                result: ProbeResult::Found { signature, selector, position },
                evaluations,
            };
        }
    }

    ProbeReport { target, result: ProbeResult::NotFound, evaluations }
}

/// Searches for a signature matching the selector named by `args`
///
/// # Arguments
///
/// * `args` - The target selector, the signature template and the range to enumerate
///
/// # Returns
///
/// The match, if any, and the number of candidates evaluated
pub async fn probe(args: ProbeArgs) -> Result<ProbeReport, Error> {
    let start_time = Instant::now();
    let target = parse_selector(&args.target)?;
    let candidates = generate_candidates(&args.template, args.from..=args.to)?;

    debug!("searching {} over {}..={} for {}", args.template, args.from, args.to, target);
    let report = find_match(target, candidates);

    debug!("selector search took {:?}", start_time.elapsed());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::ProbeArgsBuilder;
    use alloy::primitives::fixed_bytes;

    const TEMPLATE: &str = "testFunc{i}(uint16,uint256,uint256,address)";

    #[test]
    fn test_match_counts_evaluations_up_to_position() {
        let candidates = generate_candidates(TEMPLATE, 1..=100).expect("valid template");
        let report = find_match(fixed_bytes!("0b38693a"), candidates);

        assert_eq!(
            report.result,
            ProbeResult::Found {
                signature: "testFunc42(uint16,uint256,uint256,address)".to_string(),
                selector: fixed_bytes!("0b38693a"),
                position: 41,
            }
        );
        assert_eq!(report.evaluations, 42);
    }

    #[test]
    fn test_first_candidate_matches() {
        let candidates = generate_candidates(TEMPLATE, 1..=100).expect("valid template");
        let report = find_match(fixed_bytes!("381cb6fb"), candidates);

        assert_eq!(report.signature(), Some("testFunc1(uint16,uint256,uint256,address)"));
        assert_eq!(report.evaluations, 1);
    }

    #[test]
    fn test_not_found_evaluates_every_candidate() {
        let candidates = generate_candidates(TEMPLATE, 1..=250).expect("valid template");
        let report = find_match(fixed_bytes!("00000000"), candidates);

        assert_eq!(report.result, ProbeResult::NotFound);
        assert_eq!(report.evaluations, 250);
    }

    #[test]
    fn test_found_selector_matches_candidate_hash() {
        let signature = "testFunc3(uint16,uint256,uint256,address)";
        let candidates = generate_candidates(TEMPLATE, 1..=10).expect("valid template");
        let report = find_match(fixed_bytes!("809956fe"), candidates);

        let ProbeResult::Found { selector, position, .. } = report.result else {
            panic!("expected a match, got {:?}", report.result);
        };
        assert_eq!(selector, SelectorCandidate::new(signature.to_string()).selector);
        assert_eq!(position, 2);
    }

    #[test]
    fn test_empty_candidates() {
        let report = find_match(fixed_bytes!("a9059cbb"), Vec::<String>::new());

        assert_eq!(report.result, ProbeResult::NotFound);
        assert_eq!(report.evaluations, 0);
    }

    #[test]
    fn test_report_serializes_status() {
        let report = find_match(fixed_bytes!("a9059cbb"), vec!["transfer(address,uint256)".into()]);
        let json = serde_json::to_value(&report).expect("serializable");

        assert_eq!(json["result"]["status"], "found");
        assert_eq!(json["result"]["selector"], "0xa9059cbb");
        assert_eq!(json["evaluations"], 1);
    }

    #[tokio::test]
    async fn test_probe_golden_selector_is_not_found() {
        let args = ProbeArgsBuilder::new()
            .target("0xb15b76ee".to_string())
            .template(TEMPLATE.to_string())
            .from(1)
            .to(9999)
            .build()
            .expect("failed to build args");

        let report = probe(args).await.expect("probe() returned an error!");
        assert_eq!(report.result, ProbeResult::NotFound);
        assert_eq!(report.evaluations, 9999);
    }

    #[tokio::test]
    async fn test_probe_rejects_bad_input() {
        let bad_target = ProbeArgsBuilder::new()
            .target("0xb15b".to_string())
            .template(TEMPLATE.to_string())
            .build()
            .expect("failed to build args");
        assert!(matches!(probe(bad_target).await, Err(Error::InvalidSelector(_))));

        let bad_template = ProbeArgsBuilder::new()
            .target("0xb15b76ee".to_string())
            .template("testFunc(uint16)".to_string())
            .build()
            .expect("failed to build args");
        assert!(matches!(probe(bad_template).await, Err(Error::InvalidTemplate(_))));
    }
}
