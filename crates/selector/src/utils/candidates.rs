use std::ops::RangeInclusive;

use crate::error::Error;

/// The placeholder replaced by each integer of the range.
pub const PLACEHOLDER: &str = "{i}";

/// Signature candidates produced by substituting every integer of a range into a template.
///
/// The iterator is lazy and finite. Cloning it, or calling [`Candidates::restart`], yields the
/// same sequence again from the start.
#[derive(Debug, Clone)]
pub struct Candidates {
    template: String,
    range: RangeInclusive<u64>,
    remaining: RangeInclusive<u64>,
}

impl Candidates {
    /// The template candidates are generated from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The full range of integers substituted into the template.
    pub fn range(&self) -> &RangeInclusive<u64> {
        &self.range
    }

    /// Rewinds to the first candidate.
    pub fn restart(&mut self) {
        self.remaining = self.range.clone();
    }
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.next().map(|i| self.template.replace(PLACEHOLDER, &i.to_string()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }
}

/// Creates the candidates `template` yields over `range`, both ends included. Every `{i}` in
/// the template is replaced. A range whose start is after its end is valid and yields nothing.
///
/// ```
/// use loupe_selector::generate_candidates;
///
/// let candidates = generate_candidates("f{i}()", 1..=3).expect("valid template");
/// assert_eq!(candidates.collect::<Vec<_>>(), vec!["f1()", "f2()", "f3()"]);
/// ```
pub fn generate_candidates(
    template: &str,
    range: RangeInclusive<u64>,
) -> Result<Candidates, Error> {
    if template.trim().is_empty() {
        return Err(Error::InvalidTemplate("the template is empty".to_string()));
    }
    if template.chars().any(char::is_whitespace) {
        return Err(Error::InvalidTemplate(format!(
            "'{template}' contains whitespace, which a canonical signature never does"
        )));
    }
    if !template.contains(PLACEHOLDER) {
        return Err(Error::InvalidTemplate(format!(
            "'{template}' has no {PLACEHOLDER} placeholder"
        )));
    }

    Ok(Candidates { template: template.to_string(), range: range.clone(), remaining: range })
}
