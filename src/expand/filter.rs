/// Conjunctive, case-insensitive substring filter over the seed's whitespace tokens.
///
/// Tokens are matched anywhere inside the candidate, not on word boundaries:
/// the seed `"art"` accepts `"smart phone"`.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    tokens: Vec<String>,
}

impl RelevanceFilter {
    pub fn new(seed: &str) -> Self {
        Self {
            tokens: seed
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        self.tokens.iter().all(|t| candidate.contains(t.as_str()))
    }

    /// Keeps matching candidates and returns them sorted, without duplicates.
    pub fn apply<I>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut kept: Vec<String> = candidates
            .into_iter()
            .filter(|c| self.matches(c))
            .collect();
        kept.sort_unstable();
        kept.dedup();
        kept
    }
}
