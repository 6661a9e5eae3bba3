use std::collections::HashMap;

/// Tuning knobs for keyphrase extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionParams {
    pub top_n: usize,
    /// Inclusive (min, max) number of words per phrase
    pub ngram_range: (usize, usize),
    /// 0.0 ranks purely by relevance, 1.0 favours dissimilar phrases
    pub diversity: f64,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            top_n: 20,
            ngram_range: (1, 2),
            diversity: 0.7,
        }
    }
}

/// Keyphrase extraction collaborator
pub trait KeywordExtractor: Send + Sync {
    /// Return up to `params.top_n` phrases with scores in [0, 1], best first
    fn extract_keywords(&self, text: &str, params: &ExtractionParams) -> Vec<(String, f64)>;
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else", "etc", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "however", "if", "in", "into", "is", "it", "its", "itself", "just", "less", "like", "me", "more",
    "most", "much", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "per", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "via", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
];

/// Deterministic keyphrase extractor
///
/// Stop words are removed, candidate n-grams are built from the remaining
/// tokens and scored by normalized term frequency. Selection uses maximal
/// marginal relevance with token-overlap similarity so that `diversity`
/// pushes out near-duplicate phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalExtractor;

struct Candidate {
    phrase: String,
    tokens: Vec<String>,
    relevance: f64,
}

impl StatisticalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Lowercased words of two or more characters, stop words removed
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| w.chars().count() >= 2)
            .map(str::to_lowercase)
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
            .collect()
    }

    fn candidates(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<Candidate> {
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *tf.entry(token.as_str()).or_insert(0) += 1;
        }
        let max_tf = tf.values().copied().max().unwrap_or(1) as f64;

        let mut seen = std::collections::HashSet::new();
        let mut candidates = Vec::new();

        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let phrase = window.join(" ");
                if !seen.insert(phrase.clone()) {
                    continue;
                }
                let mean_tf = window.iter().map(|t| tf[t.as_str()] as f64 / max_tf).sum::<f64>() / n as f64;
                let length_factor = if max_n > min_n {
                    0.75 + 0.25 * (n - min_n) as f64 / (max_n - min_n) as f64
                } else {
                    1.0
                };
                candidates.push(Candidate {
                    phrase,
                    tokens: window.to_vec(),
                    relevance: (mean_tf * length_factor).clamp(0.0, 1.0),
                });
            }
        }

        candidates
    }
}

fn jaccard(a: &[String], b: &[String]) -> f64 {
    let shared = a.iter().filter(|t| b.contains(t)).count() as f64;
    let union = (a.len() + b.len()) as f64 - shared;
    if union == 0.0 {
        0.0
    } else {
        shared / union
    }
}

impl KeywordExtractor for StatisticalExtractor {
    fn extract_keywords(&self, text: &str, params: &ExtractionParams) -> Vec<(String, f64)> {
        let min_n = params.ngram_range.0.max(1);
        let max_n = params.ngram_range.1.max(min_n);
        let diversity = params.diversity.clamp(0.0, 1.0);

        let tokens = Self::tokenize(text);
        let mut remaining = Self::candidates(&tokens, (min_n, max_n));
        let mut selected: Vec<Candidate> = Vec::new();

        while selected.len() < params.top_n && !remaining.is_empty() {
            let mut best_idx = 0;
            let mut best_score = f64::NEG_INFINITY;

            for (idx, candidate) in remaining.iter().enumerate() {
                let redundancy = selected
                    .iter()
                    .map(|s| jaccard(&candidate.tokens, &s.tokens))
                    .fold(0.0, f64::max);
                let score = (1.0 - diversity) * candidate.relevance - diversity * redundancy;
                // Strict comparison keeps the earliest candidate on ties
                if score > best_score {
                    best_score = score;
                    best_idx = idx;
                }
            }

            selected.push(remaining.remove(best_idx));
        }

        selected.into_iter().map(|c| (c.phrase, c.relevance)).collect()
    }
}
