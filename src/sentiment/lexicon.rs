//! AFINN-style lexicon scorer

use super::SentimentScorer;
use std::collections::HashMap;

/// Integer valences (-5..=5) in the AFINN tradition, plus market slang
const DEFAULT_WORDS: &[(&str, i8)] = &[
    // positive
    ("amazing", 4),
    ("awesome", 4),
    ("win", 4),
    ("winning", 4),
    ("wins", 4),
    ("outstanding", 5),
    ("superb", 5),
    ("breathtaking", 5),
    ("love", 3),
    ("loving", 2),
    ("loves", 3),
    ("good", 3),
    ("great", 3),
    ("excellent", 3),
    ("happy", 3),
    ("best", 3),
    ("fantastic", 4),
    ("excited", 3),
    ("exciting", 3),
    ("brilliant", 4),
    ("strong", 2),
    ("like", 2),
    ("nice", 3),
    ("cool", 1),
    ("profit", 2),
    ("profits", 2),
    ("gain", 2),
    ("gains", 2),
    ("growth", 2),
    ("growing", 1),
    ("rich", 2),
    ("success", 2),
    ("successful", 3),
    ("opportunity", 2),
    ("optimistic", 2),
    ("positive", 2),
    ("rally", 2),
    ("rise", 1),
    ("rising", 1),
    ("up", 1),
    ("buy", 1),
    ("moon", 3),
    ("mooning", 3),
    ("bullish", 3),
    ("pump", 2),
    ("pumping", 2),
    ("hodl", 1),
    ("breakout", 2),
    ("lambo", 2),
    // negative
    ("bad", -3),
    ("hate", -3),
    ("hated", -3),
    ("terrible", -3),
    ("awful", -3),
    ("worst", -3),
    ("horrible", -3),
    ("sad", -2),
    ("angry", -3),
    ("afraid", -2),
    ("fear", -2),
    ("panic", -3),
    ("worried", -3),
    ("worry", -3),
    ("weak", -2),
    ("loss", -3),
    ("losses", -3),
    ("lose", -3),
    ("losing", -3),
    ("lost", -3),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("crash", -2),
    ("crashed", -2),
    ("crashing", -2),
    ("collapse", -2),
    ("down", -1),
    ("drop", -1),
    ("sell", -1),
    ("fraud", -4),
    ("scam", -4),
    ("scammers", -4),
    ("hack", -1),
    ("hacked", -3),
    ("stolen", -2),
    ("ban", -2),
    ("banned", -2),
    ("dead", -3),
    ("fuck", -4),
    ("shit", -4),
    ("bearish", -3),
    ("dump", -2),
    ("dumping", -2),
    ("rekt", -3),
    ("rug", -3),
    ("rugged", -3),
    ("fud", -2),
    ("bagholder", -2),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "dont", "don't", "doesnt", "doesn't", "isnt", "isn't",
    "wasnt", "wasn't", "arent", "aren't", "cant", "can't", "cannot", "wont",
    "won't", "aint", "ain't",
];

/// Per-text breakdown of how a score was reached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentAnalysis {
    /// Sum of matched valences
    pub score: f64,
    /// Score divided by token count
    pub comparative: f64,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub tokens: usize,
}

/// Word-valence scorer with single-token negation
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    negators: Vec<String>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        let words = DEFAULT_WORDS
            .iter()
            .map(|(w, v)| (w.to_string(), f64::from(*v)))
            .collect();

        Self {
            words,
            negators: NEGATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add or override words on top of the default lexicon
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, valence) in words {
            self.words.insert(word.into().to_lowercase(), valence);
        }
        self
    }

    pub fn analyze(&self, text: &str) -> SentimentAnalysis {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut analysis = SentimentAnalysis {
            tokens: tokens.len(),
            ..Default::default()
        };

        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.words.get(*token) else {
                continue;
            };

            let negated = i > 0 && self.is_negator(tokens[i - 1]);
            let valence = if negated { -valence } else { valence };

            if valence > 0.0 {
                analysis.positive.push(token.to_string());
            } else if valence < 0.0 {
                analysis.negative.push(token.to_string());
            }
            analysis.score += valence;
        }

        if analysis.tokens > 0 {
            analysis.comparative = analysis.score / analysis.tokens as f64;
        }
        analysis
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.iter().any(|n| n == token)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        self.analyze(text).score
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
