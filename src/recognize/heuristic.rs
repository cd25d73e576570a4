//! Heuristic recognition - capitalization and context patterns, no model files.
//!
//! Fills the role an external NLP model plays in a full deployment, well
//! enough to explore a corpus before committing to a model download:
//!
//! 1. **Format patterns** - dates and quoted work titles are recognizable
//!    from their shape alone
//! 2. **Capitalization runs** - sequences of title-case words are candidate
//!    named entities
//! 3. **Context windows** - the word before/after a candidate classifies it
//!    (titles before persons, prepositions before places, corporate suffixes
//!    after organizations)
//!
//! # Limitations
//!
//! Lower recall than an ML backend, struggles with lowercase names and
//! ambiguous context. Sentence-initial single words are only kept when some
//! other signal (title, known first name, verb of speech) backs them up.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Detection, EntityLabel, Recognizer, Result};

/// Heuristic entity recognition from capitalization and context.
pub struct HeuristicRecognizer {
    /// Minimum confidence for emitted detections.
    threshold: f64,
}

impl HeuristicRecognizer {
    /// Create a recognizer with the default threshold (0.5).
    #[must_use]
    pub fn new() -> Self {
        Self { threshold: 0.5 }
    }

    /// Create with a custom confidence threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Context Words
// =============================================================================

/// Honorifics and roles that precede a person name.
const PERSON_TITLES: &[&str] = &[
    "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "dr", "dr.", "prof", "prof.", "sir", "dame", "lady",
    "lord", "king", "queen", "prince", "princess", "duke", "duchess", "count", "countess",
    "baron", "captain", "general", "colonel", "sergeant", "father", "brother", "sister",
    "saint", "st", "st.", "president", "senator", "governor", "judge", "professor", "doctor",
    "madame", "monsieur", "mademoiselle", "herr", "frau", "don", "doña",
];

/// Verbs of speech and action that follow a person name.
const PERSON_VERBS: &[&str] = &[
    "said", "says", "wrote", "writes", "replied", "answered", "asked", "told", "thought",
    "exclaimed", "whispered", "shouted", "cried", "murmured", "remarked", "observed",
    "declared", "announced", "argued", "believed", "recalled", "remembered", "founded",
    "composed", "painted", "published", "translated", "edited",
];

/// Suffix words marking an organization.
const ORG_SUFFIXES: &[&str] = &[
    "inc", "inc.", "corp", "corp.", "co", "co.", "ltd", "ltd.", "press", "society",
    "academy", "institute", "university", "college", "school", "library", "museum",
    "theatre", "theater", "church", "abbey", "order", "guild", "company", "review",
    "journal", "gazette", "foundation", "association", "union", "club", "salon",
];

/// Prepositions and verbs that precede a place name.
const LOC_PREPOSITIONS: &[&str] = &[
    "in", "at", "from", "to", "near", "past", "toward", "towards", "through", "across",
    "outside", "via", "beyond", "around", "leaving", "reached", "reaching", "visited",
    "visiting",
];

/// Suffix words marking a facility.
const FAC_SUFFIXES: &[&str] = &[
    "street", "st.", "avenue", "ave.", "boulevard", "bridge", "station", "cathedral",
    "palace", "castle", "tower", "gate", "hall", "square", "garden", "gardens", "hotel",
    "café", "cafe", "prison", "hospital", "cemetery", "quay", "port", "harbour", "harbor",
];

/// Function words allowed inside a multi-word name ("House of Orange").
const NAME_CONNECTORS: &[&str] = &[
    "of", "the", "de", "du", "des", "da", "di", "la", "le", "van", "von", "der", "den",
    "el", "al", "bin", "y",
];

/// Words never emitted as single-word entities.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "in", "on", "at", "to", "for", "of",
    "with", "by", "from", "as", "is", "was", "are", "were", "be", "been", "being",
    "it", "its", "he", "she", "they", "we", "you", "i", "his", "her", "their", "our",
    "this", "that", "these", "those", "there", "here", "then", "when", "where", "while",
    "what", "which", "who", "whom", "whose", "why", "how", "not", "no", "nor", "so",
    "yet", "both", "all", "each", "every", "some", "any", "one", "once", "after",
    "before", "between", "during", "until", "also", "however", "perhaps", "indeed",
];

/// First names frequent enough to trust at sentence starts.
const COMMON_FIRST_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "thomas",
    "charles", "george", "henry", "edward", "arthur", "frederick", "albert", "walter",
    "mary", "anna", "anne", "emma", "elizabeth", "margaret", "catherine", "jane",
    "alice", "clara", "julia", "louise", "marie", "jean", "pierre", "jacques", "paul",
    "louis", "victor", "jules", "émile", "marcel", "andré", "françois",
];

/// Group-noun endings (nationalities, movements) for the NORP label.
const GROUP_ENDINGS: &[&str] = &[
    "ians", "ists", "ites", "ans", "ese", "ish", "ist", "ics",
];

// =============================================================================
// Tokenization
// =============================================================================

/// A word token with byte offsets into the source text.
#[derive(Debug, Clone)]
struct Token<'a> {
    text: &'a str,
    start: usize,
    end: usize,
    /// Whether sentence-ending punctuation immediately precedes this token.
    sentence_start: bool,
}

impl Token<'_> {
    fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Split text into word tokens, stripping surrounding punctuation but keeping
/// internal apostrophes/hyphens ("O'Brien", "Saint-Lazare").
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut sentence_start = true;

    let mut chunk_start = None;
    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if c.is_whitespace() {
            continue;
        }
        if chunk_start.is_none() {
            chunk_start = Some(i);
        }
        let at_chunk_end = iter
            .peek()
            .map_or(true, |(_, next)| next.is_whitespace());
        if !at_chunk_end {
            continue;
        }

        let start = chunk_start.take().unwrap_or(i);
        let end = i + c.len_utf8();
        let raw = &text[start..end];

        // Trim punctuation from both edges, tracking the byte offsets.
        let trimmed_front = raw.trim_start_matches(|c: char| !c.is_alphanumeric());
        let front_cut = raw.len() - trimmed_front.len();
        let core = trimmed_front.trim_end_matches(|c: char| !c.is_alphanumeric());
        // Keep the trailing period of known abbreviations (Mr., Inc., St.).
        let mut token_text = core;
        if trimmed_front.as_bytes().get(core.len()) == Some(&b'.') {
            let abbrev = trimmed_front[..core.len() + 1].to_lowercase();
            if PERSON_TITLES.contains(&abbrev.as_str())
                || ORG_SUFFIXES.contains(&abbrev.as_str())
                || FAC_SUFFIXES.contains(&abbrev.as_str())
            {
                token_text = &trimmed_front[..core.len() + 1];
            }
        }

        let ends_sentence = raw.ends_with(['.', '!', '?', ':', ';'])
            || raw.ends_with(".\"")
            || raw.ends_with(".”")
            || raw.ends_with(".)");

        if token_text.is_empty() {
            // Punctuation-only chunk (a dash, an ellipsis): keep any pending
            // sentence boundary alive for the next word.
            sentence_start = sentence_start || ends_sentence;
        } else {
            tokens.push(Token {
                text: token_text,
                start: start + front_cut,
                end: start + front_cut + token_text.len(),
                sentence_start,
            });
            sentence_start = ends_sentence;
        }
    }

    tokens
}

// =============================================================================
// Format patterns
// =============================================================================

static DATE_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

static DATE_WRITTEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:,\s*\d{4})?\b",
    )
    .unwrap()
});

static DATE_WRITTEN_EU: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)(?:\s+\d{4})?\b",
    )
    .unwrap()
});

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b1[0-9]{3}\b|\b20[0-9]{2}\b").unwrap());

/// Quoted runs of capitalized words: work-of-art titles.
static QUOTED_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["“]([A-Z][^"”]{2,60})["”]"#).unwrap()
});

fn format_detections(text: &str) -> Vec<Detection> {
    let mut found: Vec<Detection> = Vec::new();

    for pattern in [&*DATE_ISO, &*DATE_WRITTEN, &*DATE_WRITTEN_EU, &*YEAR] {
        for m in pattern.find_iter(text) {
            if !overlaps_any(&found, m.start(), m.end()) {
                found.push(Detection::new(
                    m.as_str(),
                    EntityLabel::Date,
                    m.start(),
                    m.end(),
                    0.9,
                ));
            }
        }
    }

    for caps in QUOTED_TITLE.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let title_case = m
            .as_str()
            .split_whitespace()
            .filter(|w| !NAME_CONNECTORS.contains(&w.to_lowercase().as_str()))
            .all(|w| w.chars().next().is_some_and(char::is_uppercase));
        if title_case && !overlaps_any(&found, m.start(), m.end()) {
            found.push(Detection::new(
                m.as_str(),
                EntityLabel::Work,
                m.start(),
                m.end(),
                0.6,
            ));
        }
    }

    found
}

fn overlaps_any(found: &[Detection], start: usize, end: usize) -> bool {
    found
        .iter()
        .any(|d| crate::spans_overlap(d.start, d.end, start, end))
}

// =============================================================================
// Candidate runs and classification
// =============================================================================

/// A maximal run of capitalized tokens (with allowed connectors inside).
struct Candidate {
    first: usize,
    last: usize,
    start: usize,
    end: usize,
}

fn candidate_runs(tokens: &[Token<'_>]) -> Vec<Candidate> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let lower = tokens[i].lower();
        // Titles are context for the following name, never a run of their own.
        if !tokens[i].is_capitalized()
            || STOP_WORDS.contains(&lower.as_str())
            || PERSON_TITLES.contains(&lower.as_str())
        {
            i += 1;
            continue;
        }
        let first = i;
        let mut last = i;
        let mut j = i + 1;
        while j < tokens.len() {
            let tok = &tokens[j];
            if tok.is_capitalized() && !tok.sentence_start {
                last = j;
                j += 1;
            } else if !tok.sentence_start
                && NAME_CONNECTORS.contains(&tok.lower().as_str())
                && tokens.get(j + 1).is_some_and(|t| t.is_capitalized() && !t.sentence_start)
            {
                last = j + 1;
                j += 2;
            } else {
                break;
            }
        }
        runs.push(Candidate {
            first,
            last,
            start: tokens[first].start,
            end: tokens[last].end,
        });
        i = j;
    }
    runs
}

/// Classify a candidate run from its context window.
///
/// Returns label and confidence, or None to discard the candidate.
fn classify(tokens: &[Token<'_>], run: &Candidate) -> Option<(EntityLabel, f64)> {
    let prev = run.first.checked_sub(1).map(|p| tokens[p].lower());
    let next = tokens.get(run.last + 1).map(Token::lower);
    let first = &tokens[run.first];
    let last = &tokens[run.last];
    let first_lower = first.lower();
    let last_lower = last.lower();
    let word_count = run.last - run.first + 1;

    // Honorific before the run: the title is context, not part of the name.
    if let Some(p) = &prev {
        if PERSON_TITLES.contains(&p.as_str()) {
            return Some((EntityLabel::Person, 0.85));
        }
    }

    if ORG_SUFFIXES.contains(&last_lower.as_str())
        || next.as_deref().is_some_and(|n| ORG_SUFFIXES.contains(&n))
    {
        return Some((EntityLabel::Organization, 0.8));
    }

    if FAC_SUFFIXES.contains(&last_lower.as_str()) {
        return Some((EntityLabel::Facility, 0.75));
    }

    if next.as_deref().is_some_and(|n| PERSON_VERBS.contains(&n)) {
        return Some((EntityLabel::Person, 0.8));
    }

    if let Some(p) = &prev {
        if LOC_PREPOSITIONS.contains(&p.as_str()) {
            return Some((EntityLabel::Location, 0.7));
        }
    }

    // "the Parisians", "the Symbolists": plural group noun after an article.
    if word_count == 1
        && prev.as_deref() == Some("the")
        && GROUP_ENDINGS.iter().any(|s| first_lower.ends_with(s))
    {
        return Some((EntityLabel::Group, 0.6));
    }

    if COMMON_FIRST_NAMES.contains(&first_lower.as_str()) {
        return Some((EntityLabel::Person, 0.7));
    }

    // Unwitnessed fallbacks. Sentence-initial capitalization carries no
    // signal, so a single sentence-initial word without any of the cues
    // above is discarded rather than guessed.
    if word_count >= 2 {
        return Some((EntityLabel::Person, 0.55));
    }
    if !first.sentence_start {
        return Some((EntityLabel::Person, 0.5));
    }
    None
}

impl Recognizer for HeuristicRecognizer {
    fn recognize(&self, text: &str, _language: Option<&str>) -> Result<Vec<Detection>> {
        let mut detections = format_detections(text);

        let tokens = tokenize(text);
        for run in candidate_runs(&tokens) {
            if overlaps_any(&detections, run.start, run.end) {
                continue;
            }
            if let Some((label, confidence)) = classify(&tokens, &run) {
                detections.push(Detection::new(
                    &text[run.start..run.end],
                    label,
                    run.start,
                    run.end,
                    confidence,
                ));
            }
        }

        detections.retain(|d| d.confidence >= self.threshold);
        detections.sort_by_key(|d| (d.start, d.end));
        Ok(detections)
    }

    fn supported_labels(&self) -> Vec<EntityLabel> {
        vec![
            EntityLabel::Person,
            EntityLabel::Organization,
            EntityLabel::Location,
            EntityLabel::Facility,
            EntityLabel::Group,
            EntityLabel::Date,
            EntityLabel::Work,
        ]
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn description(&self) -> &'static str {
        "Capitalization + context heuristics (no model files required)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(text: &str) -> Vec<Detection> {
        HeuristicRecognizer::new().recognize(text, None).unwrap()
    }

    #[test]
    fn test_person_with_title() {
        let found = recognize("She wrote to Mr. Verlaine about the manuscript.");
        assert!(found
            .iter()
            .any(|d| d.text == "Verlaine" && d.label == EntityLabel::Person));
    }

    #[test]
    fn test_person_speech_verb() {
        let found = recognize("\"Not yet,\" Rimbaud replied from the doorway.");
        assert!(found
            .iter()
            .any(|d| d.text == "Rimbaud" && d.label == EntityLabel::Person));
    }

    #[test]
    fn test_location_after_preposition() {
        let found = recognize("He spent the winter in Marseille before returning home.");
        assert!(found
            .iter()
            .any(|d| d.text == "Marseille" && d.label == EntityLabel::Location));
    }

    #[test]
    fn test_multiword_run() {
        let found = recognize("They sailed past Notre Dame at dusk.");
        let multi = found
            .iter()
            .find(|d| d.text == "Notre Dame")
            .expect("multi-word candidate");
        assert_eq!(&"They sailed past Notre Dame at dusk."[multi.start..multi.end], "Notre Dame");
    }

    #[test]
    fn test_date_patterns() {
        let found = recognize("The letter is dated 12 July 1871.");
        assert!(found.iter().any(|d| d.label == EntityLabel::Date));
    }

    #[test]
    fn test_quoted_work_title() {
        let found = recognize("He kept quoting \"The Drunken Boat\" at dinner.");
        assert!(found
            .iter()
            .any(|d| d.text == "The Drunken Boat" && d.label == EntityLabel::Work));
    }

    #[test]
    fn test_sentence_initial_stopword_skipped() {
        let found = recognize("The rain fell. However, nobody minded.");
        assert!(found.is_empty(), "found: {found:?}");
    }

    #[test]
    fn test_offsets_are_byte_accurate_non_ascii() {
        let text = "Ils ont quitté Paris hier. — Où? demanda Émile.";
        for d in recognize(text) {
            assert_eq!(&text[d.start..d.end], d.text);
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(recognize("").is_empty());
    }

    #[test]
    fn test_no_overlapping_format_detections() {
        let found = recognize("Between 1871-01-01 and 12 July 1871 nothing happened.");
        for (i, a) in found.iter().enumerate() {
            for b in &found[i + 1..] {
                assert!(
                    !crate::spans_overlap(a.start, a.end, b.start, b.end),
                    "{a:?} overlaps {b:?}"
                );
            }
        }
    }
}
