//! # rapid-vocab
//!
//! Learnable vocabulary extraction for language learners.
//!
//! Text goes through a linguistic engine (tokenize, tag, lemmatize, parse,
//! segment). Content words that survive the token filter are aggregated by
//! lowercase lemma and enriched either with the longest example sentence
//! they appeared in or with a dictionary definition.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rapid_vocab::{AnnotatedEngine, ExtractionConfig, Pipeline};
//!
//! let pipeline =
//!     Pipeline::without_dictionary(AnnotatedEngine::new(), ExtractionConfig::default())?;
//! let doc = std::fs::read_to_string("annotated.json")?;
//! for entry in pipeline.extract(&doc)? {
//!     println!("{}: {}", entry.word_or_phrase, entry.context_sentence);
//! }
//! # Ok::<(), rapid_vocab::VocabError>(())
//! ```

pub mod dictionary;
pub mod errors;
pub mod nlp;
pub mod output;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use dictionary::{DictPos, LexicalDictionary, MemoryDictionary, NoDictionary, WordNetDictionary};
pub use errors::{Result, VocabError};
pub use nlp::{AnnotatedEngine, LinguisticEngine, ProcessEngine};
pub use pipeline::{ExtractionSpec, Pipeline, RunStats};
pub use types::{EnrichmentMode, ExtractionConfig, LearnableEntry};

/// Extract and serialize in one call
pub fn extract_json<E, D>(pipeline: &Pipeline<E, D>, text: &str, pretty: bool) -> Result<String>
where
    E: LinguisticEngine,
    D: LexicalDictionary,
{
    output::to_json(&pipeline.extract(text)?, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_end_to_end() {
        let json = r#"{
            "text": "Dogs chase cats.",
            "sents": [{"start": 0, "end": 16}],
            "tokens": [
                {"start": 0, "end": 4, "pos": "NOUN", "tag": "NNS", "dep": "nsubj", "lemma": "dog"},
                {"start": 5, "end": 10, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "lemma": "chase"},
                {"start": 11, "end": 15, "pos": "NOUN", "tag": "NNS", "dep": "dobj", "lemma": "cat"},
                {"start": 15, "end": 16, "pos": "PUNCT", "tag": ".", "dep": "punct", "lemma": "."}
            ]
        }"#;
        let pipeline =
            Pipeline::without_dictionary(AnnotatedEngine::new(), ExtractionConfig::default())
                .unwrap();
        let out = extract_json(&pipeline, json, false).unwrap();
        let entries = output::from_json(&out).unwrap();
        let words: Vec<_> = entries.iter().map(|e| e.word_or_phrase.as_str()).collect();
        assert_eq!(words, vec!["dog", "chase", "cat"]);
        assert!(entries.iter().all(|e| e.context_sentence == "Dogs chase cats."));
    }

    /// Tagger output without `is_stop`, as `Doc.to_json()` produces it
    const DOGS_RUN_FAST: &str = r#"{
        "text": "dogs run fast",
        "sents": [{"start": 0, "end": 13}],
        "tokens": [
            {"start": 0, "end": 4, "pos": "NOUN", "tag": "NNS", "dep": "nsubj", "lemma": "dog"},
            {"start": 5, "end": 8, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "lemma": "run"},
            {"start": 9, "end": 13, "pos": "ADV", "tag": "RB", "dep": "advmod", "lemma": "fast"}
        ]
    }"#;

    #[test]
    fn test_definitions_with_builtin_stopwords() {
        let dict = MemoryDictionary::new()
            .with_sense("dog", DictPos::Noun, "a domesticated canid")
            .with_sense("run", DictPos::Verb, "move fast by using one's feet");
        let pipeline =
            Pipeline::new(AnnotatedEngine::new(), dict, ExtractionConfig::definitions()).unwrap();

        let entries = pipeline.extract(DOGS_RUN_FAST).unwrap();
        let words: Vec<_> = entries.iter().map(|e| e.word_or_phrase.as_str()).collect();
        assert_eq!(words, vec!["dog", "run"]);
        assert_eq!(entries[1].context_sentence, "📖 move fast by using one's feet");
    }

    #[test]
    fn test_extract_json_blank_is_empty_array() {
        let pipeline =
            Pipeline::without_dictionary(AnnotatedEngine::new(), ExtractionConfig::default())
                .unwrap();
        assert_eq!(extract_json(&pipeline, "   ", true).unwrap(), "[]");
    }
}
