//! Vocabulary extraction from standard input
//!
//! Reads the whole of stdin, runs the extraction pipeline and prints a JSON
//! array of entries on stdout. Diagnostics go to stderr.
//!
//! Exit codes: 0 success, 1 other failure, 2 engine unavailable,
//! 3 dictionary unavailable, 4 invalid configuration.
//!
//! A successful run leaves stderr empty: the default log filter only lets
//! warnings through and nothing on the success path logs above info.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rapid_vocab::errors::{Result, VocabError};
use rapid_vocab::output::{self, EMPTY_ARRAY};
use rapid_vocab::pipeline::{ExtractionSpec, Preset, StageTimingObserver};
use rapid_vocab::types::{Document, ExtractionConfig};
use rapid_vocab::{
    AnnotatedEngine, LexicalDictionary, LinguisticEngine, MemoryDictionary, NoDictionary, Pipeline,
    ProcessEngine, WordNetDictionary,
};

/// What to do when the engine or dictionary cannot be loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FailurePolicy {
    /// Report on stderr and exit non-zero
    Fatal,
    /// Print an empty array and exit 0
    Empty,
}

#[derive(Parser, Debug)]
#[command(
    name = "rapid-vocab",
    version,
    about = "Extracts learnable vocabulary from text on stdin"
)]
struct Args {
    /// Starting policy: context or definitions.
    #[arg(long, value_parser = parse_preset, conflicts_with = "config")]
    preset: Option<Preset>,

    /// JSON config file (preset plus overrides).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stdin is an already annotated document instead of raw text.
    #[arg(long, conflicts_with = "engine")]
    annotated: bool,

    /// Tagger command that turns stdin text into an annotated document.
    /// Takes every remaining argument, so pass it last.
    #[arg(
        long,
        value_name = "CMD",
        num_args = 1..,
        allow_hyphen_values = true
    )]
    engine: Vec<String>,

    /// WordNet database directory (the one holding index.noun).
    #[arg(long, value_name = "DIR", conflicts_with = "dictionary")]
    wordnet: Option<PathBuf>,

    /// JSON dictionary file: {"lemma": {"noun": ["sense", ...]}}.
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Engine or dictionary failure handling.
    #[arg(long, value_enum, default_value = "fatal")]
    on_engine_failure: FailurePolicy,

    /// Single-line output instead of two-space indentation.
    #[arg(long)]
    compact: bool,
}

fn parse_preset(name: &str) -> std::result::Result<Preset, String> {
    Preset::parse(name).ok_or_else(|| format!("unknown preset {name:?} (context, definitions)"))
}

enum CliEngine {
    Annotated(AnnotatedEngine),
    Process(ProcessEngine),
}

impl LinguisticEngine for CliEngine {
    fn analyze(&self, text: &str) -> Result<Document> {
        match self {
            CliEngine::Annotated(engine) => engine.analyze(text),
            CliEngine::Process(engine) => engine.analyze(text),
        }
    }
}

fn load_config(args: &Args) -> Result<ExtractionConfig> {
    if let Some(path) = &args.config {
        return ExtractionSpec::from_path(path)?.resolve();
    }
    Ok(args.preset.unwrap_or(Preset::Context).config())
}

fn load_engine(args: &Args) -> Result<CliEngine> {
    if args.annotated {
        return Ok(CliEngine::Annotated(AnnotatedEngine::new()));
    }
    if args.engine.is_empty() {
        return Err(VocabError::EngineUnavailable(
            "no linguistic engine: pass --annotated or --engine <CMD>".into(),
        ));
    }
    let engine = ProcessEngine::from_command(&args.engine)?;
    engine.probe()?;
    tracing::info!(program = engine.program(), "linguistic engine ready");
    Ok(CliEngine::Process(engine))
}

fn load_dictionary(args: &Args) -> Result<Box<dyn LexicalDictionary + Sync>> {
    if let Some(dir) = &args.wordnet {
        return Ok(Box::new(WordNetDictionary::open(dir)?));
    }
    if let Some(path) = &args.dictionary {
        let dict = MemoryDictionary::from_path(path)?;
        tracing::info!(path = %path.display(), entries = dict.len(), "loaded dictionary");
        return Ok(Box::new(dict));
    }
    Ok(Box::new(NoDictionary))
}

/// Used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn";

fn run(args: &Args, input: &[u8]) -> Result<String> {
    let config = load_config(args)?;
    let engine = load_engine(args)?;
    let dictionary = load_dictionary(args)?;
    let pipeline = Pipeline::new(engine, dictionary, config)?;

    // invalid UTF-8 is noise to be filtered, not a reason to fail
    let text = String::from_utf8_lossy(input);

    let mut observer = StageTimingObserver::new();
    let extraction = pipeline.extract_with_observer(&text, &mut observer)?;
    tracing::info!(
        entries = extraction.stats.entries,
        sentences = extraction.stats.sentences,
        elapsed_ms = observer.total().as_millis() as u64,
        "extraction complete"
    );

    output::to_json(&extraction.entries, !args.compact)
}

/// What the process prints and returns
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    stdout: Option<String>,
    stderr: Option<String>,
    code: u8,
}

/// Apply the failure policy to a run result
fn finish(result: Result<String>, policy: FailurePolicy) -> Outcome {
    match result {
        Ok(json) => Outcome {
            stdout: Some(json),
            stderr: None,
            code: 0,
        },
        Err(err) if err.is_unavailable() && policy == FailurePolicy::Empty => {
            tracing::info!(error = %err, "degrading to empty output");
            Outcome {
                stdout: Some(EMPTY_ARRAY.to_string()),
                stderr: None,
                code: 0,
            }
        }
        Err(err) => Outcome {
            stdout: None,
            stderr: Some(format!("rapid-vocab: {err}")),
            code: err.exit_code() as u8,
        },
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    let mut input = Vec::new();
    let result = match std::io::stdin().read_to_end(&mut input) {
        Ok(_) => run(&args, &input),
        Err(e) => Err(e.into()),
    };

    let outcome = finish(result, args.on_engine_failure);
    if let Some(stdout) = &outcome.stdout {
        println!("{stdout}");
    }
    if let Some(stderr) = &outcome.stderr {
        eprintln!("{stderr}");
    }
    ExitCode::from(outcome.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapid_vocab::types::EnrichmentMode;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["rapid-vocab", "--annotated"]).unwrap();
        assert_eq!(args.on_engine_failure, FailurePolicy::Fatal);
        assert!(!args.compact);
        assert_eq!(load_config(&args).unwrap(), ExtractionConfig::context_sentences());
    }

    #[test]
    fn test_engine_takes_remaining_args() {
        let args = Args::try_parse_from([
            "rapid-vocab",
            "--preset",
            "definitions",
            "--engine",
            "python3",
            "tag.py",
            "--model",
            "en_core_web_sm",
        ])
        .unwrap();
        assert_eq!(args.engine, ["python3", "tag.py", "--model", "en_core_web_sm"]);
        assert_eq!(load_config(&args).unwrap().enrichment, EnrichmentMode::Definition);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(Args::try_parse_from(["rapid-vocab", "--preset", "haiku"]).is_err());
    }

    #[test]
    fn test_missing_engine_is_unavailable() {
        let args = Args::try_parse_from(["rapid-vocab"]).unwrap();
        let err = load_engine(&args).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_definitions_without_dictionary_fails() {
        let args =
            Args::try_parse_from(["rapid-vocab", "--annotated", "--preset", "definitions"]).unwrap();
        let err = Pipeline::new(
            load_engine(&args).unwrap(),
            load_dictionary(&args).unwrap(),
            load_config(&args).unwrap(),
        )
        .err()
        .unwrap();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, r#"{ "v": 2, "preset": "nope" }"#).unwrap();
        let args =
            Args::try_parse_from(["rapid-vocab", "--annotated", "--config", path.to_str().unwrap()])
                .unwrap();
        assert_eq!(load_config(&args).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn test_finish_success() {
        let outcome = finish(Ok("[]".to_string()), FailurePolicy::Fatal);
        assert_eq!(outcome.stdout.as_deref(), Some("[]"));
        assert_eq!(outcome.stderr, None);
        assert_eq!(outcome.code, 0);
    }

    #[test]
    fn test_finish_fatal_policy() {
        let cases = [
            (VocabError::EngineUnavailable("no model".into()), 2),
            (VocabError::DictionaryUnavailable("no wordnet".into()), 3),
            (VocabError::MalformedDocument("bad offsets".into()), 1),
        ];
        for (err, code) in cases {
            let outcome = finish(Err(err), FailurePolicy::Fatal);
            assert_eq!(outcome.stdout, None);
            assert_eq!(outcome.code, code);
            assert!(outcome.stderr.unwrap().starts_with("rapid-vocab: "));
        }
    }

    #[test]
    fn test_finish_empty_policy() {
        for err in [
            VocabError::EngineUnavailable("no model".into()),
            VocabError::DictionaryUnavailable("no wordnet".into()),
        ] {
            let outcome = finish(Err(err), FailurePolicy::Empty);
            assert_eq!(
                outcome,
                Outcome {
                    stdout: Some(EMPTY_ARRAY.to_string()),
                    stderr: None,
                    code: 0,
                }
            );
        }

        // only startup resources degrade; other failures stay fatal
        let outcome = finish(
            Err(VocabError::MalformedDocument("bad offsets".into())),
            FailurePolicy::Empty,
        );
        assert_eq!(outcome.stdout, None);
        assert_eq!(outcome.code, 1);
    }

    #[test]
    fn test_empty_policy_on_missing_engine() {
        let args =
            Args::try_parse_from(["rapid-vocab", "--on-engine-failure", "empty"]).unwrap();
        let outcome = finish(run(&args, b"Dogs run."), args.on_engine_failure);
        assert_eq!(outcome.stdout.as_deref(), Some("[]"));
        assert_eq!(outcome.code, 0);

        let args = Args::try_parse_from(["rapid-vocab"]).unwrap();
        let outcome = finish(run(&args, b"Dogs run."), args.on_engine_failure);
        assert_eq!(outcome.stdout, None);
        assert_eq!(outcome.code, 2);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// Run the CLI path under a subscriber with `filter`, returning its log output
    fn logged_run(args: &Args, input: &[u8], filter: &str) -> (Result<String>, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || run(args, input));
        (result, captured.text())
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_stderr_chatter_stays_off_default_log() {
        let script = r#"echo "UserWarning: [W095] model version mismatch" >&2; cat >/dev/null; echo '{"text": "Dogs run.", "tokens": [{"start": 0, "end": 4, "pos": "NOUN", "tag": "NNS", "dep": "nsubj", "lemma": "dog"}, {"start": 5, "end": 8, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "lemma": "run"}]}'"#;
        let args = Args::try_parse_from(["rapid-vocab", "--engine", "sh", "-c", script]).unwrap();

        let (result, log) = logged_run(&args, b"Dogs run.", DEFAULT_LOG_FILTER);
        let json = result.unwrap();
        assert!(json.contains("\"dog\""));
        assert!(json.contains("\"run\""));
        assert_eq!(log, "");

        let (_, log) = logged_run(&args, b"Dogs run.", "debug");
        assert!(log.contains("engine wrote to stderr"));
        assert!(log.contains("W095"));
    }

    #[test]
    fn test_config_warnings_stay_off_default_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, r#"{ "v": 1, "bogus": true }"#).unwrap();
        let args =
            Args::try_parse_from(["rapid-vocab", "--annotated", "--config", path.to_str().unwrap()])
                .unwrap();

        let (result, log) = logged_run(&args, b"   ", DEFAULT_LOG_FILTER);
        assert_eq!(result.unwrap(), "[]");
        assert_eq!(log, "");
    }
}
