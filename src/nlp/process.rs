//! External-process linguistic engine
//!
//! Runs a tagger as a child process: the text goes to its stdin, an
//! annotated-document JSON (see [`crate::nlp::doc`]) comes back on stdout.
//! One process is spawned per analysis; model loading cost is the tagger's
//! own business, so [`ProcessEngine::probe`] exists to surface a broken
//! setup at startup instead of on the first request.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use crate::errors::{Result, VocabError};
use crate::nlp::doc::AnnotatedDoc;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::LinguisticEngine;
use crate::types::Document;

const PROBE_TEXT: &str = "The engine parses this sentence.";

#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
    stopwords: StopwordFilter,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stopwords: StopwordFilter::english(),
        }
    }

    /// Build from a command line: first element is the program
    pub fn from_command(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| VocabError::EngineUnavailable("empty engine command".into()))?;
        Ok(Self::new(program.clone()).with_args(args))
    }

    pub fn with_args<S: AsRef<str>>(mut self, args: &[S]) -> Self {
        self.args = args.iter().map(|a| a.as_ref().to_string()).collect();
        self
    }

    /// Stop words used when the tagger omits `is_stop`
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the engine once on a fixed sentence
    pub fn probe(&self) -> Result<()> {
        tracing::debug!(program = %self.program, "probing linguistic engine");
        match self.analyze(PROBE_TEXT) {
            Ok(_) => Ok(()),
            Err(VocabError::EngineUnavailable(msg)) => Err(VocabError::EngineUnavailable(msg)),
            Err(other) => Err(VocabError::EngineUnavailable(format!(
                "{} produced unusable output: {other}",
                self.program
            ))),
        }
    }

    fn run(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                VocabError::EngineUnavailable(format!("failed to start {}: {e}", self.program))
            })?;

        // Feed stdin from another thread so a chatty child cannot deadlock
        // on a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| VocabError::EngineUnavailable("child stdin unavailable".into()))?;
        let input = text.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            // The child may legitimately exit without reading everything;
            // its exit status decides.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(VocabError::EngineUnavailable(
                    "stdin writer thread panicked".into(),
                ))
            }
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(VocabError::EngineUnavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(program = %self.program, stderr = %stderr.trim(), "engine wrote to stderr");
        }

        String::from_utf8(output.stdout).map_err(|e| {
            VocabError::MalformedDocument(format!("engine output is not UTF-8: {e}"))
        })
    }
}

impl LinguisticEngine for ProcessEngine {
    fn analyze(&self, text: &str) -> Result<Document> {
        let stdout = self.run(text)?;
        AnnotatedDoc::from_json(&stdout)?.into_document(&self.stopwords)
    }
}
