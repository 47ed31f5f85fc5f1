//! The per-run synthesis loop.
//!
//! Lines are processed strictly in order, one request at a time. For each
//! line the driver normalizes the text, applies the pronunciation dictionary,
//! picks a key from the ledger, calls the engine, stores the clip in the
//! archive and charges the line's word count to the key.
//!
//! The first failure of any kind stops the run. Lines after it are never
//! sent, nothing is retried, and usage already charged for earlier lines
//! stays charged. The archive still holds every clip produced before the stop.

use crate::archive::AudioArchive;
use crate::dictionary::PronunciationDict;
use crate::error::RunError;
use crate::ledger::CredentialLedger;
use crate::text::{apply_pronunciations, normalize_line, word_count};
use crate::{SynthesisEngine, SynthesisResult};

/// Default extension of the clips inside the archive.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "mp3";

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum LineEvent<'a> {
    /// Line `index` has been cleaned up and is about to be sent.
    Started { index: usize, text: &'a str },
    /// Line `index` was synthesized and added to the archive.
    Synthesized { result: &'a SynthesisResult },
    /// Line `index` failed; the run stops after this event.
    Failed { index: usize, error: &'a RunError },
}

/// Outcome of a run that got past the empty-input check.
#[derive(Debug)]
pub struct RunReport {
    /// Finished zip holding one clip per successful line.
    pub archive: Vec<u8>,
    /// Successful lines, in order.
    pub results: Vec<SynthesisResult>,
    /// Number of non-blank lines the run was given.
    pub total_lines: usize,
    /// Why the run ended early, if it did.
    pub stopped: Option<RunError>,
}

impl RunReport {
    /// True when every line was synthesized.
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none() && self.results.len() == self.total_lines
    }

    /// Words charged to the ledger during this run.
    pub fn words_charged(&self) -> usize {
        self.results.iter().map(|r| r.word_count).sum()
    }
}

/// Runs lines through an engine, rotating keys from a ledger.
pub struct SynthesisDriver<E: SynthesisEngine, L: CredentialLedger> {
    engine: E,
    ledger: L,
    dictionary: PronunciationDict,
    params: Option<E::SynthesisParams>,
    archive_extension: String,
}

impl<E: SynthesisEngine, L: CredentialLedger> SynthesisDriver<E, L> {
    pub fn new(engine: E, ledger: L, dictionary: PronunciationDict) -> Self {
        Self {
            engine,
            ledger,
            dictionary,
            params: None,
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
        }
    }

    /// Engine parameters used for every request of every run.
    pub fn with_params(mut self, params: E::SynthesisParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_archive_extension(mut self, extension: impl Into<String>) -> Self {
        self.archive_extension = extension.into();
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_parts(self) -> (E, L) {
        (self.engine, self.ledger)
    }

    /// Synthesize `lines` in order, reporting each step to `on_event`.
    ///
    /// Blank lines are ignored. Returns [`RunError::EmptyInput`] without
    /// touching the ledger or the engine when nothing is left; every other
    /// failure ends up in [`RunReport::stopped`].
    pub fn run<S, F>(&mut self, lines: &[S], mut on_event: F) -> Result<RunReport, RunError>
    where
        S: AsRef<str>,
        F: FnMut(&LineEvent<'_>),
    {
        let lines: Vec<&str> = lines
            .iter()
            .map(AsRef::as_ref)
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return Err(RunError::EmptyInput);
        }

        log::info!("Synthesizing {} lines", lines.len());

        let mut archive = AudioArchive::new(self.archive_extension.as_str());
        let mut results = Vec::with_capacity(lines.len());
        let mut stopped = None;

        for (offset, line) in lines.iter().enumerate() {
            let index = offset + 1;
            let outcome = self
                .synthesize_line(index, line, &mut archive, &mut on_event)
                .and_then(|(result, key_index)| {
                    on_event(&LineEvent::Synthesized { result: &result });
                    self.ledger
                        .record_usage(key_index, result.word_count as u64)?;
                    Ok(result)
                });

            match outcome {
                Ok(result) => results.push(result),
                Err(error) => {
                    log::warn!("Stopping at line {index}: {error}");
                    on_event(&LineEvent::Failed {
                        index,
                        error: &error,
                    });
                    stopped = Some(error);
                    break;
                }
            }
        }

        log::info!(
            "Run finished: {}/{} lines synthesized",
            results.len(),
            lines.len()
        );

        Ok(RunReport {
            archive: archive.finish()?,
            results,
            total_lines: lines.len(),
            stopped,
        })
    }

    /// Returns the result and the ledger index of the key that paid for it.
    fn synthesize_line<F>(
        &mut self,
        index: usize,
        line: &str,
        archive: &mut AudioArchive,
        on_event: &mut F,
    ) -> Result<(SynthesisResult, usize), RunError>
    where
        F: FnMut(&LineEvent<'_>),
    {
        let text = apply_pronunciations(&normalize_line(line), &self.dictionary);
        let words = word_count(&text);
        on_event(&LineEvent::Started {
            index,
            text: &text,
        });

        let credential = self.ledger.select_available()?;
        let audio = self
            .engine
            .synthesize(&text, &credential.key, self.params.clone())?;
        archive.add(index, &audio)?;

        let result = SynthesisResult {
            index,
            audio,
            source_line: line.to_string(),
            text,
            word_count: words,
        };
        Ok((result, credential.index))
    }
}
