//! Run aggregation: walks a vector source, drives the verification
//! engine for both directions of every recognized file and tallies the
//! outcomes into one verdict.

use log::{error, info};

use crate::error::Result;
use crate::model::{Direction, Outcome, RunSummary};
use crate::source::{Entry, VectorSource};
use crate::suites::cavp::engine::{generate_inputs, verify, DEFAULT_MAX_BATCH};
use crate::suites::cavp::loader::{RspDocument, DECRYPT_SECTION, ENCRYPT_SECTION};
use crate::suites::cavp::model::{TestSection, VectorFile};
use crate::tools::BlockTool;

pub struct Runner<'t> {
    tool: &'t dyn BlockTool,
    max_batch: usize,
}

impl<'t> Runner<'t> {
    pub fn new(tool: &'t dyn BlockTool) -> Self {
        Self {
            tool,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Processes every entry of the source. Per-file problems become
    /// outcomes, never early exits: the run always finishes and always
    /// logs the four totals.
    pub fn run(&self, source: &dyn VectorSource) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for entry in source.entries()? {
            self.run_entry(&entry, &mut summary);
        }
        summary.log_totals();
        Ok(summary)
    }

    fn run_entry(&self, entry: &Entry, summary: &mut RunSummary) {
        let file = match VectorFile::classify(entry.name()) {
            Some(file) => file,
            None => {
                summary.record(Outcome::Skipped);
                return;
            }
        };

        // Content is read and parsed only for recognized files.
        let document = match entry.content().and_then(|text| RspDocument::parse(&text)) {
            Ok(document) => document,
            Err(e) => {
                error!("Failed to load '{}': {}", entry.name(), e);
                summary.record(Outcome::Error);
                return;
            }
        };

        summary.record(self.run_direction(&file, &document, Direction::Encrypt));
        summary.record(self.run_direction(&file, &document, Direction::Decrypt));
    }

    /// One direction of one file. Every error is downgraded to an
    /// ERROR outcome here; nothing propagates past the aggregator.
    fn run_direction(
        &self,
        file: &VectorFile,
        document: &RspDocument,
        direction: Direction,
    ) -> Outcome {
        info!("Running {} tests for '{}'...", direction, file.name());

        let section_name = match direction {
            Direction::Encrypt => ENCRYPT_SECTION,
            Direction::Decrypt => DECRYPT_SECTION,
        };
        let section: TestSection = match document.test_section(section_name, file.mode()) {
            Ok(section) => section,
            Err(e) => {
                error!("'{}' [{}]: {}", file.name(), section_name, e);
                return Outcome::Error;
            }
        };

        let (texts, expected) = match direction {
            Direction::Encrypt => (&section.plaintexts, &section.ciphertexts),
            Direction::Decrypt => (&section.ciphertexts, &section.plaintexts),
        };
        let inputs = generate_inputs(&section.keys, texts, section.init_vectors.as_deref());

        verify(
            self.tool,
            direction,
            file.algorithm(),
            file.mode(),
            &inputs,
            expected,
            self.max_batch,
        )
    }
}
