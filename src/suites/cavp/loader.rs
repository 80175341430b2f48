//! Parser for the CAVP `.rsp` structured-text format.
//!
//! The format looks like an INI file, but a field such as `KEY` or
//! `PLAINTEXT` repeats once per test case within a section. Ordinary
//! config parsing that overwrites duplicate keys would silently drop
//! all but the last case, so the document keeps an ordered list of
//! values per field.

use std::collections::HashMap;

use crate::error::{HarnessError, Result};
use crate::model::Mode;
use crate::suites::cavp::model::TestSection;

pub const ENCRYPT_SECTION: &str = "ENCRYPT";
pub const DECRYPT_SECTION: &str = "DECRYPT";

/// Field name (lowercased) to its values in file order.
type Fields = HashMap<String, Vec<String>>;

/// A parsed `.rsp` document: named sections of multi-valued fields.
#[derive(Debug, Default)]
pub struct RspDocument {
    sections: HashMap<String, Fields>,
}

impl RspDocument {
    /// Parses the raw text. Field names are matched case-insensitively
    /// (the archives write `KEY = ...`, the queries use `key`); section
    /// names are kept as written. Lines starting with `#` or `;` are
    /// comments. Repeated sections merge.
    pub fn parse(text: &str) -> Result<RspDocument> {
        let mut doc = RspDocument::default();
        let mut current: Option<String> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| HarnessError::MalformedLine {
                        line: index + 1,
                        text: line.to_string(),
                    })?
                    .trim();
                doc.sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let (name, value) = line.split_once('=').ok_or_else(|| HarnessError::MalformedLine {
                line: index + 1,
                text: line.to_string(),
            })?;
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                return Err(HarnessError::MalformedLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            }
            let section = current
                .as_ref()
                .ok_or(HarnessError::FieldOutsideSection { line: index + 1 })?;
            doc.sections
                .entry(section.clone())
                .or_default()
                .entry(name)
                .or_default()
                .push(value.trim().to_string());
        }

        Ok(doc)
    }

    /// Extracts the parallel test-case lists of one section. The IV
    /// list is fetched only when the mode calls for one; a mode without
    /// IVs yields `None`, not an empty list. All values are validated
    /// as hex and normalized to lowercase. All present lists must have
    /// the same length.
    pub fn test_section(&self, section: &str, mode: Mode) -> Result<TestSection> {
        let fields = self
            .sections
            .get(section)
            .ok_or_else(|| HarnessError::MissingSection(section.to_string()))?;

        let keys = Self::hex_field(fields, section, "key")?;
        let plaintexts = Self::hex_field(fields, section, "plaintext")?;
        let ciphertexts = Self::hex_field(fields, section, "ciphertext")?;
        let init_vectors = if mode.requires_init_vector() {
            Some(Self::hex_field(fields, section, "iv")?)
        } else {
            None
        };

        for (field, values) in [
            ("plaintext", &plaintexts),
            ("ciphertext", &ciphertexts),
        ]
        .into_iter()
        .chain(init_vectors.iter().map(|ivs| ("iv", ivs)))
        {
            if values.len() != keys.len() {
                return Err(HarnessError::LengthMismatch {
                    section: section.to_string(),
                    field,
                    expected: keys.len(),
                    actual: values.len(),
                });
            }
        }

        Ok(TestSection {
            keys,
            plaintexts,
            ciphertexts,
            init_vectors,
        })
    }

    fn hex_field(fields: &Fields, section: &str, field: &'static str) -> Result<Vec<String>> {
        let values = fields.get(field).ok_or_else(|| HarnessError::MissingField {
            section: section.to_string(),
            field,
        })?;
        values
            .iter()
            .map(|value| {
                let bytes = hex::decode(value).map_err(|source| HarnessError::BadHex {
                    section: section.to_string(),
                    field,
                    source,
                })?;
                Ok(hex::encode(bytes))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# CAVS 11.1
# Config info for aes_values

[ENCRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172a
CIPHERTEXT = 3AD77BB40D7A3660A89ECAF32466EF97

COUNT = 1
KEY = 2b7e151628aed2a6abf7158809cf4f3c
PLAINTEXT = ae2d8a571e03ac9c9eb76fac45af8e51
CIPHERTEXT = f5d3d58503b9699de785895a96fdbaaf

[DECRYPT]
COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172a
CIPHERTEXT = 3ad77bb40d7a3660a89ecaf32466ef97
";

    #[test]
    fn duplicate_fields_accumulate_in_order() {
        let doc = RspDocument::parse(SAMPLE).unwrap();
        let section = doc.test_section(ENCRYPT_SECTION, Mode::Ecb).unwrap();
        assert_eq!(section.cases(), 2);
        assert_eq!(
            section.plaintexts,
            [
                "6bc1bee22e409f96e93d7e117393172a",
                "ae2d8a571e03ac9c9eb76fac45af8e51"
            ]
        );
        assert!(section.init_vectors.is_none());
    }

    #[test]
    fn hex_is_normalized_to_lowercase() {
        let doc = RspDocument::parse(SAMPLE).unwrap();
        let section = doc.test_section(ENCRYPT_SECTION, Mode::Ecb).unwrap();
        assert_eq!(section.ciphertexts[0], "3ad77bb40d7a3660a89ecaf32466ef97");
    }

    #[test]
    fn missing_iv_for_chaining_mode_is_an_error() {
        let doc = RspDocument::parse(SAMPLE).unwrap();
        let err = doc.test_section(ENCRYPT_SECTION, Mode::Cbc).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::MissingField { field: "iv", .. }
        ));
    }

    #[test]
    fn missing_section_is_an_error() {
        let doc = RspDocument::parse("[ENCRYPT]\nkey = 00\nplaintext = 00\nciphertext = 00\n")
            .unwrap();
        assert!(matches!(
            doc.test_section(DECRYPT_SECTION, Mode::Ecb),
            Err(HarnessError::MissingSection(_))
        ));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(matches!(
            RspDocument::parse("[ENCRYPT]\nthis is not a field\n"),
            Err(HarnessError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            RspDocument::parse("key = 00\n"),
            Err(HarnessError::FieldOutsideSection { line: 1 })
        ));
        assert!(matches!(
            RspDocument::parse("[ENCRYPT\n"),
            Err(HarnessError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn non_hex_values_are_rejected() {
        let doc =
            RspDocument::parse("[ENCRYPT]\nkey = xyz\nplaintext = 00\nciphertext = 00\n").unwrap();
        assert!(matches!(
            doc.test_section(ENCRYPT_SECTION, Mode::Ecb),
            Err(HarnessError::BadHex { field: "key", .. })
        ));
    }

    #[test]
    fn uneven_lists_are_rejected() {
        let text = "\
[ENCRYPT]
KEY = 00
KEY = 11
PLAINTEXT = 22
PLAINTEXT = 33
CIPHERTEXT = 44
";
        let doc = RspDocument::parse(text).unwrap();
        assert!(matches!(
            doc.test_section(ENCRYPT_SECTION, Mode::Ecb),
            Err(HarnessError::LengthMismatch {
                field: "ciphertext",
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }
}
