//! Classification of CAVP vector files and the parsed section model.

use log::{info, warn};

use crate::model::{Algorithm, Mode};

const RECOGNIZED_EXT: &str = ".rsp";

/// Generation methods of the KAT_AES archive, in the order they are
/// tried. The method gates recognition but carries no further meaning
/// here.
const RECOGNIZED_METHODS: [&str; 4] = ["GFSbox", "KeySbox", "VarKey", "VarTxt"];

/// A recognized `.rsp` vector file.
///
/// The archive names its files `<MODE><Method><keysize>.rsp`, e.g.
/// `CBCGFSbox256.rsp` or `CFB128VarKey192.rsp`. Classification works on
/// the name alone; content parsing is a separate, later step so files
/// that are not recognized are never read.
#[derive(Debug, Clone)]
pub struct VectorFile {
    name: String,
    algorithm: Algorithm,
    mode: Mode,
}

impl VectorFile {
    /// Parses a file name into algorithm and mode. A miss at any step
    /// is not an error: it is logged and the caller skips the file.
    pub fn classify(name: &str) -> Option<VectorFile> {
        info!("Trying to parse test file name '{}'...", name);
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let stub = Self::strip_extension(base)?;
        let (stub, algorithm) = Self::strip_algorithm(stub)?;
        let stub = Self::strip_method(stub)?;
        let mode = Self::strip_mode(stub)?;
        Some(VectorFile {
            name: name.to_string(),
            algorithm,
            mode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn strip_extension(name: &str) -> Option<&str> {
        match name.strip_suffix(RECOGNIZED_EXT) {
            Some(stub) if !stub.is_empty() => Some(stub),
            _ => {
                warn!("Unknown test vectors file extension: '{}'", name);
                None
            }
        }
    }

    fn strip_algorithm(stub: &str) -> Option<(&str, Algorithm)> {
        if stub.len() < 3 || !stub.is_char_boundary(stub.len() - 3) {
            warn!("Unknown or unsupported algorithm: '{}'", stub);
            return None;
        }
        let (head, key_size) = stub.split_at(stub.len() - 3);
        match Algorithm::try_parse(&format!("aes{}", key_size)) {
            Some(algorithm) => {
                info!("\tAlgorithm: {}", algorithm);
                Some((head, algorithm))
            }
            None => {
                warn!("Unknown or unsupported algorithm: '{}'", stub);
                None
            }
        }
    }

    fn strip_method(stub: &str) -> Option<&str> {
        for method in RECOGNIZED_METHODS {
            if let Some(head) = stub.strip_suffix(method) {
                info!("\tMethod: {}", method);
                return Some(head);
            }
        }
        warn!("Unknown or unsupported method: '{}'", stub);
        None
    }

    fn strip_mode(stub: &str) -> Option<Mode> {
        match Mode::try_parse(stub) {
            Some(mode) => {
                info!("\tMode: {}", mode);
                Some(mode)
            }
            None => {
                warn!("Unknown or unsupported mode: '{}'", stub);
                None
            }
        }
    }
}

/// Parallel value lists of one `[ENCRYPT]` or `[DECRYPT]` section.
/// One index = one test case; `init_vectors` is `None` iff the mode
/// takes no IV (distinct from an empty list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSection {
    pub keys: Vec<String>,
    pub plaintexts: Vec<String>,
    pub ciphertexts: Vec<String>,
    pub init_vectors: Option<Vec<String>>,
}

impl TestSection {
    pub fn cases(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_full_name_grid() {
        for mode_token in ["ECB", "CBC", "CFB128", "OFB", "CTR"] {
            for method in RECOGNIZED_METHODS {
                for key_size in ["128", "192", "256"] {
                    let name = format!("{}{}{}.rsp", mode_token, method, key_size);
                    let file = VectorFile::classify(&name)
                        .unwrap_or_else(|| panic!("'{}' should be recognized", name));
                    assert_eq!(
                        file.algorithm(),
                        Algorithm::try_parse(&format!("aes{}", key_size)).unwrap()
                    );
                    assert_eq!(file.mode(), Mode::try_parse(mode_token).unwrap());
                }
            }
        }
    }

    #[test]
    fn cfb128_token_maps_to_cfb() {
        let file = VectorFile::classify("CFB128GFSbox128.rsp").unwrap();
        assert_eq!(file.mode(), Mode::Cfb);
        assert_eq!(file.algorithm(), Algorithm::Aes128);
    }

    #[test]
    fn classification_misses() {
        // Wrong or missing extension, case-sensitively.
        assert!(VectorFile::classify("ECBGFSbox128.txt").is_none());
        assert!(VectorFile::classify("ECBGFSbox128.RSP").is_none());
        assert!(VectorFile::classify("ECBGFSbox128").is_none());
        // Unsupported key size.
        assert!(VectorFile::classify("ECBGFSbox512.rsp").is_none());
        assert!(VectorFile::classify("ECBGFSbox12.rsp").is_none());
        // Unknown method.
        assert!(VectorFile::classify("ECBMonteCarlo128.rsp").is_none());
        // Unknown mode.
        assert!(VectorFile::classify("XTSGFSbox128.rsp").is_none());
        // Nothing left once the suffixes are gone.
        assert!(VectorFile::classify("GFSbox128.rsp").is_none());
        assert!(VectorFile::classify(".rsp").is_none());
    }

    #[test]
    fn directory_components_are_ignored() {
        let file = VectorFile::classify("KAT_AES/ECBVarTxt256.rsp").unwrap();
        assert_eq!(file.algorithm(), Algorithm::Aes256);
        assert_eq!(file.mode(), Mode::Ecb);
    }
}
