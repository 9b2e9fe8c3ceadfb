//! Streaming content digests for monitored files.

use super::error::{MonitorError, Result};
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Fixed read size so memory stays bounded regardless of file size.
const CHUNK_SIZE: usize = 4096;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
    Md5,
}

impl HashAlgorithm {
    /// Parse an algorithm name, case-insensitively.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "md5" => Ok(HashAlgorithm::Md5),
            _ => Err(MonitorError::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Canonical lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Md5 => "md5",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute the hex digest of a file's contents under `algorithm`.
///
/// Fails with `NotFound` if the path does not exist at call time; read
/// failures after that surface as `Io`. A partial digest is never
/// returned.
pub fn digest_file(path: &Path, algorithm: HashAlgorithm) -> Result<String> {
    if !path.exists() {
        return Err(MonitorError::NotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), algorithm = %algorithm, "hashing file");
    let mut file = std::fs::File::open(path).map_err(|e| MonitorError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    match algorithm {
        HashAlgorithm::Sha256 => digest_reader::<Sha256>(&mut file, path),
        HashAlgorithm::Sha512 => digest_reader::<Sha512>(&mut file, path),
        HashAlgorithm::Md5 => digest_reader::<Md5>(&mut file, path),
    }
}

/// Stream the reader through a digest in fixed-size chunks.
fn digest_reader<D: Digest>(reader: &mut impl Read, path: &Path) -> Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).map_err(|e| MonitorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(HashAlgorithm::parse("SHA256").unwrap(), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::parse("Sha512").unwrap(), HashAlgorithm::Sha512);
        assert_eq!(HashAlgorithm::parse("MD5").unwrap(), HashAlgorithm::Md5);
    }

    #[test]
    fn parse_unknown_algorithm_fails() {
        let err = HashAlgorithm::parse("crc32").unwrap_err();
        assert!(matches!(err, MonitorError::UnsupportedAlgorithm(name) if name == "crc32"));
    }

    #[test]
    fn sha256_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello");
        let digest = digest_file(&path, HashAlgorithm::Sha256).unwrap();
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn sha512_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.txt", b"");
        let digest = digest_file(&path, HashAlgorithm::Sha512).unwrap();
        assert_eq!(
            digest,
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn md5_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "abc.txt", b"abc");
        let digest = digest_file(&path, HashAlgorithm::Md5).unwrap();
        assert_eq!(digest, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn digest_is_lower_case_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.bin", &[0xDE, 0xAD, 0xBE, 0xEF]);
        let digest = digest_file(&path, HashAlgorithm::Sha256).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = digest_file(Path::new("/nonexistent/file.txt"), HashAlgorithm::Sha256)
            .unwrap_err();
        assert!(matches!(err, MonitorError::NotFound(_)));
    }

    #[test]
    fn large_file_streams_in_chunks() {
        // Content larger than one chunk so the loop runs more than once.
        let dir = tempfile::tempdir().unwrap();
        let content = vec![0xABu8; CHUNK_SIZE * 3 + 17];
        let path = write_file(&dir, "big.bin", &content);

        let streamed = digest_file(&path, HashAlgorithm::Sha256).unwrap();
        let whole = to_hex(&Sha256::digest(&content));
        assert_eq!(streamed, whole);
    }
}
