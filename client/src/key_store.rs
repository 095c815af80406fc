//! The signer's keypair, persisted as a flat file of comma-separated decimal bytes.
//!
//! The file holds the 64-byte secret: the 32-byte seed followed by the 32-byte public key.

use std::{
    fs::{
        self,
        OpenOptions,
    },
    io::Write,
    path::{
        Path,
        PathBuf,
    },
};

use solana_sdk::signature::{
    Keypair,
    Signer,
};

use crate::error::{
    StoreError,
    StoreResult,
};

pub const DEFAULT_KEYPAIR_PATH: &str = "keypair.json";

pub const KEYPAIR_LEN: usize = 64;

/// Owner read/write only; the file holds the secret key.
#[cfg(unix)]
pub const KEYPAIR_FILE_MODE: u32 = 0o600;

pub struct KeyStore {
    path: PathBuf,
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEYPAIR_PATH)
    }
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the stored keypair. Fails with [`StoreError::NotFound`] if no wallet has been
    /// provisioned yet.
    pub fn load(&self) -> StoreResult<Keypair> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        decode_keypair(&text)
    }

    /// Writes `keypair` to the store. Never overwrites: an existing file fails with
    /// [`StoreError::AlreadyExists`]. On unix the file is readable by its owner only.
    pub fn save(&self, keypair: &Keypair) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, KEYPAIR_FILE_MODE);
        let mut file = options
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(encode_keypair(keypair).as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))
    }

    /// Generates and persists a new keypair, then reloads it and checks the stored bytes decode to
    /// the same address.
    pub fn create(&self) -> StoreResult<Keypair> {
        if self.exists() {
            return Err(StoreError::AlreadyExists {
                path: self.path.clone(),
            });
        }

        let keypair = Keypair::new();
        let expected = keypair.pubkey().to_string();
        self.save(&keypair)?;

        let actual = self.load()?.pubkey().to_string();
        if actual != expected {
            return Err(StoreError::Integrity { expected, actual });
        }

        Ok(keypair)
    }
}

pub fn encode_keypair(keypair: &Keypair) -> String {
    keypair
        .to_bytes()
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses comma-separated decimal bytes. Surrounding brackets and whitespace are ignored, so
/// JSON array keypair files load too.
pub fn decode_keypair(text: &str) -> StoreResult<Keypair> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    let bytes = inner
        .split(',')
        .enumerate()
        .map(|(i, value)| {
            value.trim().parse::<u8>().map_err(|e| {
                StoreError::InvalidKeypair(format!("byte {i} ({:?}): {e}", value.trim()))
            })
        })
        .collect::<StoreResult<Vec<u8>>>()?;

    if bytes.len() != KEYPAIR_LEN {
        return Err(StoreError::InvalidKeypair(format!(
            "expected {KEYPAIR_LEN} bytes, found {}",
            bytes.len()
        )));
    }

    Keypair::try_from(bytes.as_slice()).map_err(|e| StoreError::InvalidKeypair(e.to_string()))
}
