//! Pre-rendered cadence clips on disk.
//!
//! Clips live in one directory, named `{cadence}_{tonality}.wav`
//! (e.g. `I-V-I_C.wav`).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use pt_model::{AudioClip, CadenceType, RoundConfig, Tonality};
use thiserror::Error;

use crate::wav_format::load_wav;
use crate::FormatError;

/// A cadence clip could not be provided.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing audio file: {}", path.display())]
    Missing { path: PathBuf },
    #[error("unreadable audio file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

/// Loads cadence clips by (cadence, tonality) and keeps them once decoded.
#[derive(Debug)]
pub struct CadenceLibrary {
    dir: PathBuf,
    cache: HashMap<(CadenceType, Tonality), AudioClip>,
}

impl CadenceLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// File a clip is expected at.
    pub fn clip_path(&self, cadence: CadenceType, tonality: Tonality) -> PathBuf {
        self.dir
            .join(format!("{}_{}.wav", cadence.label(), tonality))
    }

    /// Decode the clip for `cadence` in `tonality`, reading the file only once.
    pub fn load(
        &mut self,
        cadence: CadenceType,
        tonality: Tonality,
    ) -> Result<&AudioClip, AssetError> {
        let key = (cadence, tonality);
        if !self.cache.contains_key(&key) {
            let clip = self.read_clip(cadence, tonality)?;
            self.cache.insert(key, clip);
        }
        Ok(&self.cache[&key])
    }

    fn read_clip(&self, cadence: CadenceType, tonality: Tonality) -> Result<AudioClip, AssetError> {
        let path = self.clip_path(cadence, tonality);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AssetError::Missing { path });
            }
            Err(e) => {
                return Err(AssetError::Unreadable {
                    path,
                    source: FormatError::Io(e),
                })
            }
        };
        let clip = load_wav(&bytes).map_err(|source| AssetError::Unreadable {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), frames = clip.frames(), "loaded cadence clip");
        Ok(clip)
    }

    /// Clip files the configuration could ask for that don't exist.
    pub fn missing_for(&self, config: &RoundConfig) -> Vec<PathBuf> {
        config
            .cadences
            .iter()
            .flat_map(|&cadence| {
                config
                    .tonalities
                    .iter()
                    .map(move |&tonality| (cadence, tonality))
            })
            .map(|(cadence, tonality)| self.clip_path(cadence, tonality))
            .filter(|path| !path.is_file())
            .collect()
    }
}
