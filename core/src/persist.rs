use crate::encoder::Bm25Encoder;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub vocab_size: usize,
    pub avgdl: f32,
    pub created_at: String,
    pub version: u32,
}

pub const STATE_VERSION: u32 = 1;

pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn encoder(&self) -> PathBuf {
        self.root.join("encoder.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

/// Persist a fitted encoder: `encoder.bin` holds the full state, `meta.json`
/// a human-readable summary.
pub fn save_encoder(paths: &StatePaths, encoder: &Bm25Encoder, created_at: &str) -> Result<()> {
    ensure!(encoder.is_fitted(), "refusing to save an unfitted encoder");
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.encoder())?;
    let bytes = bincode::serialize(encoder)?;
    f.write_all(&bytes)?;
    let meta = MetaFile {
        num_docs: encoder.num_docs(),
        vocab_size: encoder.vocab_size(),
        avgdl: encoder.avgdl(),
        created_at: created_at.to_string(),
        version: STATE_VERSION,
    };
    let mut f = File::create(paths.meta())?;
    f.write_all(serde_json::to_string_pretty(&meta)?.as_bytes())?;
    Ok(())
}

pub fn load_encoder(paths: &StatePaths) -> Result<Bm25Encoder> {
    let mut f = File::open(paths.encoder())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let encoder: Bm25Encoder = bincode::deserialize(&buf)?;
    ensure!(encoder.is_fitted(), "encoder state at {:?} is unfitted", paths.root);
    Ok(encoder)
}

pub fn load_meta(paths: &StatePaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Bm25Params;

    #[test]
    fn round_trips_fitted_state() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StatePaths::new(dir.path());

        let mut enc = Bm25Encoder::new(Bm25Params::default());
        enc.fit(&["solar panels convert sunlight", "wind turbines convert wind"]).unwrap();
        save_encoder(&paths, &enc, "2026-08-07T00:00:00Z").unwrap();

        let loaded = load_encoder(&paths).unwrap();
        assert_eq!(loaded.vocab_size(), enc.vocab_size());
        assert_eq!(
            loaded.encode_document("wind and sunlight").unwrap(),
            enc.encode_document("wind and sunlight").unwrap()
        );

        let meta = load_meta(&paths).unwrap();
        assert_eq!(meta.num_docs, 2);
        assert_eq!(meta.version, STATE_VERSION);
    }

    #[test]
    fn refuses_to_save_unfitted() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StatePaths::new(dir.path());
        let enc = Bm25Encoder::default();
        assert!(save_encoder(&paths, &enc, "now").is_err());
    }
}
