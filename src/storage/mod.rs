//! CHV persistence
//!
//! Saves batches of encoded sentence vectors in safetensors format so an
//! external ANN index can ingest them directly.
//!
//! ## Layout
//!
//! ```text
//! <base>/<name>/
//!   vectors.safetensors   one f32 tensor "chv" of shape (N, D), values ±1
//!   metadata.json         ids (row order), dim, count, created_at, sha256
//! ```
//!
//! The checksum covers the raw tensor bytes and is verified on every load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::{Device, HydraEdgeError, Hypervector, Result, Tensor};

const VECTORS_FILE: &str = "vectors.safetensors";
const METADATA_FILE: &str = "metadata.json";
const TENSOR_NAME: &str = "chv";

/// Sidecar metadata for one saved batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Row ids, in tensor row order
    pub ids: Vec<String>,
    pub dim: usize,
    pub count: usize,
    pub created_at: DateTime<Utc>,
    /// SHA-256 of the tensor bytes
    pub sha256: String,
}

/// Store for persisting and loading CHV batches
pub struct ChvStore {
    base_path: PathBuf,

    /// Device for loaded matrices
    device: Device,
}

impl ChvStore {
    /// Create a store rooted at `base_path` (CPU tensors)
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            device: Device::Cpu,
        }
    }

    /// Place loaded matrices on `device`
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save a batch of `(id, vector)` entries under `name`
    ///
    /// Fails with `EmptyInput` for an empty batch and `DimensionMismatch` if
    /// the vectors differ in length.
    pub fn save(&self, name: &str, entries: &[(String, Hypervector)]) -> Result<StoreMetadata> {
        let dir = self.batch_dir(name)?;

        let vectors: Vec<Hypervector> = entries.iter().map(|(_, v)| v.clone()).collect();
        let matrix = Hypervector::stack(&vectors, &Device::Cpu)?;
        let (count, dim) = matrix.dims2()?;
        let data: Vec<f32> = matrix.flatten_all()?.to_vec1()?;
        let bytes: &[u8] = bytemuck::cast_slice(&data);

        std::fs::create_dir_all(&dir)?;

        let view = TensorView::new(Dtype::F32, vec![count, dim], bytes)
            .map_err(|e| HydraEdgeError::Serialization(e.to_string()))?;
        let tensors: HashMap<String, TensorView> = [(TENSOR_NAME.to_string(), view)].into();
        safetensors::serialize_to_file(tensors, &None, &dir.join(VECTORS_FILE))
            .map_err(|e| HydraEdgeError::Serialization(e.to_string()))?;

        let metadata = StoreMetadata {
            ids: entries.iter().map(|(id, _)| id.clone()).collect(),
            dim,
            count,
            created_at: Utc::now(),
            sha256: hash_bytes(bytes),
        };
        let metadata_json = serde_json::to_string_pretty(&metadata)
            .map_err(|e| HydraEdgeError::Serialization(e.to_string()))?;
        std::fs::write(dir.join(METADATA_FILE), metadata_json)?;

        info!(name, count, dim, "saved CHV batch");
        Ok(metadata)
    }

    /// Load a batch's entries in saved order
    pub fn load(&self, name: &str) -> Result<Vec<(String, Hypervector)>> {
        let (metadata, values) = self.read_verified(name)?;

        let vectors = values
            .chunks_exact(metadata.dim)
            .map(Hypervector::from_f32)
            .collect::<Result<Vec<_>>>()?;

        Ok(metadata.ids.into_iter().zip(vectors).collect())
    }

    /// Load a batch as an `(N, D)` matrix on the store's device
    pub fn load_matrix(&self, name: &str) -> Result<Tensor> {
        let (metadata, values) = self.read_verified(name)?;
        if let Some(bad) = values.iter().find(|v| **v != 1.0 && **v != -1.0) {
            return Err(HydraEdgeError::InvalidVector(format!(
                "stored value {} is not ±1",
                bad
            )));
        }
        Ok(Tensor::from_vec(values, (metadata.count, metadata.dim), &self.device)?)
    }

    /// Read a batch's metadata
    pub fn metadata(&self, name: &str) -> Result<StoreMetadata> {
        let path = self.batch_dir(name)?.join(METADATA_FILE);
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| HydraEdgeError::Serialization(e.to_string()))
    }

    /// Check if a batch is stored
    pub fn exists(&self, name: &str) -> bool {
        let dir = self.base_path.join(name);
        dir.join(VECTORS_FILE).exists() && dir.join(METADATA_FILE).exists()
    }

    /// List stored batches, sorted by name
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        if !self.base_path.exists() {
            return Ok(names);
        }

        for entry in std::fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.is_dir() && path.join(VECTORS_FILE).exists() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn batch_dir(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(HydraEdgeError::Configuration(format!(
                "invalid batch name '{}'",
                name
            )));
        }
        Ok(self.base_path.join(name))
    }

    /// Read the tensor bytes, checking them against the metadata
    fn read_verified(&self, name: &str) -> Result<(StoreMetadata, Vec<f32>)> {
        let metadata = self.metadata(name)?;
        let data = std::fs::read(self.batch_dir(name)?.join(VECTORS_FILE))?;

        let tensors = SafeTensors::deserialize(&data)
            .map_err(|e| HydraEdgeError::Serialization(e.to_string()))?;
        let view = tensors
            .tensor(TENSOR_NAME)
            .map_err(|e| HydraEdgeError::Serialization(e.to_string()))?;

        if view.dtype() != Dtype::F32 {
            return Err(HydraEdgeError::Serialization(format!(
                "tensor '{}' has dtype {:?}, expected F32",
                TENSOR_NAME,
                view.dtype()
            )));
        }
        if view.shape() != [metadata.count, metadata.dim] || metadata.ids.len() != metadata.count {
            return Err(HydraEdgeError::DimensionMismatch {
                expected: metadata.count * metadata.dim,
                found: view.shape().iter().product(),
            });
        }
        if metadata.dim == 0 {
            return Err(HydraEdgeError::EmptyInput(format!("batch '{}' has dim 0", name)));
        }

        let digest = hash_bytes(view.data());
        if digest != metadata.sha256 {
            return Err(HydraEdgeError::Serialization(format!(
                "checksum mismatch for '{}': expected {}, found {}",
                name, metadata.sha256, digest
            )));
        }

        // File bytes carry no alignment guarantee, so decode instead of casting
        let values: Vec<f32> = view
            .data()
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        debug!(name, count = metadata.count, dim = metadata.dim, "loaded CHV batch");
        Ok((metadata, values))
    }
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::ChvEncoder;
    use tempfile::TempDir;

    fn entries(dim: usize, n: u64) -> Vec<(String, Hypervector)> {
        (0..n)
            .map(|i| (format!("sent-{}", i), Hypervector::random(dim, i).unwrap()))
            .collect()
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ChvStore::new(temp.path());

        let batch = entries(256, 5);
        let metadata = store.save("batch-a", &batch).unwrap();
        assert_eq!(metadata.count, 5);
        assert_eq!(metadata.dim, 256);
        assert_eq!(metadata.sha256.len(), 64);

        assert!(store.exists("batch-a"));
        assert_eq!(store.load("batch-a").unwrap(), batch);
        assert_eq!(store.metadata("batch-a").unwrap(), metadata);
    }

    #[test]
    fn test_encoded_sentences_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = ChvStore::new(temp.path());
        let encoder = ChvEncoder::standard();

        let chv = encoder
            .encode_sentence(&[("Subject", "dog"), ("Predicate", "chase"), ("Object", "cat")])
            .unwrap();
        store.save("one", &[("s1".to_string(), chv.clone())]).unwrap();

        let loaded = store.load("one").unwrap();
        assert_eq!(loaded[0].1, chv);
    }

    #[test]
    fn test_load_matrix() {
        let temp = TempDir::new().unwrap();
        let store = ChvStore::new(temp.path());
        let batch = entries(64, 3);
        store.save("m", &batch).unwrap();

        let matrix = store.load_matrix("m").unwrap();
        assert_eq!(matrix.dims(), &[3, 64]);
        let row = Hypervector::from_tensor(&matrix.get(1).unwrap()).unwrap();
        assert_eq!(row, batch[1].1);
    }

    #[test]
    fn test_checksum_detects_tampering() {
        let temp = TempDir::new().unwrap();
        let store = ChvStore::new(temp.path());
        store.save("t", &entries(64, 2)).unwrap();

        // Flip the sign bit of the last coordinate; it stays ±1
        let path = temp.path().join("t").join(VECTORS_FILE);
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x80;
        std::fs::write(&path, bytes).unwrap();

        let err = store.load("t").unwrap_err();
        assert!(matches!(err, HydraEdgeError::Serialization(ref msg) if msg.contains("checksum")));
    }

    #[test]
    fn test_save_rejects_bad_batches() {
        let temp = TempDir::new().unwrap();
        let store = ChvStore::new(temp.path());

        assert!(matches!(store.save("empty", &[]), Err(HydraEdgeError::EmptyInput(_))));

        let mixed = vec![
            ("a".to_string(), Hypervector::ones(64).unwrap()),
            ("b".to_string(), Hypervector::ones(128).unwrap()),
        ];
        assert!(matches!(
            store.save("mixed", &mixed),
            Err(HydraEdgeError::DimensionMismatch { .. })
        ));
        assert!(!store.exists("mixed"));

        assert!(matches!(store.save("../escape", &entries(8, 1)), Err(HydraEdgeError::Configuration(_))));
    }

    #[test]
    fn test_list() {
        let temp = TempDir::new().unwrap();
        let store = ChvStore::new(temp.path().join("store"));
        assert!(store.list().unwrap().is_empty());

        store.save("b", &entries(32, 1)).unwrap();
        store.save("a", &entries(32, 1)).unwrap();
        assert_eq!(store.list().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert!(matches!(store.load("missing"), Err(HydraEdgeError::Io(_))));
    }
}
