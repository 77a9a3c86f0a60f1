//! Startup glTF/GLB asset bootstrap for the 3D renderer.
//!
//! Replaces the teacher's SPICE kernel downloader (`solar_importer`, which
//! fetched `.bsp`/`.tls` kernels over HTTP for `solar_ephem_spice`) with a
//! single NASA-hosted GLB model fetch-and-validate, following the same
//! "check for an existing valid file, else download with a blocking
//! `reqwest::Client`" shape.

use std::fs::{self, File};
use std::io::{copy, Read};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use thiserror::Error;

const GATEWAY_CORE_NASA_URL: &str = "https://assets.science.nasa.gov/content/dam/science/cds/3d/resources/model/gateway/Gateway%20Core.glb?emrc=697ae83982ce6";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid GLB file: {0}")]
    InvalidGlb(String),
}

/// Outcome of ensuring an asset is present and valid.
#[derive(Debug)]
pub enum AssetStatus {
    AlreadyPresent(PathBuf),
    Downloaded(PathBuf),
}

/// Ensure `GatewayCore_Nasa.glb` exists under `models_dir` and is a
/// well-formed GLB file, downloading it from NASA's asset service if it is
/// missing or fails validation.
pub fn ensure_gateway_core_glb(models_dir: &Path) -> Result<AssetStatus, AssetError> {
    let target_path = models_dir.join("GatewayCore_Nasa.glb");

    if target_path.exists() {
        match validate_glb_file(&target_path) {
            Ok(()) => return Ok(AssetStatus::AlreadyPresent(target_path)),
            Err(_) => {
                let _ = fs::remove_file(&target_path);
            }
        }
    }

    fs::create_dir_all(models_dir)?;
    let tmp_path = models_dir.join("GatewayCore_Nasa.glb.download");

    let client = Client::builder().build()?;
    let mut response = client
        .get(GATEWAY_CORE_NASA_URL)
        .header("User-Agent", "MarsMission3D/1.0 (+axum static-file bootstrap)")
        .send()?
        .error_for_status()?;

    {
        let mut file = File::create(&tmp_path)?;
        copy(&mut response, &mut file)?;
    }

    if let Err(e) = validate_glb_file(&tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, &target_path)?;
    Ok(AssetStatus::Downloaded(target_path))
}

/// Validate a GLB (binary glTF) file's header, first JSON chunk, and the
/// presence of a non-empty `scenes`/`nodes` array in that chunk.
pub fn validate_glb_file(path: &Path) -> Result<(), AssetError> {
    let file_size = fs::metadata(path)?.len();
    if file_size < 20 {
        return Err(AssetError::InvalidGlb(format!("GLB too small: {file_size} bytes")));
    }

    let mut file = File::open(path)?;

    let mut header = [0u8; 12];
    file.read_exact(&mut header)
        .map_err(|_| AssetError::InvalidGlb("GLB header truncated".to_string()))?;

    let magic = &header[0..4];
    let version = u32::from_le_bytes(header[4..8].try_into().unwrap());
    let length = u32::from_le_bytes(header[8..12].try_into().unwrap()) as u64;

    if magic != b"glTF" {
        return Err(AssetError::InvalidGlb(format!("invalid GLB magic: {magic:?}")));
    }
    if version != 2 {
        return Err(AssetError::InvalidGlb(format!("unsupported GLB version: {version}")));
    }
    if length != file_size {
        return Err(AssetError::InvalidGlb(format!(
            "GLB length mismatch (header={length}, file={file_size})"
        )));
    }

    let mut chunk_header = [0u8; 8];
    file.read_exact(&mut chunk_header)
        .map_err(|_| AssetError::InvalidGlb("GLB missing first chunk header".to_string()))?;
    let chunk_len = u32::from_le_bytes(chunk_header[0..4].try_into().unwrap()) as usize;
    let chunk_type = &chunk_header[4..8];

    if chunk_type != b"JSON" {
        return Err(AssetError::InvalidGlb(format!(
            "GLB first chunk is not JSON: {chunk_type:?}"
        )));
    }
    if chunk_len == 0 {
        return Err(AssetError::InvalidGlb("GLB JSON chunk is empty".to_string()));
    }

    let mut chunk = vec![0u8; chunk_len];
    file.read_exact(&mut chunk)
        .map_err(|_| AssetError::InvalidGlb("GLB JSON chunk truncated".to_string()))?;

    let payload: serde_json::Value = serde_json::from_slice(&chunk)
        .map_err(|e| AssetError::InvalidGlb(format!("invalid GLB JSON chunk: {e}")))?;

    let obj = payload
        .as_object()
        .ok_or_else(|| AssetError::InvalidGlb("invalid glTF JSON root (expected object)".to_string()))?;

    if !obj.contains_key("asset") {
        return Err(AssetError::InvalidGlb("invalid glTF JSON (missing asset)".to_string()));
    }
    let has_nonempty = |key: &str| obj.get(key).and_then(|v| v.as_array()).is_some_and(|a| !a.is_empty());
    if !has_nonempty("scenes") {
        return Err(AssetError::InvalidGlb("invalid glTF JSON (missing scenes)".to_string()));
    }
    if !has_nonempty("nodes") {
        return Err(AssetError::InvalidGlb("invalid glTF JSON (missing nodes)".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_glb(path: &Path, json: &[u8]) {
        let mut file = File::create(path).unwrap();
        let total_len = 12 + 8 + json.len() as u32;
        file.write_all(b"glTF").unwrap();
        file.write_all(&2u32.to_le_bytes()).unwrap();
        file.write_all(&total_len.to_le_bytes()).unwrap();
        file.write_all(&(json.len() as u32).to_le_bytes()).unwrap();
        file.write_all(b"JSON").unwrap();
        file.write_all(json).unwrap();
    }

    #[test]
    fn validates_a_well_formed_glb() {
        let dir = std::env::temp_dir().join("mission_assets_test_valid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ok.glb");
        write_glb(&path, br#"{"asset":{"version":"2.0"},"scenes":[0],"nodes":[0]}"#);
        assert!(validate_glb_file(&path).is_ok());
    }

    #[test]
    fn rejects_a_glb_with_no_scenes() {
        let dir = std::env::temp_dir().join("mission_assets_test_invalid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.glb");
        write_glb(&path, br#"{"asset":{"version":"2.0"},"scenes":[],"nodes":[0]}"#);
        assert!(validate_glb_file(&path).is_err());
    }

    #[test]
    fn rejects_a_truncated_file() {
        let dir = std::env::temp_dir().join("mission_assets_test_truncated");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("short.glb");
        fs::write(&path, b"glTF").unwrap();
        assert!(validate_glb_file(&path).is_err());
    }
}
