use std::fs;
use std::path::Path;
use std::thread;

use serde::Deserialize;
use volmesh_mesh_cpu::SurfaceExtractionType;

/// Edge length of a mesh chunk; 62 keeps binary meshing to one block per chunk.
pub const DEFAULT_MESH_SIZE: i32 = 62;
pub const MAX_MESH_SIZE: i32 = 256;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshStateConfig {
    pub mesh_size: i32,
    pub mesh_mode: SurfaceExtractionType,
    /// Worker threads; `None` means half the cores, at least one.
    pub workers: Option<usize>,
    /// Jobs dispatched per `update`; 0 means one per worker.
    pub max_jobs_per_update: usize,
}

impl Default for MeshStateConfig {
    fn default() -> Self {
        Self {
            mesh_size: DEFAULT_MESH_SIZE,
            mesh_mode: SurfaceExtractionType::Cubic,
            workers: None,
            max_jobs_per_update: 0,
        }
    }
}

impl MeshStateConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: MeshStateConfig = toml::from_str(toml_str).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_MESH_SIZE).contains(&self.mesh_size) {
            return Err(ConfigError::Invalid(format!(
                "mesh_size must be in 1..={MAX_MESH_SIZE}, got {}",
                self.mesh_size
            )));
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get() / 2)
                .unwrap_or(1)
                .max(1)
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = MeshStateConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, MeshStateConfig::default());
        assert!(cfg.worker_count() >= 1);
    }

    #[test]
    fn parses_mode_and_size() {
        let cfg = MeshStateConfig::from_toml_str(
            "mesh_size = 32\nmesh_mode = \"marching_cubes\"\nworkers = 3\n",
        )
        .unwrap();
        assert_eq!(cfg.mesh_size, 32);
        assert_eq!(cfg.mesh_mode, SurfaceExtractionType::MarchingCubes);
        assert_eq!(cfg.worker_count(), 3);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            MeshStateConfig::from_toml_str("mesh_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MeshStateConfig::from_toml_str("mesh_size = 512"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MeshStateConfig::from_toml_str("workers = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MeshStateConfig::from_toml_str("mesh_mode = \"voxelart\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MeshStateConfig::from_toml_str("unknown_key = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MeshStateConfig::from_path("/nonexistent/volmesh.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("failed to read config"));
    }
}
