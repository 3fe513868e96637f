use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cubecmp::{Cube, CubeList, MemCube};
use tracing::debug;

use crate::errors::{Error, Result};

/// One way of turning a file into cubes.
///
/// The scanner loads every file twice, through two loaders, and checks that both produce the
/// same cubes.
///
pub trait Loader {
    type Cube: Cube;

    /// Short label used in reports and logs.
    fn name(&self) -> &str;

    fn load(&self, path: &Path) -> Result<Vec<Self::Cube>>;
}

/// Loads a `CubeList` serialized as JSON.
#[derive(Clone, Debug)]
pub struct JsonLoader {
    name: String,
}

impl JsonLoader {
    pub fn new() -> Self {
        Self::named("json")
    }

    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl Default for JsonLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for JsonLoader {
    type Cube = MemCube;

    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, path: &Path) -> Result<Vec<MemCube>> {
        let file = File::open(path).map_err(|err| Error::io(path, err))?;
        let cubes: CubeList =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(loader = %self.name, path = %path.display(), cubes = cubes.len(), "loaded");

        Ok(cubes.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubes.json");
        let cubes = CubeList::from(vec![testing::cube("a"), testing::cube("b")]);
        testing::write_cubes(&path, &cubes);

        let loader = JsonLoader::new();
        assert_eq!(loader.name(), "json");
        let loaded = loader.load(&path).unwrap();
        assert_eq!(loaded, cubes.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = JsonLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "{\"not\": \"cubes\"}").unwrap();
        let err = JsonLoader::named("structured").load(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_load_misshapen_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        testing::write_misshapen_bounds(&path, "a");

        let err = JsonLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().contains("bounds shape []"), "{err}");
    }
}
