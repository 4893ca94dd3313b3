// Genesis files - Load the template, write the generated document
use super::{apply_policy, GenesisError};
use crate::types::GenesisParameters;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads a genesis template and writes the patched document
#[derive(Debug, Clone)]
pub struct GenesisTransformer {
    template_path: PathBuf,
    output_path: PathBuf,
}

impl GenesisTransformer {
    pub fn new(template_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Load and parse the template (read fresh on every call)
    pub fn load_template(&self) -> Result<Value, GenesisError> {
        let content = fs::read_to_string(&self.template_path).map_err(|source| GenesisError::Io {
            path: self.template_path.clone(),
            source,
        })?;
        let genesis: Value = serde_json::from_str(&content)?;
        debug!(path = %self.template_path.display(), "Loaded genesis template");
        Ok(genesis)
    }

    /// Load → patch → write. Returns the written document.
    pub fn generate(&self, params: &GenesisParameters) -> Result<Value, GenesisError> {
        let template = self.load_template()?;
        let genesis = apply_policy(template, params)?;
        self.write_document(&genesis)?;
        Ok(genesis)
    }

    /// Serialize with 2-space indentation.
    ///
    /// The document goes to a sibling temp file first and is renamed over the
    /// output path, so the output is either the previous file or the new one.
    pub fn write_document(&self, genesis: &Value) -> Result<(), GenesisError> {
        let content = serde_json::to_string_pretty(genesis)?;

        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GenesisError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = temp_path(&self.output_path);
        fs::write(&tmp_path, content).map_err(|source| GenesisError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.output_path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            GenesisError::Io {
                path: self.output_path.clone(),
                source,
            }
        })?;

        info!(path = %self.output_path.display(), "Genesis file written");
        Ok(())
    }
}

fn temp_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "genesis.json".into());
    name.push(format!(".{}.tmp", std::process::id()));
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::patch::tests::template;
    use tempfile::tempdir;

    fn write_template(dir: &Path, genesis: &Value) -> PathBuf {
        let path = dir.join("template_genesis.json");
        fs::write(&path, serde_json::to_string_pretty(genesis).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_generate_writes_output() {
        let dir = tempdir().unwrap();
        let template_path = write_template(dir.path(), &template());
        let output = dir.path().join("generated_genesis.json");

        let transformer = GenesisTransformer::new(&template_path, &output);
        let genesis = transformer.generate(&GenesisParameters::default()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, serde_json::to_string_pretty(&genesis).unwrap());
        assert!(written.contains("\n  \"app_state\": {"));

        let reloaded: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(reloaded["app_state"]["mint"]["params"]["mint_denom"], "aauth");
    }

    #[test]
    fn test_missing_mint_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut doc = template();
        doc["app_state"].as_object_mut().unwrap().remove("mint");
        let template_path = write_template(dir.path(), &doc);
        let output = dir.path().join("generated_genesis.json");

        let transformer = GenesisTransformer::new(&template_path, &output);
        let err = transformer.generate(&GenesisParameters::default()).unwrap_err();

        assert!(matches!(err, GenesisError::MissingSection { .. }));
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_generate_is_byte_identical() {
        let dir = tempdir().unwrap();
        let template_path = write_template(dir.path(), &template());
        let first = dir.path().join("first.json");
        let second = dir.path().join("out").join("second.json");

        let params = GenesisParameters::default();
        GenesisTransformer::new(&template_path, &first).generate(&params).unwrap();
        GenesisTransformer::new(&template_path, &second).generate(&params).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_missing_template() {
        let dir = tempdir().unwrap();
        let transformer = GenesisTransformer::new(dir.path().join("nope.json"), dir.path().join("out.json"));
        assert!(matches!(transformer.load_template(), Err(GenesisError::Io { .. })));
    }

    #[test]
    fn test_invalid_template_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let transformer = GenesisTransformer::new(&path, dir.path().join("out.json"));
        assert!(matches!(transformer.load_template(), Err(GenesisError::Json(_))));
    }
}
