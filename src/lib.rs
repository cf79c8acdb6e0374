pub mod ddl;
pub mod graph;
pub mod introspect;
pub mod layout;
pub mod measure;
pub mod render;
pub mod schema;
pub mod scratch;
pub mod svg;

use std::path::{Path, PathBuf};

use graph::build_graph;
use introspect::introspect;
use render::{RenderedArtifact, RenderError};
use schema::SchemaMetadata;
use scratch::ScratchFile;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to materialize schema to {}: {source}", path.display())]
    Materialize {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One-shot batch pipeline: materialize the schema DDL to a scratch file,
/// introspect, build the graph, render every default configuration, then
/// promote the designated output to the canonical artifact. The scratch
/// file is removed on every exit path, including render failures.
pub fn generate_diagrams(
    schema: &SchemaMetadata,
    out_dir: &Path,
) -> Result<Vec<(String, RenderedArtifact)>, PipelineError> {
    let scratch = ScratchFile::new(out_dir.join("tmp_social_schema.sql"));
    scratch
        .write(&ddl::ddl_dump(schema))
        .map_err(|source| PipelineError::Materialize {
            path: scratch.path().to_path_buf(),
            source,
        })?;

    let (tables, fks) = introspect(schema);
    let graph = build_graph(&tables, &fks);

    let mut artifacts = render::render_all(&graph, &render::default_configs(), out_dir)?;
    if let Some(canonical) = render::promote_canonical(&artifacts, out_dir)? {
        artifacts.push(("canonical".to_string(), canonical));
    }
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::social_schema;
    use std::fs;

    #[test]
    fn test_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = generate_diagrams(&social_schema(), dir.path()).unwrap();

        let names: Vec<&str> = artifacts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["compact", "spaced", "symmetric", "canonical"]);
        assert!(dir.path().join("diagram.svg").exists());
        // Scratch file is gone once the pipeline returns.
        assert!(!dir.path().join("tmp_social_schema.sql").exists());
    }

    #[test]
    fn test_canonical_suppressed_on_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("diagram_symmetric.svg")).unwrap();

        let result = generate_diagrams(&social_schema(), dir.path());
        assert!(result.is_err());
        assert!(!dir.path().join("diagram.svg").exists());
        // Scratch cleanup still ran on the failure path.
        assert!(!dir.path().join("tmp_social_schema.sql").exists());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        generate_diagrams(&social_schema(), dir_a.path()).unwrap();
        generate_diagrams(&social_schema(), dir_b.path()).unwrap();

        let a = fs::read_to_string(dir_a.path().join("diagram.svg")).unwrap();
        let b = fs::read_to_string(dir_b.path().join("diagram.svg")).unwrap();
        assert_eq!(a, b);
    }
}
