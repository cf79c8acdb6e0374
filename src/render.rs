use crate::graph::Graph;
use crate::layout::{LayoutConfig, LayoutEngine, RankDir};
use crate::svg::SvgRenderer;
use std::fs;
use std::path::{Path, PathBuf};

/// File name the designated configuration's output is promoted to.
pub const CANONICAL_NAME: &str = "diagram.svg";
/// The configuration whose output becomes the canonical artifact.
pub const CANONICAL_SOURCE: &str = "spaced";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to promote canonical artifact {}: {source}", path.display())]
    Promote {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Output of one successful render. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub format: &'static str,
}

/// The documented default configurations.
pub fn default_configs() -> Vec<(String, LayoutConfig)> {
    vec![
        ("compact".to_string(), LayoutConfig::new(0.25, 0.5, RankDir::TopToBottom)),
        ("spaced".to_string(), LayoutConfig::new(1.0, 1.2, RankDir::TopToBottom)),
        ("symmetric".to_string(), LayoutConfig::new(1.2, 1.0, RankDir::LeftToRight)),
    ]
}

/// Lay out and render the graph under one configuration, writing the SVG to
/// `path`.
pub fn render(graph: &Graph, config: &LayoutConfig, path: &Path) -> Result<RenderedArtifact, RenderError> {
    let layout = LayoutEngine::new(config.clone()).layout(graph);
    let svg = SvgRenderer::default().render(graph, &layout);
    fs::write(path, &svg).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RenderedArtifact {
        path: path.to_path_buf(),
        format: "svg",
    })
}

/// Render every configuration independently into `out_dir` as
/// `diagram_<name>.svg`. Configurations share no render state; a write
/// failure aborts the remaining configurations so a stale canonical
/// artifact is never promoted over a partial set.
pub fn render_all(
    graph: &Graph,
    configs: &[(String, LayoutConfig)],
    out_dir: &Path,
) -> Result<Vec<(String, RenderedArtifact)>, RenderError> {
    let mut artifacts = Vec::with_capacity(configs.len());
    for (name, config) in configs {
        let path = out_dir.join(format!("diagram_{}.svg", name));
        let artifact = render(graph, config, &path)?;
        artifacts.push((name.clone(), artifact));
    }
    Ok(artifacts)
}

/// Copy the designated configuration's output to the canonical path. Only
/// called once every configuration has rendered. Returns None when the
/// designated configuration was not part of the run.
pub fn promote_canonical(
    artifacts: &[(String, RenderedArtifact)],
    out_dir: &Path,
) -> Result<Option<RenderedArtifact>, RenderError> {
    let Some((_, source)) = artifacts.iter().find(|(name, _)| name == CANONICAL_SOURCE) else {
        return Ok(None);
    };
    let canonical = out_dir.join(CANONICAL_NAME);
    fs::copy(&source.path, &canonical).map_err(|source| RenderError::Promote {
        path: canonical.clone(),
        source,
    })?;
    Ok(Some(RenderedArtifact {
        path: canonical,
        format: "svg",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::introspect::introspect;
    use crate::schema::social_schema;

    fn social_graph() -> Graph {
        let schema = social_schema();
        let (tables, fks) = introspect(&schema);
        build_graph(&tables, &fks)
    }

    #[test]
    fn test_render_all_writes_one_file_per_config() {
        let dir = tempfile::tempdir().unwrap();
        let graph = social_graph();
        let artifacts = render_all(&graph, &default_configs(), dir.path()).unwrap();

        assert_eq!(artifacts.len(), 3);
        for name in ["compact", "spaced", "symmetric"] {
            assert!(dir.path().join(format!("diagram_{}.svg", name)).exists());
        }
    }

    #[test]
    fn test_canonical_matches_spaced_output() {
        let dir = tempfile::tempdir().unwrap();
        let graph = social_graph();
        let artifacts = render_all(&graph, &default_configs(), dir.path()).unwrap();
        let canonical = promote_canonical(&artifacts, dir.path()).unwrap().unwrap();

        let spaced = fs::read_to_string(dir.path().join("diagram_spaced.svg")).unwrap();
        let promoted = fs::read_to_string(&canonical.path).unwrap();
        assert_eq!(spaced, promoted);
    }

    #[test]
    fn test_write_failure_aborts_remaining_configs() {
        let dir = tempfile::tempdir().unwrap();
        let graph = social_graph();
        // Occupy the symmetric output path with a directory so its write fails.
        fs::create_dir(dir.path().join("diagram_symmetric.svg")).unwrap();

        let result = render_all(&graph, &default_configs(), dir.path());
        assert!(matches!(result, Err(RenderError::Write { .. })));
        // Earlier configurations were written before the failure.
        assert!(dir.path().join("diagram_compact.svg").exists());
        assert!(dir.path().join("diagram_spaced.svg").exists());
    }

    #[test]
    fn test_promote_skipped_without_designated_config() {
        let dir = tempfile::tempdir().unwrap();
        let graph = social_graph();
        let configs = vec![("compact".to_string(), default_configs()[0].1.clone())];
        let artifacts = render_all(&graph, &configs, dir.path()).unwrap();

        assert_eq!(promote_canonical(&artifacts, dir.path()).unwrap(), None);
        assert!(!dir.path().join(CANONICAL_NAME).exists());
    }
}
