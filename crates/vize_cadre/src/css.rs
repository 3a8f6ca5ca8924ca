//! Stylesheet aggregation after a build.

use std::path::{Path, PathBuf};

use vize_carton::path;

use crate::host::Metafile;
use crate::identity::Facet;

/// Extension of emitted stylesheets.
pub const CSS_EXTENSION: &str = ".css";

/// Absolute paths of emitted stylesheets that contain compiled style facets.
pub fn collect_style_outputs(metafile: &Metafile, base: &Path) -> Vec<PathBuf> {
    let Some(marker) = Facet::Style.query() else {
        return Vec::new();
    };

    metafile
        .outputs
        .iter()
        .filter(|(name, _)| name.ends_with(CSS_EXTENSION))
        .filter(|(_, output)| output.inputs.keys().any(|input| input.contains(marker)))
        .map(|(name, _)| path::join(base, name))
        .collect()
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::host::{MetafileInput, MetafileOutput};

    fn output(inputs: &[&str]) -> MetafileOutput {
        MetafileOutput {
            inputs: inputs
                .iter()
                .map(|id| (id.to_string(), MetafileInput::default()))
                .collect(),
        }
    }

    #[test]
    fn test_only_style_derived_css_is_collected() {
        let mut metafile = Metafile::default();
        metafile.outputs.insert(
            "dist/app.css".into(),
            output(&["src/App.vue?vue&type=style", "src/reset.css"]),
        );
        metafile
            .outputs
            .insert("dist/vendor.css".into(), output(&["node_modules/x/x.css"]));
        metafile.outputs.insert(
            "dist/app.js".into(),
            output(&["src/App.vue?vue&type=style"]),
        );

        let collected = collect_style_outputs(&metafile, Path::new("/project"));
        assert_eq!(collected, vec![PathBuf::from("/project/dist/app.css")]);
    }

    #[test]
    fn test_empty_metafile() {
        assert!(collect_style_outputs(&Metafile::default(), Path::new("/project")).is_empty());
    }
}
