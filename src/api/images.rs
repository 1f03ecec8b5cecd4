//! Purpose: Rendered image export request and response.
//! Exports: `ImageRequest`, `ImageExport`.
//! Role: Query builder for the images endpoint and its id -> URL map.
//! Invariants: A node that failed to render maps to `None`, not to an error.
use crate::core::value::ExportFormat;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageRequest {
    pub ids: Vec<String>,
    pub scale: Option<f64>,
    pub format: Option<ExportFormat>,
}

impl ImageRequest {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            scale: None,
            format: None,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("ids", self.ids.join(","))];
        if let Some(scale) = self.scale {
            pairs.push(("scale", scale.to_string()));
        }
        if let Some(format) = self.format {
            pairs.push(("format", format.to_string().to_ascii_lowercase()));
        }
        pairs
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ImageExport {
    #[serde(default)]
    pub images: BTreeMap<String, Option<String>>,
}

impl ImageExport {
    pub fn url(&self, id: &str) -> Option<&str> {
        self.images.get(id).and_then(Option::as_deref)
    }

    /// Ids the server could not render.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .filter(|(_, url)| url.is_none())
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageExport, ImageRequest};
    use crate::core::value::ExportFormat;
    use serde_json::json;

    #[test]
    fn query_pairs_lowercase_format() {
        let request = ImageRequest::new(["1:2", "3:4"])
            .with_format(ExportFormat::Svg)
            .with_scale(2.0);
        assert_eq!(
            request.query_pairs(),
            vec![
                ("ids", "1:2,3:4".to_string()),
                ("scale", "2".to_string()),
                ("format", "svg".to_string()),
            ]
        );
    }

    #[test]
    fn failed_renders_are_none() {
        let export: ImageExport = serde_json::from_value(json!({
            "err": null,
            "images": { "1:2": "https://cdn.example/a.png", "3:4": null }
        }))
        .expect("export");
        assert_eq!(export.url("1:2"), Some("https://cdn.example/a.png"));
        assert_eq!(export.url("3:4"), None);
        assert_eq!(export.failed().collect::<Vec<_>>(), vec!["3:4"]);
    }
}
