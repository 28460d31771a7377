use crate::browser;
use crate::engine;
use anyhow::{Context, Result};
use futures::future::join_all;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use web_sys::{HtmlAudioElement, HtmlImageElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
    Audio,
    Font,
    Json,
}

/// One manifest record. Game code only ever asks for `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetSource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub path: String,
}

#[derive(Debug, Clone)]
pub enum Asset {
    Texture(HtmlImageElement),
    Audio(HtmlAudioElement),
    /// Fonts are declared in CSS, only the resolved path is kept.
    Font(String),
    Json(serde_json::Value),
}

impl Asset {
    fn kind(&self) -> AssetKind {
        match self {
            Asset::Texture(_) => AssetKind::Texture,
            Asset::Audio(_) => AssetKind::Audio,
            Asset::Font(_) => AssetKind::Font,
            Asset::Json(_) => AssetKind::Json,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("asset '{0}' is not loaded")]
    Missing(String),
    #[error("asset '{name}' is a {actual:?}, not a {expected:?}")]
    WrongKind {
        name: String,
        expected: AssetKind,
        actual: AssetKind,
    },
}

/// Logical-name asset store built from the manifest.
#[derive(Debug, Default)]
pub struct Resources {
    sources: Vec<AssetSource>,
    items: HashMap<String, Asset>,
    failed: Vec<String>,
}

impl Resources {
    pub fn new(sources: Vec<AssetSource>) -> Self {
        Resources {
            sources,
            items: HashMap::new(),
            failed: Vec::new(),
        }
    }

    pub fn manifest_from_json(json: &str) -> Result<Vec<AssetSource>> {
        serde_json::from_str(json).context("Asset manifest is not a list of {name, type, path}")
    }

    /// Loads every manifest entry concurrently. A failing entry is logged and
    /// recorded, the remaining assets stay usable.
    pub async fn load(sources: Vec<AssetSource>) -> Resources {
        let mut resources = Resources::new(sources);
        let results = join_all(resources.sources.iter().map(load_source)).await;

        for (source, result) in resources.sources.iter().zip(results) {
            match result {
                Ok(asset) => {
                    resources.items.insert(source.name.clone(), asset);
                }
                Err(err) => {
                    error!("Resources: failed to load '{}' : {:#}", source.name, err);
                    resources.failed.push(source.name.clone());
                }
            }
        }
        info!(
            "Resources: loaded {}/{} assets",
            resources.loaded(),
            resources.to_load()
        );
        resources
    }

    pub fn insert(&mut self, name: &str, asset: Asset) {
        self.items.insert(name.to_string(), asset);
    }

    pub fn get(&self, name: &str) -> Result<&Asset, ResourceError> {
        self.items
            .get(name)
            .ok_or_else(|| ResourceError::Missing(name.to_string()))
    }

    pub fn texture(&self, name: &str) -> Result<&HtmlImageElement, ResourceError> {
        match self.get(name)? {
            Asset::Texture(image) => Ok(image),
            other => Err(self.wrong_kind(name, AssetKind::Texture, other)),
        }
    }

    pub fn audio(&self, name: &str) -> Result<&HtmlAudioElement, ResourceError> {
        match self.get(name)? {
            Asset::Audio(audio) => Ok(audio),
            other => Err(self.wrong_kind(name, AssetKind::Audio, other)),
        }
    }

    pub fn json(&self, name: &str) -> Result<&serde_json::Value, ResourceError> {
        match self.get(name)? {
            Asset::Json(value) => Ok(value),
            other => Err(self.wrong_kind(name, AssetKind::Json, other)),
        }
    }

    pub fn audios(&self) -> impl Iterator<Item = (&str, &HtmlAudioElement)> {
        self.items.iter().filter_map(|(name, asset)| match asset {
            Asset::Audio(audio) => Some((name.as_str(), audio)),
            _ => None,
        })
    }

    /// Manifest path for a logical name, loaded or not.
    pub fn path(&self, name: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|source| source.name == name)
            .map(|source| source.path.as_str())
    }

    pub fn sources(&self) -> &[AssetSource] {
        &self.sources
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn to_load(&self) -> usize {
        self.sources.len()
    }

    pub fn loaded(&self) -> usize {
        self.items.len()
    }

    pub fn progress(&self) -> f64 {
        if self.sources.is_empty() {
            1.0
        } else {
            self.loaded() as f64 / self.to_load() as f64
        }
    }

    fn wrong_kind(&self, name: &str, expected: AssetKind, actual: &Asset) -> ResourceError {
        warn!("Resources: '{}' requested as {:?}", name, expected);
        ResourceError::WrongKind {
            name: name.to_string(),
            expected,
            actual: actual.kind(),
        }
    }
}

async fn load_source(source: &AssetSource) -> Result<Asset> {
    let asset = match source.kind {
        AssetKind::Texture => Asset::Texture(engine::load_image(&source.path).await?),
        AssetKind::Audio => Asset::Audio(browser::new_audio(&source.path)?),
        AssetKind::Font => Asset::Font(source.path.clone()),
        AssetKind::Json => Asset::Json(browser::fetch_json::<serde_json::Value>(&source.path).await?),
    };
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MANIFEST: &str = r#"[
        { "name": "poppinsBold", "type": "font", "path": "fonts/Poppins-Bold.ttf" },
        { "name": "gameCard", "type": "texture", "path": "textures/card.png" },
        { "name": "dialogue", "type": "json", "path": "data/dialogue.json" }
    ]"#;

    #[test]
    fn manifest_parses_kinds_and_paths() {
        let sources = Resources::manifest_from_json(MANIFEST).unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[1].kind, AssetKind::Texture);

        let resources = Resources::new(sources);
        assert_eq!(resources.path("gameCard"), Some("textures/card.png"));
        assert_eq!(resources.path("missing"), None);
        assert_eq!(resources.progress(), 0.0);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let bad = r#"[{ "name": "x", "type": "video", "path": "x.mp4" }]"#;
        assert!(Resources::manifest_from_json(bad).is_err());
    }

    #[test]
    fn lookups_check_name_and_kind() {
        let mut resources = Resources::new(Resources::manifest_from_json(MANIFEST).unwrap());
        resources.insert("dialogue", Asset::Json(json!({ "dialogue": [] })));
        resources.insert("poppinsBold", Asset::Font("fonts/Poppins-Bold.ttf".into()));

        assert!(resources.json("dialogue").is_ok());
        assert_eq!(
            resources.json("poppinsBold").unwrap_err(),
            ResourceError::WrongKind {
                name: "poppinsBold".into(),
                expected: AssetKind::Json,
                actual: AssetKind::Font,
            }
        );
        assert_eq!(
            resources.json("gameCard").unwrap_err(),
            ResourceError::Missing("gameCard".into())
        );
        assert_eq!(resources.loaded(), 2);
    }
}
