//=========================================================================
// Content Dictionary
//=========================================================================
//
// Named store of loaded assets (models, textures, fonts, effects).
// Loading is done by a caller-supplied loader so the dictionary does not
// depend on any graphics backend; each key is loaded at most once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::error::{EngineError, Result};

//=== ContentDictionary ===================================================

#[derive(Debug)]
pub struct ContentDictionary<T> {
    name: String,
    entries: HashMap<String, Rc<T>>,
}

impl<T> ContentDictionary<T> {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), entries: HashMap::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Loading ----------------------------------------------------------

    /// Loads `path` under `key` unless `key` is already present, in which
    /// case the stored asset is returned and `loader` is not called.
    pub fn load<E, F>(&mut self, key: &str, path: &str, loader: F) -> Result<Rc<T>>
    where
        E: Display,
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        if let Some(existing) = self.entries.get(key) {
            return Ok(Rc::clone(existing));
        }

        let asset = loader(path).map_err(|e| EngineError::ContentLoad { key: key.to_string(), reason: e.to_string() })?;
        let asset = Rc::new(asset);
        self.entries.insert(key.to_string(), Rc::clone(&asset));
        debug!(target: "content", "{}: loaded '{}' from {}", self.name, key, path);
        Ok(asset)
    }

    /// Like [`load`](Self::load), keyed by the file name without extension.
    pub fn load_path<E, F>(&mut self, path: &str, loader: F) -> Result<Rc<T>>
    where
        E: Display,
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        let key = key_from_path(path);
        self.load(&key, path, loader)
    }

    /// Stores an already-built asset. Returns false if `key` was taken.
    pub fn insert(&mut self, key: &str, asset: T) -> bool {
        if self.entries.contains_key(key) {
            warn!(target: "content", "{}: '{}' already loaded", self.name, key);
            return false;
        }
        self.entries.insert(key.to_string(), Rc::new(asset));
        true
    }

    //--- Query API --------------------------------------------------------

    pub fn get(&self, key: &str) -> Result<Rc<T>> {
        self.entries.get(key).cloned().ok_or_else(|| EngineError::ContentNotFound {
            dictionary: self.name.clone(),
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    //--- Unloading --------------------------------------------------------

    /// Drops the dictionary's handle; the asset is freed once no actor
    /// holds it.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn dispose_all(&mut self) {
        debug!(target: "content", "{}: disposing {} assets", self.name, self.entries.len());
        self.entries.clear();
    }
}

/// "Assets/Props/crates.fbx" → "crates".
pub fn key_from_path(path: &str) -> String {
    Path::new(path).file_stem().and_then(|s| s.to_str()).unwrap_or(path).to_string()
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    struct Texture {
        path: String,
    }

    fn texture(path: &str) -> std::result::Result<Texture, String> {
        Ok(Texture { path: path.to_string() })
    }

    #[test]
    fn loads_once_per_key() {
        let mut textures = ContentDictionary::new("textures");
        let calls = Cell::new(0);
        let loader = |path: &str| {
            calls.set(calls.get() + 1);
            texture(path)
        };

        let first = textures.load("crate", "Assets/crate.png", loader).unwrap();
        let second = textures.load("crate", "Assets/other.png", loader).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.path, "Assets/crate.png");
    }

    #[test]
    fn key_defaults_to_file_stem() {
        let mut textures = ContentDictionary::new("textures");
        textures.load_path("Assets/Props/crates.png", texture).unwrap();
        assert!(textures.contains("crates"));
        assert_eq!(key_from_path("noext"), "noext");
    }

    #[test]
    fn missing_key_names_dictionary() {
        let textures: ContentDictionary<Texture> = ContentDictionary::new("textures");
        assert_eq!(
            textures.get("grass").unwrap_err(),
            EngineError::ContentNotFound { dictionary: "textures".into(), key: "grass".into() }
        );
    }

    #[test]
    fn loader_failure_is_reported() {
        let mut models: ContentDictionary<Texture> = ContentDictionary::new("models");
        let err = models.load("teapot", "teapot.fbx", |_| Err("unsupported format")).unwrap_err();
        assert_eq!(err, EngineError::ContentLoad { key: "teapot".into(), reason: "unsupported format".into() });
        assert!(!models.contains("teapot"));
    }

    #[test]
    fn remove_and_dispose() {
        let mut textures = ContentDictionary::new("textures");
        assert!(textures.insert("a", Texture { path: "a".into() }));
        assert!(!textures.insert("a", Texture { path: "b".into() }));
        textures.insert("b", Texture { path: "b".into() });

        assert!(textures.remove("a"));
        assert!(!textures.remove("a"));
        textures.dispose_all();
        assert!(textures.is_empty());
    }
}
