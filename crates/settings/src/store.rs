use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use ron::value::{Map as RonMap, Value as RonValue};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::SettingsError;

/// Marker trait naming a configuration section.
pub trait Settings {
    const SECTION: &'static str;
}

/// Convert any serializable struct to `ron::Value`.
fn to_ron_value<T: Serialize>(value: &T) -> Result<RonValue, SettingsError> {
    let s = ron::to_string(value)?;
    ron::from_str(&s).map_err(|_| SettingsError::Invalid("parse ron value (internal)"))
}

/// Merge default + delta recursively (maps only).
fn merge_maps(default: &RonMap, delta: &RonMap) -> RonMap {
    let mut merged = default.clone();
    for (k, v_delta) in delta.iter() {
        match (merged.get(k), v_delta) {
            (Some(RonValue::Map(def_m)), RonValue::Map(delta_m)) => {
                let rec = merge_maps(def_m, delta_m);
                merged.insert(k.clone(), RonValue::Map(rec));
            }
            _ => {
                merged.insert(k.clone(), v_delta.clone());
            }
        }
    }
    merged
}

/// Compute the recursive diff (new vs default). Empty map when identical.
fn diff_map(new_m: &RonMap, def_m: &RonMap) -> RonMap {
    let mut out = RonMap::new();
    for (k, new_v) in new_m.iter() {
        match def_m.get(k) {
            Some(RonValue::Map(def_sub)) if matches!(new_v, RonValue::Map(_)) => {
                if let RonValue::Map(new_sub) = new_v {
                    let sub = diff_map(new_sub, def_sub);
                    if !sub.is_empty() {
                        out.insert(k.clone(), RonValue::Map(sub));
                    }
                }
            }
            Some(def_v) => {
                if new_v != def_v {
                    out.insert(k.clone(), new_v.clone());
                }
            }
            None => {
                out.insert(k.clone(), new_v.clone());
            }
        }
    }
    out
}

pub struct SettingsStoreBuilder {
    settings_file: Option<PathBuf>,
}

impl SettingsStoreBuilder {
    pub fn new() -> Self {
        Self {
            settings_file: None,
        }
    }

    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SettingsStore, SettingsError> {
        let file_path = self
            .settings_file
            .ok_or(SettingsError::Invalid("settings file not specified"))?;

        if let Some(dir) = file_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let delta_map: HashMap<String, RonValue> = if file_path.exists() {
            let content = fs::read_to_string(&file_path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                ron::from_str(&content)
                    .map_err(|_| SettingsError::Invalid("parse settings file"))?
            }
        } else {
            HashMap::new()
        };

        Ok(SettingsStore {
            file_path,
            deltas: RwLock::new(delta_map),
            defaults: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
        })
    }
}

impl Default for SettingsStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe settings store: per-section defaults merged with a single
/// RON delta file; updates persist only what differs from the defaults.
pub struct SettingsStore {
    file_path: PathBuf,
    deltas: RwLock<HashMap<String, RonValue>>,
    defaults: RwLock<HashMap<&'static str, RonMap>>,
    values: RwLock<HashMap<&'static str, RonValue>>,
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }

    /// Register a section type: loads defaults and applies any delta already
    /// present in the settings file.
    pub fn register<T>(&self) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
    {
        let section = T::SECTION;

        if self.values.read().unwrap().contains_key(section) {
            return Err(SettingsError::Invalid("section already registered"));
        }

        let default_map = match to_ron_value(&T::default())? {
            RonValue::Map(m) => m,
            _ => return Err(SettingsError::Invalid("default must serialize to map")),
        };

        let merged_value = {
            let deltas = self.deltas.read().unwrap();
            match deltas.get(section) {
                Some(RonValue::Map(delta_m)) => RonValue::Map(merge_maps(&default_map, delta_m)),
                Some(other) => {
                    tracing::warn!(section, "non-map delta in settings file, taking it as-is");
                    other.clone()
                }
                None => RonValue::Map(default_map.clone()),
            }
        };

        self.defaults.write().unwrap().insert(section, default_map);
        self.values.write().unwrap().insert(section, merged_value);
        Ok(())
    }

    /// Snapshot of the effective (default + delta) section value.
    pub fn get<T>(&self) -> Result<Arc<T>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        let values = self.values.read().unwrap();
        let value = values.get(T::SECTION).ok_or(SettingsError::NotRegistered)?;
        let ron_str = ron::to_string(value)?;
        let inst: T =
            ron::from_str(&ron_str).map_err(|_| SettingsError::Invalid("deserialize section"))?;
        Ok(Arc::new(inst))
    }

    /// Update via mutable closure. Only the recursive diff against the
    /// defaults is persisted.
    pub fn update<T, F>(&self, mutator: F) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let section = T::SECTION;

        let mut current: T = {
            let values = self.values.read().unwrap();
            let raw = values.get(section).ok_or(SettingsError::NotRegistered)?;
            let s = ron::to_string(raw)?;
            ron::from_str(&s).map_err(|_| SettingsError::Invalid("deserialize current section"))?
        };
        mutator(&mut current);

        let new_map = match to_ron_value(&current)? {
            RonValue::Map(m) => m,
            _ => return Err(SettingsError::Invalid("updated must serialize to map")),
        };

        let diff_root = {
            let defaults = self.defaults.read().unwrap();
            let default_map = defaults.get(section).ok_or(SettingsError::NotRegistered)?;
            diff_map(&new_map, default_map)
        };

        self.values
            .write()
            .unwrap()
            .insert(section, RonValue::Map(new_map));

        {
            let mut deltas = self.deltas.write().unwrap();
            if diff_root.is_empty() {
                deltas.remove(section);
            } else {
                deltas.insert(section.to_string(), RonValue::Map(diff_root));
            }
        }

        self.persist_deltas()
    }

    /// Re-read the delta file and re-merge every registered section.
    pub fn reload(&self) -> Result<(), SettingsError> {
        let content = if self.file_path.exists() {
            fs::read_to_string(&self.file_path)?
        } else {
            String::new()
        };

        let new_deltas: HashMap<String, RonValue> = if content.trim().is_empty() {
            HashMap::new()
        } else {
            ron::from_str(&content)
                .map_err(|_| SettingsError::Invalid("reload parse settings file"))?
        };

        *self.deltas.write().unwrap() = new_deltas;

        let defaults_snapshot: HashMap<&'static str, RonMap> =
            self.defaults.read().unwrap().clone();
        let deltas = self.deltas.read().unwrap();
        let mut values = self.values.write().unwrap();

        for (section, default_map) in defaults_snapshot {
            let merged = match deltas.get(section) {
                Some(RonValue::Map(delta_m)) => RonValue::Map(merge_maps(&default_map, delta_m)),
                Some(other) => other.clone(),
                None => RonValue::Map(default_map.clone()),
            };
            values.insert(section, merged);
        }

        Ok(())
    }

    /// Atomic write: tmp file + rename.
    fn persist_deltas(&self) -> Result<(), SettingsError> {
        let deltas = self.deltas.read().unwrap();

        let mut clean: HashMap<String, RonValue> = HashMap::new();
        for (k, v) in deltas.iter() {
            match v {
                RonValue::Map(m) if m.is_empty() => {}
                _ => {
                    clean.insert(k.clone(), v.clone());
                }
            }
        }

        let pretty = ron::ser::PrettyConfig::default();
        let ron_string = ron::ser::to_string_pretty(&clean, pretty)?;

        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, ron_string)?;
        fs::rename(&tmp, &self.file_path)?;
        Ok(())
    }
}
