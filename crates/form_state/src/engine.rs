use serde_json::{Map, Value};

use crate::errors::FormStateError;
use crate::key_path::KeyPath;

/// Live form values, structurally conformant to the template shape the state
/// was built from. The root is always a JSON object.
///
/// Mutations never touch `self`; they clone the whole tree, edit the clone
/// and hand it back. Forms are small, so the full clone is cheaper than it
/// looks and keeps every prior snapshot valid.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState(Value);

impl FormState {
    /// Build the initial state for a template shape.
    ///
    /// Arrays always start empty (a shape's array contents are row templates,
    /// not literal rows), nested objects recurse, and every primitive leaf
    /// becomes the zero value of its kind: string -> `""`, number -> `0`,
    /// bool -> `false`. A non-object shape yields an empty form.
    pub fn from_template(shape: &Value) -> Self {
        match shape {
            Value::Object(map) => FormState(Value::Object(build_initial(map))),
            _ => FormState(Value::Object(Map::new())),
        }
    }

    /// Set the value at `path`, creating missing intermediate objects on the
    /// way down. The final segment replaces whatever was there.
    ///
    /// Numeric segments index into array fields, so a row field inside a
    /// repeatable section is addressed as e.g. `["contacts", "0", "email"]`.
    pub fn update_field(&self, path: &KeyPath, value: Value) -> Result<Self, FormStateError> {
        let (last, parents) = match path.as_slice().split_last() {
            Some(split) => split,
            None => return Err(FormStateError::InvalidPath),
        };

        let mut next = self.0.clone();
        let mut cursor = &mut next;
        for key in parents {
            cursor = match cursor {
                Value::Array(rows) => {
                    let index = parse_index(key)
                        .filter(|i| *i < rows.len())
                        .ok_or_else(|| FormStateError::PathNotFound(path.clone()))?;
                    &mut rows[index]
                }
                other => {
                    let slot = as_object_mut(other)
                        .entry(key.clone())
                        .or_insert(Value::Null);
                    // A primitive in the middle of the path cannot hold
                    // children; it gets replaced by an empty container.
                    if !slot.is_object() && !slot.is_array() {
                        *slot = Value::Object(Map::new());
                    }
                    slot
                }
            };
        }

        match cursor {
            Value::Array(rows) => {
                let index = parse_index(last)
                    .ok_or_else(|| FormStateError::PathNotFound(path.clone()))?;
                if index > rows.len() {
                    return Err(FormStateError::IndexOutOfRange {
                        index,
                        len: rows.len(),
                    });
                }
                if index == rows.len() {
                    rows.push(value);
                } else {
                    rows[index] = value;
                }
            }
            other => {
                as_object_mut(other).insert(last.clone(), value);
            }
        }
        Ok(FormState(next))
    }

    /// Append one row built from `row_template` to the array at `path`.
    ///
    /// Unlike [`update_field`](Self::update_field) this does not create
    /// missing containers: the array must already exist.
    pub fn add_array_row(
        &self,
        path: &KeyPath,
        row_template: &Value,
    ) -> Result<Self, FormStateError> {
        if path.is_empty() {
            return Err(FormStateError::InvalidPath);
        }

        let mut next = self.0.clone();
        let slot = resolve_mut(&mut next, path)?;
        let rows = slot
            .as_array_mut()
            .ok_or_else(|| FormStateError::NotAnArray(path.clone()))?;

        rows.push(FormState::from_template(row_template).into_value());
        Ok(FormState(next))
    }

    /// Remove the row at `index` from the array at `path`; remaining rows
    /// keep their relative order.
    pub fn remove_array_row(&self, path: &KeyPath, index: usize) -> Result<Self, FormStateError> {
        if path.is_empty() {
            return Err(FormStateError::InvalidPath);
        }

        let mut next = self.0.clone();
        let slot = resolve_mut(&mut next, path)?;
        let rows = slot
            .as_array_mut()
            .ok_or_else(|| FormStateError::NotAnArray(path.clone()))?;

        if index >= rows.len() {
            return Err(FormStateError::IndexOutOfRange {
                index,
                len: rows.len(),
            });
        }

        rows.remove(index);
        Ok(FormState(next))
    }

    /// Read the value at `path`, if present.
    pub fn get(&self, path: &KeyPath) -> Option<&Value> {
        let mut cursor = &self.0;
        for key in path.as_slice() {
            cursor = match cursor {
                Value::Object(map) => map.get(key)?,
                Value::Array(rows) => rows.get(parse_index(key)?)?,
                _ => return None,
            };
        }
        Some(cursor)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Hand the tree over for submission.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for FormState {
    fn default() -> Self {
        FormState(Value::Object(Map::new()))
    }
}

fn build_initial(shape: &Map<String, Value>) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, val) in shape {
        let initial = match val {
            Value::Array(_) => Value::Array(Vec::new()),
            Value::Object(nested) => Value::Object(build_initial(nested)),
            primitive => default_primitive(primitive),
        };
        result.insert(key.clone(), initial);
    }
    result
}

fn default_primitive(hint: &Value) -> Value {
    match hint {
        Value::Bool(_) => Value::Bool(false),
        Value::Number(_) => Value::Number(0.into()),
        // everything else, null hints included, takes the string base
        _ => Value::String(String::new()),
    }
}

fn parse_index(key: &str) -> Option<usize> {
    key.parse().ok()
}

/// Walk `path` without creating anything; every segment must exist.
fn resolve_mut<'a>(root: &'a mut Value, path: &KeyPath) -> Result<&'a mut Value, FormStateError> {
    let mut cursor = root;
    for key in path.as_slice() {
        cursor = match cursor {
            Value::Object(map) => map
                .get_mut(key)
                .ok_or_else(|| FormStateError::PathNotFound(path.clone()))?,
            Value::Array(rows) => {
                let index = parse_index(key)
                    .filter(|i| *i < rows.len())
                    .ok_or_else(|| FormStateError::PathNotFound(path.clone()))?;
                &mut rows[index]
            }
            _ => return Err(FormStateError::PathNotFound(path.clone())),
        };
    }
    Ok(cursor)
}

/// The slot in an object walk is an object by construction: the root always
/// is, and every intermediate slot gets coerced before descending.
fn as_object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("slot was just coerced to an object"),
    }
}
