use serde_json::{Map, Number, Value as JsonValue};

/// Key of a PHP array entry. PHP arrays are ordered maps whose keys are
/// either integers or byte strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhpKey {
    Int(i64),
    Str(Vec<u8>),
}

impl PhpKey {
    /// Build a string key from UTF-8 text
    pub fn str(s: impl AsRef<str>) -> Self {
        PhpKey::Str(s.as_ref().as_bytes().to_vec())
    }

    /// Key as UTF-8 text, if it is a valid UTF-8 string key
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpKey::Str(bytes) => std::str::from_utf8(bytes).ok(),
            PhpKey::Int(_) => None,
        }
    }
}

/// A value in PHP's native serialization model.
///
/// Strings are raw byte strings: PHP length prefixes count bytes, not
/// characters, which is exactly the property the repair pipeline guards.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Vec<u8>),
    Array(Vec<(PhpKey, PhpValue)>),
}

impl PhpValue {
    /// Build a string value from UTF-8 text
    pub fn str(s: impl AsRef<str>) -> Self {
        PhpValue::Str(s.as_ref().as_bytes().to_vec())
    }

    /// Build an array with contiguous zero-based integer keys
    pub fn list(values: Vec<PhpValue>) -> Self {
        PhpValue::Array(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (PhpKey::Int(i as i64), v))
                .collect(),
        )
    }

    pub fn as_array(&self) -> Option<&[(PhpKey, PhpValue)]> {
        match self {
            PhpValue::Array(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::Str(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Integer view: accepts `i:N;` and numeric strings, which the source
    /// data uses interchangeably for counts
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PhpValue::Int(i) => Some(*i),
            PhpValue::Str(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
            _ => None,
        }
    }

    /// Look up a string-keyed entry in an array value
    pub fn get(&self, key: &str) -> Option<&PhpValue> {
        self.as_array()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// First present entry among alternative key spellings
    pub fn get_any(&self, keys: &[&str]) -> Option<&PhpValue> {
        keys.iter().find_map(|k| self.get(k))
    }

    /// Convert to JSON for display. Non-UTF-8 string bytes are replaced
    /// lossily; integer and string keys both become object keys.
    pub fn to_json(&self) -> JsonValue {
        match self {
            PhpValue::Null => JsonValue::Null,
            PhpValue::Bool(b) => JsonValue::Bool(*b),
            PhpValue::Int(i) => JsonValue::Number((*i).into()),
            PhpValue::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            PhpValue::Str(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
            PhpValue::Array(entries) => {
                // A contiguous zero-based integer-keyed array maps to a JSON list
                let is_list = entries
                    .iter()
                    .enumerate()
                    .all(|(i, (k, _))| *k == PhpKey::Int(i as i64));
                if is_list {
                    JsonValue::Array(entries.iter().map(|(_, v)| v.to_json()).collect())
                } else {
                    let mut map = Map::new();
                    for (k, v) in entries {
                        let key = match k {
                            PhpKey::Int(i) => i.to_string(),
                            PhpKey::Str(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                        };
                        map.insert(key, v.to_json());
                    }
                    JsonValue::Object(map)
                }
            }
        }
    }
}
