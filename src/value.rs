//! Values bound into template locals
//!
//! Plain data (strings, numbers, lists, maps) is carried directly. Domain objects
//! go through the [`Object`] trait, which is where the naming convention, the
//! `to_model` adaptation and the array-like capability live.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::naming::ModelName;

/// The named-variable binding surface exposed to a template
pub type Locals = BTreeMap<String, Value>;

/// Already-rendered markup; joining and wrapping never escape it again
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeString(String);

impl SafeString {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SafeString {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<&str> for SafeString {
    fn from(markup: &str) -> Self {
        Self(markup.to_string())
    }
}

/// A domain object that can be rendered through a partial
pub trait Object: fmt::Debug + Send + Sync {
    /// Runtime type name, used as the path memo key
    fn type_name(&self) -> &str;

    /// Naming capability; objects returning `None` cannot be rendered by path
    fn model_name(&self) -> Option<ModelName> {
        None
    }

    /// Representation to use for naming purposes instead of `self`
    fn to_model(&self) -> Option<Value> {
        None
    }

    /// Field access for templates
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Array-like capability
    fn as_sequence(&self) -> Option<Vec<Value>> {
        None
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Arc<dyn Object>),
}

impl Value {
    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type name used for path memoization and diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Object(object) => object.type_name(),
        }
    }

    /// Convert to a sequence if the value is array-like
    pub fn as_sequence(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::Object(object) => object.as_sequence(),
            _ => None,
        }
    }

    /// Look up a field of a map or object
    pub fn get(&self, field: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(field).cloned(),
            Value::Object(object) => object.field(field),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Object(object) => match object.field("to_s") {
                Some(text) => write!(f, "{}", text),
                None => f.write_str(object.type_name()),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

/// Data files mark domain objects with a `_type` key; other tables stay maps
impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(n) => Value::Int(n),
            toml::Value::Float(n) => Value::Float(n),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            toml::Value::Table(mut table) => match table.remove("_type") {
                Some(toml::Value::String(type_name)) => {
                    let mut record = Record::new(type_name);
                    for (key, field) in table {
                        record = record.with_field(key, Value::from(field));
                    }
                    Value::object(record)
                }
                Some(other) => {
                    table.insert("_type".to_string(), other);
                    Value::Map(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
                }
                None => Value::Map(table.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
            },
        }
    }
}

/// A generic domain object: a type name plus fields
#[derive(Debug, Clone)]
pub struct Record {
    type_name: String,
    model_name: Option<ModelName>,
    fields: BTreeMap<String, Value>,
    model: Option<Value>,
}

impl Record {
    /// A record whose model name follows from its type name
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            model_name: Some(ModelName::new(type_name.clone())),
            type_name,
            fields: BTreeMap::new(),
            model: None,
        }
    }

    /// A record with no naming capability
    pub fn plain(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            model_name: None,
            fields: BTreeMap::new(),
            model: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_model_name(mut self, model_name: ModelName) -> Self {
        self.model_name = Some(model_name);
        self
    }

    /// Delegate naming to another value
    pub fn with_to_model(mut self, model: impl Into<Value>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn model_name(&self) -> Option<ModelName> {
        self.model_name.clone()
    }

    fn to_model(&self) -> Option<Value> {
        self.model.clone()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_array_like() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list.as_sequence().map(|s| s.len()), Some(2));
        assert!(Value::from("x").as_sequence().is_none());
    }

    #[test]
    fn test_record_fields_and_display() {
        let user = Value::from(Record::new("User").with_field("name", "ada"));
        assert_eq!(user.get("name"), Some(Value::from("ada")));
        assert_eq!(user.type_name(), "User");
        assert_eq!(user.to_string(), "User");
    }

    #[test]
    fn test_toml_table_with_type_becomes_record() {
        let parsed: toml::Value = toml::from_str(
            r#"
            [user]
            _type = "Admin::User"
            name = "ada"
            "#,
        )
        .expect("valid toml");
        let value = Value::from(parsed);
        let user = value.get("user").expect("user present");
        assert_eq!(user.type_name(), "Admin::User");
        assert_eq!(user.get("name"), Some(Value::from("ada")));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Int(2)]).to_string(),
            "a, 2"
        );
    }
}
