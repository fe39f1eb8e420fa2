//! Capability descriptors handed to the host framework.
//!
//! A [`Caps`] is an ordered list of [`Structure`]s, each a media type name
//! plus typed fields. `Display` renders the framework's textual form, e.g.
//! `video/x-raw-yuv, format=(fourcc)I420, width=(int)[ 160, 640 ]`.

use std::fmt;

use crate::pixel_format::FourCC;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i32),
    /// Inclusive on both ends.
    IntRange { min: i32, max: i32 },
    Fraction(i32, i32),
    /// Inclusive on both ends, each bound as (numerator, denominator).
    FractionRange { min: (i32, i32), max: (i32, i32) },
    FourCC(FourCC),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "(boolean){}", b),
            Self::Int(i) => write!(f, "(int){}", i),
            Self::IntRange { min, max } => write!(f, "(int)[ {}, {} ]", min, max),
            Self::Fraction(n, d) => write!(f, "(fraction){}/{}", n, d),
            Self::FractionRange { min, max } => {
                write!(f, "(fraction)[ {}/{}, {}/{} ]", min.0, min.1, max.0, max.1)
            }
            Self::FourCC(cc) => write!(f, "(fourcc){}", cc),
            Self::Str(s) => write!(f, "(string){}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    name: String,
    fields: Vec<(String, Value)>,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder form of [`Structure::set`].
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Replaces the field if present, appends it otherwise.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (name, value) in &self.fields {
            write!(f, ", {}={}", name, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Caps {
    structures: Vec<Structure>,
}

impl Caps {
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_simple(structure: Structure) -> Self {
        Self {
            structures: vec![structure],
        }
    }

    pub fn structure(&self, index: usize) -> Option<&Structure> {
        self.structures.get(index)
    }

    pub fn structure_mut(&mut self, index: usize) -> Option<&mut Structure> {
        self.structures.get_mut(index)
    }

    /// Moves every structure of `other` to the end of `self`.
    pub fn append(&mut self, other: Caps) {
        self.structures.extend(other.structures);
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter()
    }

    /// 导出为 JSON，便于调试或持久化设备能力
    #[cfg(feature = "serialize")]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Caps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.structures.is_empty() {
            return write!(f, "EMPTY");
        }
        for (i, s) in self.structures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", s)?;
        }
        Ok(())
    }
}
