//! Type names and their kinds.
//!
//! The tracer names every runtime type with a string such as `object(12)`,
//! `function(40)`, `number` or `native function push`. Names are decoded once
//! into a [`TypeKind`] when they enter the [`TypeInterner`](crate::TypeInterner)
//! and are referred to by [`TypeId`] afterwards.

use std::fmt;
use std::sync::Arc;

/// Interned handle of a type name.
///
/// Ids are dense and cheap to copy. They carry no ordering meaning: the
/// lexicographic order of type names is always taken from the name text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NUMBER: TypeId = TypeId(0);
    pub const BOOLEAN: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const UNDEFINED: TypeId = TypeId(3);
    pub const NULL: TypeId = TypeId(4);

    /// Number of pre-interned primitive ids.
    pub const PRIMITIVE_COUNT: u32 = 5;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is one of the five primitive ids.
    #[inline]
    pub fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }
}

/// Decoded kind of a type name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Number,
    String,
    Boolean,
    Undefined,
    /// `object(null)`
    Null,
    Object(Arc<str>),
    Array(Arc<str>),
    Function(Arc<str>),
    Frame(Arc<str>),
    /// `native function <name>`; carries the full type name.
    NativeFunction(Arc<str>),
    /// `global scope...`; carries the full type name.
    GlobalScope(Arc<str>),
}

/// Error for type names the tracer should never have produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeNameError {
    Empty,
    /// A `kind(` prefix without the closing parenthesis.
    Unterminated(String),
    /// `kind()` with nothing between the parentheses.
    MissingIid(String),
    Unknown(String),
}

impl fmt::Display for TypeNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNameError::Empty => write!(f, "empty type name"),
            TypeNameError::Unterminated(name) => {
                write!(f, "malformed type name '{name}': missing closing ')'")
            }
            TypeNameError::MissingIid(name) => {
                write!(f, "malformed type name '{name}': missing instruction id")
            }
            TypeNameError::Unknown(name) => write!(f, "unknown type name kind '{name}'"),
        }
    }
}

impl std::error::Error for TypeNameError {}

const PRIMITIVE_NAMES: [(&str, TypeKind); 5] = [
    ("number", TypeKind::Number),
    ("boolean", TypeKind::Boolean),
    ("string", TypeKind::String),
    ("undefined", TypeKind::Undefined),
    ("object(null)", TypeKind::Null),
];

impl TypeKind {
    /// Decode a tracer type name.
    pub fn parse(name: &str) -> Result<TypeKind, TypeNameError> {
        if name.is_empty() {
            return Err(TypeNameError::Empty);
        }
        if let Some((_, kind)) = PRIMITIVE_NAMES.iter().find(|(n, _)| *n == name) {
            return Ok(kind.clone());
        }
        if name == "null" {
            return Ok(TypeKind::Null);
        }
        if name.starts_with("native function") {
            return Ok(TypeKind::NativeFunction(Arc::from(name)));
        }
        if name.starts_with("global scope") {
            return Ok(TypeKind::GlobalScope(Arc::from(name)));
        }

        let Some(open) = name.find('(') else {
            return Err(TypeNameError::Unknown(name.to_string()));
        };
        let Some(iid) = name[open + 1..].strip_suffix(')') else {
            return Err(TypeNameError::Unterminated(name.to_string()));
        };
        if iid.is_empty() {
            return Err(TypeNameError::MissingIid(name.to_string()));
        }
        let iid: Arc<str> = Arc::from(iid);
        match &name[..open] {
            "object" => Ok(TypeKind::Object(iid)),
            "array" => Ok(TypeKind::Array(iid)),
            "function" => Ok(TypeKind::Function(iid)),
            "frame" => Ok(TypeKind::Frame(iid)),
            _ => Err(TypeNameError::Unknown(name.to_string())),
        }
    }

    /// Label used for this kind inside canonical representations.
    ///
    /// Objects, arrays, functions and frames collapse to their kind word so
    /// that renamed but identical shapes compare equal; native functions and
    /// global scopes keep their full name.
    pub fn label(&self) -> &str {
        match self {
            TypeKind::Number => "number",
            TypeKind::String => "string",
            TypeKind::Boolean => "boolean",
            TypeKind::Undefined => "undefined",
            TypeKind::Null => "null",
            TypeKind::Object(_) => "object",
            TypeKind::Array(_) => "array",
            TypeKind::Function(_) => "function",
            TypeKind::Frame(_) => "frame",
            TypeKind::NativeFunction(name) | TypeKind::GlobalScope(name) => name,
        }
    }

    /// Instruction id of the allocation site, for kinds that have one.
    pub fn iid(&self) -> Option<&str> {
        match self {
            TypeKind::Object(iid)
            | TypeKind::Array(iid)
            | TypeKind::Function(iid)
            | TypeKind::Frame(iid) => Some(iid),
            _ => None,
        }
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, TypeKind::Function(_))
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeKind::Number
                | TypeKind::String
                | TypeKind::Boolean
                | TypeKind::Undefined
                | TypeKind::Null
        )
    }
}

/// A type name together with its decoded kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeName {
    text: Arc<str>,
    kind: TypeKind,
}

impl TypeName {
    pub fn parse(text: &str) -> Result<TypeName, TypeNameError> {
        let kind = TypeKind::parse(text)?;
        Ok(TypeName {
            text: Arc::from(text),
            kind,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) fn primitive_names() -> impl Iterator<Item = &'static str> {
    PRIMITIVE_NAMES.iter().map(|(name, _)| *name)
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
