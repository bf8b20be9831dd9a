//! Warning values produced by an analysis run.

use shapecheck_common::LocationId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::table::{FxIndexSet, TypeTable};
use crate::type_diff::TypeDiff;
use crate::types::{TypeId, TypeKind};

/// Display id of a warning, unique within one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarningId(pub u32);

impl fmt::Display for WarningId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id sequence owned by one analysis run. Starts at 1.
#[derive(Clone, Debug)]
pub struct WarningIds {
    next: u32,
}

impl Default for WarningIds {
    fn default() -> Self {
        WarningIds { next: 1 }
    }
}

impl WarningIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> WarningId {
        let id = WarningId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

/// Where a described type comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Primitives and other types without a creation site.
    Unknown,
    /// Allocation site, resolved through the location lookup when rendered.
    Location(LocationId),
    /// A fixed text, used for native functions.
    Literal(Arc<str>),
}

/// Human-oriented description of a type: `"<kind> originated at <origin>"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescription {
    kind: Cow<'static, str>,
    origin: Origin,
    ty: TypeId,
}

impl TypeDescription {
    pub fn of(table: &TypeTable, ty: TypeId) -> Self {
        let name = table.name(ty);
        let (kind, origin): (Cow<'static, str>, Origin) = match name.kind() {
            TypeKind::Object(iid) => ("object".into(), Origin::Location(LocationId::new(iid))),
            TypeKind::Array(iid) => ("array".into(), Origin::Location(LocationId::new(iid))),
            TypeKind::Function(iid) => {
                ("function".into(), Origin::Location(LocationId::new(iid)))
            }
            TypeKind::Frame(iid) => ("frame".into(), Origin::Location(LocationId::new(iid))),
            TypeKind::NativeFunction(full) => ("function".into(), Origin::Literal(full.clone())),
            TypeKind::GlobalScope(full) => (Cow::Owned(full.to_string()), Origin::Unknown),
            TypeKind::Null => ("null".into(), Origin::Unknown),
            primitive => (Cow::Owned(primitive.label().to_string()), Origin::Unknown),
        };
        TypeDescription { kind, origin, ty }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }
}

/// One distinct root observed at a conflicting field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedType {
    pub description: TypeDescription,
    /// Observation sites of every member of the root's class at this field.
    pub locations: Vec<LocationId>,
}

/// A field of a type was observed with genuinely inconsistent types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InconsistentTypeWarning {
    pub id: WarningId,
    pub owner: TypeDescription,
    pub field: Arc<str>,
    pub observed: Vec<ObservedType>,
    pub type_diff: Option<TypeDiff>,
    pub highlighted: FxIndexSet<TypeId>,
    pub suppressed_by_belief: bool,
}

/// A type was read through a field it did not have.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedFieldWarning {
    pub id: WarningId,
    pub owner: TypeDescription,
    pub locations: Vec<LocationId>,
    pub highlighted: FxIndexSet<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    Inconsistent(InconsistentTypeWarning),
    UndefinedField(UndefinedFieldWarning),
}

impl Warning {
    pub fn id(&self) -> WarningId {
        match self {
            Warning::Inconsistent(w) => w.id,
            Warning::UndefinedField(w) => w.id,
        }
    }

    pub fn owner(&self) -> &TypeDescription {
        match self {
            Warning::Inconsistent(w) => &w.owner,
            Warning::UndefinedField(w) => &w.owner,
        }
    }

    /// Types a visualization should emphasize for this warning.
    pub fn highlighted(&self) -> &FxIndexSet<TypeId> {
        match self {
            Warning::Inconsistent(w) => &w.highlighted,
            Warning::UndefinedField(w) => &w.highlighted,
        }
    }

    pub fn is_suppressed_by_belief(&self) -> bool {
        matches!(self, Warning::Inconsistent(w) if w.suppressed_by_belief)
    }

    pub fn as_inconsistent(&self) -> Option<&InconsistentTypeWarning> {
        match self {
            Warning::Inconsistent(w) => Some(w),
            Warning::UndefinedField(_) => None,
        }
    }
}
