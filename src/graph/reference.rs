use serde::{Deserialize, Serialize};
use super::ClassName;

/// Where in a class file a reference to another class was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Superclass or implemented interface (including generic supertype arguments)
    Supertype,

    /// Type in the signature of a public or protected field or method
    ExposedSignature,

    /// Type in the signature of a package-private or private member
    InternalSignature,

    /// Annotation type or annotation element value
    Annotation,

    /// Class constant or member descriptor in the constant pool (code references)
    ConstantPool,
}

impl ReferenceKind {
    /// Whether the referenced type leaks into the class's public surface
    pub fn is_exposed(&self) -> bool {
        matches!(self, ReferenceKind::Supertype | ReferenceKind::ExposedSignature)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReferenceKind::Supertype => "supertype",
            ReferenceKind::ExposedSignature => "exposed signature",
            ReferenceKind::InternalSignature => "internal signature",
            ReferenceKind::Annotation => "annotation",
            ReferenceKind::ConstantPool => "constant pool",
        }
    }
}

/// A reference from one class to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassReference {
    /// The referenced class
    pub target: ClassName,

    /// Kind of reference
    pub kind: ReferenceKind,
}

impl ClassReference {
    pub fn new(target: ClassName, kind: ReferenceKind) -> Self {
        Self { target, kind }
    }
}
