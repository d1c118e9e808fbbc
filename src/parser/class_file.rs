// Class file reader.
//
// Decoding is done by jclassfile. References come from the structural parts
// (supertypes, member descriptors, Signature and annotation attributes) and
// from the constant pool. Method bodies are never decoded: every class a
// method body touches is already a CONSTANT_Class entry.

use super::descriptor::{class_constant_type, descriptor_types, signature_types};
use crate::graph::{ClassName, ClassReference, ReferenceKind};
use jclassfile::attributes::Attribute;
use jclassfile::class_file;
use jclassfile::constant_pool::ConstantPool;
use jclassfile::fields::FieldFlags;
use jclassfile::methods::MethodFlags;
use std::collections::BTreeSet;
use thiserror::Error;

const MAGIC: u32 = 0xCAFE_BABE;

/// Reasons a class file cannot be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedClassError {
    #[error("not a class file (magic {0:#010x})")]
    BadMagic(u32),
    #[error("class file truncated ({length} bytes)")]
    Truncated { length: usize },
    #[error("unreadable class file: {0}")]
    Unreadable(String),
    #[error("constant pool index {index} is not a {expected} entry")]
    BadConstantIndex { index: u16, expected: &'static str },
    #[error("invalid descriptor or signature `{0}`")]
    InvalidDescriptor(String),
}

/// Structural view of one class file
#[derive(Debug, Clone)]
pub struct ParsedClass {
    /// This class
    pub name: ClassName,

    /// Immediate superclass, `None` only for `java/lang/Object` itself
    pub super_class: Option<ClassName>,

    /// Directly implemented interfaces
    pub interfaces: Vec<ClassName>,

    /// Every other class this class references, tagged by where it was found
    pub references: BTreeSet<ClassReference>,
}

impl ParsedClass {
    /// Referenced class names, regardless of reference kind
    pub fn referenced_classes(&self) -> BTreeSet<ClassName> {
        self.references.iter().map(|r| r.target.clone()).collect()
    }
}

/// Parser for compiled `.class` files
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassFileParser;

impl ClassFileParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one class file
    pub fn parse(&self, bytes: &[u8]) -> Result<ParsedClass, MalformedClassError> {
        let magic = bytes
            .get(..4)
            .and_then(|head| <[u8; 4]>::try_from(head).ok())
            .map(u32::from_be_bytes)
            .ok_or(MalformedClassError::Truncated { length: bytes.len() })?;
        if magic != MAGIC {
            return Err(MalformedClassError::BadMagic(magic));
        }

        let class = class_file::parse(bytes).map_err(|e| MalformedClassError::Unreadable(e.to_string()))?;
        let pool = class.constant_pool();
        let mut collector = ReferenceCollector::default();

        let name = ClassName::from_internal(class_name(pool, class.this_class())?);

        let super_class = if class.super_class() == 0 {
            None
        } else {
            let super_name = ClassName::from_internal(class_name(pool, class.super_class())?);
            collector.add(super_name.clone(), ReferenceKind::Supertype);
            Some(super_name)
        };

        let mut interfaces = Vec::new();
        for index in class.interfaces() {
            let interface = ClassName::from_internal(class_name(pool, *index)?);
            collector.add(interface.clone(), ReferenceKind::Supertype);
            interfaces.push(interface);
        }

        for field in class.fields() {
            let flags = field.access_flags();
            let kind =
                member_kind(flags.contains(FieldFlags::ACC_PUBLIC) || flags.contains(FieldFlags::ACC_PROTECTED));
            collector.add_descriptor(utf8(pool, field.descriptor_index())?, kind)?;
            collect_attributes(field.attributes(), pool, kind, &mut collector)?;
        }

        for method in class.methods() {
            let flags = method.access_flags();
            let kind =
                member_kind(flags.contains(MethodFlags::ACC_PUBLIC) || flags.contains(MethodFlags::ACC_PROTECTED));
            collector.add_descriptor(utf8(pool, method.descriptor_index())?, kind)?;
            collect_attributes(method.attributes(), pool, kind, &mut collector)?;
        }

        collect_attributes(class.attributes(), pool, ReferenceKind::Supertype, &mut collector)?;
        collect_constant_pool(pool, &mut collector)?;

        let mut references = collector.finish();
        references.retain(|r| r.target != name);

        Ok(ParsedClass {
            name,
            super_class,
            interfaces,
            references,
        })
    }
}

/// Set of class names one class file references.
///
/// A class without an explicit superclass still reports `java/lang/Object.class`.
pub fn extract_references(bytes: &[u8]) -> Result<BTreeSet<ClassName>, MalformedClassError> {
    Ok(ClassFileParser::new().parse(bytes)?.referenced_classes())
}

fn member_kind(visible: bool) -> ReferenceKind {
    if visible {
        ReferenceKind::ExposedSignature
    } else {
        ReferenceKind::InternalSignature
    }
}

/// `signature_kind` tags types found in the owner's `Signature` attribute.
/// Invisible annotations are compile-time only and skipped.
fn collect_attributes(
    attributes: &[Attribute],
    pool: &[ConstantPool],
    signature_kind: ReferenceKind,
    collector: &mut ReferenceCollector,
) -> Result<(), MalformedClassError> {
    for attribute in attributes {
        match attribute {
            Attribute::Signature { signature_index } => {
                collector.add_signature(utf8(pool, *signature_index)?, signature_kind)?;
            }
            Attribute::RuntimeVisibleAnnotations { annotations, .. } => {
                for annotation in annotations {
                    collector.add_descriptor(utf8(pool, annotation.type_index())?, ReferenceKind::Annotation)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Class constants and member descriptors anywhere in the pool
fn collect_constant_pool(pool: &[ConstantPool], collector: &mut ReferenceCollector) -> Result<(), MalformedClassError> {
    for entry in pool {
        match entry {
            ConstantPool::Class { name_index } => {
                if let Some(internal) = class_constant_type(utf8(pool, *name_index)?)? {
                    collector.add(ClassName::from_internal(&internal), ReferenceKind::ConstantPool);
                }
            }
            ConstantPool::NameAndType { descriptor_index, .. }
            | ConstantPool::MethodType { descriptor_index, .. } => {
                collector.add_descriptor(utf8(pool, *descriptor_index)?, ReferenceKind::ConstantPool)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn utf8(pool: &[ConstantPool], index: u16) -> Result<&str, MalformedClassError> {
    match pool.get(index as usize) {
        Some(ConstantPool::Utf8 { value }) => Ok(value.as_str()),
        _ => Err(MalformedClassError::BadConstantIndex {
            index,
            expected: "Utf8",
        }),
    }
}

fn class_name(pool: &[ConstantPool], index: u16) -> Result<&str, MalformedClassError> {
    match pool.get(index as usize) {
        Some(ConstantPool::Class { name_index }) => utf8(pool, *name_index),
        _ => Err(MalformedClassError::BadConstantIndex {
            index,
            expected: "Class",
        }),
    }
}

/// Accumulates references, keeping one entry per (class, kind)
#[derive(Default)]
struct ReferenceCollector {
    references: BTreeSet<ClassReference>,
}

impl ReferenceCollector {
    fn add(&mut self, target: ClassName, kind: ReferenceKind) {
        self.references.insert(ClassReference::new(target, kind));
    }

    fn add_all(&mut self, internals: Vec<String>, kind: ReferenceKind) {
        for internal in internals {
            self.add(ClassName::from_internal(&internal), kind);
        }
    }

    fn add_descriptor(&mut self, descriptor: &str, kind: ReferenceKind) -> Result<(), MalformedClassError> {
        self.add_all(descriptor_types(descriptor)?, kind);
        Ok(())
    }

    fn add_signature(&mut self, signature: &str, kind: ReferenceKind) -> Result<(), MalformedClassError> {
        self.add_all(signature_types(signature)?, kind);
        Ok(())
    }

    fn finish(self) -> BTreeSet<ClassReference> {
        self.references
    }
}
