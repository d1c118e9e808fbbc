// Field/method descriptors and generic signatures.
//
// Plain descriptors go through jdescriptor. Generic `Signature` attributes use
// a small recursive-descent scanner, since jdescriptor only covers the
// descriptor grammar. Only the class types either mentions are collected.

use super::MalformedClassError;
use jdescriptor::{MethodDescriptor, TypeDescriptor};
use std::str::FromStr;

/// Maximum array dimensions a type may declare
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Maximum nesting of type arguments in a generic signature
pub const MAX_TYPE_NESTING: usize = 255;

/// Internal names of the class types in a field or method descriptor
pub fn descriptor_types(descriptor: &str) -> Result<Vec<String>, MalformedClassError> {
    check_array_dimensions(descriptor)?;
    let invalid = || MalformedClassError::InvalidDescriptor(descriptor.to_string());

    if descriptor.starts_with('(') {
        let method = MethodDescriptor::from_str(descriptor).map_err(|_| invalid())?;
        Ok(method
            .parameter_types()
            .iter()
            .chain(std::iter::once(method.return_type()))
            .filter_map(class_of)
            .collect())
    } else {
        let field = TypeDescriptor::from_str(descriptor).map_err(|_| invalid())?;
        Ok(class_of(&field).into_iter().collect())
    }
}

/// Element type of a `CONSTANT_Class` name, which may be an array descriptor.
///
/// Returns `None` for arrays of primitives.
pub fn class_constant_type(name: &str) -> Result<Option<String>, MalformedClassError> {
    if !name.starts_with('[') {
        return Ok(Some(name.to_string()));
    }
    Ok(descriptor_types(name)?.pop())
}

fn class_of(descriptor: &TypeDescriptor) -> Option<String> {
    match descriptor {
        TypeDescriptor::Object(name) => Some(internal_name(name)),
        TypeDescriptor::Array(element, _) => class_of(element),
        _ => None,
    }
}

fn internal_name(name: &str) -> String {
    match name.strip_prefix('L').and_then(|rest| rest.strip_suffix(';')) {
        Some(inner) => inner.to_string(),
        None => name.to_string(),
    }
}

fn check_array_dimensions(descriptor: &str) -> Result<(), MalformedClassError> {
    let mut run = 0;
    for byte in descriptor.bytes() {
        if byte == b'[' {
            run += 1;
            if run > MAX_ARRAY_DIMENSIONS {
                return Err(MalformedClassError::InvalidDescriptor(format!(
                    "more than {} array dimensions",
                    MAX_ARRAY_DIMENSIONS
                )));
            }
        } else {
            run = 0;
        }
    }
    Ok(())
}

/// Collect the internal names of every class type mentioned in a generic
/// signature.
///
/// Nested types written as `Lcom/Outer<TT;>.Inner;` yield both `com/Outer`
/// and `com/Outer$Inner`.
pub fn signature_types(signature: &str) -> Result<Vec<String>, MalformedClassError> {
    let mut out = Vec::new();
    let mut scanner = SignatureScanner::new(signature);
    scanner.scan(&mut out)?;
    Ok(out)
}

struct SignatureScanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> SignatureScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn invalid(&self) -> MalformedClassError {
        MalformedClassError::InvalidDescriptor(self.source.to_string())
    }

    fn too_deep(&self, what: &str, limit: usize) -> MalformedClassError {
        MalformedClassError::InvalidDescriptor(format!("more than {} {}", limit, what))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<(), MalformedClassError> {
        match self.bump() {
            Some(byte) if byte == expected => Ok(()),
            _ => Err(self.invalid()),
        }
    }

    /// Top level: optional type parameters, then any mix of parameter lists,
    /// return types, throws clauses and field types.
    fn scan(&mut self, out: &mut Vec<String>) -> Result<(), MalformedClassError> {
        if self.bytes.is_empty() {
            return Err(self.invalid());
        }
        if self.peek() == Some(b'<') {
            self.type_parameters(out)?;
        }
        while let Some(byte) = self.peek() {
            match byte {
                b'(' | b')' | b'^' | b'V' => {
                    self.pos += 1;
                }
                _ => self.field_type(out)?,
            }
        }
        Ok(())
    }

    fn field_type(&mut self, out: &mut Vec<String>) -> Result<(), MalformedClassError> {
        let mut dimensions = 0;
        while self.peek() == Some(b'[') {
            self.pos += 1;
            dimensions += 1;
            if dimensions > MAX_ARRAY_DIMENSIONS {
                return Err(self.too_deep("array dimensions", MAX_ARRAY_DIMENSIONS));
            }
        }
        match self.bump() {
            Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => Ok(()),
            Some(b'L') => self.class_type(out),
            Some(b'T') => {
                self.identifier(b";")?;
                self.expect(b';')
            }
            _ => Err(self.invalid()),
        }
    }

    fn class_type(&mut self, out: &mut Vec<String>) -> Result<(), MalformedClassError> {
        let mut name = self.identifier(b";<.")?.to_string();
        loop {
            match self.bump() {
                Some(b';') => {
                    out.push(name);
                    return Ok(());
                }
                Some(b'<') => {
                    self.depth += 1;
                    if self.depth > MAX_TYPE_NESTING {
                        return Err(self.too_deep("nested type arguments", MAX_TYPE_NESTING));
                    }
                    self.type_arguments(out)?;
                    self.depth -= 1;
                }
                Some(b'.') => {
                    let inner = self.identifier(b";<.")?;
                    let nested = format!("{}${}", name, inner);
                    out.push(std::mem::replace(&mut name, nested));
                }
                _ => return Err(self.invalid()),
            }
        }
    }

    /// Arguments after an opening `<`, through the closing `>`
    fn type_arguments(&mut self, out: &mut Vec<String>) -> Result<(), MalformedClassError> {
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b'*') => {
                    self.pos += 1;
                }
                Some(b'+' | b'-') => {
                    self.pos += 1;
                    self.field_type(out)?;
                }
                Some(_) => self.field_type(out)?,
                None => return Err(self.invalid()),
            }
        }
    }

    /// `<T:Ljava/lang/Object;U::Ljava/lang/Comparable<TU;>;>`
    fn type_parameters(&mut self, out: &mut Vec<String>) -> Result<(), MalformedClassError> {
        self.expect(b'<')?;
        loop {
            if self.peek() == Some(b'>') {
                self.pos += 1;
                return Ok(());
            }
            self.identifier(b":")?;
            if self.peek() != Some(b':') {
                return Err(self.invalid());
            }
            while self.peek() == Some(b':') {
                self.pos += 1;
                if matches!(self.peek(), Some(b'L' | b'T' | b'[')) {
                    self.field_type(out)?;
                }
            }
        }
    }

    /// Read a non-empty run of bytes up to (not including) any stop byte
    fn identifier(&mut self, stops: &[u8]) -> Result<&'a str, MalformedClassError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if stops.contains(&byte) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start || self.peek().is_none() {
            return Err(self.invalid());
        }
        let source = self.source;
        Ok(&source[start..self.pos])
    }
}
