// Minimal class file writer for unit tests

use std::collections::HashMap;

#[derive(Default)]
struct PoolWriter {
    bytes: Vec<u8>,
    next: u16,
    utf8s: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolWriter {
    fn new() -> Self {
        Self {
            next: 1,
            ..Self::default()
        }
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8s.get(value) {
            return index;
        }
        let index = self.next;
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self.next += 1;
        self.utf8s.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(&index) = self.classes.get(name) {
            return index;
        }
        let name_index = self.utf8(name);
        let index = self.next;
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.next += 1;
        self.classes.insert(name.to_string(), index);
        index
    }

    fn string(&mut self, value: &str) -> u16 {
        let utf8 = self.utf8(value);
        let index = self.next;
        self.bytes.push(8);
        self.bytes.extend_from_slice(&utf8.to_be_bytes());
        self.next += 1;
        index
    }

    fn long(&mut self, value: i64) -> u16 {
        let index = self.next;
        self.bytes.push(5);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.next += 2;
        index
    }
}

/// Builds syntactically valid class files with chosen references
pub(crate) struct ClassFileBuilder {
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<(u16, String, String)>,
    methods: Vec<(u16, String, String)>,
    class_refs: Vec<String>,
    signature: Option<String>,
    annotations: Vec<String>,
}

impl ClassFileBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            class_refs: Vec::new(),
            signature: None,
            annotations: Vec::new(),
        }
    }

    pub(crate) fn extends(mut self, name: &str) -> Self {
        self.super_name = Some(name.to_string());
        self
    }

    pub(crate) fn without_super(mut self) -> Self {
        self.super_name = None;
        self
    }

    pub(crate) fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub(crate) fn field(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.fields.push((access, name.to_string(), descriptor.to_string()));
        self
    }

    pub(crate) fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push((access, name.to_string(), descriptor.to_string()));
        self
    }

    /// Add a CONSTANT_Class entry, as a method body would
    pub(crate) fn references(mut self, name: &str) -> Self {
        self.class_refs.push(name.to_string());
        self
    }

    pub(crate) fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub(crate) fn annotated(mut self, descriptor: &str) -> Self {
        self.annotations.push(descriptor.to_string());
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::new();
        let this_index = pool.class(&self.name);
        let super_index = self.super_name.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        let fields: Vec<(u16, u16, u16)> = self
            .fields
            .iter()
            .map(|(access, name, desc)| (*access, pool.utf8(name), pool.utf8(desc)))
            .collect();
        let methods: Vec<(u16, u16, u16)> = self
            .methods
            .iter()
            .map(|(access, name, desc)| (*access, pool.utf8(name), pool.utf8(desc)))
            .collect();
        for class_ref in &self.class_refs {
            pool.class(class_ref);
        }
        pool.long(42);
        pool.string("constant");
        let code_name = pool.utf8("Code");
        let signature = self
            .signature
            .as_deref()
            .map(|s| (pool.utf8("Signature"), pool.utf8(s)));
        let annotations = if self.annotations.is_empty() {
            None
        } else {
            let types: Vec<u16> = self.annotations.iter().map(|a| pool.utf8(a)).collect();
            Some((pool.utf8("RuntimeVisibleAnnotations"), types))
        };

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&pool.next.to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&this_index.to_be_bytes());
        out.extend_from_slice(&super_index.to_be_bytes());
        push_indices(&mut out, &interfaces);

        out.extend_from_slice(&(fields.len() as u16).to_be_bytes());
        for (access, name, desc) in &fields {
            out.extend_from_slice(&access.to_be_bytes());
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&desc.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes());
        }

        out.extend_from_slice(&(methods.len() as u16).to_be_bytes());
        for (access, name, desc) in &methods {
            out.extend_from_slice(&access.to_be_bytes());
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&desc.to_be_bytes());
            // Code: max_stack, max_locals, `return`, no handlers, no attributes
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&code_name.to_be_bytes());
            out.extend_from_slice(&13u32.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&1u32.to_be_bytes());
            out.push(0xB1);
            out.extend_from_slice(&0u16.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes());
        }

        let attribute_count = signature.is_some() as u16 + annotations.is_some() as u16;
        out.extend_from_slice(&attribute_count.to_be_bytes());
        if let Some((name, value)) = signature {
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&2u32.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes());
        }
        if let Some((name, types)) = annotations {
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&(2 + 4 * types.len() as u32).to_be_bytes());
            out.extend_from_slice(&(types.len() as u16).to_be_bytes());
            for type_index in types {
                out.extend_from_slice(&type_index.to_be_bytes());
                out.extend_from_slice(&0u16.to_be_bytes());
            }
        }
        out
    }
}

fn push_indices(out: &mut Vec<u8>, indices: &[u16]) {
    out.extend_from_slice(&(indices.len() as u16).to_be_bytes());
    for index in indices {
        out.extend_from_slice(&index.to_be_bytes());
    }
}
