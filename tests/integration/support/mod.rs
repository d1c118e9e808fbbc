//! Synthesized class files, class directories and jars for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;

/// Writes a minimal, valid class file
pub struct ClassWriter {
    name: String,
    super_name: String,
    interfaces: Vec<String>,
    class_refs: Vec<String>,
    methods: Vec<(u16, String, String)>,
}

impl ClassWriter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_name: "java/lang/Object".to_string(),
            interfaces: Vec::new(),
            class_refs: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extends(mut self, name: &str) -> Self {
        self.super_name = name.to_string();
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    /// Code-level reference (a CONSTANT_Class entry)
    pub fn uses(mut self, name: &str) -> Self {
        self.class_refs.push(name.to_string());
        self
    }

    pub fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push((access, name.to_string(), descriptor.to_string()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let this_class = pool.class(&self.name);
        let super_class = pool.class(&self.super_name);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        for name in &self.class_refs {
            pool.class(name);
        }
        let methods: Vec<(u16, u16, u16)> = self
            .methods
            .iter()
            .map(|(access, name, desc)| (*access, pool.utf8(name), pool.utf8(desc)))
            .collect();

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&(pool.count + 1).to_be_bytes());
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&super_class.to_be_bytes());
        out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        for interface in interfaces {
            out.extend_from_slice(&interface.to_be_bytes());
        }
        // no fields
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&(methods.len() as u16).to_be_bytes());
        for (access, name, desc) in methods {
            out.extend_from_slice(&access.to_be_bytes());
            out.extend_from_slice(&name.to_be_bytes());
            out.extend_from_slice(&desc.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes());
        }
        // no class attributes
        out.extend_from_slice(&0u16.to_be_bytes());
        out
    }
}

#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
    utf8s: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Pool {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8s.get(value) {
            return index;
        }
        self.count += 1;
        self.bytes.push(1);
        self.bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        self.utf8s.insert(value.to_string(), self.count);
        self.count
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(&index) = self.classes.get(name) {
            return index;
        }
        let name_index = self.utf8(name);
        self.count += 1;
        self.bytes.push(7);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.classes.insert(name.to_string(), self.count);
        self.count
    }
}

/// Write classes into a class directory, returning its path
pub fn write_class_dir(root: &Path, classes: &[ClassWriter]) -> PathBuf {
    std::fs::create_dir_all(root).unwrap();
    for class in classes {
        let path = root.join(format!("{}.class", class.name()));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, class.build()).unwrap();
    }
    root.to_path_buf()
}

/// Write classes (and optionally raw entries) into a jar
pub fn write_jar(path: &Path, classes: &[ClassWriter], extra: &[(&str, &[u8])]) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for class in classes {
        writer
            .start_file(format!("{}.class", class.name()), options)
            .unwrap();
        writer.write_all(&class.build()).unwrap();
    }
    for (name, bytes) in extra {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}
