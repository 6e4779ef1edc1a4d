#![allow(dead_code)]

use classpool_api::{ClassDefinition, ClassName, InvalidClassFile, Result};
use classpool_core::archive::{ArchiveContainer, ArchiveOpener, ZipOpener};
use classpool_core::decode::{BytecodeDecoder, ClassDecoder};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

/// Minimal class-file writer: constant pool, members, no attributes.
pub struct ClassBytes {
    name: String,
    access: u16,
    super_name: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<(String, String)>,
    methods: Vec<(String, String)>,
}

impl ClassBytes {
    /// `name` in internal form, e.g. `com/x/A`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access: ACC_PUBLIC | ACC_SUPER,
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(mut self) -> Self {
        self.access = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        self
    }

    pub fn extends(mut self, super_name: &str) -> Self {
        self.super_name = Some(super_name.to_string());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push((name.to_string(), descriptor.to_string()));
        self
    }

    /// Abstract method, so no `Code` attribute is needed.
    pub fn method(mut self, name: &str, descriptor: &str) -> Self {
        self.methods.push((name.to_string(), descriptor.to_string()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let this_class = pool.class(&self.name);
        let super_class = self.super_name.as_deref().map_or(0, |s| pool.class(s));
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        let fields: Vec<(u16, u16)> = self
            .fields
            .iter()
            .map(|(n, d)| (pool.utf8(n), pool.utf8(d)))
            .collect();
        let methods: Vec<(u16, u16)> = self
            .methods
            .iter()
            .map(|(n, d)| (pool.utf8(n), pool.utf8(d)))
            .collect();

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
        put_u16(&mut out, 0);
        put_u16(&mut out, 52);
        put_u16(&mut out, pool.entries.len() as u16 + 1);
        for entry in &pool.entries {
            out.extend_from_slice(entry);
        }
        put_u16(&mut out, self.access);
        put_u16(&mut out, this_class);
        put_u16(&mut out, super_class);
        put_u16(&mut out, interfaces.len() as u16);
        for index in interfaces {
            put_u16(&mut out, index);
        }
        write_members(&mut out, ACC_PUBLIC, &fields);
        write_members(&mut out, ACC_PUBLIC | ACC_ABSTRACT, &methods);
        put_u16(&mut out, 0);
        out
    }
}

#[derive(Default)]
struct Pool {
    entries: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
}

impl Pool {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8.get(value) {
            return index;
        }
        let mut entry = vec![1];
        put_u16(&mut entry, value.len() as u16);
        entry.extend_from_slice(value.as_bytes());
        self.entries.push(entry);
        let index = self.entries.len() as u16;
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut entry = vec![7];
        put_u16(&mut entry, name_index);
        self.entries.push(entry);
        self.entries.len() as u16
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn write_members(out: &mut Vec<u8>, access: u16, members: &[(u16, u16)]) {
    put_u16(out, members.len() as u16);
    for &(name, descriptor) in members {
        put_u16(out, access);
        put_u16(out, name);
        put_u16(out, descriptor);
        put_u16(out, 0);
    }
}

/// Write a jar with the given entries, in order.
pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// Jar holding one class per name, each with no members.
pub fn write_classes_jar(path: &Path, internal_names: &[&str]) {
    let entries: Vec<(String, Vec<u8>)> = internal_names
        .iter()
        .map(|n| (format!("{n}.class"), ClassBytes::new(n).build()))
        .collect();
    let borrowed: Vec<(&str, Vec<u8>)> = entries
        .iter()
        .map(|(n, b)| (n.as_str(), b.clone()))
        .collect();
    write_jar(path, &borrowed);
}

/// Real decoder that counts calls and can be slowed down.
#[derive(Default)]
pub struct CountingDecoder {
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingDecoder {
    pub fn slow(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClassDecoder for CountingDecoder {
    fn decode(
        &self,
        name: &ClassName,
        bytes: Vec<u8>,
    ) -> std::result::Result<ClassDefinition, InvalidClassFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        BytecodeDecoder.decode(name, bytes)
    }
}

/// Zip opener that records open/close per archive and can refuse one file.
#[derive(Default)]
pub struct TrackingOpener {
    fail_on: Option<String>,
    opened: Mutex<Vec<PathBuf>>,
    closes: Arc<Mutex<HashMap<PathBuf, usize>>>,
}

impl TrackingOpener {
    pub fn failing_on(file_name: &str) -> Self {
        Self {
            fail_on: Some(file_name.to_string()),
            ..Default::default()
        }
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }

    pub fn close_count(&self, path: &Path) -> usize {
        self.closes.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_closes(&self) -> usize {
        self.closes.lock().unwrap().values().sum()
    }
}

impl ArchiveOpener for TrackingOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveContainer>> {
        let refuse = self
            .fail_on
            .as_deref()
            .is_some_and(|f| path.file_name().is_some_and(|n| n == f));
        if refuse {
            return Err(classpool_api::ResolverError::archive(path, "refused by test"));
        }

        let inner = ZipOpener.open(path)?;
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(Box::new(TrackedContainer {
            inner,
            closes: self.closes.clone(),
        }))
    }
}

struct TrackedContainer {
    inner: Box<dyn ArchiveContainer>,
    closes: Arc<Mutex<HashMap<PathBuf, usize>>>,
}

impl ArchiveContainer for TrackedContainer {
    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn entry_names(&self) -> std::io::Result<Vec<String>> {
        self.inner.entry_names()
    }

    fn read_entry(&self, entry: &str) -> std::io::Result<Vec<u8>> {
        self.inner.read_entry(entry)
    }

    fn close(&self) -> std::io::Result<()> {
        *self
            .closes
            .lock()
            .unwrap()
            .entry(self.inner.path().to_path_buf())
            .or_default() += 1;
        self.inner.close()
    }
}
