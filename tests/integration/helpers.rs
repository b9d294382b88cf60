//! Shared fixtures: JAR builders, fake SDK layouts and fake runners.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use dexstrip::runner::{CommandOutput, CommandRunner, Invocation};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Write a JAR with the given (name, content) entries.
pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

/// Read every file entry of a ZIP into a sorted map.
pub fn read_jar(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut zip = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut out = BTreeMap::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut data = Vec::new();
        entry.read_to_end(&mut data).unwrap();
        out.insert(entry.name().to_string(), data);
    }
    out
}

const SAMPLE_ENTRIES: &[(&str, &[u8])] = &[
    ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
    ("a/B.class", b"\xca\xfe\xba\xbe class B"),
    ("a/C.class", b"\xca\xfe\xba\xbe class C"),
    ("a/C$Inner.class", b"\xca\xfe\xba\xbe class C$Inner"),
];

/// Standard fixture: two classes in package `a`, an inner class and a manifest.
pub fn sample_entries() -> &'static [(&'static str, &'static [u8])] {
    SAMPLE_ENTRIES
}

/// A project directory laid out like the default config expects.
pub struct Project {
    pub root: tempfile::TempDir,
}

impl Project {
    pub const DEX: &'static str = "build/libs/launcher.dex";
    pub const JAR: &'static str = "build/libs/LeviLauncherDex-1.0.jar";
    pub const ORIGINAL_DEX: &'static [u8] = b"dex\n035\0original";

    pub fn new(entries: &[(&str, &[u8])]) -> Self {
        let root = tempfile::tempdir().unwrap();
        write_jar(&root.path().join(Self::JAR), entries);
        fs::write(root.path().join(Self::DEX), Self::ORIGINAL_DEX).unwrap();
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn dex(&self) -> PathBuf {
        self.path().join(Self::DEX)
    }

    pub fn jar(&self) -> PathBuf {
        self.path().join(Self::JAR)
    }

    pub fn inputs(&self) -> dexstrip::dex::Inputs {
        dexstrip::dex::Inputs {
            dex: self.dex(),
            archive: self.jar(),
        }
    }

    /// Write a config file removing `classes`, returning its path.
    pub fn write_config(&self, classes: &[&str]) -> PathBuf {
        let list = classes
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let path = self.path().join("dexstrip.toml");
        fs::write(&path, format!("[remove]\nclasses = [{}]\n", list)).unwrap();
        path
    }
}

/// Create `<root>/build-tools/<version>/` with the named (empty) tools.
pub fn fake_sdk(root: &Path, version: &str, tools: &[&str]) -> PathBuf {
    let dir = root.join("build-tools").join(version);
    fs::create_dir_all(&dir).unwrap();
    for tool in tools {
        let name = if cfg!(windows) {
            format!("{}.bat", tool)
        } else {
            tool.to_string()
        };
        fs::write(dir.join(name), b"#!/bin/sh\nexit 0\n").unwrap();
    }
    dir
}

/// Runner standing in for d8/dx: the "DEX" it writes is a byte copy of
/// the input JAR, so tests can inspect what would have been compiled.
#[derive(Default)]
pub struct CopyingRunner {
    pub calls: RefCell<Vec<Invocation>>,
}

impl CommandRunner for CopyingRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let args: Vec<String> = invocation
            .args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        match args.as_slice() {
            [flag, dir, jar] if flag == "--output" => {
                fs::copy(jar, Path::new(dir).join("classes.dex"))?;
            }
            [flag, out, jar] if flag == "--dex" => {
                let out = out.strip_prefix("--output=").unwrap_or(out.as_str());
                fs::copy(jar, out)?;
            }
            other => panic!("unexpected invocation: {:?}", other),
        }
        Ok(CommandOutput {
            code: Some(0),
            ..Default::default()
        })
    }
}

/// Runner whose tool always fails without producing output.
pub struct FailingRunner;

impl CommandRunner for FailingRunner {
    fn run(&self, _invocation: &Invocation) -> std::io::Result<CommandOutput> {
        Ok(CommandOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "Error: invalid class file".to_string(),
        })
    }
}
