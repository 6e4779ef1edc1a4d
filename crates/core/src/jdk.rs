//! JDK install discovery.
//!
//! Looks for a JDK home in:
//! - the JAVA_HOME environment variable
//! - the macOS java_home tool
//! - `java -XshowSettings:properties`
//! - common installation roots and SDKMAN

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

static VERSION_IN_PATH: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"jdk-?(\d+(?:\.\d+)*)").ok());

/// Locate a JDK home directory on this machine.
pub fn find_java_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("JAVA_HOME") {
        let home = PathBuf::from(home);
        if is_jdk_home(&home) {
            return Some(home);
        }
    }

    #[cfg(target_os = "macos")]
    if let Some(home) = macos_java_home() {
        return Some(home);
    }

    if let Some(home) = java_home_from_properties() {
        return Some(home);
    }

    search_roots().into_iter().find_map(|root| scan_root(&root))
}

/// Whether `home` looks like a JDK or JRE with class libraries.
pub fn is_jdk_home(home: &Path) -> bool {
    home.join("lib/modules").is_file()
        || home.join("jre/lib/rt.jar").is_file()
        || home.join("lib/rt.jar").is_file()
        || home.join("jmods").is_dir()
}

/// Version from `<home>/release`, falling back to a version embedded in the path.
pub fn detect_version(home: &Path) -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(home.join("release")) {
        let version = content.lines().find_map(|line| {
            line.strip_prefix("JAVA_VERSION=")
                .map(|v| v.trim().trim_matches('"').to_string())
        });
        if version.is_some() {
            return version;
        }
    }

    let path = home.to_string_lossy();
    VERSION_IN_PATH
        .as_ref()?
        .captures(&path)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Presentable label for a JDK home, e.g. `JDK 17.0.2 (/usr/lib/jvm/jdk-17.0.2)`.
pub fn jdk_label(home: &Path) -> String {
    match detect_version(home) {
        Some(version) => format!("JDK {version} ({})", home.display()),
        None => format!("JDK ({})", home.display()),
    }
}

#[cfg(target_os = "macos")]
fn macos_java_home() -> Option<PathBuf> {
    let output = Command::new("/usr/libexec/java_home").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let home = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    is_jdk_home(&home).then_some(home)
}

fn java_home_from_properties() -> Option<PathBuf> {
    let output = Command::new("java")
        .arg("-XshowSettings:properties")
        .arg("-version")
        .output()
        .ok()?;
    // Settings are printed on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    let reported = stderr
        .lines()
        .find_map(|line| line.trim().strip_prefix("java.home = "))?;
    let mut home = PathBuf::from(reported.trim());
    // Java 8 reports the embedded JRE
    if home.ends_with("jre") && home.parent().is_some_and(is_jdk_home) {
        home.pop();
    }
    debug!("java reports java.home = {}", home.display());
    is_jdk_home(&home).then_some(home)
}

fn search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    #[cfg(target_os = "macos")]
    {
        roots.push(PathBuf::from("/Library/Java/JavaVirtualMachines/"));
        roots.push(PathBuf::from("/opt/homebrew/opt/openjdk/"));
        roots.push(PathBuf::from("/usr/local/opt/openjdk/"));
    }
    #[cfg(target_os = "linux")]
    roots.push(PathBuf::from("/usr/lib/jvm/"));
    #[cfg(target_os = "windows")]
    roots.push(PathBuf::from("C:\\Program Files\\Java\\"));

    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".sdkman/candidates/java/"));
    }
    roots
}

/// `root` itself if it is a JDK, otherwise the first JDK among its children.
fn scan_root(root: &Path) -> Option<PathBuf> {
    if !root.is_dir() {
        return None;
    }
    if is_jdk_home(root) {
        return Some(root.to_path_buf());
    }

    let mut candidates: Vec<PathBuf> = std::fs::read_dir(root)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .collect();
    candidates.sort();

    candidates.into_iter().find_map(|mut candidate| {
        if candidate.join("Contents/Home").is_dir() {
            candidate.push("Contents/Home");
        }
        is_jdk_home(&candidate).then_some(candidate)
    })
}
