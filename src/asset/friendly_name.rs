//! Human-readable labels for release asset filenames.
//!
//! The label is assembled by running an ordered list of rules over the
//! lowercased filename. Every rule whose predicate matches writes into a
//! shared [`Label`] accumulator, so a later rule overwrites the prefix or
//! install type an earlier rule set. A filename is expected to match one
//! platform family in practice; when it matches several, the last matching
//! rule wins (e.g. `imhex-linux-aarch64.appimage` hits the Arch rule through
//! `aarch64` and becomes `AppImage Package`).

/// Accumulator the rules write into.
#[derive(Debug, Default, Clone, PartialEq)]
struct Label {
    prefix: String,
    arch: Option<&'static str>,
    install_type: Option<&'static str>,
    software_rendered: bool,
}

impl Label {
    fn render(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4);
        if !self.prefix.is_empty() {
            parts.push(&self.prefix);
        }
        if let Some(arch) = self.arch {
            parts.push(arch);
        }
        if let Some(install_type) = self.install_type {
            parts.push(install_type);
        }
        if self.software_rendered {
            parts.push("(SW Rendered)");
        }
        parts.join(" ")
    }
}

struct Rule {
    applies: fn(&str) -> bool,
    apply: fn(&str, &mut Label),
}

/// Rules in evaluation order.
const RULES: &[Rule] = &[
    Rule {
        applies: has_arch_marker,
        apply: arch_suffix,
    },
    Rule {
        applies: is_windows,
        apply: windows,
    },
    Rule {
        applies: is_macos,
        apply: macos,
    },
    Rule {
        applies: |name| name.contains("ubuntu"),
        apply: |name, label| {
            label.prefix = versioned("Ubuntu", extract_version(name, "ubuntu", true));
            label.install_type = Some("DEB Package");
        },
    },
    Rule {
        applies: |name| name.contains("debian"),
        apply: |name, label| {
            label.prefix = versioned("Debian", extract_version(name, "debian", false));
            label.install_type = Some("DEB Package");
        },
    },
    Rule {
        applies: |name| name.contains("fedora"),
        apply: |name, label| {
            label.prefix = versioned("Fedora", extract_version(name, "fedora", false));
            label.install_type = Some("RPM Package");
        },
    },
    Rule {
        applies: |name| name.contains("rhel"),
        apply: |name, label| {
            label.prefix = versioned("RHEL", extract_version(name, "rhel", false));
            label.install_type = Some("RPM Package");
        },
    },
    Rule {
        applies: |name| name.contains("arch"),
        apply: |_, label| {
            label.prefix = "Arch Linux".to_string();
            label.install_type = Some("Package");
        },
    },
    Rule {
        applies: |name| name.ends_with(".appimage"),
        apply: |_, label| label.prefix = "AppImage".to_string(),
    },
    Rule {
        applies: |name| name.ends_with(".flatpak"),
        apply: |_, label| label.prefix = "Flatpak".to_string(),
    },
    Rule {
        applies: |name| name.ends_with(".snap"),
        apply: |_, label| label.prefix = "Snap".to_string(),
    },
    Rule {
        applies: |name| name.contains(NO_GPU_MARKER),
        apply: |_, label| label.software_rendered = true,
    },
];

/// Token marking software-rendered builds.
pub const NO_GPU_MARKER: &str = "nogpu";

/// Token marking ARM64 builds.
pub const ARM64_MARKER: &str = "arm64";

const X86_64_MARKER: &str = "x86_64";

/// Resolve the display name for a release asset filename.
///
/// Matching is case-insensitive. The result never has leading, trailing or
/// doubled spaces; segments that end up empty are omitted.
pub fn friendly_name(filename: &str) -> String {
    let name = filename.to_lowercase();
    let mut label = Label::default();

    for rule in RULES {
        if (rule.applies)(&name) {
            (rule.apply)(&name, &mut label);
        }
    }

    label.render()
}

fn has_arch_marker(name: &str) -> bool {
    name.contains(X86_64_MARKER) || name.contains(ARM64_MARKER)
}

// x86_64 is checked first; the two markers are treated as exclusive.
fn arch_suffix(name: &str, label: &mut Label) {
    label.arch = if name.contains(X86_64_MARKER) {
        Some("x86_64")
    } else {
        Some("ARM64")
    };
}

fn is_windows(name: &str) -> bool {
    name.contains("windows") || name.contains("win")
}

fn windows(name: &str, label: &mut Label) {
    label.prefix = "Windows".to_string();
    if name.ends_with(".msi") {
        label.install_type = Some("MSI Installer");
    } else if name.ends_with(".zip") {
        label.install_type = Some("Portable");
    }
}

fn is_macos(name: &str) -> bool {
    name.contains("macos") || name.contains("darwin")
}

fn macos(name: &str, label: &mut Label) {
    if name.contains(ARM64_MARKER) {
        label.prefix = "Apple Silicon".to_string();
    } else if name.contains(X86_64_MARKER) {
        label.prefix = "Intel CPU".to_string();
    }
    label.install_type = Some("DMG");
    // The CPU family is already part of the macOS prefix.
    label.arch = None;
}

fn versioned(distro: &str, version: Option<&str>) -> String {
    match version {
        Some(version) => format!("{} {}", distro, version),
        None => distro.to_string(),
    }
}

/// Find the version following `keyword`, optionally separated by `_` or `-`.
///
/// Behaves like the leftmost match of `keyword[_-]?(\d+)` or, with `dotted`,
/// `keyword[_-]?(\d+\.\d+)`: every occurrence of `keyword` is tried in order
/// and the first one followed by a well-formed version wins.
fn extract_version<'a>(name: &'a str, keyword: &str, dotted: bool) -> Option<&'a str> {
    name.match_indices(keyword).find_map(|(index, _)| {
        let rest = &name[index + keyword.len()..];
        let rest = rest
            .strip_prefix('_')
            .or_else(|| rest.strip_prefix('-'))
            .unwrap_or(rest);

        let major = digit_run(rest);
        if major == 0 {
            return None;
        }
        if !dotted {
            return Some(&rest[..major]);
        }

        let after_major = &rest[major..];
        let minor = after_major.strip_prefix('.').map(digit_run).unwrap_or(0);
        if minor == 0 {
            return None;
        }
        Some(&rest[..major + 1 + minor])
    })
}

fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
