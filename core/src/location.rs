//! # Location Extractor
//!
//! Directory nodes do not carry a location attribute. The location of a
//! matched node is defined positionally: it is the label of the DN element
//! directly above the `<type>=<target>` element.
//!
//! ```text
//! OU=ADM,OU=Office1,OU=Sites,DC=example,DC=com   ->  Office1
//! CN=Kiosks,OU=Branch9,DC=x,DC=y                 ->  Branch9
//! ```

use ldap3::dn_escape;
use oucount_common::aggregation::UNKNOWN_LOCATION;
use oucount_common::directory::ContainerKind;
use regex::Regex;

/// Search order: the primary container type first, then the alternate one.
const KIND_ORDER: [ContainerKind; 2] = [ContainerKind::OrganizationalUnit, ContainerKind::Container];

/// Maps `path` to the label of the element enclosing `<type>=<target_name>`.
///
/// Matching is case-insensitive and only the first occurrence counts. Any
/// failure to find the pair yields [`UNKNOWN_LOCATION`].
pub fn extract_location(path: &str, target_name: &str) -> String {
    let path = path.trim();
    let target_name = target_name.trim();
    if path.is_empty() || target_name.is_empty() {
        return UNKNOWN_LOCATION.to_string();
    }

    KIND_ORDER
        .iter()
        .find_map(|kind| location_for_kind(path, target_name, *kind))
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

fn location_for_kind(path: &str, target_name: &str, kind: ContainerKind) -> Option<String> {
    // An RDN starts at the beginning or after a comma preceded by an even
    // run of backslashes; `\,` is part of the previous value.
    let pattern = format!(
        r"(?i)(?:^|(?:^|[^\\])(?:\\\\)*,)\s*{prefix}={name}\s*,\s*[a-z][a-z0-9-]*=((?:\\.|[^,\\])+)",
        prefix = kind.rdn_prefix(),
        name = regex::escape(&dn_escape(target_name)),
    );
    let re = Regex::new(&pattern).ok()?;
    let label = re.captures(path)?.get(1)?.as_str().trim();
    if label.is_empty() {
        return None;
    }
    Some(unescape_value(label))
}

/// Drops the backslash from `\,` style escapes so labels read naturally.
fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
