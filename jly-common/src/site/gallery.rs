//! Wallpaper gallery URL resolution

use serde::Serialize;

use super::schema::Wallpapers;

/// Local base used when the document names neither base
pub const DEFAULT_LOCAL_BASE: &str = "/galley";

/// One gallery cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    /// `p1`, `p2`, ... in file order
    pub id: String,
    pub filename: String,
    pub url: String,
}

/// Pick the base every filename is resolved against
///
/// A non-blank remote base wins over the local base.
pub fn resolve_gallery_base(wallpapers: &Wallpapers) -> String {
    if let Some(remote) = wallpapers.remote_base_url.as_deref() {
        let remote = remote.trim();
        if !remote.is_empty() {
            return remote.to_string();
        }
    }
    let local = wallpapers.local_base.trim();
    if local.is_empty() {
        DEFAULT_LOCAL_BASE.to_string()
    } else {
        local.to_string()
    }
}

/// Join a base and a filename, encoding the filename as one path component
pub fn join_gallery_url(base: &str, filename: &str) -> String {
    format!(
        "{}/{}",
        base.strip_suffix('/').unwrap_or(base),
        encode_uri_component(filename)
    )
}

/// Every non-empty filename resolved to a photo, in file order
pub fn photos(wallpapers: &Wallpapers) -> Vec<Photo> {
    let base = resolve_gallery_base(wallpapers);
    wallpapers
        .files
        .iter()
        .filter(|f| !f.is_empty())
        .enumerate()
        .map(|(idx, filename)| Photo {
            id: format!("p{}", idx + 1),
            filename: filename.clone(),
            url: join_gallery_url(&base, filename),
        })
        .collect()
}

/// Percent-encode everything except the URI-component unreserved set
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
