// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Virtual path utilities
//!
//! Module ids and repository locations are `/`-separated strings that never
//! touch the host file system, so none of this goes through [`std::path`].
//! The semantics are those of the classic CommonJS `path` module, which differ
//! from Node's current one in a few corners (`dirname("/a")` is `"."`, a
//! leading `..` on an absolute path is kept).

/// Path segment separator
pub const SEP: char = '/';

/// Collapse `.` and `..` segments.
///
/// Blank segments are dropped unless they are first, last, or `keep_blanks`
/// is set. A `..` is kept literally when there is nothing it can pop.
pub fn normalize_array<'a>(parts: &[&'a str], keep_blanks: bool) -> Vec<&'a str> {
    let mut directories: Vec<&'a str> = Vec::with_capacity(parts.len());
    let mut prev: Option<&'a str> = None;
    let last = parts.len().saturating_sub(1);

    for (i, &directory) in parts.iter().enumerate() {
        if directory.is_empty() && i != 0 && i != last && !keep_blanks {
            continue;
        }

        if directory == "." && prev.is_some() {
            continue;
        }

        let can_pop = match prev {
            None | Some("..") => false,
            Some("") => keep_blanks,
            Some(_) => true,
        };

        if directory == ".." && !directories.is_empty() && can_pop {
            directories.pop();
            prev = directories.last().copied();
        } else {
            if prev == Some(".") {
                directories.pop();
            }
            directories.push(directory);
            prev = Some(directory);
        }
    }

    directories
}

/// Normalize a `/`-separated path
pub fn normalize(path: &str, keep_blanks: bool) -> String {
    let parts: Vec<&str> = path.split(SEP).collect();
    normalize_array(&parts, keep_blanks).join("/")
}

/// Join segments with `/` and normalize the result
pub fn join(parts: &[&str]) -> String {
    normalize(&parts.join("/"), false)
}

/// Everything before the last `/`, or `.` when that is empty
pub fn dirname(path: &str) -> &str {
    match path.rfind(SEP) {
        Some(idx) if idx > 0 => &path[..idx],
        _ => ".",
    }
}

/// Everything after the last `/`, minus a trailing `ext` if it matches exactly
pub fn basename<'a>(path: &'a str, ext: Option<&str>) -> &'a str {
    let name = match path.rfind(SEP) {
        Some(idx) => &path[idx + 1..],
        None => path,
    };

    match ext {
        Some(ext) if !ext.is_empty() => name.strip_suffix(ext).unwrap_or(name),
        _ => name,
    }
}

/// Everything from the last `.` on, or `""`
pub fn extname(path: &str) -> &str {
    path.rfind('.').map_or("", |idx| &path[idx..])
}

/// Whether `request` is resolved against the requesting module
///
/// Anything starting with `./`, `../` or `..` counts.
pub fn is_relative(request: &str) -> bool {
    let mut chars = request.chars();
    chars.next() == Some('.') && matches!(chars.next(), Some('/') | Some('.'))
}

/// Whether `path` is rooted at the repository root
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEP)
}
