//! File lookup across an ordered list of candidate base directories.

use crate::resp::{Error, Result, path_ext, provide::Fs, wildcard};

/// How many matches a lookup keeps, and from how many search paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cardinality {
    /// First match of the first search path that has one.
    #[default]
    FirstInFirstPath,
    /// Every match of the first search path that has any.
    FirstInAnyPath,
    /// Every match of every search path, concatenated in order.
    AllPaths,
}

/// Lookup behavior: cardinality plus the independent choice to never fall
/// back to the working directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocateMode {
    pub cardinality: Cardinality,
    pub ignore_cwd: bool,
}

/// A resolved file, with the search path that produced it when one did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Located {
    pub path: String,
    pub search_path: Option<String>,
}

/// Resolve `file` to the first existing match.
///
/// Absolute files resolve directly. Relative files try each search path in
/// order, or fall back to the working directory when no search path is
/// given and `ignore_cwd` is not set. Absence of a match is `None`, never
/// an error; an empty `file` is a usage error.
pub fn locate_file_in_search_path<F: Fs>(
    fs: &F,
    file: &str,
    search_paths: &[String],
    ignore_cwd: bool,
) -> Result<Option<Located>> {
    if file.is_empty() {
        return Err(Error::MissingArgument("file"));
    }

    if path_ext::is_rooted(file) {
        return Ok(wildcard::locate_first(fs, file).map(Located::unpathed));
    }

    let cwd = fs.current_dir();

    if search_paths.is_empty() {
        if ignore_cwd {
            return Ok(None);
        }
        let Some(cwd) = cwd else {
            return Ok(None);
        };
        return Ok(wildcard::locate_first(fs, &path_ext::join(&cwd, file)).map(Located::unpathed));
    }

    for dir in search_paths {
        let base = absolute_dir(dir, cwd.as_deref());
        if let Some(path) = wildcard::locate_first(fs, &path_ext::join(&base, file)) {
            return Ok(Some(Located {
                path,
                search_path: Some(dir.clone()),
            }));
        }
    }

    Ok(None)
}

/// Resolve a possibly-wildcarded `filespec` according to `mode`.
///
/// Every search path that yields at least one match is recorded in
/// `used_search_paths` when the caller supplies one. An empty `filespec` is
/// a usage error; any other miss is an empty result.
pub fn locate_all_matching_files<F: Fs>(
    fs: &F,
    filespec: &str,
    search_paths: &[String],
    mode: LocateMode,
    mut used_search_paths: Option<&mut Vec<String>>,
) -> Result<Vec<String>> {
    if filespec.is_empty() {
        return Err(Error::MissingArgument("filespec"));
    }

    let mut matches = Vec::new();
    let cwd = fs.current_dir();

    if path_ext::is_rooted(filespec) || search_paths.is_empty() {
        let pattern = if path_ext::is_rooted(filespec) {
            filespec.to_owned()
        } else if mode.ignore_cwd {
            return Ok(matches);
        } else if let Some(cwd) = cwd {
            path_ext::join(&cwd, filespec)
        } else {
            return Ok(matches);
        };
        collect(fs, &pattern, mode.cardinality, &mut matches);
        return Ok(matches);
    }

    for dir in search_paths {
        let base = absolute_dir(dir, cwd.as_deref());
        let before = matches.len();
        collect(fs, &path_ext::join(&base, filespec), mode.cardinality, &mut matches);

        if matches.len() > before {
            if let Some(used) = used_search_paths.as_deref_mut() {
                used.push(dir.clone());
            }
            if mode.cardinality != Cardinality::AllPaths {
                break;
            }
        }
    }

    Ok(matches)
}

impl Located {
    fn unpathed(path: String) -> Self {
        Self {
            path,
            search_path: None,
        }
    }
}

fn collect<F: Fs>(fs: &F, pattern: &str, cardinality: Cardinality, matches: &mut Vec<String>) {
    match cardinality {
        Cardinality::FirstInFirstPath => matches.extend(wildcard::locate_first(fs, pattern)),
        Cardinality::FirstInAnyPath | Cardinality::AllPaths => {
            wildcard::locate_into(fs, pattern, matches);
        }
    }
}

/// Search-path entries may themselves be relative; anchor them on the
/// working directory when one is known.
fn absolute_dir(dir: &str, cwd: Option<&str>) -> String {
    if path_ext::is_rooted(dir) {
        path_ext::normalize(dir)
    } else if let Some(cwd) = cwd {
        path_ext::join(cwd, dir)
    } else {
        dir.to_owned()
    }
}
