//! Wildcard path locator: expands one absolute, possibly-globbed path into
//! the filesystem entries it names.

use std::path::{Component, Path};

use globset::{GlobBuilder, GlobMatcher};

use crate::resp::{path_ext, provide::Fs};

/// Characters that make a path component a glob, plus the `**` token.
const GLOB_CHARS: [char; 11] = ['?', '*', '[', '(', ',', ':', ';', '|', '@', '!', '+'];

pub fn has_glob(component: &str) -> bool {
    component.contains(GLOB_CHARS)
}

/// First entry matching `pattern`, in directory-listing order.
pub fn locate_first<F: Fs>(fs: &F, pattern: &str) -> Option<String> {
    let mut sink = Sink::First(None);
    walk_pattern(fs, pattern, &mut sink);
    match sink {
        Sink::First(found) => found,
        Sink::All(..) => None,
    }
}

/// Append every entry matching `pattern` to `out`, in discovery order,
/// without deduplication.
pub fn locate_into<F: Fs>(fs: &F, pattern: &str, out: &mut Vec<String>) {
    let mut sink = Sink::All(out);
    walk_pattern(fs, pattern, &mut sink);
}

/// Match collector; `push` reports whether the walk should stop early.
enum Sink<'out> {
    First(Option<String>),
    All(&'out mut Vec<String>),
}

impl Sink<'_> {
    fn push(&mut self, path: String) -> bool {
        match self {
            Self::First(slot) => {
                *slot = Some(path);
                true
            }
            Self::All(out) => {
                out.push(path);
                false
            }
        }
    }
}

fn walk_pattern<F: Fs>(fs: &F, pattern: &str, sink: &mut Sink) {
    let pattern = path_ext::normalize(pattern);

    let mut root = String::new();
    let mut components = Vec::new();
    for component in Path::new(&pattern).components() {
        match component {
            Component::Prefix(prefix) => root.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => root.push(std::path::MAIN_SEPARATOR),
            Component::Normal(name) => components.push(name.to_string_lossy().into_owned()),
            Component::CurDir | Component::ParentDir => {}
        }
    }

    let components: Vec<&str> = components.iter().map(String::as_str).collect();
    walk(fs, &root, &components, sink);
}

/// Resolve `components` under `dir`. Returns true when the sink asked to
/// stop.
fn walk<F: Fs>(fs: &F, dir: &str, components: &[&str], sink: &mut Sink) -> bool {
    let Some(split) = components.iter().position(|component| has_glob(component)) else {
        // fully literal remainder, a single existence check
        let path = append_all(dir, components);
        if fs.path_exists(&path) {
            return sink.push(path);
        }
        return false;
    };

    let parent = append_all(dir, &components[..split]);
    let token = components[split];
    let rest = &components[split + 1..];

    if token == "**" {
        // nothing after the recursive token means "everything below"
        let rest = if rest.is_empty() { &["*"][..] } else { rest };
        return walk_subtree(fs, &parent, rest, sink);
    }

    let last = rest.is_empty();
    let matcher = compile(token);
    for name in fs.list_dir(&parent, !last) {
        let hit = name == token || matcher.as_ref().is_some_and(|m| m.is_match(&name));
        if !hit {
            continue;
        }
        let path = path_ext::push_component(&parent, &name);
        let stop = if last {
            sink.push(path)
        } else {
            walk(fs, &path, rest, sink)
        };
        if stop {
            return true;
        }
    }
    false
}

/// `**` expansion: try `rest` in `dir` itself (zero levels), then in every
/// descendant directory.
fn walk_subtree<F: Fs>(fs: &F, dir: &str, rest: &[&str], sink: &mut Sink) -> bool {
    if walk(fs, dir, rest, sink) {
        return true;
    }
    for sub in fs.list_dir(dir, true) {
        if walk_subtree(fs, &path_ext::push_component(dir, &sub), rest, sink) {
            return true;
        }
    }
    false
}

/// Case-insensitive single-component matcher with class, brace, and
/// negation support. An uncompilable token matches nothing.
fn compile(token: &str) -> Option<GlobMatcher> {
    GlobBuilder::new(token)
        .case_insensitive(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .ok()
}

fn append_all(dir: &str, components: &[&str]) -> String {
    components
        .iter()
        .fold(String::from(dir), |path, component| {
            path_ext::push_component(&path, component)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resp::provide::MemoryFs;

    fn sample() -> MemoryFs {
        MemoryFs::new()
            .file("/data/x.txt", "")
            .file("/data/y.log", "")
            .file("/data/a/b/x.txt", "")
            .file("/data/a/x.md", "")
            .file("/other/x.txt", "")
    }

    fn all(fs: &MemoryFs, pattern: &str) -> Vec<String> {
        let mut out = Vec::new();
        locate_into(fs, pattern, &mut out);
        out
    }

    #[test]
    fn literal_path_requires_existence() {
        let fs = sample();
        assert_eq!(locate_first(&fs, "/data/x.txt"), Some("/data/x.txt".into()));
        assert_eq!(locate_first(&fs, "/data/missing.txt"), None);
    }

    #[test]
    fn star_matches_within_one_directory() {
        let fs = sample();
        assert_eq!(all(&fs, "/data/*.txt"), ["/data/x.txt"]);
        assert_eq!(all(&fs, "/data/*"), ["/data/x.txt", "/data/y.log"]);
    }

    #[test]
    fn recursive_token_matches_zero_and_many_levels() {
        let fs = sample();
        assert_eq!(all(&fs, "/data/**/x.txt"), ["/data/x.txt", "/data/a/b/x.txt"]);
    }

    #[test]
    fn recursive_token_with_empty_remainder_takes_the_subtree() {
        let fs = sample();
        assert_eq!(
            all(&fs, "/data/**"),
            ["/data/x.txt", "/data/y.log", "/data/a/x.md", "/data/a/b/x.txt"]
        );
    }

    #[test]
    fn matches_stay_under_the_literal_prefix() {
        let fs = sample();
        for found in all(&fs, "/data/**/x.txt") {
            assert!(found.starts_with("/data/"));
        }
    }

    #[test]
    fn first_match_stops_early() {
        let fs = sample();
        assert_eq!(locate_first(&fs, "/data/**/x.txt"), Some("/data/x.txt".into()));
    }

    #[test]
    fn glob_classes_and_case_fold() {
        let fs = MemoryFs::new().file("/d/File1.TXT", "").file("/d/file2.txt", "");
        assert_eq!(all(&fs, "/d/file[12].txt"), ["/d/File1.TXT", "/d/file2.txt"]);
        assert_eq!(all(&fs, "/d/*.{txt,log}"), ["/d/File1.TXT", "/d/file2.txt"]);
    }

    #[test]
    fn intermediate_glob_components_descend_directories() {
        let fs = sample();
        assert_eq!(all(&fs, "/data/*/x.md"), ["/data/a/x.md"]);
    }

    #[test]
    fn no_match_is_empty_not_an_error() {
        let fs = sample();
        assert!(all(&fs, "/data/*.bin").is_empty());
        assert!(all(&fs, "/absent/**/x.txt").is_empty());
    }
}
