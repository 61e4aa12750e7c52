//! Search-path scopes: one frame per open response file or explicit push,
//! on a stack of bounded depth.

use std::sync::Arc;

use crate::resp::{Error, PathSet, Result, path_ext};

/// Most deeply nested scopes a single call may hold open.
pub const MAX_DEPTH: usize = 32;

/// Effective search paths for a response file's own context: the file's
/// directory first, inherited entries after it with relative ones rewritten
/// against that directory, duplicates removed keeping first occurrence.
///
/// Returns a fresh list, never mutates the input. `owning_file` is expected
/// to be a resolved absolute path.
pub fn deduce(inherited: &[String], owning_file: &str) -> Vec<String> {
    deduce_in(inherited, &path_ext::parent_dir(owning_file))
}

/// [deduce] anchored at a directory directly, for scopes with no owning
/// file of their own.
pub fn deduce_in(inherited: &[String], dir: &str) -> Vec<String> {
    let dir = path_ext::normalize(dir);

    let mut seen = PathSet::default();
    let mut out = Vec::with_capacity(inherited.len() + 1);
    seen.insert(dir.clone());
    out.push(dir.clone());

    for entry in inherited {
        let entry = if path_ext::is_rooted(entry) {
            entry.clone()
        } else {
            path_ext::join(&dir, entry)
        };
        if seen.insert(entry.clone()) {
            out.push(entry);
        }
    }

    out
}

/// One scope: base search paths, an optional override replacing them, and
/// the response file that opened the scope (`None` for the top-level frame
/// and for explicit pushes).
#[derive(Debug, Clone)]
pub struct Frame {
    base: Vec<String>,
    active: Option<Vec<String>>,
    file: Option<Arc<str>>,
}

impl Frame {
    /// Frame with no response file of its own: the top-level scope and
    /// explicit pushes.
    pub const fn bare(base: Vec<String>) -> Self {
        Self {
            base,
            active: None,
            file: None,
        }
    }

    pub const fn included(base: Vec<String>, file: Arc<str>) -> Self {
        Self {
            base,
            active: None,
            file: Some(file),
        }
    }

    fn paths(&self) -> &[String] {
        self.active.as_deref().unwrap_or(&self.base)
    }
}

/// Stack of [Frame]s. The bottom frame belongs to the top-level call and is
/// never popped.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new(root: Frame) -> Self {
        Self { frames: vec![root] }
    }

    /// Search paths of the innermost scope.
    pub fn active(&self) -> &[String] {
        self.top().paths()
    }

    /// Replace (or clear) the innermost scope's override list.
    pub fn set_active(&mut self, active: Option<Vec<String>>) {
        self.top_mut().active = active;
    }

    /// Response file owning the innermost scope that has one.
    pub fn current_file(&self) -> Option<&Arc<str>> {
        self.frames.iter().rev().find_map(|frame| frame.file.as_ref())
    }

    pub fn push(&mut self, frame: Frame) -> Result {
        if self.frames.len() >= MAX_DEPTH {
            return Err(Error::DepthExceeded { limit: MAX_DEPTH });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Drop the innermost scope. Popping past the bottom is a no-op; the
    /// return value tells whether a frame was actually removed.
    pub fn pop(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Whether `file` is already open in any live scope.
    pub fn contains_file(&self, file: &str) -> bool {
        self.frames
            .iter()
            .any(|frame| frame.file.as_deref() == Some(file))
    }

    /// Open response files from the outside in, `next` appended; the cycle
    /// diagnostic chain.
    pub fn chain_with(&self, next: &str) -> Vec<String> {
        self.frames
            .iter()
            .filter_map(|frame| frame.file.as_deref().map(String::from))
            .chain([String::from(next)])
            .collect()
    }

    fn top(&self) -> &Frame {
        self.frames.last().expect("stack always holds the root frame")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("stack always holds the root frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|path| String::from(*path)).collect()
    }

    #[test]
    fn deduce_prepends_dir_and_rewrites_relative_entries() {
        let deduced = deduce(&owned(&["/abs", "rel/sub"]), "/proj/main.rsp");
        assert_eq!(deduced, owned(&["/proj", "/abs", "/proj/rel/sub"]));
    }

    #[test]
    fn deduce_removes_duplicates_keeping_first() {
        let deduced = deduce(&owned(&["/proj", "/abs", "/abs"]), "/proj/main.rsp");
        assert_eq!(deduced, owned(&["/proj", "/abs"]));
    }

    #[test]
    fn deduce_is_idempotent() {
        let inherited = owned(&["/abs", "rel", "rel", "../up"]);
        let once = deduce(&inherited, "/proj/nested/main.rsp");
        let twice = deduce(&once, "/proj/nested/main.rsp");
        assert_eq!(once, twice);
    }

    #[test]
    fn deduce_does_not_mutate_input() {
        let inherited = owned(&["rel"]);
        let _ = deduce(&inherited, "/proj/main.rsp");
        assert_eq!(inherited, owned(&["rel"]));
    }

    #[test]
    fn push_fails_past_max_depth() {
        let mut stack = ScopeStack::new(Frame::bare(Vec::new()));
        for _ in 1..MAX_DEPTH {
            stack.push(Frame::bare(Vec::new())).expect("below the limit");
        }
        assert!(matches!(
            stack.push(Frame::bare(Vec::new())),
            Err(Error::DepthExceeded { limit: MAX_DEPTH })
        ));
    }

    #[test]
    fn pop_past_bottom_is_a_noop() {
        let mut stack = ScopeStack::new(Frame::bare(owned(&["/p"])));
        assert!(!stack.pop());
        assert_eq!(stack.active(), owned(&["/p"]));
    }

    #[test]
    fn active_defers_to_base_until_overridden() {
        let mut stack = ScopeStack::new(Frame::bare(owned(&["/p"])));
        stack.set_active(Some(owned(&["/q"])));
        assert_eq!(stack.active(), owned(&["/q"]));
        stack.set_active(None);
        assert_eq!(stack.active(), owned(&["/p"]));
    }

    #[test]
    fn current_file_skips_pushed_frames() {
        let mut stack = ScopeStack::new(Frame::bare(Vec::new()));
        stack
            .push(Frame::included(Vec::new(), Arc::from("/a.rsp")))
            .expect("depth");
        stack.push(Frame::bare(Vec::new())).expect("depth");
        assert_eq!(stack.current_file().map(AsRef::as_ref), Some("/a.rsp"));
    }

    #[test]
    fn cycle_chain_lists_files_outside_in() {
        let mut stack = ScopeStack::new(Frame::bare(Vec::new()));
        stack
            .push(Frame::included(Vec::new(), Arc::from("/a.rsp")))
            .expect("depth");
        stack
            .push(Frame::included(Vec::new(), Arc::from("/b.rsp")))
            .expect("depth");
        assert_eq!(
            stack.chain_with("/a.rsp"),
            owned(&["/a.rsp", "/b.rsp", "/a.rsp"])
        );
    }
}
