//! Line-by-line response-file interpreter.
//!
//! Each input line is classified, expanded, and flattened into one result
//! list. Nested `@file` inclusions splice their lines in place under a new
//! search-path scope; `SEARCHPATH=` directives rewrite the scope in place.

mod scope;
mod work_list;

use std::{borrow::Cow, sync::Arc};

use log::{debug, warn};
use tap::Pipe;

use crate::resp::{
    Error, Result,
    directive::{LineKind, SearchPathCmd},
    path_ext,
    provide::{CwdCache, Fs},
    search_path::{self, LocateMode},
};

use self::{
    scope::{Frame, ScopeStack},
    work_list::{Entry, WorkList},
};

/// Prefixes applied to result entries that are not resolved paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Comments and directive lines kept for provenance.
    pub ignore: String,
    /// Assignment statements, passed through verbatim.
    pub statement: String,
    /// Lines that failed to resolve but did not stop processing.
    pub failure: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            ignore: String::from(";"),
            statement: String::from("="),
            failure: String::from("!"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Directory anchoring the top-level scope, standing in for the
    /// directory of the response file the lines came from. Falls back to
    /// the working directory.
    pub output_base_dir: Option<String>,
    pub markers: Markers,
}

/// Expand `lines` into the flattened result list.
///
/// Filespec lines resolve against the active search paths under `mode`;
/// see [Markers] for how non-path lines are tagged. Inclusion cycles and
/// scope nesting deeper than 32 levels abort the whole call with no
/// partial result.
pub fn process_response_file_lines<F: Fs>(
    fs: &F,
    lines: &[String],
    search_paths: &[String],
    mode: LocateMode,
    options: &Options,
) -> Result<Vec<String>> {
    Interpreter::new(fs, search_paths, mode, options).run(lines)
}

struct Interpreter<'env, F> {
    /// Provider with the working directory cached for the whole call.
    fs: CwdCache<&'env F>,
    mode: LocateMode,
    markers: &'env Markers,
    /// Anchor for top-level scope deduction.
    root_dir: String,
    stack: ScopeStack,
    out: Vec<String>,
}

impl<'env, F: Fs> Interpreter<'env, F> {
    fn new(
        fs: &'env F,
        search_paths: &[String],
        mode: LocateMode,
        options: &'env Options,
    ) -> Self {
        let fs = CwdCache::new(fs);
        let cwd = fs.current_dir();
        let root_dir = match &options.output_base_dir {
            Some(dir) if path_ext::is_rooted(dir) => path_ext::normalize(dir),
            Some(dir) => match &cwd {
                Some(cwd) => path_ext::join(cwd, dir),
                None => path_ext::normalize(dir),
            },
            None => cwd.unwrap_or_else(|| String::from(".")),
        };

        Self {
            fs,
            mode,
            markers: &options.markers,
            root_dir,
            stack: ScopeStack::new(Frame::bare(search_paths.to_vec())),
            out: Vec::new(),
        }
    }

    fn run(mut self, lines: &[String]) -> Result<Vec<String>> {
        let mut work = WorkList::new(lines);

        while let Some(entry) = work.next() {
            match entry {
                Entry::Emit(text) => self.out.push(text),
                Entry::ExitScope => {
                    self.stack.pop();
                }
                Entry::Line(line) => self.line(line.as_ref(), &mut work)?,
            }
        }

        // every balanced inclusion already popped its own frame
        while self.stack.pop() {}

        Ok(self.out)
    }

    fn line<'input>(&mut self, line: &str, work: &mut WorkList<'input>) -> Result {
        let text = line.trim();
        let markers = self.markers;

        match LineKind::classify(text) {
            LineKind::Blank => {}
            LineKind::Comment => self.emit(&markers.ignore, text),
            LineKind::Statement => self.emit(&markers.statement, text),
            LineKind::FileSpec(spec) => {
                let matches = search_path::locate_all_matching_files(
                    &self.fs,
                    spec,
                    self.stack.active(),
                    self.mode,
                    None,
                )?;
                self.out.extend(matches);
            }
            LineKind::SearchPath(cmd) => {
                // the directive itself stays visible downstream
                self.emit(&markers.ignore, text);
                self.search_path(cmd)?;
            }
            LineKind::Include(reference) => self.include(reference, text, work)?,
        }

        Ok(())
    }

    fn search_path(&mut self, cmd: SearchPathCmd<'_>) -> Result {
        match cmd {
            SearchPathCmd::Push => {
                let deduced = self.deduce(self.stack.active());
                debug!("search path push: {deduced:?}");
                self.stack.push(Frame::bare(deduced))?;
            }
            SearchPathCmd::Pop => {
                self.stack.pop();
            }
            SearchPathCmd::Revert => self.stack.set_active(None),
            SearchPathCmd::Replace(elements) => {
                let replacement = elements
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>()
                    .pipe(|elements| self.deduce(&elements));
                debug!("search path replace: {replacement:?}");
                self.stack.set_active(Some(replacement));
            }
        }
        Ok(())
    }

    fn include<'input>(
        &mut self,
        reference: &str,
        text: &str,
        work: &mut WorkList<'input>,
    ) -> Result {
        let markers = self.markers;
        let located = if reference.is_empty() {
            None
        } else {
            search_path::locate_file_in_search_path(
                &self.fs,
                reference,
                self.stack.active(),
                self.mode.ignore_cwd,
            )?
        };

        let Some(located) = located else {
            warn!("could not locate response file {reference}");
            self.emit(&markers.failure, text);
            return Ok(());
        };

        let resolved: Arc<str> = located.path.into();
        if self.stack.contains_file(&resolved) {
            return Err(Error::Cycle {
                chain: self.stack.chain_with(&resolved),
            });
        }

        let Ok(contents) = self.fs.read_to_string(&resolved) else {
            warn!("could not read response file {resolved}");
            self.emit(&markers.failure, text);
            return Ok(());
        };

        debug!("including response file {resolved}");
        let base = scope::deduce(self.stack.active(), &resolved);
        self.stack.push(Frame::included(base, Arc::clone(&resolved)))?;

        let mut items = Vec::with_capacity(contents.lines().count() + 2);
        items.push(Entry::Emit(format!("{}{text}", markers.ignore)));
        items.extend(
            contents
                .lines()
                .map(|line| Entry::Line(Cow::Owned(String::from(line)))),
        );
        items.push(Entry::ExitScope);
        work.splice(items);

        Ok(())
    }

    /// Deduction anchored on the innermost open response file, or the
    /// top-level base directory when none is open.
    fn deduce(&self, inherited: &[String]) -> Vec<String> {
        match self.stack.current_file() {
            Some(file) => scope::deduce(inherited, file),
            None => scope::deduce_in(inherited, &self.root_dir),
        }
    }

    fn emit(&mut self, marker: &str, text: &str) {
        self.out.push(format!("{marker}{text}"));
    }
}
