#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::module_inception,
    clippy::missing_errors_doc
)]

mod directive;
mod error;
mod interpreter;
mod path_ext;
mod search_path;
mod wildcard;

pub mod provide;

pub use self::{
    directive::{LineKind, SearchPathCmd},
    error::Error,
    interpreter::{Markers, Options, process_response_file_lines},
    search_path::{
        Cardinality, LocateMode, Located, locate_all_matching_files, locate_file_in_search_path,
    },
};

type PathSet = rustc_hash::FxHashSet<String>;

pub type Result<T = ()> = ::core::result::Result<T, Error>;
