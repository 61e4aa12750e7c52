//! Response-file expansion: resolve the file specifications, directives,
//! and nested includes of a response file across an ordered set of search
//! directories, wildcards included.

pub mod cli;
pub mod resp;

pub use resp::{
    Cardinality, Error, LocateMode, Located, Markers, Options,
    locate_all_matching_files, locate_file_in_search_path, process_response_file_lines,
};
