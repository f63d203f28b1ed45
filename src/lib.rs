//! This crate sorts line-oriented text files that are too large to hold
//! comfortably in memory. The input is split into size-bounded chunks, the
//! chunks are sorted concurrently, and a streaming k-way merge of the sorted
//! chunks produces a single totally-ordered output file, so peak memory is
//! governed by the chunk size and the number of sort tasks rather than by
//! the input size.
//!
//! Lines are ordered by a composite key: the text after the first `.`
//! delimiter, compared case-insensitively, then the integer prefix before
//! it. Lines that do not follow the `"<integer>. <word>"` convention are
//! tolerated; their key degrades to the whole trimmed line with a zero
//! number.
//!
//! Work is organized in jobs. A [job id](job::JobId) determines the input
//! file (`file_<id>.txt`), the output file (`file_<id>_sorted.txt`) and the
//! per-job working directory, which is removed when the job finishes
//! regardless of outcome. Job state can be published to a
//! [status store](status::StatusStore) and a running job can be stopped
//! through a [cancellation token](cancellation::CancellationToken).
//!
//! # Examples
//! ```
//! use std::path::PathBuf;
//! use large_file_sort::config::SortConfig;
//! use large_file_sort::generator::Generator;
//! use large_file_sort::job::JobId;
//! use large_file_sort::sorter::Sorter;
//!
//! fn generate_and_sort() -> Result<bool, anyhow::Error> {
//!     let job_id = JobId::new();
//!
//!     // produce an input file of ~256 MB of "<integer>. <word>" lines
//!     let generator = Generator::new(PathBuf::from("./generated"));
//!     generator.generate(&job_id, 256)?;
//!
//!     let mut config = SortConfig::new(
//!         PathBuf::from("./generated"),
//!         PathBuf::from("./sorted"),
//!     );
//!     config.with_tmp_dir(PathBuf::from("./tmp"));
//!     Ok(Sorter::new(config).run(&job_id))
//! }
//! ```

pub(crate) mod chunk_cursor;
pub(crate) mod chunk_sorter;
pub(crate) mod line_record;
pub(crate) mod merger;
pub(crate) mod sort_command;
pub(crate) mod splitter;
pub(crate) mod work_dir;

pub mod cancellation;
pub mod config;
pub mod generator;
pub mod job;
pub mod sort_key;
pub mod sorter;
pub mod status;
