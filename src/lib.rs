//! # Cyber Zen
//!
//! A personal toolbox behind one binary. Each command is self-contained and
//! loads only what it needs:
//!
//! ```text
//! gcm [message]        git add . → commit --no-verify → push (message drafted from the tree)
//! compress --src ...   nearest-neighbor downscale of JPEG/PNG/GIF into a stamped mirror
//! server [dir]         static file server with a per-request access log
//! status / uninstall   install housekeeping
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.yaml` loading and classifier-table directory lookup |
//! | [`classify`] | YAML lookup tables: file kind, category, commit wording |
//! | [`git`] | [`git::GitClient`] trait and the `git` subprocess client |
//! | [`summarize`] | Porcelain parsing and commit-message composition (pure) |
//! | [`gcm`] | The `gcm` flow: repository check, draft, confirm, commit, push |
//! | [`prompt`] | `[Y/n]` confirmation over any reader/writer |
//! | [`imaging`] | Resize math, nearest-neighbor sampler, JPEG/PNG/GIF encoding |
//! | [`compress`] | Directory walk, destination stamping, per-file events |
//! | [`server`] | Pre-flight checks, request log, directory listings, `ServeDir` |
//! | [`housekeeping`] | `status` report and `uninstall` |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Lazy Configuration
//!
//! Nothing is loaded up front. `status` reads `config.yaml`; only `gcm`
//! without a message reads the classifier tables. A broken table file
//! therefore never stops `compress` or `server`.
//!
//! ## Seams for Testing
//!
//! Every side effect that is awkward in a unit test sits behind a small
//! trait or closure: [`git::GitClient`] for subprocesses,
//! [`imaging::ImageBackend`] for pixel work, [`housekeeping::Remover`] for
//! `sudo rm`, and the confirmation callback of [`gcm::run`]. Tests swap in
//! recording mocks.
//!
//! ## Events Over Printing
//!
//! Library code never prints progress itself. `compress` sends
//! [`compress::CompressEvent`]s over a channel and the binary formats them
//! through [`output`]. Diagnostics use `tracing` and go to stderr.

pub mod classify;
pub mod compress;
pub mod config;
pub mod gcm;
pub mod git;
pub mod housekeeping;
pub mod imaging;
pub mod output;
pub mod prompt;
pub mod server;
pub mod summarize;
