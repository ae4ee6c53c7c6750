//! panetrack: run commands in tmux panes and track them to completion.
//!
//! Commands are typed into a pane wrapped in sentinel lines carrying a global
//! sequence number. Later status checks capture the pane text and pair those
//! sentinels to recover each command's exit status and output.
//!
//! # Quick start
//!
//! ```no_run
//! use panetrack::config::load_config;
//! use panetrack::tmux::TmuxClient;
//! use panetrack::tracker::{CommandTracker, ExecuteRequest, SliceOptions, TrackerSettings};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let client = Arc::new(TmuxClient::from_config(&config.tmux));
//! let tracker =
//!     CommandTracker::with_backend(client, config.shell, TrackerSettings::from(&config.tracker));
//! let id = tracker.execute(ExecuteRequest::new("%1", "make test")).await.unwrap();
//! let record = tracker.wait(&id, &SliceOptions::default(), None).await.unwrap();
//! println!("{:?} {:?}", record.status, record.exit_code);
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod contracts;
pub mod error;
#[cfg(test)]
pub mod testsupport;
pub mod tmux;
pub mod tracker;
