//! Run configuration resolved from parsed CLI arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use url::Url;

use seqfetch_core::fetch::efetch_url;
use seqfetch_core::pipeline::TransferConfig;
use seqfetch_core::scan::ScanError;

use crate::cli::Args;

/// Where the record to scan comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SourceMode {
    /// Fetch `id` from `url`.
    Remote { url: Url, id: String },
    /// Scan an existing XML file.
    Local(PathBuf),
}

/// Everything one run needs, passed explicitly to each step.
#[derive(Debug, Clone)]
pub(crate) struct RunConfig {
    pub source: SourceMode,
    pub pattern: Regex,
    pub element: String,
    pub transfer: TransferConfig,
    pub output: PathBuf,
    pub save_dir: Option<PathBuf>,
    pub show_progress: bool,
}

impl RunConfig {
    /// Validates `args` and builds the run configuration.
    pub(crate) fn from_args(args: &Args, stderr_is_terminal: bool) -> Result<Self> {
        let pattern = RegexBuilder::new(&args.pattern)
            .case_insensitive(args.ignore_case)
            .build()
            .map_err(|source| ScanError::Pattern {
                pattern: args.pattern.clone(),
                source,
            })?;

        let transfer = TransferConfig::new(args.chunk_size, args.queue_capacity)
            .context("Invalid transfer settings")?;

        let source = match &args.file {
            Some(path) => SourceMode::Local(path.clone()),
            None => SourceMode::Remote {
                url: efetch_url(&args.endpoint, &args.id)?,
                id: args.id.clone(),
            },
        };

        Ok(Self {
            source,
            pattern,
            element: args.element.clone(),
            transfer,
            output: args.output.clone(),
            save_dir: args.save.then(|| args.save_dir.clone()),
            show_progress: super::terminal::should_use_spinner(
                stderr_is_terminal,
                args.quiet,
                super::terminal::is_dumb_terminal(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_config_remote_defaults() {
        let config = RunConfig::from_args(&parse(&["seqfetch", "AAAATAGCCCC"]), false).unwrap();
        match &config.source {
            SourceMode::Remote { url, id } => {
                assert_eq!(id, "30271926");
                assert!(url.as_str().contains("id=30271926"), "{url}");
                assert!(url.as_str().contains("retmode=xml"), "{url}");
            }
            SourceMode::Local(path) => panic!("unexpected local source {}", path.display()),
        }
        assert!(config.save_dir.is_none());
        assert!(!config.show_progress);
        assert_eq!(config.element, "TSeq_sequence");
    }

    #[test]
    fn test_run_config_local_with_save() {
        let config = RunConfig::from_args(
            &parse(&["seqfetch", "AC", "-f", "r.xml", "--save", "--save-dir", "keep"]),
            false,
        )
        .unwrap();
        assert_eq!(config.source, SourceMode::Local(PathBuf::from("r.xml")));
        assert_eq!(config.save_dir, Some(PathBuf::from("keep")));
    }

    #[test]
    fn test_run_config_ignore_case() {
        let config = RunConfig::from_args(&parse(&["seqfetch", "gattaca", "-i"]), false).unwrap();
        assert!(config.pattern.is_match("GATTACA"));

        let config = RunConfig::from_args(&parse(&["seqfetch", "gattaca"]), false).unwrap();
        assert!(!config.pattern.is_match("GATTACA"));
    }

    #[test]
    fn test_run_config_rejects_bad_pattern() {
        let err = RunConfig::from_args(&parse(&["seqfetch", "(AC"]), false).unwrap_err();
        assert!(err.to_string().contains("invalid search pattern"), "{err}");
    }

    #[test]
    fn test_run_config_rejects_bad_endpoint() {
        let err = RunConfig::from_args(&parse(&["seqfetch", "AC", "--endpoint", "not a url"]), false)
            .unwrap_err();
        assert!(err.downcast_ref::<seqfetch_core::FetchError>().is_some(), "{err:?}");
    }

    #[test]
    fn test_run_config_quiet_disables_progress() {
        let config = RunConfig::from_args(&parse(&["seqfetch", "AC", "-q"]), true).unwrap();
        assert!(!config.show_progress);
    }
}
