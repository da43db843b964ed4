//! List command
//!
//! Usage: snapq list --fixture <PATH> [--repository R]... [--snapshot S]... [options]

use std::path::PathBuf;

use clap::{ArgAction, Args};
use snapq_core::{GetSnapshotsRequest, SortKey, SortOrder};
use snapq_engine::{apply_engine_query, EngineQuery, EngineQueryResult, QueryContext};
use snapq_store::fixture::load_cluster_file;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Cluster fixture (YAML)
    #[arg(long)]
    pub fixture: PathBuf,

    /// Repository name or pattern; repeat for several. Defaults to all
    #[arg(long = "repository", short = 'r')]
    pub repositories: Vec<String>,

    /// Snapshot name or pattern; repeat for several. Defaults to all
    #[arg(long = "snapshot", short = 's')]
    pub snapshots: Vec<String>,

    /// Policy name or pattern; `_none` selects snapshots without a policy
    #[arg(long = "policy")]
    pub policies: Vec<String>,

    /// start_time, name, duration, index_count, shard_count, failed_shard_count or repository
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,

    #[arg(long)]
    pub size: Option<usize>,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Cursor from the `next` field of a previous response
    #[arg(long)]
    pub after: Option<String>,

    #[arg(long)]
    pub from_sort_value: Option<String>,

    /// Load full snapshot details
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub verbose: bool,

    /// Skip missing or unloadable snapshots instead of failing
    #[arg(long)]
    pub ignore_unavailable: bool,
}

impl ListArgs {
    fn to_request(&self) -> Result<GetSnapshotsRequest, Box<dyn std::error::Error>> {
        let mut request = GetSnapshotsRequest::default()
            .with_verbose(self.verbose)
            .with_ignore_unavailable(self.ignore_unavailable)
            .with_offset(self.offset)
            .with_policies(self.policies.iter().cloned());
        if !self.repositories.is_empty() {
            request.repositories = self.repositories.clone();
        }
        if !self.snapshots.is_empty() {
            request = request.with_snapshots(self.snapshots.iter().cloned());
        }
        let sort: SortKey = match &self.sort {
            Some(raw) => raw.parse()?,
            None => SortKey::default(),
        };
        let order: SortOrder = match &self.order {
            Some(raw) => raw.parse()?,
            None => SortOrder::default(),
        };
        request = request.with_sort(sort, order);
        if let Some(size) = self.size {
            request = request.with_size(size);
        }
        if let Some(after) = &self.after {
            request = request.with_after(after.clone());
        }
        request.from_sort_value = self.from_sort_value.clone();
        Ok(request)
    }
}

/// Execute list command
pub async fn execute(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.to_request()?;
    let cluster = load_cluster_file(&args.fixture)?;

    let ctx = QueryContext::new();
    let token = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let EngineQueryResult::GetSnapshots(response) =
        apply_engine_query(EngineQuery::GetSnapshots(request), &cluster, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: ListArgs,
    }

    fn parse(argv: &[&str]) -> ListArgs {
        let mut full = vec!["list"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_defaults_map_to_default_request() {
        let request = parse(&["--fixture", "c.yaml"]).to_request().unwrap();
        assert_eq!(request.repositories, vec!["_all"]);
        assert_eq!(request.snapshots, vec!["_all"]);
        assert!(request.verbose);
        assert_eq!(request.sort, SortKey::StartTime);
        assert_eq!(request.order, SortOrder::Asc);
    }

    #[test]
    fn test_flags_map_onto_request() {
        let request = parse(&[
            "--fixture",
            "c.yaml",
            "-r",
            "repo-a",
            "-r",
            "repo-b",
            "--snapshot",
            "snap-*",
            "--policy",
            "daily-*",
            "--sort",
            "duration",
            "--order",
            "DESC",
            "--size",
            "3",
            "--verbose",
            "false",
        ])
        .to_request()
        .unwrap();
        assert_eq!(request.repositories, vec!["repo-a", "repo-b"]);
        assert_eq!(request.snapshots, vec!["snap-*"]);
        assert_eq!(request.policies, vec!["daily-*"]);
        assert_eq!(request.sort, SortKey::Duration);
        assert_eq!(request.order, SortOrder::Desc);
        assert!(!request.verbose);
    }

    #[test]
    fn test_unknown_sort_key_rejected() {
        assert!(parse(&["--fixture", "c.yaml", "--sort", "size"])
            .to_request()
            .is_err());
    }
}
