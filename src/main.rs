use anyhow::Result;
use clap::Parser;

use release_publish::config::{self, CommitterIdentity, ReleaseSpec};
use release_publish::host::github::{parse_github_remote, GitHubConfig};
use release_publish::host::GitHubReleaseHost;
use release_publish::release::{ReleaseOutcome, ReleasePublisher};
use release_publish::ui;
use release_publish::vcs::Git2VersionControl;

#[derive(clap::Parser)]
#[command(
    name = "release-publish",
    about = "Create a GitHub release with assets, rolling back the version bump commit on failure"
)]
struct Args {
    #[arg(long, help = "Semantic version to release (becomes the release tag)")]
    version: String,

    #[arg(long, help = "Release notes body")]
    release_notes: String,

    #[arg(
        long,
        default_value = "",
        help = "Comma separated list of artifact files to attach"
    )]
    files: String,

    #[arg(long, help = "Record the version bump as a commit before releasing")]
    commit: bool,

    #[arg(
        long,
        help = "File whose change is the version bump, relative to the repository root (required with --commit)"
    )]
    versioned_file_path: Option<String>,

    #[arg(
        long,
        help = "GitHub token; falls back to the GITHUB_TOKEN environment variable"
    )]
    github_token: Option<String>,

    #[arg(long, help = "Repository as owner/name; derived from the git remote when omitted")]
    repo: Option<String>,

    #[arg(long, help = "Git remote to push to and derive the repository from")]
    remote: Option<String>,

    #[arg(long, help = "Committer name for the version bump commit")]
    git_user_name: Option<String>,

    #[arg(long, help = "Committer email for the version bump commit")]
    git_user_email: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let token = match config::resolve_token(args.github_token.as_deref()) {
        Some(token) => token,
        None => {
            ui::display_error("A GitHub token is required (--github-token or GITHUB_TOKEN)");
            std::process::exit(1);
        }
    };

    let remote_name = args
        .remote
        .clone()
        .or(file_config.git.remote.clone())
        .unwrap_or_else(|| "origin".to_string());

    let (owner, repo) = match resolve_repository(args.repo.as_deref(), &remote_name) {
        Ok(pair) => pair,
        Err(e) => {
            ui::display_error(&format!("Could not determine repository: {}", e));
            std::process::exit(1);
        }
    };

    let mut spec =
        ReleaseSpec::new(&args.version, &args.release_notes).with_artifact_list(&args.files);
    if args.commit {
        spec = spec.with_version_bump(args.versioned_file_path.clone().unwrap_or_default());
    }

    // CLI overrides win over the config file; both fall back to the bot
    // identity.
    let identity = CommitterIdentity::resolve(
        args.git_user_name
            .as_deref()
            .or(file_config.committer.name.as_deref()),
        args.git_user_email
            .as_deref()
            .or(file_config.committer.email.as_deref()),
    );

    let vcs = Git2VersionControl::new(
        &args.version,
        spec.versioned_file_path.clone().unwrap_or_default(),
        identity,
        &remote_name,
        Some(token.clone()),
    );

    let mut host_config = GitHubConfig::new(owner, repo, token);
    if let Some(api_url) = &file_config.host.api_url {
        host_config = host_config.with_api_url(api_url);
    }
    if let Some(upload_url) = &file_config.host.upload_url {
        host_config = host_config.with_upload_url(upload_url);
    }
    let host = match GitHubReleaseHost::new(host_config) {
        Ok(host) => host,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let publisher = ReleasePublisher::new(&spec, &vcs, &host);
    match publisher.run() {
        ReleaseOutcome::Published { url } => {
            ui::display_success(&format!("Release {} published", args.version));
            println!("{}", url);
            Ok(())
        }
        ReleaseOutcome::Failed { error } => {
            ui::display_error(&error);
            std::process::exit(1);
        }
    }
}

/// Resolves the owner/name pair from `--repo` or, failing that, from the
/// configured git remote's URL.
fn resolve_repository(explicit: Option<&str>, remote_name: &str) -> Result<(String, String)> {
    if let Some(repo) = explicit {
        return repo
            .split_once('/')
            .map(|(owner, name)| (owner.to_string(), name.to_string()))
            .ok_or_else(|| anyhow::anyhow!("expected owner/name, got '{}'", repo));
    }

    let repo = git2::Repository::discover(".")
        .map_err(|e| anyhow::anyhow!("not in a git repository and no --repo given: {}", e))?;
    let remote = repo
        .find_remote(remote_name)
        .map_err(|_| anyhow::anyhow!("no remote named '{}' found", remote_name))?;
    let url = remote
        .url()
        .ok_or_else(|| anyhow::anyhow!("remote '{}' has no URL", remote_name))?;

    parse_github_remote(url)
        .ok_or_else(|| anyhow::anyhow!("remote URL '{}' is not a GitHub repository", url))
}
