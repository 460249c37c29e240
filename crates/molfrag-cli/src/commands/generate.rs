use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use molfrag::engine::cache::CacheStore;
use molfrag::engine::config::BuildConfigBuilder;
use molfrag::engine::registry::BuildRegistry;
use molfrag::engine::tool::PartitionProcess;
use molfrag::workflows::generate;
use std::time::Duration;
use tracing::info;

pub fn run(args: GenerateArgs) -> Result<()> {
    let request = super::read_request(&args.request)?;

    let mut builder = BuildConfigBuilder::new()
        .repo_root(args.repo_root)
        .cache_dir(args.cache_dir.clone())
        .tool_binary(args.tool.clone());
    if let Some(repository) = args.repository {
        builder = builder.default_repository(repository);
    }
    if let Some(shell_size) = args.shell_size {
        builder = builder.default_shell_size(shell_size);
    }
    if let Some(pool_width) = args.pool_width {
        builder = builder.pool_width(pool_width);
    }
    if let Some(timeout) = args.timeout {
        builder = builder.tool_timeout(Duration::from_secs(timeout));
    }
    let config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    info!(
        repo_root = %config.repo_root.display(),
        pool_width = config.pool_width,
        "Running generate workflow"
    );

    let store = CacheStore::new(args.cache_dir);
    let registry = BuildRegistry::new();
    let tool = PartitionProcess::new(args.tool).with_timeout(config.tool_timeout);

    let response = generate::handle(Some(&request), &config, &store, &registry, &tool);
    println!("{}", serde_json::to_string_pretty(&response).map_err(anyhow::Error::from)?);
    Ok(())
}
