use crate::cli::ReposArgs;
use crate::error::Result;
use molfrag::engine::repository;
use serde_json::json;

pub fn run(args: ReposArgs) -> Result<()> {
    let repositories = repository::list_repositories(&args.repo_root)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "repositories": repositories }))
            .map_err(anyhow::Error::from)?
    );
    Ok(())
}
