use crate::cli::FindArgs;
use crate::error::Result;
use molfrag::engine::cache::CacheStore;
use molfrag::workflows::find;
use tracing::info;

pub fn run(args: FindArgs) -> Result<()> {
    let request = super::read_request(&args.request)?;

    info!(cache_dir = %args.cache_dir.display(), "Running find workflow");

    let store = CacheStore::new(args.cache_dir);
    let response = find::handle(Some(&request), &store);
    println!("{}", serde_json::to_string_pretty(&response).map_err(anyhow::Error::from)?);
    Ok(())
}
