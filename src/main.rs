use env_logger::Env;
use iron::Iron;
use log::info;

use hermes_blog::config::Config;
use hermes_blog::database::PostStore;

// RUST_LOG=info hermes_blog > logs 2>&1 &
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    let store = PostStore::seeded();
    info!("seeded store with {} posts", store.list().len());

    let chain = hermes_blog::app(store, &config);

    let _listening = Iron::new(chain).http(config.bind_addr.as_str())?;
    info!("listening on {}", config.bind_addr);
    Ok(())
}
