//! Example: Rendering a public profile and, when signed in, the owner view
//!
//! # Setup
//!
//! 1. Point the example at a project: ```bash export
//!    LINKBIO_DATA_URL=https://abc.supabase.co export
//!    LINKBIO_DATA_API_KEY=anon-key ```
//!
//! 2. Optionally sign in by exporting a session token: ```bash export
//!    LINKBIO_SESSION_TOKEN=eyJ... ```
//!
//! 3. Run this example: ```bash cargo run --example public_profile -- ana ```

use std::sync::Arc;

use anyhow::Context;
use linkbio_domain::LogicalEntity;
use linkbio_infra::auth::SessionTokenStore;
use linkbio_infra::{config, init_tracing, LinkBioServices, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::Pretty);

    let username = std::env::args().nth(1).unwrap_or_else(|| "ana".to_string());
    let config = config::load().context("loading configuration")?;

    let tokens = Arc::new(SessionTokenStore::new());
    if let Ok(token) = std::env::var("LINKBIO_SESSION_TOKEN") {
        tokens.set_token(token);
    }

    let services = LinkBioServices::connect(&config, tokens).context("connecting services")?;

    println!("Public profile for @{username}");
    println!("==========================\n");

    match services.public.read_public(&username).await {
        Ok(view) => {
            println!("  {}", view.profile.title.as_deref().unwrap_or("(no title)"));
            if let Some(bio) = &view.profile.bio {
                println!("  {bio}");
            }
            for link in &view.links {
                println!("  - {} -> {}", link.title, link.url);
            }
        }
        Err(err) if err.is_not_found() => println!("  no such profile"),
        Err(err) => return Err(err).context("reading public profile"),
    }

    let load = services.session.load().await.context("loading owner profile")?;
    match load.snapshot().and_then(|snapshot| snapshot.profile.as_ref()) {
        Some(profile) => {
            let links = services.session.links().len();
            println!("\nSigned in as @{} ({links} links)", profile.username);
            if load.was_created() {
                println!("  profile created on first load");
            }
        }
        None => println!("\nNot signed in"),
    }

    for entity in LogicalEntity::ALL {
        if let Some(table) = services.resolver.resolved(entity) {
            println!("  {entity} -> {table}");
        }
    }

    Ok(())
}
