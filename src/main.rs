/*!
 * Multipass - Command Line Entry Point
 *
 * Resolves one player against a data directory and prints the effective
 * permissions as JSON:
 *
 * ```text
 * multipass <player> [world]
 * ```
 *
 * Configuration comes from MULTIPASS_* environment variables.
 */

use miette::{IntoDiagnostic, Result};
use multipass::{init_tracing, MultipassConfig, PermissionManager, YamlSource};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(player) = args.next() else {
        miette::bail!(help = "usage: multipass <player> [world]", "missing player name");
    };
    let world = args.next();

    let config = MultipassConfig::from_env()?;
    info!(data_dir = %config.data_dir.display(), policy = %config.world_policy, "Loading data");

    let source = YamlSource::open(&config.data_dir)?;
    let manager = PermissionManager::new(Arc::new(source), &config)?;

    let resolved = manager.resolve(&player, world.as_deref());
    let json = serde_json::to_string_pretty(&*resolved).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
