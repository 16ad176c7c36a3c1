//! `kiln cache`: inspect and reset the modification-time cache.

use crate::pipeline::load_project;
use crate::{CacheAction, GlobalArgs};

/// Runs a `kiln cache` subcommand.
pub fn run(action: CacheAction, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let mut cache = project.open_cache()?;

    match action {
        CacheAction::Path => {
            println!("{}", cache.path().display());
        }
        CacheAction::Clear => {
            cache.clear();
            cache.commit_and_save()?;
            if !global.quiet {
                eprintln!("   Cleared {}", cache.path().display());
            }
        }
        CacheAction::Delete => {
            let deleted = cache.delete_file()?;
            if !global.quiet {
                if deleted {
                    eprintln!("   Deleted {}", cache.path().display());
                } else {
                    eprintln!("   Nothing to delete at {}", cache.path().display());
                }
            }
        }
    }
    Ok(0)
}
