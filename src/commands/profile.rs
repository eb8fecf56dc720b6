//! Profile command handlers: export and import.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lampa_core::{
    APP_VERSION, DEFAULT_PROFILE_FILENAME, PageStorage, apply_import, export_profile,
    import_profile, read_profile, write_profile,
};

use super::HostContext;

pub fn run_profile_export_command(ctx: &HostContext, path: Option<&Path>) -> Result<()> {
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_PROFILE_FILENAME), Path::to_path_buf);

    let local_storage = ctx
        .page_storage
        .snapshot()
        .context("Failed to read page storage")?;
    let document = export_profile(ctx.store.get_all(), local_storage, APP_VERSION);
    write_profile(&path, &document)
        .with_context(|| format!("Failed to save profile to '{}'", path.display()))?;

    println!("Profile saved: {}", path.display());
    Ok(())
}

pub fn run_profile_import_command(ctx: &HostContext, path: &Path) -> Result<()> {
    let document = read_profile(path)
        .with_context(|| format!("Failed to load profile from '{}'", path.display()))?;
    let import = import_profile(&document)?;
    let counts = apply_import(import, &ctx.store, ctx.page_storage.as_ref())
        .context("Failed to apply profile")?;

    let bounds = ctx.store.window_bounds();
    println!(
        "Profile loaded: {} setting(s), {} page storage entr{}",
        counts.settings,
        counts.local_storage,
        if counts.local_storage == 1 { "y" } else { "ies" }
    );
    println!("Start URL: {}", ctx.start_url());
    println!("Window: {}x{}", bounds.width, bounds.height);
    Ok(())
}
