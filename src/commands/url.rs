//! Start URL command handler.

use anyhow::Result;

use super::HostContext;

/// Prints the start URL, or validates and stores `new_url`.
pub fn run_url_command(ctx: &HostContext, new_url: Option<&str>) -> Result<()> {
    match new_url {
        None => println!("{}", ctx.start_url()),
        Some(input) => {
            let url = ctx.store.set_start_url(input)?;
            println!("Start URL changed to: {url}");
        }
    }
    Ok(())
}
