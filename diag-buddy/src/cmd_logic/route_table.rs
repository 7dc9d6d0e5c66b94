use anyhow::{Context, Result};

use diag_buddy::diag_call::NetDiagWrapper;

pub fn handle(wrapper: &NetDiagWrapper) -> Result<()> {
    let routes = wrapper.get_route_table()
        .context("Failed to read route table")?;
    super::print_json(&routes)
}
