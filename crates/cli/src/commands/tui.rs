use crate::util;
use anyhow::{bail, Result};
use domain::config::DashboardConfig;
use ui::{DashboardApp, Exit};

pub async fn run(config: &DashboardConfig) -> Result<()> {
    let dashboard = util::connect(config)?;
    if !dashboard.session().is_authenticated() {
        bail!("Not logged in. Run `kcloud login --principal <id>` first");
    }

    let mut app = DashboardApp::new(dashboard)?;
    let exit = app.run().await?;
    // терминал восстанавливается в Drop до печати
    drop(app);

    if matches!(exit, Exit::LoggedOut) {
        util::success("Logged out");
    }
    Ok(())
}
