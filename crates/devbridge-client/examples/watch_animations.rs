//! Connects to a browser started with `--remote-debugging-port=9222` and
//! prints every animation that starts during the next ten seconds.
//!
//! The endpoint comes from `devbridge.toml` / `DEVBRIDGE_*` variables when
//! present, e.g. `DEVBRIDGE_ENDPOINT__REMOTE_DEBUGGING_PORT=9333`.

use devbridge_client::{
    Client, ClientError, animation, browser, load_config, setup_logging, target,
};
use std::time::Duration;

#[actix::main]
async fn main() -> Result<(), ClientError> {
    let config = load_config()?;
    if let Err(e) = setup_logging(&config.global.log_level) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let client = Client::from_config(&config).await?;
    let version = client.execute(browser::GetVersionParams::new()).await?;
    println!("Connected to {} (protocol {})", version.product, version.protocol_version);

    let targets = client
        .execute(target::GetTargetsParams::new())
        .await?;
    let Some(page) = targets
        .target_infos
        .iter()
        .find(|info| info.r#type == "page")
    else {
        println!("No page target to watch.");
        client.close().await;
        return Ok(());
    };

    let session = client.attach_to_target(page.target_id.clone()).await?;
    let _started = session
        .on(|event: animation::EventAnimationStarted| {
            let animation = event.animation;
            println!(
                "{} '{}' started ({}, rate {})",
                animation.r#type, animation.name, animation.play_state, animation.playback_rate
            );
        })
        .await?;
    session.execute(animation::EnableParams::new()).await?;

    tokio::time::sleep(Duration::from_secs(10)).await;

    session.execute(animation::DisableParams::new()).await?;
    session.detach().await?;
    client.close().await;
    Ok(())
}
