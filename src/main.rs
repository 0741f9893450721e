use anyhow::{Context, Result};
use hand_controller::communication::{Communicator, HttpBridgeClient};
use hand_controller::config::ControllerConfig;
use hand_controller::device::{Device, DeviceFactory, DeviceManager, PoseExecutor};
use hand_controller::models::register_device_types;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ControllerConfig::from_env();
    info!("Hand controller starting");
    info!("  CAN bridge: {}", config.can_service_url);

    let bridge = HttpBridgeClient::new(config.can_service_url.clone())
        .context("failed to create CAN bridge client")?;
    match bridge.all_interface_statuses().await {
        Ok(statuses) => {
            for (interface, active) in statuses {
                info!(interface = %interface, active, "CAN interface status");
            }
        }
        Err(e) => warn!(error = %e, "CAN bridge not reachable, continuing"),
    }

    let mut factory = DeviceFactory::new();
    register_device_types(&mut factory);
    info!("Supported models: {:?}", factory.supported_models());

    let manager = DeviceManager::new();
    for device_config in &config.devices {
        let bag = device_config.to_bag(&config.can_service_url);
        let device = factory
            .create(&device_config.model, &bag)
            .with_context(|| format!("failed to create device {}", device_config.id))?;

        device
            .connect()
            .await
            .with_context(|| format!("failed to connect device {}", device_config.id))?;
        info!(
            device = %device.id(),
            model = device.model(),
            hand = %device.hand_type().await,
            presets = device.supported_presets().len(),
            "Device ready"
        );

        manager
            .register(device)
            .await
            .context("failed to register device")?;
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutting down");

    manager.shutdown().await;

    info!("Hand controller stopped");
    Ok(())
}
