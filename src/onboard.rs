use anyhow::{bail, Context, Result};
use tracing::{debug, error, info};

use crate::cvp::types::{device_status, streaming_status, NETELEMENT, UNDEFINED_CONTAINER};
use crate::cvp::{ConfigletRef, CvpApi, NetElement};

/// Change-control note attached to every task this tool enqueues
const TASK_REASON: &str = "Legacy device onboarder";

/// A device qualifies for onboarding when it streams telemetry but was
/// never brought under provisioning control, and its hostname matches the
/// operator's substring filter (an empty filter matches everything).
pub fn is_candidate(device: &NetElement, filter: &str) -> bool {
    device.parent_container_id == UNDEFINED_CONTAINER
        && device.streaming_status == streaming_status::ACTIVE
        && device.device_type == NETELEMENT
        && device.status == device_status::REGISTERED
        && device.hostname.contains(filter)
}

/// Filter the inventory down to onboarding candidates, preserving order.
pub fn find_candidates(inventory: Vec<NetElement>, filter: &str) -> Vec<NetElement> {
    let mut onboard_list = Vec::new();
    for device in inventory {
        if is_candidate(&device, filter) {
            info!("Adding {} to onboarding list", device.hostname);
            onboard_list.push(device);
        } else {
            debug!("Skipping: {}", device.hostname);
        }
    }
    onboard_list
}

/// Create the configlet if the name is new, otherwise replace its text.
/// Any lookup failure is treated as "does not exist yet". Returns the
/// configlet key either way.
async fn upsert_configlet<C: CvpApi + ?Sized>(cvp: &C, name: &str, config: &str) -> Result<String> {
    match cvp.get_configlet_by_name(name).await {
        Ok(existing) => {
            debug!("{} configlet already exists with id: {}", name, existing.key);
            cvp.update_configlet(config, &existing.key, name)
                .await
                .with_context(|| format!("Failed to update configlet {}", name))?;
            Ok(existing.key)
        }
        Err(_) => {
            let key = cvp
                .add_configlet(name, config)
                .await
                .with_context(|| format!("Failed to create configlet {}", name))?;
            info!("{} configlet created with id: {}", name, key);
            Ok(key)
        }
    }
}

/// Bring one device under provisioning control: capture its running
/// config into an `auto_<hostname>` configlet, move it into the target
/// container, then attach the configlet.
///
/// Every mutation only enqueues a pending task; nothing is executed until
/// the tasks are run from CVP itself.
pub async fn onboard_device<C: CvpApi + ?Sized>(
    cvp: &C,
    device: &NetElement,
    container_name: &str,
) -> Result<()> {
    info!("Collecting running config for {}", device.hostname);
    let running_config = cvp
        .get_device_configuration(&device.system_mac_address)
        .await
        .with_context(|| format!("Failed to collect running config for {}", device.hostname))?;
    info!(
        "Running config collected: {} lines",
        running_config.lines().count()
    );

    let name = format!("auto_{}", device.hostname);
    let key = upsert_configlet(cvp, &name, &running_config).await?;

    info!(
        "Preparing to move {} to container: {}",
        device.hostname, container_name
    );
    let container = match cvp.get_container_by_name(container_name).await? {
        Some(container) => container,
        None => {
            error!("Target container: {} does not exist", container_name);
            bail!("target container {} does not exist", container_name);
        }
    };
    cvp.move_device_to_container(TASK_REASON, device, &container)
        .await
        .with_context(|| {
            format!(
                "Failed to move {} to container {}",
                device.hostname, container.name
            )
        })?;

    // The configlet has to be assigned after the move
    info!("Assigning configlet to device");
    let configs = [ConfigletRef { name, key }];
    cvp.apply_configlets_to_device(TASK_REASON, device, &configs)
        .await
        .with_context(|| format!("Failed to assign configlet to {}", device.hostname))?;

    Ok(())
}
