use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use cvp_ops::cvp::{CvpApi, CvpClient};
use cvp_ops::{logging, onboard, prompt};

/// Find any streaming devices that are not under provisioning control,
/// keep their running config, and move them to a container
#[derive(Parser, Debug)]
#[command(name = "legacy-device-onboard")]
struct Args {
    /// CVP username (unused in token mode)
    #[arg(short, long, default_value = "username")]
    username: String,

    /// CVP server hostname or IP address
    #[arg(short = 'c', long)]
    cvpserver: String,

    /// Container name to move the device to
    #[arg(long)]
    container: String,

    /// Substring to filter device hostnames on, e.g. oob
    #[arg(long, default_value = "")]
    filter: String,

    /// CVP password; prompted for when neither this nor --token is given
    #[arg(short, long, conflicts_with = "token")]
    password: Option<String>,

    /// CVaaS service-account token
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (log_guard, log_path) = logging::init("CVP_Legacy_Device_Onboarder")?;
    info!("Script started successfully");
    debug!("Logging to {}", log_path.display());
    debug!(
        "Arguments: server={} container={} filter={:?} auth={}",
        args.cvpserver,
        args.container,
        args.filter,
        if args.token.is_some() { "token" } else { "password" },
    );

    let password = match (&args.password, &args.token) {
        (None, None) => Some(prompt::read_password()?),
        _ => args.password.clone(),
    };

    info!("Starting to connect to CVP server(s)");
    info!("Connecting to {}", args.cvpserver);
    let connected = match &args.token {
        Some(token) => CvpClient::connect_with_token(&args.cvpserver, token).await,
        None => {
            let password = password.as_deref().unwrap_or("");
            CvpClient::connect(&args.cvpserver, &args.username, password).await
        }
    };
    let cvp = match connected {
        Ok(cvp) => cvp,
        Err(e) => {
            error!("Unable to connect to CVP: {:#}", e);
            return Ok(());
        }
    };

    let cvp_info = cvp.get_cvp_info().await?;
    if cvp_info.version == "cvaas" {
        info!("Successfully connected to a CVaaS instance");
    } else {
        info!("Connected to CVP running version: {}", cvp_info.version);
    }

    debug!("Collecting inventory");
    let inventory = cvp.get_inventory().await?;

    let onboard_list = onboard::find_candidates(inventory, &args.filter);
    if onboard_list.is_empty() {
        info!("No devices found that are streaming, but not onboarded.");
        return Ok(());
    }

    println!("The following devices are in scope:");
    for device in &onboard_list {
        println!("* {}", device.hostname);
    }

    if !prompt::confirm("Proceed with onboarding?")? {
        debug!("User aborted onboarding");
        drop(log_guard);
        std::process::exit(1);
    }

    for device in &onboard_list {
        onboard::onboard_device(&cvp, device, &args.container).await?;
    }

    info!("Script run completed");
    Ok(())
}
