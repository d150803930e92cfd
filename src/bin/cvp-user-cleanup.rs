use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info, warn};

use cvp_ops::cleanup::{self, CleanupOptions};
use cvp_ops::cvp::{CvpApi, CvpClient};
use cvp_ops::logging;

/// Kick any ONLINE non-local users using external AAA systems
/// (TACACS/RADIUS) from the system
#[derive(Parser, Debug)]
#[command(name = "cvp-user-cleanup")]
struct Args {
    /// CVP username
    #[arg(short, long)]
    username: String,

    /// CVP password
    #[arg(short, long)]
    password: Option<String>,

    /// CVP server hostname or IP address; repeat for multiple servers
    #[arg(short = 'c', long, required = true)]
    cvpserver: Vec<String>,

    /// Number of hours since last access before a user is deleted
    #[arg(short, long, default_value_t = 24)]
    timeout: u32,

    /// Dry-run mode - don't actually kick any users
    #[arg(short, long)]
    dryrun: bool,

    /// Delete a specific user ID
    #[arg(long)]
    target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (_log_guard, log_path) = logging::init("CVP_User_Cleanup")?;
    info!("Script started successfully");
    debug!("Logging to {}", log_path.display());

    let opts = CleanupOptions {
        max_idle_secs: i64::from(args.timeout) * 3600,
        dry_run: args.dryrun,
    };

    if args.dryrun {
        info!("Executing in dry-run mode - no users will be kicked");
    }
    if args.target.is_some() {
        info!("Executing in targeted mode");
    }

    info!("Starting to connect to CVP server(s)");
    let mut cvp_count = 0u64;
    let mut user_count = 0u64;

    for server in &args.cvpserver {
        info!("Connecting to {}", server);
        let password = args.password.as_deref().unwrap_or("");
        let cvp = match CvpClient::connect(server, &args.username, password).await {
            Ok(cvp) => cvp,
            Err(e) => {
                error!("Unable to connect to CVP: {:#}", e);
                continue;
            }
        };
        cvp_count += 1;

        match cvp.get_cvp_info().await {
            Ok(cvp_info) => debug!("CVP version: {}", cvp_info.version),
            Err(e) => warn!("Unable to read CVP version: {:#}", e),
        }

        if let Some(target) = &args.target {
            info!("Targeting user: {}", target);
            match cleanup::delete_target(&cvp, target, args.dryrun).await {
                Ok(kicked) => user_count += kicked,
                Err(e) => {
                    error!("Unable to delete user: {:#}", e);
                    break;
                }
            }
        } else {
            match cleanup::scan(&cvp, &opts).await {
                Ok(kicked) => user_count += kicked,
                Err(e) => error!("User cleanup failed on {}: {:#}", server, e),
            }
        }
    }

    info!("Deleted {} users from {} CVP servers", user_count, cvp_count);
    Ok(())
}
