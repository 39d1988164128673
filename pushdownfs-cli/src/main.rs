//! pushdownfs CLI - mounts the command/result channel filesystem.

use clap::Parser;
use pushdownfs::channel::ChannelLayout;
use pushdownfs::config::{Settings, DEFAULT_BACKING_DIR, DEFAULT_WORKER};
use pushdownfs::logging::{default_log_dir, default_log_file, init_logging};
use pushdownfs::mount::mount_blocking;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "pushdownfs")]
#[command(version = pushdownfs::VERSION)]
#[command(about = "Mount a shared-memory command/result channel filesystem", long_about = None)]
struct Args {
    /// Directory to mount the channel filesystem on
    mountpoint: PathBuf,

    /// Directory holding the shared-memory backing files
    #[arg(long, default_value = DEFAULT_BACKING_DIR)]
    backing_dir: PathBuf,

    /// Worker executable spawned when the command channel is flushed
    #[arg(long, default_value = DEFAULT_WORKER)]
    worker: PathBuf,

    /// Expose the legacy single `result` channel instead of `res0`..`res2`
    #[arg(long)]
    single_result: bool,

    /// Directory for session logs
    #[arg(long, default_value_t = default_log_dir().to_string())]
    log_dir: String,
}

fn main() {
    let args = Args::parse();

    let _guard = match init_logging(&args.log_dir, default_log_file()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let layout = if args.single_result {
        ChannelLayout::Single
    } else {
        ChannelLayout::Triple
    };
    let settings = Settings {
        backing_dir: args.backing_dir,
        layout,
        worker: args.worker,
    };

    if let Err(e) = mount_blocking(&settings, &args.mountpoint) {
        eprintln!("Error: {}", e);
        eprintln!();
        eprintln!("Common issues:");
        eprintln!("  1. FUSE not installed: sudo apt install fuse (Linux)");
        eprintln!("  2. Mountpoint in use: try: fusermount -u <mountpoint>");
        eprintln!(
            "  3. Backing directory not writable: check {}",
            settings.backing_dir.display()
        );
        process::exit(1);
    }
}
