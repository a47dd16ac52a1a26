fn setup_environment() {
    // A previously bootstrapped yt-dlp lives in the managed bin dir;
    // put it on PATH so discovery finds it.
    if let Some(bin_dir) = dirs::data_dir().map(|d| d.join("driveget").join("bin")) {
        let sep = if cfg!(windows) { ";" } else { ":" };
        let current = std::env::var("PATH").unwrap_or_default();
        std::env::set_var("PATH", format!("{}{}{}", bin_dir.display(), sep, current));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();
    tracing_subscriber::fmt::init();
    driveget::run().await
}
