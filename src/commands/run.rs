use crate::commands::build_bot;
use crate::transcript::HttpTranscript;
use crate::{Config, Result};
use tracing::info;

/// The poll loop: watch the transcript bridge and answer new messages until
/// the process is terminated.
pub async fn run(config: Config) -> Result<()> {
    let bot = build_bot(&config);
    let transcript = HttpTranscript::new(config.bridge_url())?;
    info!(
        "starting against bridge {} for sheet {}",
        config.bridge_url(),
        config.spreadsheet_id()
    );
    bot.run(&transcript, config.poll_interval()).await
}
