use clap::Args;
use pingme_core::{
    CheckinLoop, Config, DesktopNotifier, Event, RodioPlayer, StdinReplySource,
    UnrecognizedPolicy,
};

#[derive(Args)]
pub struct StartArgs {
    /// Check-in interval in seconds
    #[arg(short = 'i', long)]
    interval: Option<u64>,
    /// Ping sound file path
    #[arg(short = 's', long)]
    sound: Option<String>,
    /// Check-in message
    #[arg(short = 'm', long)]
    message: Option<String>,
    /// Missed pings before stopping
    #[arg(short = 'n', long)]
    max_misses: Option<u32>,
    /// Seconds to wait for a reply each cycle
    #[arg(long)]
    reply_timeout: Option<u64>,
    /// What to do with a reply that is neither yes nor no
    #[arg(long, value_name = "count-as-miss|abort")]
    on_unrecognized: Option<UnrecognizedPolicy>,
    /// Notification title
    #[arg(long)]
    notification_title: Option<String>,
    /// Notification body
    #[arg(long)]
    notification_message: Option<String>,
    /// Notification timeout in seconds
    #[arg(long)]
    notification_timeout: Option<u64>,
    /// Print engine events as JSON lines instead of status text
    #[arg(long)]
    json: bool,
}

/// Fold CLI flag overrides into the loaded config.
fn apply_overrides(config: &mut Config, args: &StartArgs) {
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }
    if let Some(ref sound) = args.sound {
        config.sound = sound.clone();
    }
    if let Some(ref message) = args.message {
        config.message = message.clone();
    }
    if let Some(max_misses) = args.max_misses {
        config.max_misses = max_misses;
    }
    if let Some(reply_timeout) = args.reply_timeout {
        config.reply_timeout_secs = reply_timeout;
    }
    if let Some(policy) = args.on_unrecognized {
        config.unrecognized_policy = policy;
    }
    if let Some(ref title) = args.notification_title {
        config.notification.title = title.clone();
    }
    if let Some(ref message) = args.notification_message {
        config.notification.message = message.clone();
    }
    if let Some(timeout) = args.notification_timeout {
        config.notification.timeout_secs = timeout;
    }
}

fn print_status(event: &Event) {
    match event {
        Event::CheckinStarted { .. } => {
            println!("Sleep protocol initialized! Dim lights and go to sleep.");
        }
        Event::PingEmitted { message, .. } => println!("{message}"),
        Event::AwaitingReply { .. } => println!("Reply (yes/y/1 for yes, no/n/0 for no):"),
        Event::ReplyTimedOut { .. } => println!("No reply received."),
        Event::MissRecorded {
            missed_pings,
            max_misses,
            ..
        } => println!("Missed pings: {missed_pings}/{max_misses}"),
        Event::CheckinEnded { .. } => println!("Sleep protocol deactivated!"),
        _ => {}
    }
}

pub fn run(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    apply_overrides(&mut config, &args);

    let player = RodioPlayer::new(config.sound.clone());
    let mut engine = CheckinLoop::new(config, StdinReplySource::new(), player, DesktopNotifier);

    let json = args.json;
    let reason = engine.run(|event| {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => log::warn!("failed to serialize event: {e}"),
            }
        } else {
            print_status(event);
        }
    });
    log::debug!("check-in loop ended after {} cycles: {reason:?}", engine.cycles());

    Ok(())
}
