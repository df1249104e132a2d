use std::sync::Arc;

use portfolio_contact_relay::client::{DeliveryChannel, FormField, NotificationKind, SubmitOutcome};
use portfolio_contact_relay::{Config, ContactForm, HostedChannel, RelayChannel};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin send_contact -- --name NAME --email EMAIL --message TEXT\n\
         \x20      [--subject TEXT] [--endpoint URL | --hosted]\n\
         \n\
         --endpoint  relay base URL (default http://localhost:$PORT)\n\
         --hosted    call the hosted email API directly (needs EMAILJS_* env vars)\n"
    );
    std::process::exit(2);
}

fn take_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = Config::from_env()?;

    let channel: Arc<dyn DeliveryChannel> = if args.iter().any(|a| a == "--hosted") {
        let hosted = config.hosted.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "--hosted needs EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and EMAILJS_PUBLIC_KEY"
            )
        })?;
        Arc::new(HostedChannel::new(hosted))
    } else {
        let base = take_value(&args, "--endpoint")
            .unwrap_or_else(|| format!("http://localhost:{}", config.port));
        Arc::new(RelayChannel::new(&base))
    };

    let form = ContactForm::new(channel.clone());
    form.set_field(FormField::Name, take_value(&args, "--name").unwrap_or_default());
    form.set_field(FormField::Email, take_value(&args, "--email").unwrap_or_default());
    form.set_field(FormField::Message, take_value(&args, "--message").unwrap_or_default());
    if let Some(subject) = take_value(&args, "--subject") {
        form.set_field(FormField::Subject, subject);
    }

    println!("> Sending via {} channel...", channel.name());
    match form.submit().await {
        SubmitOutcome::Completed(n) if n.kind == NotificationKind::Success => {
            println!("{} {}", n.title, n.description);
            Ok(())
        }
        SubmitOutcome::Completed(n) => Err(anyhow::anyhow!("{}: {}", n.title, n.description)),
        SubmitOutcome::Ignored => Err(anyhow::anyhow!("a submission is already in flight")),
    }
}
